//! Output formatting for the guardmine CLI
//!
//! Human-readable listings and JSON shapes for mined results.

use guardmine_types::{Constraint, EngineResult, FunctionConstraintSet};
use serde_json::{json, Map, Value};

/// Full listing of every function, parameter and value.
pub fn format_result(result: &EngineResult, verbose: bool) -> String {
    let mut out = String::new();
    if result.is_empty() {
        out.push_str("No function declarations found\n");
        return out;
    }

    for (name, set) in result.iter() {
        out.push_str(&format!(
            "\x1b[1m{}\x1b[0m({})\n",
            display_name(name),
            set.parameters.join(", ")
        ));
        for (parameter, constraints) in &set.constraints_by_parameter {
            if constraints.is_empty() {
                out.push_str(&format!("  {}: (no guards)\n", parameter));
                continue;
            }
            out.push_str(&format!("  {}:\n", parameter));
            for constraint in constraints {
                out.push_str(&format_constraint(constraint, verbose));
            }
        }
        out.push('\n');
    }
    out
}

fn format_constraint(constraint: &Constraint, verbose: bool) -> String {
    let mut line = format!("    {:24} [{}]", constraint.value, constraint.kind);
    if verbose {
        if let Some(expr) = &constraint.source_expression_text {
            line.push_str(&format!("  from `{}`", expr));
        }
        if let Some(alternate) = &constraint.alternate_value {
            line.push_str(&format!("  alt {}", alternate));
        }
    }
    line.push('\n');
    line
}

/// One line per function with counts per constraint kind.
pub fn format_summary(result: &EngineResult) -> String {
    let mut out = String::new();
    for (name, set) in result.iter() {
        let counts = set
            .kind_counts()
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{}: {} parameter(s), {} constraint(s)",
            display_name(name),
            set.parameters.len(),
            set.total_constraints()
        ));
        if !counts.is_empty() {
            out.push_str(&format!(" ({})", counts));
        }
        out.push('\n');
    }
    out
}

/// JSON counterpart of [`format_summary`].
pub fn summary_json(result: &EngineResult) -> Value {
    let functions: Map<String, Value> = result
        .iter()
        .map(|(name, set)| (name.clone(), function_summary_json(set)))
        .collect();
    Value::Object(functions)
}

fn function_summary_json(set: &FunctionConstraintSet) -> Value {
    let kinds: Map<String, Value> = set
        .kind_counts()
        .into_iter()
        .map(|(kind, count)| (kind.as_str().to_string(), json!(count)))
        .collect();
    json!({
        "parameters": set.parameters,
        "totalConstraints": set.total_constraints(),
        "kinds": kinds,
    })
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<anonymous>"
    } else {
        name
    }
}
