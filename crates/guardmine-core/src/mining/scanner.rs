//! Function scanner.
//!
//! Walks a parsed unit, finds every function declaration, and runs the guard
//! classifier over each declaration's subtree. Guards inside a nested
//! declaration are attributed to every enclosing declaration whose
//! parameters they name.

use guardmine_types::{EngineResult, FunctionConstraintSet};
use tracing::{debug, warn};
use tree_sitter::Node;

use super::accumulator::ConstraintAccumulator;
use super::classifier::{classify_node, FunctionScope, Guard};
use super::rules::{seeded_phone_number, synthesize, PHONE_NUMBER_KEY};
use super::value_gen::SynthesisContext;
use crate::config::MinerConfig;
use crate::errors::MinerError;
use crate::source::{significant_children, walk_preorder, SourceUnit};

const FUNCTION_DECLARATION_KINDS: &[&str] =
    &["function_declaration", "generator_function_declaration"];

/// Parse `source` and mine every function declaration in it.
pub fn mine_source(
    source: &str,
    config: &MinerConfig,
    ctx: &mut SynthesisContext,
) -> Result<EngineResult, MinerError> {
    let unit = SourceUnit::parse(source)?;
    Ok(mine_unit(&unit, config, ctx))
}

/// Mine an already parsed unit.
///
/// Functions are visited in declaration order. A later declaration with the
/// same name replaces the earlier one's constraints.
pub fn mine_unit(
    unit: &SourceUnit,
    config: &MinerConfig,
    ctx: &mut SynthesisContext,
) -> EngineResult {
    let mut declarations = Vec::new();
    walk_preorder(unit.root(), |node| {
        if FUNCTION_DECLARATION_KINDS.contains(&node.kind()) {
            declarations.push(node);
        }
    });

    let mut result = EngineResult::new();
    for declaration in declarations {
        let (name, set) = scan_function(declaration, unit, config, ctx);
        if result.get(&name).is_some() {
            debug!(function = %name, "Replacing earlier declaration with the same name");
        }
        result.insert(name, set);
    }
    result
}

fn scan_function(
    declaration: Node<'_>,
    unit: &SourceUnit,
    config: &MinerConfig,
    ctx: &mut SynthesisContext,
) -> (String, FunctionConstraintSet) {
    let name = declaration
        .child_by_field_name("name")
        .map(|n| unit.node_text(n).to_string())
        .unwrap_or_default();
    let parameters = declared_parameters(declaration, unit, &name);
    let scope = FunctionScope::new(&name, &parameters);

    let mut acc = ConstraintAccumulator::new(parameters.clone());
    for parameter in &parameters {
        if parameter == PHONE_NUMBER_KEY {
            acc.push(seeded_phone_number(&scope, config, ctx));
        }
    }

    let mut skipped = 0usize;
    walk_preorder(declaration, |node| {
        let guard = classify_node(node, unit, &scope);
        if guard == Guard::NoMatch {
            return;
        }
        let synthesis = synthesize(&guard, &scope, config, ctx);
        for e in &synthesis.errors {
            let expression = guard.text().unwrap_or("");
            warn!(function = %name, expression = %expression, error = %e, "Skipping guard");
            skipped += 1;
        }
        acc.extend(synthesis.constraints);
    });

    debug!(
        function = %name,
        parameters = parameters.len(),
        constraints = acc.len(),
        skipped,
        "Scanned function"
    );
    (name, acc.finish())
}

/// Identifier parameters in declaration order. Patterns, defaults and rest
/// parameters have no single name and are left out.
fn declared_parameters(declaration: Node<'_>, unit: &SourceUnit, function: &str) -> Vec<String> {
    let Some(list) = declaration.child_by_field_name("parameters") else {
        return Vec::new();
    };
    significant_children(list)
        .into_iter()
        .filter_map(|param| {
            let text = unit.node_text(param);
            if param.kind() == "identifier" {
                Some(text.to_string())
            } else {
                debug!(
                    function = %function,
                    pattern = %text,
                    kind = param.kind(),
                    "Skipping non-identifier parameter"
                );
                None
            }
        })
        .collect()
}

/// Owns a validated configuration and the random engine for a sequence of
/// mining runs. Every call to [`GuardMiner::mine`] continues the same random
/// stream, so a run over several inputs is reproducible from one seed.
pub struct GuardMiner {
    config: MinerConfig,
    ctx: SynthesisContext,
}

impl GuardMiner {
    pub fn new(config: MinerConfig) -> Result<Self, MinerError> {
        config.validate()?;
        let ctx = match config.seed {
            Some(seed) => SynthesisContext::new(seed),
            None => SynthesisContext::from_entropy(),
        };
        debug!(seed = ctx.seed(), "Guard miner ready");
        Ok(Self { config, ctx })
    }

    /// Seed actually in use, drawn fresh when the configuration had none.
    pub fn seed(&self) -> u64 {
        self.ctx.seed()
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn mine(&mut self, source: &str) -> Result<EngineResult, MinerError> {
        mine_source(source, &self.config, &mut self.ctx)
    }
}
