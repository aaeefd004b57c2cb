//! Synthesis rules: one classified [`Guard`] in, concrete constraints out.
//!
//! Every guard yields values on both sides of its condition where the shape
//! allows it. Values are formatted as source literals.

use guardmine_types::{Constraint, ConstraintKind};

use super::classifier::{ComparisonGuard, FunctionScope, Guard, Operand, NEGATION_OPERATOR};
use super::value_gen::SynthesisContext;
use crate::config::MinerConfig;
use crate::errors::SynthesisError;

/// Synthetic key that `area` comparisons feed.
pub const PHONE_NUMBER_KEY: &str = "phoneNumber";
/// Parameter name that gets single-fixture file values.
pub const FILE_PATH_PARAMETER: &str = "filePath";
/// Probe used when an equality's right side has no string form to perturb.
pub const NOT_A_NUMBER: &str = "NaN";
/// Largest `indexOf` position a probe string is built for.
pub const MAX_INDEX_OF_POSITION: i64 = 1 << 16;

/// Result of applying the rules to one guard. A guard can produce values for
/// one part and fail on another (a relational check on `area` with a bad
/// threshold still yields phone numbers), so both are kept.
#[derive(Debug, Default)]
pub struct Synthesis {
    pub constraints: Vec<Constraint>,
    pub errors: Vec<SynthesisError>,
}

impl Synthesis {
    fn absorb(&mut self, part: Result<Vec<Constraint>, SynthesisError>) {
        match part {
            Ok(constraints) => self.constraints.extend(constraints),
            Err(e) => self.errors.push(e),
        }
    }
}

/// Apply the synthesis rules to `guard`.
pub fn synthesize(
    guard: &Guard,
    scope: &FunctionScope<'_>,
    config: &MinerConfig,
    ctx: &mut SynthesisContext,
) -> Synthesis {
    let mut out = Synthesis::default();
    match guard {
        Guard::NegatedParam { parameter, text } => {
            out.constraints
                .extend(negation_pair(scope, parameter, text, "true", "false"));
        }
        Guard::NegatedMember {
            parameter,
            property,
            text,
        } => {
            let truthy = format!("{{ {}: 'true' }}", property);
            let falsy = format!("{{ {}: 'false' }}", property);
            out.constraints
                .extend(negation_pair(scope, parameter, text, &truthy, &falsy));
        }
        Guard::Comparison(cmp) => {
            if cmp.declared {
                out.absorb(comparison_values(cmp, scope, config, ctx));
            }
            if cmp.is_area_check() {
                out.absorb(area_phone_numbers(cmp, scope, config, ctx));
            }
        }
        Guard::IndexOf {
            parameter,
            needle,
            operator,
            position,
            text,
        } => {
            out.absorb(index_of_strings(
                scope,
                parameter,
                needle,
                operator.as_str(),
                position,
                text,
                ctx,
            ));
        }
        Guard::ExistsCheck { parameter, text } => {
            let values: &[&str] = if parameter == FILE_PATH_PARAMETER {
                &["file"]
            } else {
                &["emptyDir", "nonEmptyDir"]
            };
            out.constraints.extend(fixture_values(
                scope,
                parameter,
                text,
                ConstraintKind::FileExists,
                values,
            ));
        }
        Guard::ReadCheck { parameter, text } => {
            let values: Vec<&str> = if parameter == FILE_PATH_PARAMETER {
                vec![config.file_fixture.as_str()]
            } else {
                vec![config.file_fixture.as_str(), config.dir_fixture.as_str()]
            };
            out.constraints.extend(fixture_values(
                scope,
                parameter,
                text,
                ConstraintKind::FileWithContent,
                &values,
            ));
        }
        Guard::NoMatch => {}
    }
    out
}

/// The constraint every `phoneNumber` parameter starts with.
pub fn seeded_phone_number(
    scope: &FunctionScope<'_>,
    config: &MinerConfig,
    ctx: &mut SynthesisContext,
) -> Constraint {
    Constraint::new(
        scope.name,
        PHONE_NUMBER_KEY,
        ConstraintKind::PhoneNumber,
        ctx.random_digits(config.phone_number_len),
    )
}

// The boolean label mismatch is part of the output contract.
fn negation_pair(
    scope: &FunctionScope<'_>,
    parameter: &str,
    text: &str,
    truthy: &str,
    falsy: &str,
) -> Vec<Constraint> {
    [truthy, falsy]
        .into_iter()
        .map(|value| {
            Constraint::new(scope.name, parameter, ConstraintKind::Integer, value)
                .with_operator(NEGATION_OPERATOR)
                .with_expression(text)
        })
        .collect()
}

fn comparison_values(
    cmp: &ComparisonGuard,
    scope: &FunctionScope<'_>,
    config: &MinerConfig,
    ctx: &mut SynthesisContext,
) -> Result<Vec<Constraint>, SynthesisError> {
    let constraint = |kind: ConstraintKind, value: String| {
        Constraint::new(scope.name, &cmp.identifier, kind, value)
            .with_operator(cmp.operator.as_str())
            .with_expression(&cmp.text)
    };

    if cmp.operator.is_equality() {
        let (kind, probe) = match cmp.right.string_contents() {
            Some(contents) => (
                ConstraintKind::String,
                single_quoted(&format!("NEQ - {}", contents)),
            ),
            None => (ConstraintKind::Integer, NOT_A_NUMBER.to_string()),
        };
        return Ok(vec![
            constraint(kind, cmp.right.text.clone()),
            constraint(kind, probe),
        ]);
    }

    let threshold = numeric_operand(&cmp.right)?;
    let above = ctx.boundary_integer(threshold, config.boundary_span, true)?;
    let below = ctx.boundary_integer(threshold, config.boundary_span, false)?;
    Ok(vec![
        constraint(ConstraintKind::Integer, above.to_string()),
        constraint(ConstraintKind::Integer, below.to_string()),
    ])
}

fn area_phone_numbers(
    cmp: &ComparisonGuard,
    scope: &FunctionScope<'_>,
    config: &MinerConfig,
    ctx: &mut SynthesisContext,
) -> Result<Vec<Constraint>, SynthesisError> {
    let area = cmp
        .right
        .literal_value()
        .ok_or_else(|| SynthesisError::NonLiteralOperand {
            text: cmp.right.text.clone(),
        })?;
    let with_area = ctx.phone_number_with_prefix(area, config.phone_number_len);
    let random = ctx.random_digits(config.phone_number_len);

    Ok([with_area, random]
        .into_iter()
        .map(|value| {
            Constraint::new(scope.name, PHONE_NUMBER_KEY, ConstraintKind::PhoneNumber, value)
                .with_operator(cmp.operator.as_str())
                .with_expression(&cmp.text)
        })
        .collect())
}

// Length-based placement only approximates "needle at index N".
fn index_of_strings(
    scope: &FunctionScope<'_>,
    parameter: &str,
    needle: &Operand,
    operator: &str,
    position: &Operand,
    text: &str,
    ctx: &mut SynthesisContext,
) -> Result<Vec<Constraint>, SynthesisError> {
    let needle = needle
        .literal_value()
        .ok_or_else(|| SynthesisError::NonLiteralOperand {
            text: needle.text.clone(),
        })?;
    let index = numeric_operand(position)?;
    if index > MAX_INDEX_OF_POSITION {
        return Err(SynthesisError::ThresholdOutOfRange {
            text: position.text.clone(),
        });
    }
    // Negative positions (the usual `!== -1`) get an empty prefix.
    let at = usize::try_from(index).unwrap_or(0);

    let found = format!("{}{}", ctx.random_string_of_length(at), needle);
    let shifted = format!("{}{}", ctx.random_string_of_length(at + 1), needle);

    Ok([found, shifted]
        .into_iter()
        .map(|value| {
            Constraint::new(scope.name, parameter, ConstraintKind::String, single_quoted(&value))
                .with_operator(operator)
                .with_expression(text)
        })
        .collect())
}

fn fixture_values(
    scope: &FunctionScope<'_>,
    parameter: &str,
    text: &str,
    kind: ConstraintKind,
    values: &[&str],
) -> Vec<Constraint> {
    values
        .iter()
        .map(|value| {
            Constraint::new(scope.name, parameter, kind, single_quoted(value)).with_expression(text)
        })
        .collect()
}

/// Integer value of an operand; string literals are read by their contents.
fn numeric_operand(operand: &Operand) -> Result<i64, SynthesisError> {
    let text = operand.literal_value().unwrap_or(&operand.text);
    parse_int(text).ok_or_else(|| SynthesisError::NonNumericThreshold {
        text: operand.text.clone(),
    })
}

/// Wrap `raw` in single quotes, escaping quotes that are not already escaped.
/// `raw` is source text, so existing escape sequences are kept as written.
pub fn single_quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    let mut escaped = false;
    for c in raw.chars() {
        if c == '\'' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    if escaped {
        // A dangling backslash would swallow the closing quote.
        out.push('\\');
    }
    out.push('\'');
    out
}

/// Integer prefix of `text`, read the way JavaScript's `parseInt` reads it:
/// optional sign, then a `0x` hex literal or decimal digits. Trailing
/// characters are ignored. `None` when there are no digits or the value does
/// not fit in an i64.
pub fn parse_int(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed[1..].trim_start()),
        Some(b'+') => (false, trimmed[1..].trim_start()),
        _ => (false, trimmed),
    };

    let (radix, body) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };
    let digits: &str = {
        let end = body
            .char_indices()
            .find(|(_, c)| !c.is_digit(radix))
            .map(|(i, _)| i)
            .unwrap_or(body.len());
        &body[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::classifier::{ComparisonOp, Literal};

    fn scope_for<'a>(params: &'a [String]) -> FunctionScope<'a> {
        FunctionScope::new("f", params)
    }

    fn comparison(identifier: &str, declared: bool, op: ComparisonOp, right: &str) -> Guard {
        let literal = if right.starts_with('\'') {
            Some(Literal::Str(right.trim_matches('\'').to_string()))
        } else if right.parse::<i64>().is_ok() {
            Some(Literal::Bare(right.to_string()))
        } else {
            None
        };
        Guard::Comparison(ComparisonGuard {
            identifier: identifier.into(),
            declared,
            operator: op,
            right: Operand {
                text: right.into(),
                literal,
            },
            text: format!("{} {} {}", identifier, op.as_str(), right),
        })
    }

    fn values(synthesis: &Synthesis) -> Vec<&str> {
        synthesis
            .constraints
            .iter()
            .map(|c| c.value.as_str())
            .collect()
    }

    #[test]
    fn test_negated_param_values() {
        let params = vec!["p".to_string()];
        let mut ctx = SynthesisContext::new(1);
        let guard = Guard::NegatedParam {
            parameter: "p".into(),
            text: "!p".into(),
        };
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert_eq!(values(&out), vec!["true", "false"]);
        assert!(out
            .constraints
            .iter()
            .all(|c| c.kind == ConstraintKind::Integer && c.operator.as_deref() == Some("!")));
    }

    #[test]
    fn test_negated_member_values() {
        let params = vec!["o".to_string()];
        let mut ctx = SynthesisContext::new(1);
        let guard = Guard::NegatedMember {
            parameter: "o".into(),
            property: "ready".into(),
            text: "!o.ready".into(),
        };
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert_eq!(
            values(&out),
            vec!["{ ready: 'true' }", "{ ready: 'false' }"]
        );
    }

    #[test]
    fn test_string_equality_probe() {
        let params = vec!["x".to_string()];
        let mut ctx = SynthesisContext::new(1);
        let guard = comparison("x", true, ComparisonOp::StrictEq, "'foo'");
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert_eq!(values(&out), vec!["'foo'", "'NEQ - foo'"]);
        assert!(out.constraints.iter().all(|c| c.kind == ConstraintKind::String));
    }

    #[test]
    fn test_numeric_equality_probe_is_nan() {
        let params = vec!["x".to_string()];
        let mut ctx = SynthesisContext::new(1);
        let guard = comparison("x", true, ComparisonOp::NotEq, "3");
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert_eq!(values(&out), vec!["3", "NaN"]);
    }

    #[test]
    fn test_relational_boundaries() {
        let params = vec!["x".to_string()];
        let mut ctx = SynthesisContext::new(5);
        for op in [ComparisonOp::Lt, ComparisonOp::Le, ComparisonOp::Gt, ComparisonOp::Ge] {
            let guard = comparison("x", true, op, "5");
            let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
            assert_eq!(out.constraints.len(), 2);
            let above: i64 = out.constraints[0].value.parse().unwrap();
            let below: i64 = out.constraints[1].value.parse().unwrap();
            assert!((6..=15).contains(&above));
            assert!((-5..=4).contains(&below));
        }
    }

    #[test]
    fn test_relational_non_numeric_threshold_is_reported() {
        let params = vec!["x".to_string()];
        let mut ctx = SynthesisContext::new(5);
        let guard = comparison("x", true, ComparisonOp::Lt, "LIMIT");
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert!(out.constraints.is_empty());
        assert_eq!(
            out.errors,
            vec![SynthesisError::NonNumericThreshold {
                text: "LIMIT".into()
            }]
        );
    }

    #[test]
    fn test_area_feeds_phone_number_key() {
        let params = vec!["phone".to_string()];
        let mut ctx = SynthesisContext::new(9);
        let guard = comparison("area", false, ComparisonOp::Eq, "'415'");
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert_eq!(out.constraints.len(), 2);
        assert!(out.constraints.iter().all(|c| c.parameter_id == PHONE_NUMBER_KEY
            && c.kind == ConstraintKind::PhoneNumber
            && c.value.len() == 10
            && c.value.chars().all(|ch| ch.is_ascii_digit())));
        assert!(out.constraints[0].value.starts_with("415"));
    }

    #[test]
    fn test_declared_area_gets_both_rule_sets() {
        let params = vec!["area".to_string()];
        let mut ctx = SynthesisContext::new(9);
        let guard = comparison("area", true, ComparisonOp::StrictEq, "'212'");
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        let keys: Vec<&str> = out
            .constraints
            .iter()
            .map(|c| c.parameter_id.as_str())
            .collect();
        assert_eq!(keys, vec!["area", "area", "phoneNumber", "phoneNumber"]);
    }

    #[test]
    fn test_index_of_lengths() {
        let params = vec!["s".to_string()];
        let mut ctx = SynthesisContext::new(2);
        let guard = Guard::IndexOf {
            parameter: "s".into(),
            needle: Operand {
                text: "'ab'".into(),
                literal: Some(Literal::Str("ab".into())),
            },
            operator: ComparisonOp::StrictEq,
            position: Operand {
                text: "3".into(),
                literal: Some(Literal::Bare("3".into())),
            },
            text: "s.indexOf('ab') === 3".into(),
        };
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        let lens: Vec<usize> = out.constraints.iter().map(|c| c.value.len()).collect();
        // quotes + prefix + needle
        assert_eq!(lens, vec![2 + 3 + 2, 2 + 4 + 2]);
        assert!(out.constraints.iter().all(|c| c.value.ends_with("ab'")));
    }

    #[test]
    fn test_index_of_negative_position() {
        let params = vec!["s".to_string()];
        let mut ctx = SynthesisContext::new(2);
        let guard = Guard::IndexOf {
            parameter: "s".into(),
            needle: Operand {
                text: "'x'".into(),
                literal: Some(Literal::Str("x".into())),
            },
            operator: ComparisonOp::StrictNotEq,
            position: Operand {
                text: "-1".into(),
                literal: Some(Literal::Bare("-1".into())),
            },
            text: "s.indexOf('x') !== -1".into(),
        };
        let out = synthesize(&guard, &scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert_eq!(out.constraints[0].value, "'x'");
        assert_eq!(out.constraints[1].value.len(), 4);
    }

    #[test]
    fn test_exists_check_values() {
        let params = vec!["dirArg".to_string(), "filePath".to_string()];
        let mut ctx = SynthesisContext::new(1);
        let config = MinerConfig::default();

        let dir = Guard::ExistsCheck {
            parameter: "dirArg".into(),
            text: "fs.existsSync(dirArg)".into(),
        };
        let out = synthesize(&dir, &scope_for(&params), &config, &mut ctx);
        assert_eq!(values(&out), vec!["'emptyDir'", "'nonEmptyDir'"]);

        let file = Guard::ExistsCheck {
            parameter: "filePath".into(),
            text: "fs.existsSync(filePath)".into(),
        };
        let out = synthesize(&file, &scope_for(&params), &config, &mut ctx);
        assert_eq!(values(&out), vec!["'file'"]);
        assert_eq!(out.constraints[0].kind, ConstraintKind::FileExists);
    }

    #[test]
    fn test_read_check_uses_configured_fixtures() {
        let params = vec!["src".to_string()];
        let mut ctx = SynthesisContext::new(1);
        let config = MinerConfig {
            file_fixture: "/tmp/a.txt".into(),
            dir_fixture: "/tmp/d".into(),
            ..Default::default()
        };
        let guard = Guard::ReadCheck {
            parameter: "src".into(),
            text: "readFileSync(src)".into(),
        };
        let out = synthesize(&guard, &scope_for(&params), &config, &mut ctx);
        assert_eq!(values(&out), vec!["'/tmp/a.txt'", "'/tmp/d'"]);
        assert!(out
            .constraints
            .iter()
            .all(|c| c.kind == ConstraintKind::FileWithContent));
    }

    #[test]
    fn test_seeded_phone_number() {
        let params = vec!["phoneNumber".to_string()];
        let mut ctx = SynthesisContext::new(4);
        let c = seeded_phone_number(&scope_for(&params), &MinerConfig::default(), &mut ctx);
        assert_eq!(c.parameter_id, "phoneNumber");
        assert_eq!(c.value.len(), 10);
        assert!(c.operator.is_none());
        assert!(c.source_expression_text.is_none());
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(single_quoted("abc"), "'abc'");
        assert_eq!(single_quoted("it's"), "'it\\'s'");
        assert_eq!(single_quoted("it\\'s"), "'it\\'s'");
        assert_eq!(single_quoted("trail\\"), "'trail\\\\'");
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("5"), Some(5));
        assert_eq!(parse_int(" -12 "), Some(-12));
        assert_eq!(parse_int("5.9"), Some(5));
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("1e3"), Some(1));
        assert_eq!(parse_int("LIMIT"), None);
        assert_eq!(parse_int("'7'"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }
}
