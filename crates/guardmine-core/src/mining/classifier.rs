//! Guard classification.
//!
//! Looks at one syntax node at a time and decides whether it is one of the
//! guard shapes the miner understands. Recognized shapes become a [`Guard`]
//! carrying the fields the synthesis rules need; everything else is
//! [`Guard::NoMatch`].

use tree_sitter::Node;

use crate::source::{significant_children, unparenthesize, SourceUnit};

/// Identifier whose comparisons are read as phone area-code checks.
pub const AREA_IDENTIFIER: &str = "area";

/// The function a node is being classified in.
#[derive(Debug, Clone, Copy)]
pub struct FunctionScope<'a> {
    pub name: &'a str,
    pub parameters: &'a [String],
}

impl<'a> FunctionScope<'a> {
    pub fn new(name: &'a str, parameters: &'a [String]) -> Self {
        Self { name, parameters }
    }

    pub fn declares(&self, identifier: &str) -> bool {
        self.parameters.iter().any(|p| p == identifier)
    }
}

/// Comparison operators a guard may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(ComparisonOp::Eq),
            "===" => Some(ComparisonOp::StrictEq),
            "!=" => Some(ComparisonOp::NotEq),
            "!==" => Some(ComparisonOp::StrictNotEq),
            "<" => Some(ComparisonOp::Lt),
            "<=" => Some(ComparisonOp::Le),
            ">" => Some(ComparisonOp::Gt),
            ">=" => Some(ComparisonOp::Ge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::StrictEq => "===",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::StrictNotEq => "!==",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            ComparisonOp::Eq | ComparisonOp::StrictEq | ComparisonOp::NotEq | ComparisonOp::StrictNotEq
        )
    }
}

/// An operand as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// Verbatim text, quotes included.
    pub text: String,
    pub literal: Option<Literal>,
}

/// Literal operands the rules can read a value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Quoted string; holds the raw text between the quotes.
    Str(String),
    /// Anything else that evaluates to itself: numbers, booleans, `null`,
    /// `undefined`, and negated numbers.
    Bare(String),
}

impl Operand {
    /// The literal's value as a string, if the operand is a literal.
    pub fn literal_value(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Str(s)) | Some(Literal::Bare(s)) => Some(s),
            None => None,
        }
    }

    /// Contents of a quoted string literal.
    pub fn string_contents(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Str(s)) => Some(s),
            _ => None,
        }
    }
}

/// `<identifier> <op> <right>` guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonGuard {
    pub identifier: String,
    /// Whether `identifier` is a parameter of the enclosing function.
    pub declared: bool,
    pub operator: ComparisonOp,
    pub right: Operand,
    pub text: String,
}

impl ComparisonGuard {
    pub fn is_area_check(&self) -> bool {
        self.identifier == AREA_IDENTIFIER
    }
}

/// A recognized guard shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// `!param`
    NegatedParam { parameter: String, text: String },
    /// `!param.property`
    NegatedMember {
        parameter: String,
        property: String,
        text: String,
    },
    /// `ident <op> literal`, where `ident` is a parameter or `area`.
    Comparison(ComparisonGuard),
    /// `param.indexOf(needle) <op> position`
    IndexOf {
        parameter: String,
        needle: Operand,
        operator: ComparisonOp,
        position: Operand,
        text: String,
    },
    /// `existsSync(param)` / `fs.existsSync(param)`
    ExistsCheck { parameter: String, text: String },
    /// `readFileSync(param)` / `fs.readFileSync(param)`
    ReadCheck { parameter: String, text: String },
    NoMatch,
}

impl Guard {
    /// Source text of the guarded expression, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Guard::NegatedParam { text, .. }
            | Guard::NegatedMember { text, .. }
            | Guard::IndexOf { text, .. }
            | Guard::ExistsCheck { text, .. }
            | Guard::ReadCheck { text, .. } => Some(text),
            Guard::Comparison(cmp) => Some(&cmp.text),
            Guard::NoMatch => None,
        }
    }
}

/// Operator recorded on negation constraints.
pub const NEGATION_OPERATOR: &str = "!";

/// Classify a single node. Only the node itself is examined; descendants are
/// classified when the scanner reaches them.
pub fn classify_node(node: Node<'_>, unit: &SourceUnit, scope: &FunctionScope<'_>) -> Guard {
    match node.kind() {
        "unary_expression" => classify_negation(node, unit, scope),
        "binary_expression" => classify_comparison(node, unit, scope),
        "call_expression" => classify_fs_call(node, unit, scope),
        _ => Guard::NoMatch,
    }
}

fn classify_negation(node: Node<'_>, unit: &SourceUnit, scope: &FunctionScope<'_>) -> Guard {
    let Some(operator) = node.child_by_field_name("operator") else {
        return Guard::NoMatch;
    };
    if unit.node_text(operator) != NEGATION_OPERATOR {
        return Guard::NoMatch;
    }
    let Some(argument) = node.child_by_field_name("argument").map(unparenthesize) else {
        return Guard::NoMatch;
    };
    let text = unit.node_text(node).to_string();

    match argument.kind() {
        "identifier" => {
            let name = unit.node_text(argument);
            if scope.declares(name) {
                Guard::NegatedParam {
                    parameter: name.to_string(),
                    text,
                }
            } else {
                Guard::NoMatch
            }
        }
        "member_expression" => {
            let object = argument.child_by_field_name("object").map(unparenthesize);
            let property = argument.child_by_field_name("property");
            match (object, property) {
                (Some(object), Some(property))
                    if object.kind() == "identifier" && scope.declares(unit.node_text(object)) =>
                {
                    Guard::NegatedMember {
                        parameter: unit.node_text(object).to_string(),
                        property: unit.node_text(property).to_string(),
                        text,
                    }
                }
                _ => Guard::NoMatch,
            }
        }
        _ => Guard::NoMatch,
    }
}

fn classify_comparison(node: Node<'_>, unit: &SourceUnit, scope: &FunctionScope<'_>) -> Guard {
    let (Some(left), Some(operator), Some(right)) = (
        node.child_by_field_name("left").map(unparenthesize),
        node.child_by_field_name("operator"),
        node.child_by_field_name("right").map(unparenthesize),
    ) else {
        return Guard::NoMatch;
    };
    let Some(operator) = ComparisonOp::from_token(unit.node_text(operator)) else {
        return Guard::NoMatch;
    };
    let text = unit.node_text(node).to_string();

    match left.kind() {
        "identifier" => {
            let identifier = unit.node_text(left);
            let declared = scope.declares(identifier);
            if !declared && identifier != AREA_IDENTIFIER {
                return Guard::NoMatch;
            }
            Guard::Comparison(ComparisonGuard {
                identifier: identifier.to_string(),
                declared,
                operator,
                right: read_operand(right, unit),
                text,
            })
        }
        "call_expression" => {
            let Some((Some(receiver), method)) = callee(left, unit) else {
                return Guard::NoMatch;
            };
            if method != "indexOf" || receiver.kind() != "identifier" {
                return Guard::NoMatch;
            }
            let parameter = unit.node_text(receiver);
            if !scope.declares(parameter) {
                return Guard::NoMatch;
            }
            let Some(needle) = sole_argument(left) else {
                return Guard::NoMatch;
            };
            Guard::IndexOf {
                parameter: parameter.to_string(),
                needle: read_operand(needle, unit),
                operator,
                position: read_operand(right, unit),
                text,
            }
        }
        _ => Guard::NoMatch,
    }
}

fn classify_fs_call(node: Node<'_>, unit: &SourceUnit, scope: &FunctionScope<'_>) -> Guard {
    let Some((_, method)) = callee(node, unit) else {
        return Guard::NoMatch;
    };
    if method != "existsSync" && method != "readFileSync" {
        return Guard::NoMatch;
    }
    let Some(argument) = sole_argument(node) else {
        return Guard::NoMatch;
    };
    if argument.kind() != "identifier" || !scope.declares(unit.node_text(argument)) {
        return Guard::NoMatch;
    }

    let parameter = unit.node_text(argument).to_string();
    let text = unit.node_text(node).to_string();
    if method == "existsSync" {
        Guard::ExistsCheck { parameter, text }
    } else {
        Guard::ReadCheck { parameter, text }
    }
}

/// Receiver (for member calls) and method name of a call expression.
fn callee<'t>(call: Node<'t>, unit: &'t SourceUnit) -> Option<(Option<Node<'t>>, &'t str)> {
    if call.kind() != "call_expression" {
        return None;
    }
    let function = unparenthesize(call.child_by_field_name("function")?);
    match function.kind() {
        "member_expression" => {
            let object = function.child_by_field_name("object").map(unparenthesize);
            let property = function.child_by_field_name("property")?;
            Some((object, unit.node_text(property)))
        }
        "identifier" => Some((None, unit.node_text(function))),
        _ => None,
    }
}

/// The only argument of a call, looking through parentheses. `None` for
/// zero or several arguments, spreads, and tagged templates.
fn sole_argument(call: Node<'_>) -> Option<Node<'_>> {
    let arguments = call.child_by_field_name("arguments")?;
    if arguments.kind() != "arguments" {
        return None;
    }
    match significant_children(arguments).as_slice() {
        [only] if only.kind() != "spread_element" => Some(unparenthesize(*only)),
        _ => None,
    }
}

fn read_operand(node: Node<'_>, unit: &SourceUnit) -> Operand {
    let text = unit.node_text(node).to_string();
    let literal = match node.kind() {
        "string" => Some(Literal::Str(strip_quotes(&text).to_string())),
        "template_string" if !has_substitution(node) => {
            Some(Literal::Str(strip_quotes(&text).to_string()))
        }
        "number" | "true" | "false" | "null" | "undefined" => Some(Literal::Bare(text.clone())),
        "unary_expression" if is_signed_number(node, unit) => Some(Literal::Bare(text.clone())),
        _ => None,
    };
    Operand { text, literal }
}

fn strip_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '\'' | '"' | '`') => {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

fn has_substitution(template: Node<'_>) -> bool {
    significant_children(template)
        .iter()
        .any(|child| child.kind() == "template_substitution")
}

fn is_signed_number(node: Node<'_>, unit: &SourceUnit) -> bool {
    let operator = node
        .child_by_field_name("operator")
        .map(|op| unit.node_text(op));
    let argument = node.child_by_field_name("argument").map(unparenthesize);
    matches!(operator, Some("-") | Some("+"))
        && argument.map(|a| a.kind() == "number").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::walk_preorder;

    /// Classify every node of `source` with parameters `params` and return
    /// the recognized guards in traversal order.
    fn guards(source: &str, params: &[&str]) -> Vec<Guard> {
        let unit = SourceUnit::parse(source).unwrap();
        let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        let scope = FunctionScope::new("f", &params);
        let mut found = Vec::new();
        walk_preorder(unit.root(), |node| {
            let guard = classify_node(node, &unit, &scope);
            if guard != Guard::NoMatch {
                found.push(guard);
            }
        });
        found
    }

    #[test]
    fn test_negated_param() {
        let found = guards("function f(p) { if (!p) return; }", &["p"]);
        assert_eq!(
            found,
            vec![Guard::NegatedParam {
                parameter: "p".into(),
                text: "!p".into()
            }]
        );
    }

    #[test]
    fn test_negation_of_unknown_identifier_is_ignored() {
        assert!(guards("function f(p) { if (!q) return; }", &["p"]).is_empty());
    }

    #[test]
    fn test_negated_member() {
        let found = guards("function f(opts) { if (!opts.verbose) {} }", &["opts"]);
        assert_eq!(
            found,
            vec![Guard::NegatedMember {
                parameter: "opts".into(),
                property: "verbose".into(),
                text: "!opts.verbose".into(),
            }]
        );
    }

    #[test]
    fn test_parenthesized_negation() {
        let found = guards("function f(p) { if (!(p)) {} }", &["p"]);
        assert!(matches!(found.as_slice(), [Guard::NegatedParam { .. }]));
    }

    #[test]
    fn test_string_equality() {
        let found = guards("function f(x) { if (x === 'foo') {} }", &["x"]);
        let [Guard::Comparison(cmp)] = found.as_slice() else {
            panic!("expected one comparison, got {found:?}");
        };
        assert!(cmp.declared);
        assert_eq!(cmp.operator, ComparisonOp::StrictEq);
        assert_eq!(cmp.right.text, "'foo'");
        assert_eq!(cmp.right.string_contents(), Some("foo"));
        assert_eq!(cmp.text, "x === 'foo'");
    }

    #[test]
    fn test_negative_number_operand() {
        let found = guards("function f(x) { if (x >= -3) {} }", &["x"]);
        let [Guard::Comparison(cmp)] = found.as_slice() else {
            panic!("expected one comparison, got {found:?}");
        };
        assert_eq!(cmp.right.literal, Some(Literal::Bare("-3".into())));
    }

    #[test]
    fn test_area_comparison_without_parameter() {
        let found = guards("function f(phone) { if (area == '415') {} }", &["phone"]);
        let [Guard::Comparison(cmp)] = found.as_slice() else {
            panic!("expected one comparison, got {found:?}");
        };
        assert!(!cmp.declared);
        assert!(cmp.is_area_check());
    }

    #[test]
    fn test_comparison_on_unknown_identifier_is_ignored() {
        assert!(guards("function f(x) { if (y < 3) {} }", &["x"]).is_empty());
    }

    #[test]
    fn test_non_comparison_operator_is_ignored() {
        assert!(guards("function f(x) { return x + 1; }", &["x"]).is_empty());
    }

    #[test]
    fn test_index_of() {
        let found = guards("function f(s) { if (s.indexOf('ab') === 2) {} }", &["s"]);
        let [Guard::IndexOf {
            parameter,
            needle,
            position,
            ..
        }] = found.as_slice()
        else {
            panic!("expected indexOf guard, got {found:?}");
        };
        assert_eq!(parameter, "s");
        assert_eq!(needle.string_contents(), Some("ab"));
        assert_eq!(position.text, "2");
    }

    #[test]
    fn test_index_of_on_other_receiver_is_ignored() {
        assert!(guards("function f(s) { if (t.indexOf('a') > 0) {} }", &["s"]).is_empty());
    }

    #[test]
    fn test_exists_sync_member_and_bare() {
        let found = guards(
            "function f(dir) { fs.existsSync(dir); existsSync(dir); }",
            &["dir"],
        );
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|g| matches!(g, Guard::ExistsCheck { parameter, .. } if parameter == "dir")));
    }

    #[test]
    fn test_read_file_sync_requires_parameter_argument() {
        let found = guards(
            "function f(p) { fs.readFileSync(p); fs.readFileSync('x'); fs.readFileSync(p, 'utf8'); }",
            &["p"],
        );
        assert_eq!(
            found,
            vec![Guard::ReadCheck {
                parameter: "p".into(),
                text: "fs.readFileSync(p)".into()
            }]
        );
    }

    #[test]
    fn test_other_calls_are_ignored() {
        assert!(guards("function f(p) { fs.statSync(p); p.includes('x'); }", &["p"]).is_empty());
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'abc'"), "abc");
        assert_eq!(strip_quotes("\"abc\""), "abc");
        assert_eq!(strip_quotes("`abc`"), "abc");
        assert_eq!(strip_quotes("42"), "42");
    }
}
