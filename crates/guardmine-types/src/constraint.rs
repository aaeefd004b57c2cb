//! Constraint records and the per-function / per-unit containers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a constraint's value is meant to drive.
///
/// Boolean negation guards are labelled [`ConstraintKind::Integer`]; consumers
/// of the output depend on that label, so it is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    /// A path to a fixture whose contents will be read.
    FileWithContent,
    /// A fixture name whose existence is checked.
    FileExists,
    Integer,
    String,
    /// A bare 10-digit numeral.
    PhoneNumber,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 5] = [
        ConstraintKind::FileWithContent,
        ConstraintKind::FileExists,
        ConstraintKind::Integer,
        ConstraintKind::String,
        ConstraintKind::PhoneNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::FileWithContent => "fileWithContent",
            ConstraintKind::FileExists => "fileExists",
            ConstraintKind::Integer => "integer",
            ConstraintKind::String => "string",
            ConstraintKind::PhoneNumber => "phoneNumber",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesized candidate value for one parameter under one guard.
///
/// `value` is already source-level literal text: quoted strings carry their
/// quotes, numbers and booleans are bare, so it can be substituted directly
/// into a generated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    /// Parameter (or synthetic key) the value is for.
    pub parameter_id: String,
    /// Verbatim text of the guard. Absent for seeded constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_expression_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_value: Option<String>,
    pub function_name: String,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(
        function_name: impl Into<String>,
        parameter_id: impl Into<String>,
        kind: ConstraintKind,
        value: impl Into<String>,
    ) -> Self {
        Self {
            parameter_id: parameter_id.into(),
            source_expression_text: None,
            operator: None,
            value: value.into(),
            alternate_value: None,
            function_name: function_name.into(),
            kind,
        }
    }

    /// Attach the operator of the triggering guard.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Attach the verbatim guard text.
    pub fn with_expression(mut self, text: impl Into<String>) -> Self {
        self.source_expression_text = Some(text.into());
        self
    }

    pub fn with_alternate(mut self, value: impl Into<String>) -> Self {
        self.alternate_value = Some(value.into());
        self
    }
}

/// Everything mined for one function declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionConstraintSet {
    /// Declared parameter identifiers, in order. Duplicates are kept.
    pub parameters: Vec<String>,
    /// Constraints per parameter in discovery order. Every declared parameter
    /// has an entry; synthetic keys such as `phoneNumber` may appear too.
    pub constraints_by_parameter: IndexMap<String, Vec<Constraint>>,
}

impl FunctionConstraintSet {
    /// Constraints mined for `parameter`, empty when the key is unknown.
    pub fn constraints_for(&self, parameter: &str) -> &[Constraint] {
        self.constraints_by_parameter
            .get(parameter)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_constraints(&self) -> usize {
        self.constraints_by_parameter.values().map(Vec::len).sum()
    }

    /// Number of constraints of each kind, in [`ConstraintKind::ALL`] order.
    /// Kinds with no constraints are left out.
    pub fn kind_counts(&self) -> Vec<(ConstraintKind, usize)> {
        ConstraintKind::ALL
            .iter()
            .filter_map(|kind| {
                let count = self
                    .constraints_by_parameter
                    .values()
                    .flatten()
                    .filter(|c| c.kind == *kind)
                    .count();
                (count > 0).then_some((*kind, count))
            })
            .collect()
    }
}

/// Mining output for one source unit: function name to constraint set, in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineResult {
    functions: IndexMap<String, FunctionConstraintSet>,
}

impl EngineResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the set for `name`. A later declaration with the same name
    /// replaces the earlier set but keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, set: FunctionConstraintSet) {
        self.functions.insert(name.into(), set);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionConstraintSet> {
        self.functions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FunctionConstraintSet)> {
        self.functions.iter()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Keep only the function called `name`.
    pub fn retain_function(&mut self, name: &str) {
        self.functions.retain(|k, _| k == name);
    }
}
