//! Per-function constraint accumulation.

use guardmine_types::{Constraint, FunctionConstraintSet};

/// Append-only builder for one function's [`FunctionConstraintSet`].
///
/// Every declared parameter gets an empty list up front. Constraints are kept
/// in the order they are pushed, with no deduplication.
#[derive(Debug)]
pub struct ConstraintAccumulator {
    set: FunctionConstraintSet,
}

impl ConstraintAccumulator {
    pub fn new(parameters: Vec<String>) -> Self {
        let constraints_by_parameter = parameters
            .iter()
            .map(|p| (p.clone(), Vec::new()))
            .collect();
        Self {
            set: FunctionConstraintSet {
                parameters,
                constraints_by_parameter,
            },
        }
    }

    /// Append under the constraint's own `parameter_id`, creating the key for
    /// synthetic parameters.
    pub fn push(&mut self, constraint: Constraint) {
        self.set
            .constraints_by_parameter
            .entry(constraint.parameter_id.clone())
            .or_default()
            .push(constraint);
    }

    pub fn extend(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        for constraint in constraints {
            self.push(constraint);
        }
    }

    pub fn len(&self) -> usize {
        self.set.total_constraints()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn finish(self) -> FunctionConstraintSet {
        self.set
    }
}
