//! Guard mining over JavaScript function declarations.
//!
//! Finds simple guard conditions on a function's parameters and synthesizes
//! concrete values on both sides of each condition.
//!
//! # Architecture
//!
//! - [`scanner`]: Locates function declarations and drives classification
//! - [`classifier`]: Recognizes guard shapes on single syntax nodes
//! - [`rules`]: Turns a recognized guard into constraints
//! - [`value_gen`]: Seeded boundary, digit and string generation
//! - [`accumulator`]: Per-function constraint collection

pub mod accumulator;
pub mod classifier;
pub mod rules;
pub mod scanner;
pub mod value_gen;

pub use accumulator::ConstraintAccumulator;
pub use classifier::{classify_node, ComparisonOp, FunctionScope, Guard};
pub use rules::{synthesize, Synthesis};
pub use scanner::{mine_source, mine_unit, GuardMiner};
pub use value_gen::SynthesisContext;
