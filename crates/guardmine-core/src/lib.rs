//! Guardmine Core
//!
//! Static guard mining for JavaScript sources.
//!
//! Parses a source unit with tree-sitter, finds the parameter checks inside
//! each function declaration (negations, comparisons, `indexOf` probes, file
//! system calls) and produces candidate argument values that land on both
//! sides of every check.
//!
//! # Core Modules
//!
//! - [`source`]: Parsing and syntax tree traversal
//! - [`mining`]: Scanner, guard classifier and value synthesis
//! - [`config`]: Miner configuration with environment overrides
//! - [`errors`]: Parse and synthesis errors
//!
//! # Example
//!
//! ```ignore
//! use guardmine_core::{GuardMiner, MinerConfig};
//!
//! let mut miner = GuardMiner::new(MinerConfig::default().with_seed(7))?;
//! let result = miner.mine("function f(x) { if (x < 5) return; }")?;
//! for constraint in result.get("f").unwrap().constraints_for("x") {
//!     println!("{}", constraint.value);
//! }
//! ```

pub mod config;
pub mod errors;
pub mod mining;
pub mod source;

pub use config::MinerConfig;
pub use errors::{MinerError, SynthesisError};
pub use mining::{mine_source, mine_unit, GuardMiner, SynthesisContext};
pub use source::SourceUnit;

pub use guardmine_types::{
    Constraint, ConstraintKind, EngineResult, FunctionConstraintSet,
};
