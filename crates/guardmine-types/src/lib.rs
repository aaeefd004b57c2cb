//! Shared types for the guardmine workspace.
//!
//! This crate holds the output data model of the guard miner so that the
//! engine, the CLI and any downstream test generator agree on one shape:
//!
//! - [`Constraint`] - one candidate value for one parameter under one guard
//! - [`FunctionConstraintSet`] - every constraint mined for one function
//! - [`EngineResult`] - every function of one source unit, in declaration order
//!
//! The [`env_utils`] module carries the environment-variable helpers used by
//! configuration layers in the workspace.

pub mod constraint;
pub mod env_utils;

pub use constraint::{Constraint, ConstraintKind, EngineResult, FunctionConstraintSet};
