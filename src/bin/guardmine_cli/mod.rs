//! CLI subcommand implementations for guardmine

pub mod mine;
pub mod output;
