//! Error types for guard mining.
//!
//! [`MinerError`] is fatal for a whole source unit: the caller gets no partial
//! result. [`SynthesisError`] is scoped to a single guard; the scanner logs it
//! and moves on to the next node.

use std::fmt;

/// Failure that aborts mining of a source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinerError {
    /// The JavaScript grammar could not be loaded into the parser.
    LanguageUnavailable { message: String },
    /// The parser returned no tree at all.
    ParseFailed,
    /// The tree contains an ERROR or MISSING node.
    SyntaxError {
        /// 1-based line of the first offending node
        line: usize,
        /// 1-based column of the first offending node
        column: usize,
        /// Source text around the offending node (truncated)
        snippet: String,
    },
    /// A configuration value cannot be used.
    InvalidConfig { field: &'static str, reason: String },
}

impl fmt::Display for MinerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinerError::LanguageUnavailable { message } => {
                write!(f, "failed to load JavaScript grammar: {}", message)
            }
            MinerError::ParseFailed => write!(f, "parser produced no syntax tree"),
            MinerError::SyntaxError {
                line,
                column,
                snippet,
            } => {
                write!(f, "syntax error at {}:{}", line, column)?;
                if !snippet.is_empty() {
                    write!(f, " near `{}`", snippet)?;
                }
                Ok(())
            }
            MinerError::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for MinerError {}

/// Failure to turn one classified guard into concrete values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// A relational threshold or `indexOf` position is not an integer.
    NonNumericThreshold { text: String },
    /// The threshold is an integer but the boundary window does not fit in i64.
    ThresholdOutOfRange { text: String },
    /// An operand that must be a literal (substring, area code) is not one.
    NonLiteralOperand { text: String },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::NonNumericThreshold { text } => {
                write!(f, "threshold `{}` is not an integer", text)
            }
            SynthesisError::ThresholdOutOfRange { text } => {
                write!(f, "threshold `{}` is out of range for boundary values", text)
            }
            SynthesisError::NonLiteralOperand { text } => {
                write!(f, "operand `{}` is not a literal", text)
            }
        }
    }
}

impl std::error::Error for SynthesisError {}
