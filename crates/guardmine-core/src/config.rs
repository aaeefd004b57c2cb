//! Miner configuration.
//!
//! Defaults reproduce the fixed constants of the mining rules. Every field can
//! be overridden from the environment with [`MinerConfig::from_env`], and the
//! CLI applies its flags on top of that.

use guardmine_types::env_utils::{env_string_or, env_var, env_var_or};

use crate::errors::MinerError;

/// Environment variable holding a fixed seed for the synthesis context.
pub const SEED_ENV: &str = "GUARDMINE_SEED";
/// Environment variable overriding the file fixture path.
pub const FILE_FIXTURE_ENV: &str = "GUARDMINE_FILE_FIXTURE";
/// Environment variable overriding the directory fixture path.
pub const DIR_FIXTURE_ENV: &str = "GUARDMINE_DIR_FIXTURE";
/// Environment variable overriding the relational boundary span.
pub const BOUNDARY_SPAN_ENV: &str = "GUARDMINE_BOUNDARY_SPAN";

pub const DEFAULT_BOUNDARY_SPAN: i64 = 10;
pub const DEFAULT_PHONE_NUMBER_LEN: usize = 10;
pub const DEFAULT_FILE_FIXTURE: &str = "./fixtures/file.txt";
pub const DEFAULT_DIR_FIXTURE: &str = "./fixtures/dir";

/// Knobs of a mining run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerConfig {
    /// Seed for the synthesis context. `None` picks a fresh one per run.
    pub seed: Option<u64>,
    /// Width of the window on each side of a relational threshold.
    pub boundary_span: i64,
    /// Number of digits in a synthesized phone number.
    pub phone_number_len: usize,
    /// Path emitted for `readFileSync` guards that expect a file.
    pub file_fixture: String,
    /// Path emitted for `readFileSync` guards that may receive a directory.
    pub dir_fixture: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            boundary_span: DEFAULT_BOUNDARY_SPAN,
            phone_number_len: DEFAULT_PHONE_NUMBER_LEN,
            file_fixture: DEFAULT_FILE_FIXTURE.to_string(),
            dir_fixture: DEFAULT_DIR_FIXTURE.to_string(),
        }
    }
}

impl MinerConfig {
    /// Defaults overlaid with `GUARDMINE_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            seed: env_var(SEED_ENV),
            boundary_span: env_var_or(BOUNDARY_SPAN_ENV, DEFAULT_BOUNDARY_SPAN),
            phone_number_len: DEFAULT_PHONE_NUMBER_LEN,
            file_fixture: env_string_or(FILE_FIXTURE_ENV, DEFAULT_FILE_FIXTURE),
            dir_fixture: env_string_or(DIR_FIXTURE_ENV, DEFAULT_DIR_FIXTURE),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), MinerError> {
        if self.boundary_span < 1 {
            return Err(MinerError::InvalidConfig {
                field: "boundary_span",
                reason: format!("must be at least 1, got {}", self.boundary_span),
            });
        }
        if self.phone_number_len == 0 {
            return Err(MinerError::InvalidConfig {
                field: "phone_number_len",
                reason: "must be at least 1".into(),
            });
        }
        if self.file_fixture.is_empty() || self.dir_fixture.is_empty() {
            return Err(MinerError::InvalidConfig {
                field: "fixtures",
                reason: "fixture paths must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MinerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.boundary_span, 10);
        assert_eq!(config.phone_number_len, 10);
    }

    #[test]
    fn test_zero_span_rejected() {
        let config = MinerConfig {
            boundary_span: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MinerError::InvalidConfig {
                field: "boundary_span",
                ..
            })
        ));
    }

    #[test]
    fn test_with_seed() {
        let config = MinerConfig::default().with_seed(7);
        assert_eq!(config.seed, Some(7));
    }
}
