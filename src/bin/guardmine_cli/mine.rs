//! `mine` command: extract guards and synthesize values for JavaScript files.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use guardmine_core::{EngineResult, GuardMiner, MinerConfig};

use super::output::{format_result, format_summary, summary_json};

#[derive(Parser, Debug)]
#[command(
    about = "Mine parameter guards from JavaScript functions",
    long_about = "Parses each file, finds the guard conditions on every function \
                  declaration's parameters and prints candidate values that land on \
                  both sides of each guard.\n\n\
                  Values are random but reproducible: the seed in use is always \
                  reported and can be passed back with --seed."
)]
pub struct MineCmd {
    /// JavaScript source files to analyze
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Random seed for reproducibility (default: GUARDMINE_SEED, then time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only report the function with this name
    #[arg(long)]
    pub function: Option<String>,

    /// Path emitted for guards that read a file
    #[arg(long)]
    pub file_fixture: Option<String>,

    /// Path emitted for guards that may read a directory
    #[arg(long)]
    pub dir_fixture: Option<String>,

    /// Print constraint counts per kind instead of every value
    #[arg(long)]
    pub summary: bool,
}

impl MineCmd {
    pub fn execute(&self, json_output: bool, verbose: bool) -> Result<()> {
        let config = self.config();
        let mut miner = GuardMiner::new(config).context("Invalid miner configuration")?;
        let seed = miner.seed();
        info!(seed, files = self.files.len(), "Mining");

        let mut mined = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut result = miner
                .mine(&source)
                .with_context(|| format!("Failed to mine {}", path.display()))?;
            if let Some(name) = &self.function {
                result.retain_function(name);
                if result.is_empty() {
                    warn!(file = %path.display(), function = %name, "Function not found");
                }
            }
            mined.push((path.display().to_string(), result));
        }

        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&self.json_report(seed, &mined)?)?
            );
        } else {
            eprintln!("seed: {}", seed);
            let multiple = mined.len() > 1;
            for (path, result) in &mined {
                if multiple {
                    println!("== {} ==", path);
                }
                if self.summary {
                    print!("{}", format_summary(result));
                } else {
                    print!("{}", format_result(result, verbose));
                }
            }
        }
        Ok(())
    }

    /// Environment defaults with command-line flags on top.
    fn config(&self) -> MinerConfig {
        let mut config = MinerConfig::from_env();
        config.seed = Some(self.seed.or(config.seed).unwrap_or_else(time_seed));
        if let Some(path) = &self.file_fixture {
            config.file_fixture = path.clone();
        }
        if let Some(path) = &self.dir_fixture {
            config.dir_fixture = path.clone();
        }
        config
    }

    fn json_report(&self, seed: u64, mined: &[(String, EngineResult)]) -> Result<Value> {
        let render = |result: &EngineResult| -> Result<Value> {
            if self.summary {
                Ok(summary_json(result))
            } else {
                Ok(serde_json::to_value(result)?)
            }
        };

        if let [(path, result)] = mined {
            return Ok(json!({
                "seed": seed,
                "file": path,
                "functions": render(result)?,
            }));
        }

        let mut files = Map::new();
        for (path, result) in mined {
            files.insert(path.clone(), render(result)?);
        }
        Ok(json!({
            "seed": seed,
            "files": files,
        }))
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
