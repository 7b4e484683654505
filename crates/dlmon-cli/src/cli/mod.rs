//! CLI for the dlmon Steam download monitor.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dlmon_core::config::{self, Eligibility, MonitorConfig};
use dlmon_core::root;
use std::path::{Path, PathBuf};

use commands::{run_once, run_root, run_watch};

/// Top-level CLI for dlmon.
#[derive(Debug, Parser)]
#[command(name = "dlmon")]
#[command(about = "dlmon: infer Steam download activity and speed from local files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Staging-directory eligibility rule (see `eligibility` in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EligibilityArg {
    /// Staging directory must contain a file.
    NonEmpty,
    /// Staging directory contains a file, or the manifest has progress keys.
    NonEmptyOrManifest,
}

impl From<EligibilityArg> for Eligibility {
    fn from(arg: EligibilityArg) -> Self {
        match arg {
            EligibilityArg::NonEmpty => Eligibility::NonEmpty,
            EligibilityArg::NonEmptyOrManifest => Eligibility::NonEmptyOrManifest,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Poll repeatedly and print one line per active download per poll.
    Watch {
        /// Steam installation root (overrides STEAM_ROOT and config).
        #[arg(long, value_name = "PATH")]
        root: Option<PathBuf>,
        /// Seconds between polls (default from config, 60).
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Number of polls (default from config, 5).
        #[arg(long, value_name = "N")]
        cycles: Option<u32>,
        /// Which evidence makes a staging directory an active download.
        #[arg(long, value_enum)]
        eligibility: Option<EligibilityArg>,
        /// Emit one JSON object per line instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Poll once and print the current snapshot.
    Once {
        /// Steam installation root (overrides STEAM_ROOT and config).
        #[arg(long, value_name = "PATH")]
        root: Option<PathBuf>,
        /// Which evidence makes a staging directory an active download.
        #[arg(long, value_enum)]
        eligibility: Option<EligibilityArg>,
        /// Emit one JSON object per line instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved Steam installation root.
    Root {
        /// Explicit root to validate instead of discovering one.
        #[arg(long, value_name = "PATH")]
        root: Option<PathBuf>,
    },
}

/// Resolve the installation root with CLI > STEAM_ROOT > config > discovery.
fn resolve_root(cli_root: Option<&Path>, cfg: &MonitorConfig) -> Result<PathBuf> {
    let path = root::resolve_default(cli_root, cfg.root.as_deref())?;
    tracing::info!(root = %path.display(), "resolved Steam root");
    Ok(path)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_default();
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Watch {
                root,
                interval,
                cycles,
                eligibility,
                json,
            } => {
                if let Some(secs) = interval {
                    cfg.interval_secs = secs;
                }
                if let Some(n) = cycles {
                    cfg.cycles = n;
                }
                if let Some(e) = eligibility {
                    cfg.eligibility = e.into();
                }
                let root = resolve_root(root.as_deref(), &cfg)?;
                run_watch(&root, &cfg, json)?;
            }
            CliCommand::Once {
                root,
                eligibility,
                json,
            } => {
                if let Some(e) = eligibility {
                    cfg.eligibility = e.into();
                }
                let root = resolve_root(root.as_deref(), &cfg)?;
                run_once(&root, &cfg, json)?;
            }
            CliCommand::Root { root } => {
                let root = resolve_root(root.as_deref(), &cfg)?;
                run_root(&root);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
