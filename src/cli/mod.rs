//! CLI interface for fmv-engine
//!
//! Provides subcommands for:
//! - `analyze`: Full market value analysis of an appraisal file
//! - `score`: Per-comparable quality scores and adjustments
//! - `equipment`: Show the effective equipment value table
//! - `config`: Show the effective configuration

mod analyze;
mod input;
mod score;

pub use analyze::AnalyzeArgs;
pub use input::{load_request, resolve_as_of};
pub use score::ScoreArgs;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "fmv")]
#[command(about = "Quality-weighted fair market value for comparable-vehicle appraisals")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the market value, confidence and audit trail
    Analyze(AnalyzeArgs),
    /// Score and adjust comparables without aggregating
    Score(ScoreArgs),
    /// Show the effective equipment value table
    Equipment,
    /// Show the effective configuration
    Config,
}

/// Output format for analysis commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}
