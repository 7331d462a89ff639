//! Analyze command implementation

use super::{load_request, resolve_as_of, OutputFormat};
use crate::config::Config;
use crate::distance::HaversineDistance;
use crate::engine::ValuationEngine;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Appraisal JSON file with the loss vehicle and comparables
    #[arg(short, long)]
    pub input: PathBuf,

    /// Valuation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Run the analysis and render it in the requested format
    pub fn render(&self, config: &Config) -> anyhow::Result<String> {
        let request = load_request(&self.input)?;
        let engine = ValuationEngine::new(config).with_distance(HaversineDistance::new());
        let analysis = engine.analyze(&request, resolve_as_of(self.as_of))?;

        let rendered = match self.format {
            OutputFormat::Table => analysis.format_table(),
            OutputFormat::Json => serde_json::to_string_pretty(&analysis)?,
        };
        Ok(rendered)
    }

    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        tracing::info!("Analyzing {:?}...", self.input);
        let rendered = self.render(config)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, rendered)?;
                tracing::info!("Wrote analysis to {:?}", path);
            }
            None => println!("{rendered}"),
        }
        Ok(())
    }
}
