//! Score command implementation

use super::{load_request, resolve_as_of, OutputFormat};
use crate::config::Config;
use crate::distance::HaversineDistance;
use crate::engine::ValuationEngine;
use crate::market::ScoredComparable;
use crate::money::{format_signed_usd, format_usd};
use chrono::NaiveDate;
use clap::Args;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Appraisal JSON file with the loss vehicle and comparables
    #[arg(short, long)]
    pub input: PathBuf,

    /// Valuation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl ScoreArgs {
    /// Score the comparables and render them in the requested format
    pub fn render(&self, config: &Config) -> anyhow::Result<String> {
        let request = load_request(&self.input)?;
        let engine = ValuationEngine::new(config).with_distance(HaversineDistance::new());
        let scored = engine.score_comparables(&request, resolve_as_of(self.as_of))?;

        let rendered = match self.format {
            OutputFormat::Table => format_scores(&scored),
            OutputFormat::Json => serde_json::to_string_pretty(&scored)?,
        };
        Ok(rendered)
    }

    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        println!("{}", self.render(config)?);
        Ok(())
    }
}

fn format_scores(scored: &[ScoredComparable]) -> String {
    let mut out = String::new();
    for (i, item) in scored.iter().enumerate() {
        let q = &item.quality_score;
        let a = &item.adjustments;
        let _ = writeln!(
            out,
            "{}. {} ({})",
            i + 1,
            item.comparable.describe(),
            item.comparable.id
        );
        let _ = writeln!(
            out,
            "   Quality:   {} = base {} / distance {} / age {} / mileage {} / equipment {}",
            q.final_score,
            q.base_score,
            q.distance_score,
            q.age_score,
            q.mileage_score,
            q.equipment_score
        );
        let _ = writeln!(
            out,
            "   Mileage:   {}  {}",
            format_signed_usd(a.mileage_adjustment.adjustment_amount),
            a.mileage_adjustment.explanation
        );
        for line in &a.equipment_adjustments {
            let _ = writeln!(
                out,
                "   Equipment: {}  {}",
                format_signed_usd(line.value),
                line.explanation
            );
        }
        let _ = writeln!(
            out,
            "   Condition: {}  {}",
            format_signed_usd(a.condition_adjustment.adjustment_amount),
            a.condition_adjustment.explanation
        );
        let _ = writeln!(
            out,
            "   Adjusted:  {} {} = {}",
            format_usd(item.comparable.list_price),
            format_signed_usd(a.total_adjustment),
            format_usd(a.adjusted_price)
        );
    }
    out
}
