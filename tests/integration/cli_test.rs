//! CLI command tests against appraisal files on disk

use crate::common::worked_scenario;
use fmv_engine::cli::{AnalyzeArgs, OutputFormat, ScoreArgs};
use fmv_engine::config::Config;
use fmv_engine::MarketAnalysis;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_scenario(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("appraisal.json");
    let json = serde_json::to_string_pretty(&worked_scenario()).unwrap();
    std::fs::write(&path, json).unwrap();
    path
}

fn as_of() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 6, 1)
}

#[test]
fn test_analyze_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let args = AnalyzeArgs {
        input: write_scenario(&dir),
        as_of: as_of(),
        format: OutputFormat::Json,
        output: None,
    };

    let rendered = args.render(&Config::default()).unwrap();
    let analysis: MarketAnalysis = serde_json::from_str(&rendered).unwrap();
    assert_eq!(analysis.calculated_market_value, dec!(11750));
}

#[test]
fn test_analyze_table_output() {
    let dir = tempfile::tempdir().unwrap();
    let args = AnalyzeArgs {
        input: write_scenario(&dir),
        as_of: as_of(),
        format: OutputFormat::Table,
        output: None,
    };

    let rendered = args.render(&Config::default()).unwrap();
    assert!(rendered.contains("MARKET VALUE ANALYSIS"));
    assert!(rendered.contains("$11,750.00"));
    assert!(rendered.contains("quality-weighted average"));
}

#[test]
fn test_analyze_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("analysis.json");
    let args = AnalyzeArgs {
        input: write_scenario(&dir),
        as_of: as_of(),
        format: OutputFormat::Json,
        output: Some(output.clone()),
    };

    args.execute(&Config::default()).unwrap();
    let written = std::fs::read_to_string(output).unwrap();
    assert!(written.contains("\"calculatedMarketValue\""));
}

#[test]
fn test_score_table_output() {
    let dir = tempfile::tempdir().unwrap();
    let args = ScoreArgs {
        input: write_scenario(&dir),
        as_of: as_of(),
        format: OutputFormat::Table,
    };

    let rendered = args.render(&Config::default()).unwrap();
    assert!(rendered.contains("2015 Honda Accord"));
    assert!(rendered.contains("5,000 fewer miles"));
    assert!(rendered.contains("$11,750.00"));
}

#[test]
fn test_analyze_surfaces_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appraisal.json");
    let mut request = worked_scenario();
    request.comparables.clear();
    std::fs::write(&path, serde_json::to_string(&request).unwrap()).unwrap();

    let args = AnalyzeArgs {
        input: path,
        as_of: as_of(),
        format: OutputFormat::Json,
        output: None,
    };
    let err = args.render(&Config::default()).unwrap_err();
    assert!(err.to_string().contains("At least one comparable"));
}
