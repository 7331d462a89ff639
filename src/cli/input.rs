//! Appraisal file loading shared by the analysis commands

use crate::engine::AppraisalRequest;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;

/// Read an appraisal request from a JSON file
pub fn load_request(path: &Path) -> anyhow::Result<AppraisalRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read appraisal file {}", path.display()))?;
    let request = serde_json::from_str(&content)
        .with_context(|| format!("Invalid appraisal file {}", path.display()))?;
    Ok(request)
}

/// Valuation date at midnight UTC, or now when not given
pub fn resolve_as_of(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}
