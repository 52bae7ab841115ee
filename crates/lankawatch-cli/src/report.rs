//! Batch report file.

use crate::error::Result;
use lankawatch_domain::{ExecutiveSummary, RiskAssessment};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name written into the output directory.
pub const REPORT_FILE_NAME: &str = "risk_analysis_report.json";

/// Serialized shape of a batch report.
#[derive(Debug, Serialize)]
pub struct RiskReport<'a> {
    /// Batch aggregate
    pub summary: &'a ExecutiveSummary,
    /// One assessment per input article, in input order
    pub assessments: &'a [RiskAssessment],
}

impl<'a> RiskReport<'a> {
    /// Pair a summary with the assessments it was built from.
    pub fn new(summary: &'a ExecutiveSummary, assessments: &'a [RiskAssessment]) -> Self {
        Self {
            summary,
            assessments,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report into `dir`, creating it if needed.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(REPORT_FILE_NAME);
        fs::write(&path, self.to_json()?)?;
        info!("Risk report written to {}", path.display());
        Ok(path)
    }
}
