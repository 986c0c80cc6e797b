// CSV export of per-week season results.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::season::{SeasonReport, WeekResult};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct WeekRow<'a> {
    week: u32,
    playoffs: bool,
    opponent: &'a str,
    actual: f64,
    optimal: f64,
    opponent_score: f64,
    points_missed: f64,
    result: &'static str,
    blown_win: bool,
    swaps: usize,
    top_swap: String,
}

impl<'a> From<&'a WeekResult> for WeekRow<'a> {
    fn from(week: &'a WeekResult) -> Self {
        WeekRow {
            week: week.week,
            playoffs: week.is_playoffs,
            opponent: &week.opponent_name,
            actual: round2(week.actual_score),
            optimal: round2(week.optimal_score),
            opponent_score: round2(week.opponent_score),
            points_missed: round2(week.points_missed),
            result: week.outcome.letter(),
            blown_win: week.is_blown_win,
            swaps: week.swaps.len(),
            top_swap: week.top_swap().map(|s| s.describe()).unwrap_or_default(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Write one CSV row per analyzed week, with a header row.
pub fn write_weeks_csv<W: io::Write>(report: &SeasonReport, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for week in &report.weeks {
        out.serialize(WeekRow::from(week))?;
    }
    out.flush()?;
    Ok(())
}

pub fn export_weeks_csv(report: &SeasonReport, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_weeks_csv(report, file)?;
    Ok(())
}
