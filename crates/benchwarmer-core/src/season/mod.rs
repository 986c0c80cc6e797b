// Season analysis: per-week results and the season-level rollup.

pub mod report;
pub mod week;

pub use report::{
    generate_report, week_inputs, Record, ReportBuilder, ReportEnvelope, ReportError,
    ReportRequest, SeasonReport,
};
pub use week::{analyze_week, Outcome, WeekInput, WeekResult};
