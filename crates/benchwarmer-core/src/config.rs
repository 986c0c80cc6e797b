// Configuration loading and parsing (report.toml, sanitize.toml).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::espn::{LeagueSettings, PositionCorrections, TeamId};
use crate::lineup::{parse_slot_requirements, SlotRequirement};
use crate::season::ReportRequest;

const DEFAULT_LOG_FILTER: &str = "benchwarmer=info,warn";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub report: ReportSettings,
    /// Slot counts replacing the snapshot's `lineupPositionCount`.
    pub lineup_override: Option<BTreeMap<String, i32>>,
    pub output: OutputSettings,
    pub corrections: PositionCorrections,
}

impl Config {
    /// Slot requirements for the season: the configured override if present,
    /// otherwise the league's own settings.
    pub fn slot_requirements(&self, league: &LeagueSettings) -> Vec<SlotRequirement> {
        let counts = self
            .lineup_override
            .as_ref()
            .unwrap_or(&league.lineup_position_count);
        parse_slot_requirements(counts)
    }

    /// Week range for the report, with configured overrides applied on top of
    /// the league settings.
    pub fn report_request(&self, league: &LeagueSettings) -> ReportRequest {
        let mut request = ReportRequest::for_league(self.report.team_id, league);
        if let Some(total) = self.report.total_weeks {
            request.total_weeks = total;
        }
        if let Some(start) = self.report.playoff_start_week {
            request.playoff_start_week = start;
        }
        request
    }
}

// ---------------------------------------------------------------------------
// report.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire report.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ReportFile {
    report: ReportSettings,
    #[serde(default)]
    lineup: Option<BTreeMap<String, i32>>,
    #[serde(default)]
    output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    pub team_id: TeamId,
    pub snapshot_path: String,
    /// Overrides the league's regular + playoff matchup count.
    #[serde(default)]
    pub total_weeks: Option<u32>,
    #[serde(default)]
    pub playoff_start_week: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub csv_path: Option<String>,
    pub log_filter: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            csv_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// sanitize.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[sanitize]` table in sanitize.toml.
#[derive(Debug, Clone, Deserialize)]
struct SanitizeFile {
    #[serde(default)]
    sanitize: PositionCorrections,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/report.toml` and
/// (optionally) `config/sanitize.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- report.toml (required) ---
    let report_path = config_dir.join("report.toml");
    let report_text = read_file(&report_path)?;
    let report_file: ReportFile =
        toml::from_str(&report_text).map_err(|e| ConfigError::ParseError {
            path: report_path.clone(),
            source: e,
        })?;

    // --- sanitize.toml (optional) ---
    let sanitize_path = config_dir.join("sanitize.toml");
    let corrections = if sanitize_path.exists() {
        let sanitize_text = read_file(&sanitize_path)?;
        let sanitize_file: SanitizeFile =
            toml::from_str(&sanitize_text).map_err(|e| ConfigError::ParseError {
                path: sanitize_path.clone(),
                source: e,
            })?;
        sanitize_file.sanitize
    } else {
        PositionCorrections::default()
    };

    let config = Config {
        report: report_file.report,
        lineup_override: report_file.lineup,
        output: report_file.output,
        corrections,
    };

    validate(&config)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();
    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // Never clobber a user's edited config.
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let report = &config.report;

    if report.team_id <= 0 {
        return Err(invalid(
            "report.team_id",
            format!("must be greater than 0, got {}", report.team_id),
        ));
    }

    if report.snapshot_path.trim().is_empty() {
        return Err(invalid("report.snapshot_path", "must not be empty"));
    }

    if report.total_weeks == Some(0) {
        return Err(invalid("report.total_weeks", "must be greater than 0"));
    }

    if let Some(start) = report.playoff_start_week {
        if start == 0 {
            return Err(invalid("report.playoff_start_week", "must be greater than 0"));
        }
        // One past the last week means "no playoff weeks".
        if let Some(total) = report.total_weeks {
            if start > total + 1 {
                return Err(invalid(
                    "report.playoff_start_week",
                    format!("must be at most total_weeks + 1 ({}), got {start}", total + 1),
                ));
            }
        }
    }

    if let Some(counts) = &config.lineup_override {
        if parse_slot_requirements(counts).is_empty() {
            return Err(invalid(
                "lineup",
                "must require at least one starting slot",
            ));
        }
    }

    if config.output.log_filter.trim().is_empty() {
        return Err(invalid("output.log_filter", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
