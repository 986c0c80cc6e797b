// Season snapshot payloads.
//
// A snapshot is a single JSON document holding what the provider returns for
// a league season: settings, teams and per-week boxscores. Field names follow
// the provider (camelCase). Everything is validated and converted into typed
// core entities here, once, so the lineup engine never sees raw payloads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sanitize::PositionCorrections;
use crate::roster::{Player, PlayerId};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("player `{player}` is missing required field `{field}`")]
    MissingField { player: String, field: &'static str },
}

// ---------------------------------------------------------------------------
// League and team payloads
// ---------------------------------------------------------------------------

pub type TeamId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSettings {
    pub name: String,
    pub season_id: i32,
    /// Slot label -> starters required (bench/IR entries included).
    #[serde(default)]
    pub lineup_position_count: BTreeMap<String, i32>,
    pub number_of_regular_season_matchups: u32,
    #[serde(default)]
    pub number_of_playoff_matchups: u32,
}

impl LeagueSettings {
    pub fn total_weeks(&self) -> u32 {
        self.number_of_regular_season_matchups + self.number_of_playoff_matchups
    }

    pub fn playoff_start_week(&self) -> u32 {
        self.number_of_regular_season_matchups + 1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub final_standings_position: Option<u32>,
}

// ---------------------------------------------------------------------------
// Boxscore payloads
// ---------------------------------------------------------------------------

/// A boxscore player as the provider reports it. Only `id`,
/// `eligiblePositions` and `rosteredPosition` are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBoxscorePlayer {
    pub id: Option<PlayerId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub pro_team: Option<String>,
    pub pro_team_abbreviation: Option<String>,
    pub default_position: Option<String>,
    pub eligible_positions: Option<Vec<String>>,
    pub rostered_position: Option<String>,
    pub total_points: Option<f64>,
}

impl RawBoxscorePlayer {
    fn display_name(&self) -> String {
        if let Some(full) = &self.full_name {
            return full.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => match self.id {
                Some(id) => format!("player {id}"),
                None => "<unknown>".to_string(),
            },
        }
    }

    /// Validate and convert into a sanitized `Player`.
    pub fn into_player(self, corrections: &PositionCorrections) -> Result<Player, PayloadError> {
        let full_name = self.display_name();
        let missing = |field: &'static str| PayloadError::MissingField {
            player: full_name.clone(),
            field,
        };

        let id = self.id.ok_or_else(|| missing("id"))?;
        let eligible_positions = self
            .eligible_positions
            .ok_or_else(|| missing("eligiblePositions"))?;
        let rostered_position = self
            .rostered_position
            .ok_or_else(|| missing("rosteredPosition"))?;

        let pro_team = self
            .pro_team
            .or(self.pro_team_abbreviation)
            .unwrap_or_default();
        let default_position = self
            .default_position
            .or_else(|| eligible_positions.first().cloned())
            .unwrap_or_default();

        let player = Player {
            id,
            full_name,
            pro_team,
            default_position,
            eligible_positions,
            rostered_position,
            total_points: self.total_points.unwrap_or(0.0),
        };
        Ok(corrections.sanitize(player))
    }
}

/// One head-to-head matchup for a week.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBoxscore {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: Option<f64>,
    pub away_score: Option<f64>,
    #[serde(default)]
    pub home_roster: Vec<RawBoxscorePlayer>,
    #[serde(default)]
    pub away_roster: Vec<RawBoxscorePlayer>,
}

/// One team's view of a matchup.
#[derive(Debug, Clone)]
pub struct MatchupSide {
    pub roster: Vec<Player>,
    pub score: Option<f64>,
    pub opponent_id: TeamId,
    pub opponent_score: Option<f64>,
}

impl RawBoxscore {
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// The given team's roster, score and opponent, or `None` if the team did
    /// not play in this matchup.
    pub fn side_for(
        &self,
        team_id: TeamId,
        corrections: &PositionCorrections,
    ) -> Result<Option<MatchupSide>, PayloadError> {
        let (roster, score, opponent_id, opponent_score) = if self.home_team_id == team_id {
            (&self.home_roster, self.home_score, self.away_team_id, self.away_score)
        } else if self.away_team_id == team_id {
            (&self.away_roster, self.away_score, self.home_team_id, self.home_score)
        } else {
            return Ok(None);
        };

        let roster = roster
            .iter()
            .cloned()
            .map(|raw| raw.into_player(corrections))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(MatchupSide {
            roster,
            score,
            opponent_id,
            opponent_score,
        }))
    }
}

// ---------------------------------------------------------------------------
// Season snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonSnapshot {
    pub league: LeagueSettings,
    #[serde(default)]
    pub teams: Vec<TeamInfo>,
    /// Week number -> that week's matchups.
    #[serde(default)]
    pub boxscores: BTreeMap<u32, Vec<RawBoxscore>>,
}

impl SeasonSnapshot {
    pub fn from_json(text: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, PayloadError> {
        let text = std::fs::read_to_string(path).map_err(|source| PayloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn team(&self, team_id: TeamId) -> Option<&TeamInfo> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn team_name(&self, team_id: TeamId) -> Option<&str> {
        self.team(team_id).map(|t| t.name.as_str())
    }

    /// The matchup the team played in `week`, if any.
    pub fn matchup(&self, week: u32, team_id: TeamId) -> Option<&RawBoxscore> {
        self.boxscores
            .get(&week)?
            .iter()
            .find(|b| b.involves(team_id))
    }
}
