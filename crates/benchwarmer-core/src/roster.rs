// Weekly roster snapshot types.

use serde::{Deserialize, Serialize};

/// Provider player ID. Unique within a single roster.
pub type PlayerId = i64;

/// A rostered player and their scored points for one week.
///
/// Built once at the snapshot boundary (see `espn::payload`) and never
/// mutated afterwards. `eligible_positions` holds only real playing
/// positions: slot-type labels such as "RB/WR" are stripped by the
/// sanitizer before a `Player` is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub full_name: String,
    /// Pro team abbreviation (e.g. "KC"). Empty if unknown.
    pub pro_team: String,
    pub default_position: String,
    pub eligible_positions: Vec<String>,
    /// The slot label the manager put this player in, or "Bench"/"IR".
    pub rostered_position: String,
    pub total_points: f64,
}

impl Player {
    /// Whether the player can fill any of the given positions.
    pub fn plays_any(&self, positions: &[String]) -> bool {
        self.eligible_positions
            .iter()
            .any(|pos| positions.iter().any(|p| p == pos))
    }

    /// Short display label, e.g. "Puka Nacua (WR, LAR)".
    pub fn label(&self) -> String {
        if self.pro_team.is_empty() {
            format!("{} ({})", self.full_name, self.default_position)
        } else {
            format!(
                "{} ({}, {})",
                self.full_name, self.default_position, self.pro_team
            )
        }
    }
}
