// Position data corrections applied at the snapshot boundary.
//
// ESPN reports some slot-type labels as if they were player positions
// (e.g. eligiblePositions containing "RB/WR", or a defaultPosition of
// "RB/WR" for players who are really receivers). The correction table is
// configuration: `config/sanitize.toml` can replace it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::roster::Player;

/// Labels stripped from eligible positions and default-position remaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionCorrections {
    pub invalid_positions: Vec<String>,
    pub default_position_remap: BTreeMap<String, String>,
}

impl Default for PositionCorrections {
    fn default() -> Self {
        PositionCorrections {
            invalid_positions: ["RB/WR", "RB/WR/TE", "WR/TE", "OP"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_position_remap: BTreeMap::from([("RB/WR".to_string(), "WR".to_string())]),
        }
    }
}

impl PositionCorrections {
    pub fn is_invalid(&self, position: &str) -> bool {
        self.invalid_positions.iter().any(|p| p == position)
    }

    /// Remap the default position and drop slot-type labels from the
    /// eligible positions.
    pub fn sanitize(&self, mut player: Player) -> Player {
        if let Some(fixed) = self.default_position_remap.get(&player.default_position) {
            player.default_position = fixed.clone();
        }
        player.eligible_positions.retain(|pos| !self.is_invalid(pos));
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::test_support::player;

    #[test]
    fn strips_slot_labels_from_eligible_positions() {
        let raw = player(1, "Receiver", &["WR", "RB/WR", "WR/TE", "OP", "RB/WR/TE"], "WR", 9.0);
        let clean = PositionCorrections::default().sanitize(raw);
        assert_eq!(clean.eligible_positions, vec!["WR"]);
    }

    #[test]
    fn remaps_rb_wr_default_position() {
        let mut raw = player(2, "Slot Guy", &["WR", "RB/WR"], "Bench", 4.0);
        raw.default_position = "RB/WR".into();
        let clean = PositionCorrections::default().sanitize(raw);
        assert_eq!(clean.default_position, "WR");
    }

    #[test]
    fn leaves_real_positions_alone() {
        let raw = player(3, "Hybrid", &["RB", "WR"], "RB", 12.0);
        let clean = PositionCorrections::default().sanitize(raw.clone());
        assert_eq!(clean, raw);
    }

    #[test]
    fn empty_table_from_config_is_identity() {
        let table: PositionCorrections =
            toml::from_str("invalid_positions = []\ndefault_position_remap = {}").unwrap();
        let raw = player(4, "Untouched", &["WR", "RB/WR"], "WR", 1.0);
        let clean = table.sanitize(raw.clone());
        assert_eq!(clean, raw);
    }

    #[test]
    fn deserializes_partial_table_with_defaults() {
        let table: PositionCorrections = toml::from_str("invalid_positions = [\"OP\"]").unwrap();
        assert_eq!(table.invalid_positions, vec!["OP"]);
        // Missing keys fall back to the provider defaults.
        assert_eq!(
            table.default_position_remap.get("RB/WR").map(String::as_str),
            Some("WR")
        );
    }
}
