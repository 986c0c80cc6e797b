// Lineup engine: optimal lineup search, actual lineup extraction, and swap
// reconstruction between the two.

pub mod actual;
pub mod requirements;
pub mod slots;
pub mod solver;
pub mod swaps;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::{Player, PlayerId};

pub use actual::actual_lineup;
pub use requirements::{
    expand_slots, parse_slot_requirements, total_slot_count, SlotInstance, SlotRequirement,
};
pub use solver::compute_optimal_lineup;
pub use swaps::{build_swap_chains, ChainSwap, IntermediateMove, SimpleSwap, Swap};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Inconsistent actual/optimal data handed to the swap reconstructor.
#[derive(Debug, Error, PartialEq)]
pub enum LineupError {
    #[error("{lineup} lineup references player {player_id} who is not on the roster")]
    UnknownPlayer {
        lineup: &'static str,
        player_id: PlayerId,
    },

    #[error("{lineup} lineup assigns player {player_id} more than once")]
    DuplicateAssignment {
        lineup: &'static str,
        player_id: PlayerId,
    },
}

// ---------------------------------------------------------------------------
// Lineup types
// ---------------------------------------------------------------------------

/// A player placed in a lineup slot, with the points they scored there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSlotAssignment {
    pub player: Player,
    pub slot: String,
    pub points: f64,
}

/// The best achievable lineup for a roster-week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalLineup {
    pub starters: Vec<PlayerSlotAssignment>,
    pub total_points: f64,
}

impl OptimalLineup {
    pub fn from_starters(starters: Vec<PlayerSlotAssignment>) -> Self {
        let total_points = lineup_points(&starters);
        OptimalLineup {
            starters,
            total_points,
        }
    }
}

/// Sum of points across a lineup.
pub fn lineup_points(lineup: &[PlayerSlotAssignment]) -> f64 {
    lineup.iter().map(|a| a.points).sum()
}

/// Points the optimal lineup would have added, clamped at zero.
pub fn points_missed(optimal: &OptimalLineup, actual: &[PlayerSlotAssignment]) -> f64 {
    (optimal.total_points - lineup_points(actual)).max(0.0)
}
