// Actual lineup extraction: the lineup the manager really set.

use super::slots::is_bench_slot;
use super::PlayerSlotAssignment;
use crate::roster::Player;

/// Every started (non-Bench, non-IR) player, with their rostered slot label
/// and points carried over verbatim.
pub fn actual_lineup(roster: &[Player]) -> Vec<PlayerSlotAssignment> {
    roster
        .iter()
        .filter(|p| !is_bench_slot(&p.rostered_position))
        .map(|p| PlayerSlotAssignment {
            player: p.clone(),
            slot: p.rostered_position.clone(),
            points: p.total_points,
        })
        .collect()
}
