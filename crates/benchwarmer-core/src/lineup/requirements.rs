// Slot requirement builder: league slot counts -> ordered slot instances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::slots::{eligible_positions_for_slot, is_bench_slot};

/// One configured lineup slot type and how many of it the league starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequirement {
    pub slot: String,
    pub count: usize,
    pub eligible_positions: Vec<String>,
}

/// A single slot to fill. A requirement with count N expands to N instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInstance {
    pub slot: String,
    pub eligible_positions: Vec<String>,
}

/// Build slot requirements from a league's slot -> count mapping.
///
/// Bench/IR labels and entries with a count of zero or less are skipped.
/// Output follows the mapping's key order.
pub fn parse_slot_requirements(counts: &BTreeMap<String, i32>) -> Vec<SlotRequirement> {
    counts
        .iter()
        .filter(|(slot, &count)| !is_bench_slot(slot) && count > 0)
        .map(|(slot, &count)| SlotRequirement {
            slot: slot.clone(),
            count: count as usize,
            eligible_positions: eligible_positions_for_slot(slot),
        })
        .collect()
}

/// Expand requirements into individual slot instances, most restrictive
/// (fewest eligible positions) first.
///
/// The sort is stable, so instances with equal restrictiveness keep the
/// requirement order.
pub fn expand_slots(requirements: &[SlotRequirement]) -> Vec<SlotInstance> {
    let mut instances: Vec<SlotInstance> = requirements
        .iter()
        .flat_map(|req| {
            (0..req.count).map(move |_| SlotInstance {
                slot: req.slot.clone(),
                eligible_positions: req.eligible_positions.clone(),
            })
        })
        .collect();

    instances.sort_by_key(|s| s.eligible_positions.len());
    instances
}

/// Total number of slot instances the requirements describe.
pub fn total_slot_count(requirements: &[SlotRequirement]) -> usize {
    requirements.iter().map(|r| r.count).sum()
}
