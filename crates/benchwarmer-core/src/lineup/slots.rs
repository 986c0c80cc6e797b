// Lineup slot model: which player positions may fill which lineup slots.
//
// This table is the single source of truth for eligibility across the
// engine. Slot labels are the provider's slot names (e.g. "RB/WR/TE", "OP").

use crate::roster::Player;

// ---------------------------------------------------------------------------
// Slot label constants
// ---------------------------------------------------------------------------

pub const SLOT_BENCH: &str = "Bench";
pub const SLOT_IR: &str = "IR";

/// Roster labels that do not count as started.
pub const BENCH_SLOTS: &[&str] = &[SLOT_BENCH, SLOT_IR];

/// Slot label -> eligible player positions.
const SLOT_ELIGIBILITY: &[(&str, &[&str])] = &[
    ("QB", &["QB"]),
    ("RB", &["RB"]),
    ("WR", &["WR"]),
    ("TE", &["TE"]),
    ("K", &["K"]),
    ("D/ST", &["D/ST"]),
    ("FLEX", &["RB", "WR", "TE"]),
    ("RB/WR", &["RB", "WR"]),
    ("WR/TE", &["WR", "TE"]),
    ("RB/WR/TE", &["RB", "WR", "TE"]),
    ("OP", &["QB", "RB", "WR", "TE"]), // SUPERFLEX
    ("DL", &["DT", "DE"]),
    ("LB", &["LB"]),
    ("DB", &["CB", "S"]),
    ("DP", &["DT", "DE", "LB", "CB", "S"]), // Defensive player flex
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Eligible positions for a known slot label, or `None` for labels outside
/// the table.
pub fn slot_eligibility(slot: &str) -> Option<&'static [&'static str]> {
    SLOT_ELIGIBILITY
        .iter()
        .find(|(label, _)| *label == slot)
        .map(|(_, positions)| *positions)
}

/// Eligible positions for any slot label.
///
/// Unknown labels are not rejected: they accept exactly the position of the
/// same name (a custom "P" slot accepts "P" players).
pub fn eligible_positions_for_slot(slot: &str) -> Vec<String> {
    match slot_eligibility(slot) {
        Some(positions) => positions.iter().map(|p| p.to_string()).collect(),
        None => vec![slot.to_string()],
    }
}

/// Whether a roster label is bench-like (Bench or IR).
pub fn is_bench_slot(label: &str) -> bool {
    BENCH_SLOTS.contains(&label)
}

/// Whether a roster label is one of the known starter slots.
pub fn is_starter_slot(label: &str) -> bool {
    slot_eligibility(label).is_some()
}

/// Display name for a slot label. The provider's combo flex labels all
/// render as "FLEX" and "OP" renders as "SUPERFLEX".
pub fn display_name(slot: &str) -> &str {
    match slot {
        "RB/WR/TE" | "RB/WR" | "WR/TE" => "FLEX",
        "OP" => "SUPERFLEX",
        other => other,
    }
}

/// Whether a player is eligible for a slot with the given position set.
pub fn is_eligible(player: &Player, slot_positions: &[String]) -> bool {
    player.plays_any(slot_positions)
}

/// Whether a player is eligible for the slot with the given label.
pub fn is_eligible_for_label(player: &Player, slot: &str) -> bool {
    is_eligible(player, &eligible_positions_for_slot(slot))
}

/// Every known slot label the player could fill, in table order.
pub fn eligible_slots_for_player(player: &Player) -> Vec<&'static str> {
    SLOT_ELIGIBILITY
        .iter()
        .filter(|(_, positions)| {
            player
                .eligible_positions
                .iter()
                .any(|pos| positions.contains(&pos.as_str()))
        })
        .map(|(label, _)| *label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::test_support::player;

    #[test]
    fn flex_accepts_rb_wr_te() {
        assert_eq!(slot_eligibility("FLEX"), Some(&["RB", "WR", "TE"][..]));
        assert_eq!(
            slot_eligibility("RB/WR/TE"),
            Some(&["RB", "WR", "TE"][..])
        );
    }

    #[test]
    fn superflex_accepts_quarterbacks() {
        let positions = eligible_positions_for_slot("OP");
        assert_eq!(positions, vec!["QB", "RB", "WR", "TE"]);
    }

    #[test]
    fn defensive_slots() {
        assert_eq!(slot_eligibility("DL"), Some(&["DT", "DE"][..]));
        assert_eq!(slot_eligibility("DB"), Some(&["CB", "S"][..]));
        assert_eq!(
            slot_eligibility("DP"),
            Some(&["DT", "DE", "LB", "CB", "S"][..])
        );
    }

    #[test]
    fn unknown_slot_defaults_to_itself() {
        assert_eq!(slot_eligibility("P"), None);
        assert_eq!(eligible_positions_for_slot("P"), vec!["P"]);
    }

    #[test]
    fn bench_and_ir_are_bench_like() {
        assert!(is_bench_slot("Bench"));
        assert!(is_bench_slot("IR"));
        assert!(!is_bench_slot("FLEX"));
        assert!(!is_bench_slot("bench"));
    }

    #[test]
    fn starter_slots_are_table_labels() {
        for label in ["QB", "RB", "WR", "TE", "K", "D/ST", "FLEX", "OP", "DP"] {
            assert!(is_starter_slot(label), "{label} should be a starter slot");
        }
        assert!(!is_starter_slot("Bench"));
        assert!(!is_starter_slot("IR"));
    }

    #[test]
    fn display_names_collapse_flex_variants() {
        assert_eq!(display_name("RB/WR/TE"), "FLEX");
        assert_eq!(display_name("RB/WR"), "FLEX");
        assert_eq!(display_name("WR/TE"), "FLEX");
        assert_eq!(display_name("OP"), "SUPERFLEX");
        assert_eq!(display_name("D/ST"), "D/ST");
        assert_eq!(display_name("QB"), "QB");
    }

    #[test]
    fn eligibility_is_position_intersection() {
        let rb = player(1, "Bijan Robinson", &["RB"], "RB", 18.0);
        assert!(is_eligible_for_label(&rb, "RB"));
        assert!(is_eligible_for_label(&rb, "FLEX"));
        assert!(is_eligible_for_label(&rb, "OP"));
        assert!(!is_eligible_for_label(&rb, "WR"));
        assert!(!is_eligible_for_label(&rb, "WR/TE"));
    }

    #[test]
    fn eligible_slots_for_multi_position_player() {
        let p = player(7, "Deebo Samuel", &["RB", "WR"], "WR", 11.0);
        let slots = eligible_slots_for_player(&p);
        assert_eq!(
            slots,
            vec!["RB", "WR", "FLEX", "RB/WR", "WR/TE", "RB/WR/TE", "OP"]
        );
    }
}
