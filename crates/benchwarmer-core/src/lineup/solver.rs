// Optimal lineup search.
//
// Exhaustive branch-and-bound over slot instances. Slots are visited most
// restrictive first and candidates highest-scoring first, so strong
// incumbents are found early and the optimistic bound prunes most of the
// tree for realistic rosters (15-20 candidates, 9-12 slots).

use std::cmp::Ordering;

use tracing::debug;

use super::requirements::{expand_slots, SlotInstance, SlotRequirement};
use super::slots::{is_bench_slot, is_eligible};
use super::{OptimalLineup, PlayerSlotAssignment};
use crate::roster::Player;

/// Compute the points-maximizing lineup for a roster.
///
/// Every started player stays in the candidate pool regardless of score, so
/// the search can always fall back to the lineup that was actually played.
/// Bench and IR players only enter the pool with strictly positive points.
pub fn compute_optimal_lineup(roster: &[Player], requirements: &[SlotRequirement]) -> OptimalLineup {
    let slots = expand_slots(requirements);
    let candidates = candidate_pool(roster);
    let starters = find_optimal_assignment(&candidates, &slots);
    let lineup = OptimalLineup::from_starters(starters);

    debug!(
        roster = roster.len(),
        candidates = candidates.len(),
        slots = slots.len(),
        filled = lineup.starters.len(),
        total = lineup.total_points,
        "optimal lineup computed"
    );

    lineup
}

/// Filter and order the roster into search candidates: descending points,
/// ties by ascending player ID.
pub fn candidate_pool(roster: &[Player]) -> Vec<&Player> {
    let mut pool: Vec<&Player> = roster
        .iter()
        .filter(|p| !is_bench_slot(&p.rostered_position) || p.total_points > 0.0)
        .collect();

    pool.sort_by(|a, b| {
        b.total_points
            .partial_cmp(&a.total_points)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    pool
}

/// Assign candidates to slot instances, maximizing total points.
///
/// `candidates` must already be in search order (see `candidate_pool`) and
/// `slots` in fill order (see `expand_slots`). A slot instance is left empty
/// only when no unused eligible candidate exists; empty instances are absent
/// from the result. The result is listed in slot order.
pub fn find_optimal_assignment(
    candidates: &[&Player],
    slots: &[SlotInstance],
) -> Vec<PlayerSlotAssignment> {
    let search = Search::new(candidates, slots);
    let Some(best) = search.explore(0, 0.0, None, None) else {
        return Vec::new();
    };

    best.picks
        .into_iter()
        .map(|(slot_idx, cand_idx)| {
            let player = candidates[cand_idx];
            PlayerSlotAssignment {
                player: player.clone(),
                slot: slots[slot_idx].slot.clone(),
                points: player.total_points,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Search internals
// ---------------------------------------------------------------------------

/// One placement in the partial assignment. Picks form an immutable chain on
/// the call stack, newest first.
struct Pick<'p> {
    slot: usize,
    candidate: usize,
    prev: Option<&'p Pick<'p>>,
}

fn chain_contains(mut link: Option<&Pick<'_>>, candidate: usize) -> bool {
    while let Some(pick) = link {
        if pick.candidate == candidate {
            return true;
        }
        link = pick.prev;
    }
    false
}

/// Best complete assignment found so far.
#[derive(Debug, Clone)]
struct Incumbent {
    score: f64,
    /// (slot index, candidate index) in slot order.
    picks: Vec<(usize, usize)>,
}

impl Incumbent {
    fn from_chain(score: f64, mut link: Option<&Pick<'_>>) -> Self {
        let mut picks = Vec::new();
        while let Some(pick) = link {
            picks.push((pick.slot, pick.candidate));
            link = pick.prev;
        }
        picks.reverse();
        Incumbent { score, picks }
    }
}

struct Search<'a> {
    candidates: &'a [&'a Player],
    slot_count: usize,
    /// eligible[slot][candidate]
    eligible: Vec<Vec<bool>>,
}

impl<'a> Search<'a> {
    fn new(candidates: &'a [&'a Player], slots: &[SlotInstance]) -> Self {
        let eligible = slots
            .iter()
            .map(|slot| {
                candidates
                    .iter()
                    .map(|p| is_eligible(p, &slot.eligible_positions))
                    .collect()
            })
            .collect();

        Search {
            candidates,
            slot_count: slots.len(),
            eligible,
        }
    }

    /// Upper bound on the points the remaining slots can add: the best
    /// `remaining` unused scores, ignoring negatives (a slot may end up
    /// empty, which is worth zero).
    fn optimistic_remaining(&self, picks: Option<&Pick<'_>>, remaining: usize) -> f64 {
        self.candidates
            .iter()
            .enumerate()
            .filter(|(idx, _)| !chain_contains(picks, *idx))
            .take(remaining)
            .map(|(_, p)| p.total_points.max(0.0))
            .sum()
    }

    /// Explore every completion of `picks` from `slot_idx` onward and return
    /// the better of `incumbent` and the best completion found.
    fn explore(
        &self,
        slot_idx: usize,
        score: f64,
        picks: Option<&Pick<'_>>,
        incumbent: Option<Incumbent>,
    ) -> Option<Incumbent> {
        if slot_idx == self.slot_count {
            return match incumbent {
                Some(best) if best.score >= score => Some(best),
                _ => Some(Incumbent::from_chain(score, picks)),
            };
        }

        let remaining = self.slot_count - slot_idx;
        let pruned = incumbent.as_ref().is_some_and(|best| {
            score + self.optimistic_remaining(picks, remaining) <= best.score
        });
        if pruned {
            return incumbent;
        }

        let mut incumbent = incumbent;
        let mut found_any = false;

        for (cand_idx, player) in self.candidates.iter().enumerate() {
            if !self.eligible[slot_idx][cand_idx] || chain_contains(picks, cand_idx) {
                continue;
            }
            found_any = true;
            let pick = Pick {
                slot: slot_idx,
                candidate: cand_idx,
                prev: picks,
            };
            incumbent = self.explore(
                slot_idx + 1,
                score + player.total_points,
                Some(&pick),
                incumbent,
            );
        }

        if !found_any {
            incumbent = self.explore(slot_idx + 1, score, picks, incumbent);
        }

        incumbent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::requirements::parse_slot_requirements;
    use crate::roster::test_support::player;
    use std::collections::{BTreeMap, HashSet};

    fn requirements(counts: &[(&str, i32)]) -> Vec<SlotRequirement> {
        let map: BTreeMap<String, i32> = counts
            .iter()
            .map(|(slot, n)| (slot.to_string(), *n))
            .collect();
        parse_slot_requirements(&map)
    }

    /// Unpruned enumeration with the same feasibility rules as the solver.
    fn brute_force_best(candidates: &[&Player], slots: &[SlotInstance]) -> f64 {
        fn go(
            candidates: &[&Player],
            slots: &[SlotInstance],
            idx: usize,
            used: &mut Vec<bool>,
        ) -> f64 {
            if idx == slots.len() {
                return 0.0;
            }
            let mut best = f64::NEG_INFINITY;
            let mut any = false;
            for (i, p) in candidates.iter().enumerate() {
                if used[i] || !is_eligible(p, &slots[idx].eligible_positions) {
                    continue;
                }
                any = true;
                used[i] = true;
                best = best.max(p.total_points + go(candidates, slots, idx + 1, used));
                used[i] = false;
            }
            if !any {
                best = go(candidates, slots, idx + 1, used);
            }
            best
        }
        let mut used = vec![false; candidates.len()];
        go(candidates, slots, 0, &mut used)
    }

    #[test]
    fn candidate_pool_keeps_all_starters_and_positive_bench() {
        let roster = vec![
            player(1, "Starter Zero", &["RB"], "RB", 0.0),
            player(2, "Starter Negative", &["D/ST"], "D/ST", -4.0),
            player(3, "Bench Zero", &["WR"], "Bench", 0.0),
            player(4, "Bench Negative", &["WR"], "Bench", -1.5),
            player(5, "Bench Positive", &["WR"], "Bench", 3.0),
            player(6, "IR Positive", &["TE"], "IR", 2.0),
        ];
        let ids: Vec<i64> = candidate_pool(&roster).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 6, 1, 2]);
    }

    #[test]
    fn candidate_pool_breaks_ties_by_id() {
        let roster = vec![
            player(9, "B", &["WR"], "WR", 10.0),
            player(3, "A", &["WR"], "Bench", 10.0),
            player(5, "C", &["WR"], "WR", 12.0),
        ];
        let ids: Vec<i64> = candidate_pool(&roster).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }

    #[test]
    fn picks_highest_scorers_for_simple_slots() {
        let roster = vec![
            player(1, "QB One", &["QB"], "QB", 18.0),
            player(2, "QB Two", &["QB"], "Bench", 24.0),
            player(3, "RB One", &["RB"], "RB", 7.0),
            player(4, "RB Two", &["RB"], "Bench", 11.0),
        ];
        let lineup = compute_optimal_lineup(&roster, &requirements(&[("QB", 1), ("RB", 1)]));
        let ids: HashSet<i64> = lineup.starters.iter().map(|a| a.player.id).collect();
        assert_eq!(ids, HashSet::from([2, 4]));
        assert!((lineup.total_points - 35.0).abs() < 1e-9);
    }

    #[test]
    fn flex_takes_best_remaining_eligible() {
        let roster = vec![
            player(1, "RB A", &["RB"], "RB", 15.0),
            player(2, "RB B", &["RB"], "RB/WR/TE", 5.0),
            player(3, "WR A", &["WR"], "WR", 9.0),
            player(4, "WR B", &["WR"], "Bench", 20.0),
        ];
        let reqs = requirements(&[("RB", 1), ("WR", 1), ("RB/WR/TE", 1)]);
        let lineup = compute_optimal_lineup(&roster, &reqs);
        assert!((lineup.total_points - 44.0).abs() < 1e-9);

        let flex = lineup
            .starters
            .iter()
            .find(|a| a.slot == "RB/WR/TE")
            .unwrap();
        assert_eq!(flex.player.id, 3);
    }

    #[test]
    fn forced_negative_starter_still_fills_slot() {
        let roster = vec![
            player(1, "Bad Defense", &["D/ST"], "D/ST", -3.0),
            player(2, "Bench Defense", &["D/ST"], "Bench", -1.0),
        ];
        let lineup = compute_optimal_lineup(&roster, &requirements(&[("D/ST", 1)]));
        // The bench defense is pruned from the pool for scoring <= 0.
        assert_eq!(lineup.starters.len(), 1);
        assert_eq!(lineup.starters[0].player.id, 1);
        assert!((lineup.total_points + 3.0).abs() < 1e-9);
    }

    #[test]
    fn unfillable_slot_is_left_empty() {
        let roster = vec![
            player(1, "Only QB", &["QB"], "QB", 20.0),
            player(2, "Only RB", &["RB"], "RB", 8.0),
        ];
        let lineup = compute_optimal_lineup(&roster, &requirements(&[("QB", 1), ("K", 1), ("RB", 1)]));
        assert_eq!(lineup.starters.len(), 2);
        assert!(lineup.starters.iter().all(|a| a.slot != "K"));
        assert!((lineup.total_points - 28.0).abs() < 1e-9);
    }

    #[test]
    fn empty_inputs_produce_empty_lineup() {
        let lineup = compute_optimal_lineup(&[], &requirements(&[("QB", 1)]));
        assert!(lineup.starters.is_empty());
        assert_eq!(lineup.total_points, 0.0);

        let roster = vec![player(1, "QB", &["QB"], "QB", 10.0)];
        let lineup = compute_optimal_lineup(&roster, &[]);
        assert!(lineup.starters.is_empty());
    }

    #[test]
    fn forced_negative_kicker_with_bench_upgrade_and_empty_slot() {
        let roster = vec![
            player(1, "Kicker", &["K"], "K", -2.0),
            player(2, "Bench QB", &["QB"], "Bench", 12.0),
            player(3, "Starting QB", &["QB"], "QB", 3.0),
        ];
        let reqs = requirements(&[("K", 1), ("QB", 1), ("TE", 1)]);
        let lineup = compute_optimal_lineup(&roster, &reqs);
        assert!((lineup.total_points - 10.0).abs() < 1e-9);
    }

    #[test]
    fn matches_brute_force_on_small_rosters() {
        let positions: [&[&str]; 6] = [
            &["RB"],
            &["WR"],
            &["TE"],
            &["RB", "WR"],
            &["QB"],
            &["WR", "TE"],
        ];
        let slot_sets: [&[(&str, i32)]; 4] = [
            &[("RB", 1), ("WR", 1), ("RB/WR/TE", 1)],
            &[("FLEX", 2), ("TE", 1)],
            &[("OP", 1), ("QB", 1), ("WR/TE", 1)],
            &[("RB/WR", 1), ("WR/TE", 1), ("RB", 1)],
        ];

        // Deterministic pseudo-random point values.
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            ((seed % 400) as f64) / 10.0 - 5.0
        };

        for round in 0..40 {
            let roster: Vec<Player> = (0..6)
                .map(|i| {
                    let slot = if i < 3 { "FLEX" } else { "Bench" };
                    player(i as i64 + 1, "P", positions[(i + round) % 6], slot, next())
                })
                .collect();
            for counts in slot_sets {
                let reqs = requirements(counts);
                let slots = expand_slots(&reqs);
                let candidates = candidate_pool(&roster);
                let lineup = compute_optimal_lineup(&roster, &reqs);
                let expected = brute_force_best(&candidates, &slots);
                assert!(
                    (lineup.total_points - expected).abs() < 1e-9,
                    "round {round}: solver {} vs brute force {expected}",
                    lineup.total_points
                );
            }
        }
    }

    #[test]
    fn identical_input_yields_identical_assignment() {
        let roster = vec![
            player(1, "RB A", &["RB"], "RB", 10.0),
            player(2, "RB B", &["RB"], "RB", 10.0),
            player(3, "WR A", &["WR"], "WR", 10.0),
            player(4, "WR B", &["WR"], "Bench", 10.0),
            player(5, "TE A", &["TE"], "FLEX", 10.0),
        ];
        let reqs = requirements(&[("RB", 1), ("WR", 1), ("FLEX", 2)]);
        let first = compute_optimal_lineup(&roster, &reqs);
        for _ in 0..5 {
            assert_eq!(compute_optimal_lineup(&roster, &reqs), first);
        }
        // Ties resolve to the lowest IDs in slot order.
        let ids: Vec<i64> = first.starters.iter().map(|a| a.player.id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4]);
    }

    #[test]
    fn no_player_used_twice() {
        let roster = vec![
            player(1, "Flex Guy", &["RB", "WR", "TE"], "RB", 30.0),
            player(2, "RB", &["RB"], "Bench", 4.0),
            player(3, "WR", &["WR"], "WR", 6.0),
            player(4, "TE", &["TE"], "TE", 2.0),
        ];
        let reqs = requirements(&[("RB", 1), ("WR", 1), ("TE", 1), ("FLEX", 2)]);
        let lineup = compute_optimal_lineup(&roster, &reqs);
        let ids: Vec<i64> = lineup.starters.iter().map(|a| a.player.id).collect();
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.len(), 4);
    }
}
