// Swap reconstruction: explain the difference between the actual and the
// optimal lineup as a short list of human-readable swaps.
//
// Lineup changes with FLEX/SUPERFLEX slots are not always one-for-one: a
// bench player can take a slot whose occupant shifts to another slot, and so
// on, until someone is benched. Each bench-to-starter player's displacement
// chain is traced to the player it ultimately sends to the bench. Chains that
// produce the same visible result as a direct swap are shown as one.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::slots::{display_name, is_bench_slot, is_eligible_for_label};
use super::{LineupError, OptimalLineup, PlayerSlotAssignment};
use crate::roster::{Player, PlayerId};

// ---------------------------------------------------------------------------
// Swap types
// ---------------------------------------------------------------------------

/// A bench player directly replaces a started player in one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleSwap {
    pub bench_player: Player,
    pub benched_player: Player,
    pub slot: String,
    pub points_gained: f64,
}

/// A started player moving from one slot to another to make room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateMove {
    pub player: Player,
    pub from_slot: String,
    pub to_slot: String,
}

/// A bench player takes `target_slot`, vacated by `intermediate_move.player`,
/// whose move in turn sends `benched_player` to the bench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSwap {
    pub bench_player: Player,
    pub target_slot: String,
    pub intermediate_move: IntermediateMove,
    pub benched_player: Player,
    pub points_gained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Swap {
    Simple(SimpleSwap),
    Chain(ChainSwap),
}

impl Swap {
    pub fn points_gained(&self) -> f64 {
        match self {
            Swap::Simple(s) => s.points_gained,
            Swap::Chain(c) => c.points_gained,
        }
    }

    /// The player coming off the bench.
    pub fn bench_player(&self) -> &Player {
        match self {
            Swap::Simple(s) => &s.bench_player,
            Swap::Chain(c) => &c.bench_player,
        }
    }

    /// The started player who ends up on the bench.
    pub fn benched_player(&self) -> &Player {
        match self {
            Swap::Simple(s) => &s.benched_player,
            Swap::Chain(c) => &c.benched_player,
        }
    }

    /// One-line description, e.g. "Start Puka Nacua at FLEX over Tank Dell (+15.0)".
    pub fn describe(&self) -> String {
        match self {
            Swap::Simple(s) => format!(
                "Start {} at {} over {} (+{:.1})",
                s.bench_player.full_name,
                display_name(&s.slot),
                s.benched_player.full_name,
                s.points_gained
            ),
            Swap::Chain(c) => format!(
                "Move {} {}→{}, start {} at {}, bench {} (+{:.1})",
                c.intermediate_move.player.full_name,
                display_name(&c.intermediate_move.from_slot),
                display_name(&c.intermediate_move.to_slot),
                c.bench_player.full_name,
                display_name(&c.target_slot),
                c.benched_player.full_name,
                c.points_gained
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// How one player's status differs between the actual and optimal lineups.
#[derive(Debug, Clone)]
struct PlayerChange<'r> {
    player: &'r Player,
    actual_slot: Option<&'r str>,
    optimal_slot: Option<&'r str>,
}

impl PlayerChange<'_> {
    fn actual(&self) -> &str {
        self.actual_slot.unwrap_or_default()
    }

    fn optimal(&self) -> &str {
        self.optimal_slot.unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct Changes<'r> {
    bench_to_starter: Vec<PlayerChange<'r>>,
    starter_to_bench: Vec<PlayerChange<'r>>,
    /// Started in both lineups, but in different slots.
    movers: Vec<PlayerChange<'r>>,
}

/// Player ID -> slot label for a lineup, checking every assignment refers to
/// a distinct roster player.
fn slot_map<'r>(
    lineup_name: &'static str,
    lineup: &'r [PlayerSlotAssignment],
    roster_ids: &HashSet<PlayerId>,
) -> Result<HashMap<PlayerId, &'r str>, LineupError> {
    let mut map = HashMap::with_capacity(lineup.len());
    for assignment in lineup {
        let player_id = assignment.player.id;
        if !roster_ids.contains(&player_id) {
            return Err(LineupError::UnknownPlayer {
                lineup: lineup_name,
                player_id,
            });
        }
        if map.insert(player_id, assignment.slot.as_str()).is_some() {
            return Err(LineupError::DuplicateAssignment {
                lineup: lineup_name,
                player_id,
            });
        }
    }
    Ok(map)
}

fn classify<'r>(
    roster: &'r [Player],
    actual: &HashMap<PlayerId, &'r str>,
    optimal: &HashMap<PlayerId, &'r str>,
) -> Changes<'r> {
    let started = |slot: Option<&&'r str>| slot.copied().filter(|s| !is_bench_slot(s));

    let mut changes = Changes::default();
    for player in roster {
        let change = PlayerChange {
            player,
            actual_slot: started(actual.get(&player.id)),
            optimal_slot: started(optimal.get(&player.id)),
        };
        match (change.actual_slot, change.optimal_slot) {
            (None, Some(_)) => changes.bench_to_starter.push(change),
            (Some(_), None) => changes.starter_to_bench.push(change),
            (Some(a), Some(o)) if a != o => changes.movers.push(change),
            _ => {}
        }
    }
    changes
}

// ---------------------------------------------------------------------------
// Chain tracing
// ---------------------------------------------------------------------------

/// A traced displacement chain: movers in order, then the benched player.
struct Chain<'c, 'r> {
    hops: Vec<&'c PlayerChange<'r>>,
    benched: &'c PlayerChange<'r>,
}

/// Players already credited to an emitted swap.
#[derive(Debug, Default)]
struct Consumed {
    movers: HashSet<PlayerId>,
    benched: HashSet<PlayerId>,
}

impl Consumed {
    fn commit(&mut self, chain: &Chain<'_, '_>) {
        self.movers.extend(chain.hops.iter().map(|hop| hop.player.id));
        self.benched.insert(chain.benched.player.id);
    }
}

/// Follow the chain of slot vacancies starting at `start_slot` until a
/// starter-to-bench player is found. When several movers left the same slot
/// label, each is tried in turn before giving up. Returns `None` when every
/// path dead-ends or runs past `max_depth` steps.
fn trace_chain<'c, 'r>(
    start_slot: &str,
    changes: &'c Changes<'r>,
    consumed: &Consumed,
    max_depth: usize,
) -> Option<Chain<'c, 'r>> {
    let mut hops: Vec<&'c PlayerChange<'r>> = Vec::new();
    let benched = extend_chain(start_slot, changes, consumed, max_depth, &mut hops)?;
    Some(Chain { hops, benched })
}

fn extend_chain<'c, 'r>(
    current: &str,
    changes: &'c Changes<'r>,
    consumed: &Consumed,
    depth_left: usize,
    hops: &mut Vec<&'c PlayerChange<'r>>,
) -> Option<&'c PlayerChange<'r>> {
    if depth_left == 0 {
        return None;
    }

    if let Some(benched) = changes
        .starter_to_bench
        .iter()
        .find(|c| c.actual() == current && !consumed.benched.contains(&c.player.id))
    {
        return Some(benched);
    }

    let candidates = changes
        .movers
        .iter()
        .filter(|c| c.actual() == current && !consumed.movers.contains(&c.player.id));
    for mover in candidates {
        if hops.iter().any(|h| h.player.id == mover.player.id) {
            continue;
        }
        hops.push(mover);
        if let Some(benched) = extend_chain(mover.optimal(), changes, consumed, depth_left - 1, hops)
        {
            return Some(benched);
        }
        hops.pop();
    }

    None
}

fn chain_to_swap(entry: &PlayerChange<'_>, chain: &Chain<'_, '_>) -> Swap {
    let bench_player = entry.player;
    let benched = chain.benched;
    let points_gained = bench_player.total_points - benched.player.total_points;

    let Some(last) = chain.hops.last() else {
        return Swap::Simple(SimpleSwap {
            bench_player: bench_player.clone(),
            benched_player: benched.player.clone(),
            slot: entry.optimal().to_string(),
            points_gained,
        });
    };

    // If the bench player could have taken the benched player's slot
    // directly, the reshuffle is internal and the visible result is a
    // one-for-one swap.
    if is_eligible_for_label(bench_player, benched.actual()) {
        return Swap::Simple(SimpleSwap {
            bench_player: bench_player.clone(),
            benched_player: benched.player.clone(),
            slot: benched.actual().to_string(),
            points_gained,
        });
    }

    Swap::Chain(ChainSwap {
        bench_player: bench_player.clone(),
        target_slot: last.actual().to_string(),
        intermediate_move: IntermediateMove {
            player: last.player.clone(),
            from_slot: last.actual().to_string(),
            to_slot: last.optimal().to_string(),
        },
        benched_player: benched.player.clone(),
        points_gained,
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Reconstruct the swaps that turn `actual` into `optimal`.
///
/// Bench-to-starter players are processed highest-scoring first, so they get
/// first claim on shared displacement chains. Each mover and each benched
/// player is credited to at most one swap. Bench players whose chain cannot
/// be traced contribute nothing. Swaps that gain no points are dropped; the
/// rest are ordered by points gained (descending), then bench player ID.
///
/// Returns an error if either lineup references a player missing from
/// `roster` or assigns a player twice.
pub fn build_swap_chains(
    actual: &[PlayerSlotAssignment],
    optimal: &OptimalLineup,
    roster: &[Player],
) -> Result<Vec<Swap>, LineupError> {
    let roster_ids: HashSet<PlayerId> = roster.iter().map(|p| p.id).collect();
    let actual_slots = slot_map("actual", actual, &roster_ids)?;
    let optimal_slots = slot_map("optimal", &optimal.starters, &roster_ids)?;

    let mut changes = classify(roster, &actual_slots, &optimal_slots);
    changes.bench_to_starter.sort_by(|a, b| {
        b.player
            .total_points
            .partial_cmp(&a.player.total_points)
            .unwrap_or(Ordering::Equal)
    });

    // Every step either ends the chain or consumes a distinct mover.
    let max_depth = changes.movers.len() + 1;
    let mut consumed = Consumed::default();
    let mut swaps = Vec::new();

    for entry in &changes.bench_to_starter {
        let Some(chain) = trace_chain(entry.optimal(), &changes, &consumed, max_depth) else {
            debug!(
                player = %entry.player.label(),
                slot = entry.optimal(),
                "no displacement chain for bench player"
            );
            continue;
        };
        // Only a chain that reaches the bench claims its movers; a dead-end
        // trace leaves them free for later bench players.
        consumed.commit(&chain);
        swaps.push(chain_to_swap(entry, &chain));
    }

    swaps.retain(|s| s.points_gained() > 0.0);
    swaps.sort_by(|a, b| {
        b.points_gained()
            .partial_cmp(&a.points_gained())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.bench_player().id.cmp(&b.bench_player().id))
    });

    Ok(swaps)
}
