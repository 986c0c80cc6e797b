// Per-week analysis: optimal lineup, points left on the bench, and the swaps
// that would have recovered them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lineup::{
    self, actual_lineup, build_swap_chains, compute_optimal_lineup, LineupError, OptimalLineup,
    SlotRequirement, Swap,
};
use crate::roster::Player;

/// Everything needed to analyze one week, already pulled out of the snapshot.
#[derive(Debug, Clone)]
pub struct WeekInput {
    pub week: u32,
    pub is_playoffs: bool,
    pub opponent_name: String,
    /// The team's score as the provider recorded it.
    pub team_score: f64,
    pub opponent_score: f64,
    pub roster: Vec<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    fn from_scores(team: f64, opponent: f64) -> Self {
        if team > opponent {
            Outcome::Win
        } else if team < opponent {
            Outcome::Loss
        } else {
            Outcome::Tie
        }
    }

    /// Single-letter form used in exports.
    pub fn letter(self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
            Outcome::Tie => "T",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResult {
    pub week: u32,
    pub is_playoffs: bool,
    pub opponent_name: String,
    pub actual_score: f64,
    pub opponent_score: f64,
    pub outcome: Outcome,
    pub optimal_score: f64,
    /// Points the starters actually put up (may differ from `actual_score`
    /// when the provider applies adjustments).
    pub lineup_score: f64,
    pub points_missed: f64,
    pub is_blown_win: bool,
    /// How much the optimal lineup would have won by. Present only for
    /// blown wins.
    pub blown_win_margin: Option<f64>,
    pub swaps: Vec<Swap>,
    pub optimal_lineup: OptimalLineup,
}

impl WeekResult {
    pub fn won(&self) -> bool {
        self.outcome == Outcome::Win
    }

    pub fn lost(&self) -> bool {
        self.outcome == Outcome::Loss
    }

    pub fn top_swap(&self) -> Option<&Swap> {
        self.swaps.first()
    }
}

/// Analyze a single roster-week.
///
/// Swaps are only reconstructed when points were actually missed. A loss is
/// a blown win when the optimal lineup would have outscored the opponent.
pub fn analyze_week(
    input: &WeekInput,
    requirements: &[SlotRequirement],
) -> Result<WeekResult, LineupError> {
    let optimal = compute_optimal_lineup(&input.roster, requirements);
    let actual = actual_lineup(&input.roster);
    let lineup_score = lineup::lineup_points(&actual);
    let points_missed = lineup::points_missed(&optimal, &actual);

    let outcome = Outcome::from_scores(input.team_score, input.opponent_score);
    let is_blown_win = outcome == Outcome::Loss && optimal.total_points > input.opponent_score;
    let blown_win_margin = is_blown_win.then(|| optimal.total_points - input.opponent_score);

    let swaps = if points_missed > 0.0 {
        build_swap_chains(&actual, &optimal, &input.roster)?
    } else {
        Vec::new()
    };

    debug!(
        week = input.week,
        optimal = optimal.total_points,
        lineup = lineup_score,
        missed = points_missed,
        swaps = swaps.len(),
        "analyzed week"
    );

    Ok(WeekResult {
        week: input.week,
        is_playoffs: input.is_playoffs,
        opponent_name: input.opponent_name.clone(),
        actual_score: input.team_score,
        opponent_score: input.opponent_score,
        outcome,
        optimal_score: optimal.total_points,
        lineup_score,
        points_missed,
        is_blown_win,
        blown_win_margin,
        swaps,
        optimal_lineup: optimal,
    })
}
