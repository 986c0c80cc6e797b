// Season aggregation: walk every week for one team, analyze each, and roll the
// results up into a `SeasonReport`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::week::{analyze_week, WeekInput, WeekResult};
use crate::espn::{LeagueSettings, PayloadError, PositionCorrections, SeasonSnapshot, TeamId};
use crate::lineup::{LineupError, SlotRequirement};

const UNKNOWN_OWNER: &str = "Unknown Owner";
const UNKNOWN_TEAM: &str = "Unknown Team";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("team {0} not found in league")]
    TeamNotFound(TeamId),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("week {week}: {source}")]
    Lineup { week: u32, source: LineupError },
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Which team to analyze and over which weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub team_id: TeamId,
    pub total_weeks: u32,
    pub playoff_start_week: u32,
}

impl ReportRequest {
    /// Week range taken from the league settings.
    pub fn for_league(team_id: TeamId, league: &LeagueSettings) -> Self {
        ReportRequest {
            team_id,
            total_weeks: league.total_weeks(),
            playoff_start_week: league.playoff_start_week(),
        }
    }

    pub fn is_playoff_week(&self, week: u32) -> bool {
        week >= self.playoff_start_week
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    fn tally(&mut self, week: &WeekResult) {
        if week.won() {
            self.wins += 1;
        } else if week.lost() {
            self.losses += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonReport {
    pub team_id: TeamId,
    pub team_name: String,
    pub owner_name: String,
    pub final_standing: Option<u32>,
    pub league_size: usize,
    pub league_name: String,
    pub season_id: i32,
    pub total_points_left_on_bench: f64,
    pub blown_wins: u32,
    pub regular_season: Record,
    pub playoffs: Record,
    /// Analyzed weeks in ascending week order.
    pub weeks: Vec<WeekResult>,
    /// The week with the most points missed. Ties keep the earliest week.
    pub worst_week: Option<WeekResult>,
}

impl SeasonReport {
    pub fn weeks_analyzed(&self) -> usize {
        self.weeks.len()
    }
}

/// Accumulates week results into a `SeasonReport`.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    report: SeasonReport,
}

impl ReportBuilder {
    pub fn new(snapshot: &SeasonSnapshot, team_id: TeamId) -> Result<Self, ReportError> {
        let team = snapshot
            .team(team_id)
            .ok_or(ReportError::TeamNotFound(team_id))?;

        Ok(ReportBuilder {
            report: SeasonReport {
                team_id,
                team_name: team.name.clone(),
                owner_name: team
                    .owner_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_OWNER.to_string()),
                final_standing: team.final_standings_position,
                league_size: snapshot.teams.len(),
                league_name: snapshot.league.name.clone(),
                season_id: snapshot.league.season_id,
                total_points_left_on_bench: 0.0,
                blown_wins: 0,
                regular_season: Record::default(),
                playoffs: Record::default(),
                weeks: Vec::new(),
                worst_week: None,
            },
        })
    }

    /// Fold in one week. Weeks must be pushed in ascending order for the
    /// worst-week tie rule to hold.
    pub fn push_week(&mut self, week: WeekResult) {
        let report = &mut self.report;
        report.total_points_left_on_bench += week.points_missed;
        if week.is_blown_win {
            report.blown_wins += 1;
        }
        if week.is_playoffs {
            report.playoffs.tally(&week);
        } else {
            report.regular_season.tally(&week);
        }

        let is_worse = report
            .worst_week
            .as_ref()
            .map_or(true, |worst| week.points_missed > worst.points_missed);
        if is_worse {
            report.worst_week = Some(week.clone());
        }
        report.weeks.push(week);
    }

    pub fn finish(self) -> SeasonReport {
        self.report
    }
}

// ---------------------------------------------------------------------------
// Season walk
// ---------------------------------------------------------------------------

/// Pull each analyzable week out of the snapshot.
///
/// A week is skipped (with a warning) when the team has no matchup, its
/// roster is empty, or either score is missing.
pub fn week_inputs(
    snapshot: &SeasonSnapshot,
    request: &ReportRequest,
    corrections: &PositionCorrections,
) -> Result<Vec<WeekInput>, ReportError> {
    if snapshot.team(request.team_id).is_none() {
        return Err(ReportError::TeamNotFound(request.team_id));
    }

    let mut inputs = Vec::new();
    for week in 1..=request.total_weeks {
        let Some(matchup) = snapshot.matchup(week, request.team_id) else {
            warn!(week, team_id = request.team_id, "no matchup found, skipping week");
            continue;
        };
        let Some(side) = matchup.side_for(request.team_id, corrections)? else {
            continue;
        };
        if side.roster.is_empty() {
            warn!(week, "empty roster, skipping week");
            continue;
        }
        let (Some(team_score), Some(opponent_score)) = (side.score, side.opponent_score) else {
            warn!(week, "matchup has no final score, skipping week");
            continue;
        };

        inputs.push(WeekInput {
            week,
            is_playoffs: request.is_playoff_week(week),
            opponent_name: snapshot
                .team_name(side.opponent_id)
                .unwrap_or(UNKNOWN_TEAM)
                .to_string(),
            team_score,
            opponent_score,
            roster: side.roster,
        });
    }
    Ok(inputs)
}

/// Analyze every week sequentially and build the season report.
pub fn generate_report(
    snapshot: &SeasonSnapshot,
    request: &ReportRequest,
    corrections: &PositionCorrections,
    requirements: &[SlotRequirement],
) -> Result<SeasonReport, ReportError> {
    let mut builder = ReportBuilder::new(snapshot, request.team_id)?;
    for input in week_inputs(snapshot, request, corrections)? {
        let result = analyze_week(&input, requirements).map_err(|source| ReportError::Lineup {
            week: input.week,
            source,
        })?;
        builder.push_week(result);
    }

    let report = builder.finish();
    info!(
        team = %report.team_name,
        weeks = report.weeks_analyzed(),
        missed = report.total_points_left_on_bench,
        blown_wins = report.blown_wins,
        "season report generated"
    );
    Ok(report)
}

/// A report stamped with its generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    pub generated_at: DateTime<Utc>,
    pub report: SeasonReport,
}

impl ReportEnvelope {
    pub fn new(report: SeasonReport, generated_at: DateTime<Utc>) -> Self {
        ReportEnvelope {
            generated_at,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::parse_slot_requirements;
    use chrono::TimeZone;

    const SNAPSHOT: &str = r#"{
        "league": {
            "name": "Bench Mob",
            "seasonId": 2024,
            "lineupPositionCount": { "QB": 1, "RB": 1, "Bench": 2 },
            "numberOfRegularSeasonMatchups": 2,
            "numberOfPlayoffMatchups": 1
        },
        "teams": [
            { "id": 1, "name": "Alpha", "finalStandingsPosition": 2 },
            { "id": 2, "name": "Beta", "ownerName": "Bo" }
        ],
        "boxscores": {
            "1": [{
                "homeTeamId": 1, "awayTeamId": 2, "homeScore": 25.0, "awayScore": 30.0,
                "homeRoster": [
                    { "id": 1, "fullName": "QB1", "eligiblePositions": ["QB"], "rosteredPosition": "QB", "totalPoints": 20.0 },
                    { "id": 2, "fullName": "RB1", "eligiblePositions": ["RB"], "rosteredPosition": "RB", "totalPoints": 5.0 },
                    { "id": 3, "fullName": "RB2", "eligiblePositions": ["RB"], "rosteredPosition": "Bench", "totalPoints": 18.0 }
                ]
            }],
            "2": [{
                "homeTeamId": 2, "awayTeamId": 1, "homeScore": 10.0, "awayScore": 35.0,
                "awayRoster": [
                    { "id": 1, "fullName": "QB1", "eligiblePositions": ["QB"], "rosteredPosition": "QB", "totalPoints": 20.0 },
                    { "id": 2, "fullName": "RB1", "eligiblePositions": ["RB"], "rosteredPosition": "RB", "totalPoints": 15.0 },
                    { "id": 3, "fullName": "RB2", "eligiblePositions": ["RB"], "rosteredPosition": "Bench", "totalPoints": 2.0 }
                ]
            }],
            "3": [{
                "homeTeamId": 1, "awayTeamId": 2, "homeScore": 21.0, "awayScore": 40.0,
                "homeRoster": [
                    { "id": 1, "fullName": "QB1", "eligiblePositions": ["QB"], "rosteredPosition": "QB", "totalPoints": 20.0 },
                    { "id": 2, "fullName": "RB1", "eligiblePositions": ["RB"], "rosteredPosition": "RB", "totalPoints": 1.0 },
                    { "id": 3, "fullName": "RB2", "eligiblePositions": ["RB"], "rosteredPosition": "Bench", "totalPoints": 14.0 }
                ]
            }]
        }
    }"#;

    fn snapshot() -> SeasonSnapshot {
        SeasonSnapshot::from_json(SNAPSHOT).unwrap()
    }

    fn requirements(snapshot: &SeasonSnapshot) -> Vec<SlotRequirement> {
        parse_slot_requirements(&snapshot.league.lineup_position_count)
    }

    #[test]
    fn request_from_league_settings() {
        let snap = snapshot();
        let request = ReportRequest::for_league(1, &snap.league);
        assert_eq!(request.total_weeks, 3);
        assert_eq!(request.playoff_start_week, 3);
        assert!(!request.is_playoff_week(2));
        assert!(request.is_playoff_week(3));
    }

    #[test]
    fn full_season_rollup() {
        let snap = snapshot();
        let request = ReportRequest::for_league(1, &snap.league);
        let report = generate_report(
            &snap,
            &request,
            &PositionCorrections::default(),
            &requirements(&snap),
        )
        .unwrap();

        assert_eq!(report.team_name, "Alpha");
        assert_eq!(report.owner_name, "Unknown Owner");
        assert_eq!(report.final_standing, Some(2));
        assert_eq!(report.league_size, 2);
        assert_eq!(report.league_name, "Bench Mob");
        assert_eq!(report.weeks_analyzed(), 3);

        // Week 1: 38 optimal vs 25 actual, lost to 30 -> blown win.
        // Week 2: perfect lineup, won.
        // Week 3: 34 optimal vs 21 actual, lost to 40 (playoffs).
        assert_eq!(report.total_points_left_on_bench, 26.0);
        assert_eq!(report.blown_wins, 1);
        assert_eq!(report.regular_season, Record { wins: 1, losses: 1 });
        assert_eq!(report.playoffs, Record { wins: 0, losses: 1 });
        assert_eq!(report.weeks[1].opponent_name, "Beta");
        assert!(report.weeks[2].is_playoffs);

        // Weeks 1 and 3 both missed 13; the earlier one is kept.
        assert_eq!(report.worst_week.as_ref().map(|w| w.week), Some(1));
    }

    #[test]
    fn unknown_team_is_an_error() {
        let snap = snapshot();
        let request = ReportRequest::for_league(99, &snap.league);
        let err = generate_report(
            &snap,
            &request,
            &PositionCorrections::default(),
            &requirements(&snap),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::TeamNotFound(99)));
    }

    #[test]
    fn weeks_without_data_are_skipped() {
        let snap = snapshot();
        let request = ReportRequest {
            team_id: 2,
            total_weeks: 5,
            playoff_start_week: 3,
        };
        // Team 2's rosters are empty in the fixture, and weeks 4-5 have no
        // boxscores at all.
        let inputs = week_inputs(&snap, &request, &PositionCorrections::default()).unwrap();
        assert!(inputs.is_empty());
    }

    #[test]
    fn missing_score_skips_week() {
        let mut snap = snapshot();
        snap.boxscores.get_mut(&2).unwrap()[0].away_score = None;
        let request = ReportRequest::for_league(1, &snap.league);
        let inputs = week_inputs(&snap, &request, &PositionCorrections::default()).unwrap();
        let weeks: Vec<u32> = inputs.iter().map(|i| i.week).collect();
        assert_eq!(weeks, vec![1, 3]);
    }

    #[test]
    fn empty_season_has_no_worst_week() {
        let snap = snapshot();
        let report = ReportBuilder::new(&snap, 2).unwrap().finish();
        assert_eq!(report.owner_name, "Bo");
        assert!(report.worst_week.is_none());
        assert_eq!(report.total_points_left_on_bench, 0.0);
    }

    #[test]
    fn envelope_serializes_timestamp() {
        let snap = snapshot();
        let report = ReportBuilder::new(&snap, 1).unwrap().finish();
        let at = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
        let json = serde_json::to_value(ReportEnvelope::new(report, at)).unwrap();
        assert_eq!(json["generatedAt"], "2025-01-06T12:00:00Z");
        assert_eq!(json["report"]["teamName"], "Alpha");
        assert_eq!(json["report"]["regularSeason"]["wins"], 0);
    }
}
