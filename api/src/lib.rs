pub mod client;
pub mod envelope;
pub mod error;
pub mod leaders;
pub mod mapping;
pub mod raw;
pub mod service;
pub mod standings;

pub use client::{FootballApi, LogContext, Method, Params, Transport, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use service::{FixtureFilter, FootballService};

use chrono::{DateTime, FixedOffset};

// ---------------------------------------------------------------------------
// Domain types: a clean model independent of the API-Football wire format
// ---------------------------------------------------------------------------
//
// An id of 0 means the upstream record did not carry one.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct League {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub logo: Option<String>,
    pub season: Option<i32>,
    pub kind: Option<String>, // "League" or "Cup"
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub country: String, // empty when the endpoint doesn't carry it (standings, fixtures)
    pub logo: Option<String>,
    pub founded: Option<u32>,
    pub venue_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub age: Option<u32>,
    pub nationality: Option<String>,
    pub position: Option<String>, // "Goalkeeper", "Defender", "Midfielder", "Attacker"
    pub photo: Option<String>,
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Coarse grouping of upstream short status codes, used for coloring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FixturePhase {
    Live,
    Break,
    Finished,
    NotStarted,
    Disrupted,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureStatus {
    pub long: String,  // "Second Half"
    pub short: String, // "2H"
    pub elapsed: Option<u32>,
}

impl FixtureStatus {
    pub fn phase(&self) -> FixturePhase {
        match self.short.as_str() {
            "1H" | "2H" | "ET" | "P" | "LIVE" => FixturePhase::Live,
            "HT" | "BT" => FixturePhase::Break,
            "FT" | "AET" | "PEN" => FixturePhase::Finished,
            "NS" | "TBD" => FixturePhase::NotStarted,
            "PST" | "CANC" | "ABD" | "SUSP" | "INT" | "AWD" | "WO" => FixturePhase::Disrupted,
            _ => FixturePhase::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureTeam {
    pub id: u64,
    pub name: String,
    pub logo: Option<String>,
    pub goals: Option<u32>,
    pub winner: Option<bool>, // None while undecided or drawn
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScorePair {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl ScorePair {
    pub fn is_empty(&self) -> bool {
        self.home.is_none() && self.away.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureScore {
    pub halftime: ScorePair,
    pub fulltime: ScorePair,
    pub extratime: ScorePair,
    pub penalty: ScorePair,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixture {
    pub id: u64,
    pub date: Option<DateTime<FixedOffset>>, // None when upstream sent nothing parseable
    pub status: FixtureStatus,
    pub home: FixtureTeam,
    pub away: FixtureTeam,
    pub league: League,
    pub score: Option<FixtureScore>,
    pub referee: Option<String>,
    pub venue: Option<String>,
}

impl Fixture {
    /// `"2-1"`, with missing goals shown as 0.
    pub fn score_display(&self) -> String {
        format!(
            "{}-{}",
            self.home.goals.unwrap_or(0),
            self.away.goals.unwrap_or(0)
        )
    }

    pub fn is_live(&self) -> bool {
        matches!(
            self.status.short.as_str(),
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "SUSP" | "INT" | "LIVE"
        )
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status.short.as_str(), "FT" | "AET" | "PEN")
    }

    /// The side `team_id` played on, and the opponent.
    pub fn sides_for(&self, team_id: u64) -> Option<(&FixtureTeam, &FixtureTeam)> {
        if self.home.id == team_id {
            Some((&self.home, &self.away))
        } else if self.away.id == team_id {
            Some((&self.away, &self.home))
        } else {
            None
        }
    }
}

/// Fixtures of one league, as produced by the multi-league dashboards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueFixtures {
    pub league: League,
    pub fixtures: Vec<Fixture>,
}

/// Win/draw/loss summary of a team over a list of its fixtures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRecord {
    /// Only decided fixtures count: a winner flag on either side, or a
    /// finished status with no winner (a draw). Goals are summed over
    /// finished fixtures that carry both scores.
    pub fn from_fixtures(team_id: u64, fixtures: &[Fixture]) -> Self {
        let mut record = TeamRecord::default();
        for fixture in fixtures {
            let Some((us, them)) = fixture.sides_for(team_id) else {
                continue;
            };

            if us.winner == Some(true) {
                record.wins += 1;
            } else if them.winner == Some(true) {
                record.losses += 1;
            } else if fixture.is_finished() {
                record.draws += 1;
            }

            if let (true, Some(scored), Some(conceded)) = (fixture.is_finished(), us.goals, them.goals) {
                record.goals_for += scored;
                record.goals_against += conceded;
            }
        }
        record.played = record.wins + record.draws + record.losses;
        record
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStanding {
    pub rank: u32, // 1-based, positional within one league/season snapshot
    pub team: Team,
    pub points: i32, // can go negative after deductions
    pub played: u32,
    pub win: u32,
    pub draw: u32,
    pub lose: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub form: Option<String>,        // "WWDLW"
    pub description: Option<String>, // "Promotion - Champions League (Group Stage)"
    pub group: Option<String>,
}

impl TeamStanding {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

// ---------------------------------------------------------------------------
// Match details: events, statistics, lineups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Goal,
    Card,
    Substitution,
    Var,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureEvent {
    pub elapsed: Option<u32>,
    pub extra: Option<u32>, // stoppage-time minutes
    pub team_id: u64,
    pub team_name: String,
    pub player_id: u64,
    pub player_name: String,
    pub kind: String,   // "Goal", "Card", "subst", "Var"
    pub detail: String, // "Normal Goal", "Yellow Card", "Substitution 1"
    pub comments: Option<String>,
    pub assist_id: Option<u64>,
    pub assist_name: Option<String>,
}

impl FixtureEvent {
    pub fn category(&self) -> EventCategory {
        match self.kind.as_str() {
            "Goal" => EventCategory::Goal,
            "Card" => EventCategory::Card,
            "subst" | "Substitution" => EventCategory::Substitution,
            "Var" => EventCategory::Var,
            _ => EventCategory::Other,
        }
    }

    /// `"45+2'"` or `"67'"`.
    pub fn minute_label(&self) -> String {
        match (self.elapsed, self.extra) {
            (Some(min), Some(extra)) if extra > 0 => format!("{min}+{extra}'"),
            (Some(min), _) => format!("{min}'"),
            (None, _) => "-".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum StatValue {
    Count(i64),
    Text(String), // percentages arrive as "55%", xG as "1.37"
    #[default]
    Missing,
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Count(n) => write!(f, "{n}"),
            StatValue::Text(s) => write!(f, "{s}"),
            StatValue::Missing => write!(f, "0"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistic {
    pub kind: String, // "Shots on Goal", "Ball Possession"
    pub value: StatValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureStatistics {
    pub team_id: u64,
    pub team_name: String,
    pub statistics: Vec<Statistic>,
}

impl FixtureStatistics {
    /// Exact, case-sensitive lookup by the upstream type label.
    pub fn get(&self, kind: &str) -> Option<&StatValue> {
        self.statistics.iter().find(|s| s.kind == kind).map(|s| &s.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineupPlayer {
    pub id: u64,
    pub name: String,
    pub number: Option<u32>,
    pub position: Option<String>, // "G", "D", "M", "F"
    pub grid: Option<String>,     // "row:col", starters only
}

impl LineupPlayer {
    /// Parsed `(row, col)` of the grid coordinate.
    pub fn grid_cell(&self) -> Option<(u32, u32)> {
        let (row, col) = self.grid.as_deref()?.split_once(':')?;
        Some((row.trim().parse().ok()?, col.trim().parse().ok()?))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamLineup {
    pub team_id: u64,
    pub team_name: String,
    pub formation: Option<String>, // "4-3-3"
    pub starters: Vec<LineupPlayer>,
    pub substitutes: Vec<LineupPlayer>,
    pub coach: Option<String>,
}

impl TeamLineup {
    /// Outfield lines of the formation, e.g. `[4, 3, 3]`. Empty if the
    /// formation is missing or not dash-separated integers.
    pub fn formation_lines(&self) -> Vec<u32> {
        let Some(formation) = self.formation.as_deref() else {
            return Vec::new();
        };
        formation
            .split('-')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_default()
    }

    /// Outfield lines plus the goalkeeper make eleven.
    pub fn is_complete_formation(&self) -> bool {
        let lines = self.formation_lines();
        !lines.is_empty() && lines.iter().sum::<u32>() + 1 == 11
    }
}

/// Everything shown for a single fixture. Any part may be empty if its
/// sub-query failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStatistics {
    pub events: Vec<FixtureEvent>,
    pub team_statistics: Vec<FixtureStatistics>,
    pub lineups: Vec<TeamLineup>,
}

// ---------------------------------------------------------------------------
// Team season statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomeAway {
    pub home: u32,
    pub away: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureCounts {
    pub played: HomeAway,
    pub wins: HomeAway,
    pub draws: HomeAway,
    pub losses: HomeAway,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinuteBucket {
    pub range: String, // "0-15", "76-90", "91-105"
    pub total: u32,
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalStats {
    pub home: u32,
    pub away: u32,
    pub total: u32,
    pub average: f64, // per match, all venues
    pub minute: Vec<MinuteBucket>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamGoals {
    pub scored: GoalStats,
    pub conceded: GoalStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardStats {
    pub total: u32, // sum of the minute buckets
    pub minute: Vec<MinuteBucket>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamCards {
    pub yellow: CardStats,
    pub red: CardStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scorelines {
    pub home: Option<String>, // "5-0"
    pub away: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiggestResults {
    pub wins: Scorelines,
    pub losses: Scorelines,
    pub streak: Streaks,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormationUsage {
    pub formation: String,
    pub played: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStatistics {
    pub league: League,
    pub team: Team,
    pub form: Option<String>,
    pub fixtures: FixtureCounts,
    pub goals: TeamGoals,
    pub clean_sheet: HomeAway,
    pub failed_to_score: HomeAway,
    pub cards: TeamCards,
    pub biggest: BiggestResults,
    pub lineups: Vec<FormationUsage>,
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// One row of a player leaderboard, flattened from the player's first
/// statistics block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSeasonStats {
    pub player: Player,
    pub team_id: u64,
    pub team_name: String,
    pub appearances: u32,
    pub minutes: u32,
    pub position: Option<String>,
    pub rating: Option<f64>,
    pub goals: u32,
    pub assists: u32,
    pub yellow: u32,
    pub red: u32,
    pub passes: u32,
    pub key_passes: u32,
    pub pass_accuracy: Option<f64>, // always 0-100 once mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(home: (u64, Option<u32>, Option<bool>), away: (u64, Option<u32>, Option<bool>), short: &str) -> Fixture {
        Fixture {
            status: FixtureStatus { short: short.into(), ..Default::default() },
            home: FixtureTeam { id: home.0, goals: home.1, winner: home.2, ..Default::default() },
            away: FixtureTeam { id: away.0, goals: away.1, winner: away.2, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn score_display_defaults_missing_goals_to_zero() {
        let f = fixture((1, None, None), (2, Some(2), None), "NS");
        assert_eq!(f.score_display(), "0-2");
    }

    #[test]
    fn live_and_finished_status_codes() {
        for code in ["1H", "HT", "2H", "ET", "BT", "P", "SUSP", "INT", "LIVE"] {
            assert!(fixture((1, None, None), (2, None, None), code).is_live(), "{code}");
        }
        for code in ["FT", "AET", "PEN"] {
            let f = fixture((1, None, None), (2, None, None), code);
            assert!(f.is_finished() && !f.is_live(), "{code}");
        }
        assert!(!fixture((1, None, None), (2, None, None), "NS").is_live());
    }

    #[test]
    fn status_phase_groups_codes() {
        let phase = |s: &str| FixtureStatus { short: s.into(), ..Default::default() }.phase();
        assert_eq!(phase("2H"), FixturePhase::Live);
        assert_eq!(phase("HT"), FixturePhase::Break);
        assert_eq!(phase("PEN"), FixturePhase::Finished);
        assert_eq!(phase("NS"), FixturePhase::NotStarted);
        assert_eq!(phase("CANC"), FixturePhase::Disrupted);
        assert_eq!(phase("???"), FixturePhase::Other);
    }

    #[test]
    fn team_record_counts_only_decided_fixtures() {
        let fixtures = vec![
            fixture((10, Some(2), Some(true)), (20, Some(0), Some(false)), "FT"),
            fixture((30, Some(1), None), (10, Some(1), None), "FT"),
            fixture((10, Some(0), Some(false)), (40, Some(3), Some(true)), "FT"),
            fixture((10, None, None), (50, None, None), "NS"),
            fixture((60, Some(1), None), (70, Some(1), None), "FT"),
        ];
        let record = TeamRecord::from_fixtures(10, &fixtures);
        assert_eq!(
            record,
            TeamRecord { played: 3, wins: 1, draws: 1, losses: 1, goals_for: 3, goals_against: 4 }
        );
        assert_eq!(record.goal_difference(), -1);
    }

    #[test]
    fn formation_lines_and_completeness() {
        let lineup = |f: Option<&str>| TeamLineup { formation: f.map(str::to_owned), ..Default::default() };
        assert_eq!(lineup(Some("4-2-3-1")).formation_lines(), vec![4, 2, 3, 1]);
        assert!(lineup(Some("4-3-3")).is_complete_formation());
        assert!(!lineup(Some("4-4-3")).is_complete_formation());
        assert!(lineup(Some("4-x-3")).formation_lines().is_empty());
        assert!(!lineup(None).is_complete_formation());
    }

    #[test]
    fn event_category_accepts_both_substitution_spellings() {
        let event = |kind: &str| FixtureEvent { kind: kind.into(), ..Default::default() };
        assert_eq!(event("subst").category(), EventCategory::Substitution);
        assert_eq!(event("Substitution").category(), EventCategory::Substitution);
        assert_eq!(event("Goal").category(), EventCategory::Goal);
        assert_eq!(event("Var").category(), EventCategory::Var);
        assert_eq!(event("goal").category(), EventCategory::Other);
    }

    #[test]
    fn statistic_lookup_is_case_sensitive() {
        let stats = FixtureStatistics {
            statistics: vec![Statistic { kind: "Ball Possession".into(), value: StatValue::Text("61%".into()) }],
            ..Default::default()
        };
        assert_eq!(stats.get("Ball Possession"), Some(&StatValue::Text("61%".into())));
        assert_eq!(stats.get("ball possession"), None);
    }

    #[test]
    fn grid_cell_parses_row_and_column() {
        let player = LineupPlayer { grid: Some("3:2".into()), ..Default::default() };
        assert_eq!(player.grid_cell(), Some((3, 2)));
        assert_eq!(LineupPlayer::default().grid_cell(), None);
    }
}
