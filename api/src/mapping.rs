//! One record in, one entity out.
//!
//! Mappers never fail. Missing optional fields become `None`, `0` or `""`,
//! and a missing id becomes `0`, which callers treat as "unknown entity".

use crate::leaders::normalize_accuracy;
use crate::raw::{parse_datetime, Raw};
use crate::standings::Split;
use crate::{
    BiggestResults, CardStats, Fixture, FixtureCounts, FixtureEvent, FixtureScore,
    FixtureStatistics, FixtureStatus, FixtureTeam, FormationUsage, GoalStats, HomeAway, League,
    LineupPlayer, MinuteBucket, Player, PlayerSeasonStats, ScorePair, Scorelines, StatValue,
    Statistic, Streaks, Team, TeamCards, TeamGoals, TeamLineup, TeamStanding, TeamStatistics,
};
use serde_json::Value;

// `games.appearences` is how upstream spells it; newer payloads fix it.
const APPEARANCE_KEYS: [&str; 2] = ["appearences", "appearances"];

/// A record of the `leagues` endpoint: `{league, country, seasons}`.
pub fn map_league(record: &Value) -> League {
    let raw = Raw::new(record);
    let league = raw.get("league");

    let current_season = raw
        .get("seasons")
        .items()
        .iter()
        .map(Raw::new)
        .find(|season| season.get("current").bool() == Some(true))
        .and_then(|season| season.get("year").i32());

    League {
        id: league.get("id").u64().unwrap_or(0),
        name: league.get("name").text(),
        country: raw
            .path("country.name")
            .string()
            .unwrap_or_else(|| league.get("country").text()),
        logo: league.get("logo").string(),
        season: raw
            .get("season")
            .i32()
            .or_else(|| league.get("season").i32())
            .or(current_season),
        kind: league.get("type").string(),
    }
}

/// The flat league block embedded in fixtures and team statistics.
fn map_embedded_league(league: Raw) -> League {
    League {
        id: league.get("id").u64().unwrap_or(0),
        name: league.get("name").text(),
        country: league.get("country").text(),
        logo: league.get("logo").string(),
        season: league.get("season").i32(),
        kind: league.get("type").string(),
    }
}

/// A record of the `teams` endpoint: `{team, venue}`.
pub fn map_team(record: &Value) -> Team {
    let raw = Raw::new(record);
    let mut team = map_team_block(raw.get("team"));
    team.venue_name = raw.path("venue.name").string();
    team
}

fn map_team_block(team: Raw) -> Team {
    Team {
        id: team.get("id").u64().unwrap_or(0),
        name: team.get("name").text(),
        country: team.get("country").text(),
        logo: team.get("logo").string(),
        founded: team.get("founded").u32(),
        venue_name: None,
    }
}

/// A record of the `players` endpoint. The position lives on the player in
/// squad listings and inside the first statistics block otherwise.
pub fn map_player(record: &Value) -> Player {
    let raw = Raw::new(record);
    map_player_block(raw.get("player"), raw.get("statistics").first_or_self())
}

fn map_player_block(player: Raw, stats: Raw) -> Player {
    Player {
        id: player.get("id").u64().unwrap_or(0),
        name: player.get("name").text(),
        age: player.get("age").u32(),
        nationality: player.get("nationality").string(),
        position: player
            .get("position")
            .string()
            .or_else(|| stats.path("games.position").string()),
        photo: player.get("photo").string(),
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn map_fixture(record: &Value) -> Fixture {
    let raw = Raw::new(record);
    let fixture = raw.get("fixture");
    let status = fixture.get("status");
    let id = fixture.get("id").u64().unwrap_or(0);

    Fixture {
        id,
        date: map_date(fixture.get("date")),
        status: FixtureStatus {
            long: status.get("long").text(),
            short: status.get("short").text(),
            elapsed: status.get("elapsed").u32(),
        },
        home: map_fixture_team(raw.path("teams.home"), raw.path("goals.home")),
        away: map_fixture_team(raw.path("teams.away"), raw.path("goals.away")),
        league: map_embedded_league(raw.get("league")),
        score: raw.get("score").is_present().then(|| FixtureScore {
            halftime: map_score_pair(raw.path("score.halftime")),
            fulltime: map_score_pair(raw.path("score.fulltime")),
            extratime: map_score_pair(raw.path("score.extratime")),
            penalty: map_score_pair(raw.path("score.penalty")),
        }),
        referee: fixture.get("referee").string(),
        venue: fixture.path("venue.name").string(),
    }
}

/// Missing and unparseable dates both come back as `None`; the service
/// reports them under its own log target.
fn map_date(date: Raw) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    date.str().and_then(parse_datetime)
}

fn map_fixture_team(team: Raw, goals: Raw) -> FixtureTeam {
    FixtureTeam {
        id: team.get("id").u64().unwrap_or(0),
        name: team.get("name").text(),
        logo: team.get("logo").string(),
        goals: goals.u32(),
        winner: team.get("winner").bool(),
    }
}

fn map_score_pair(pair: Raw) -> ScorePair {
    ScorePair {
        home: pair.get("home").u32(),
        away: pair.get("away").u32(),
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

pub fn map_standing(record: &Value) -> TeamStanding {
    map_standing_split(record, Split::All)
}

/// Build a standing from one split of the record.
///
/// `All` takes the headline points. `Home` and `Away` are rebuilt from their
/// own sub-object only; when that split carries no `points`, they are
/// recomputed as `win * 3 + draw`.
pub fn map_standing_split(record: &Value, split: Split) -> TeamStanding {
    let raw = Raw::new(record);
    let block = raw.get(split.key());

    let win = block.get("win").u32().unwrap_or(0);
    let draw = block.get("draw").u32().unwrap_or(0);
    let points = match split {
        Split::All => raw.get("points").i32().unwrap_or(0),
        Split::Home | Split::Away => block
            .get("points")
            .i32()
            .unwrap_or_else(|| i32::try_from(win.saturating_mul(3).saturating_add(draw)).unwrap_or(i32::MAX)),
    };

    TeamStanding {
        rank: raw.get("rank").u32().unwrap_or(0),
        team: map_team_block(raw.get("team")),
        points,
        played: block.get("played").u32().unwrap_or(0),
        win,
        draw,
        lose: block.get("lose").u32().unwrap_or(0),
        goals_for: block.path("goals.for").u32().unwrap_or(0),
        goals_against: block.path("goals.against").u32().unwrap_or(0),
        form: raw.get("form").string(),
        description: raw.get("description").string(),
        group: raw.get("group").string(),
    }
}

// ---------------------------------------------------------------------------
// Events, statistics, lineups
// ---------------------------------------------------------------------------

pub fn map_event(record: &Value) -> FixtureEvent {
    let raw = Raw::new(record);
    FixtureEvent {
        elapsed: raw.path("time.elapsed").u32(),
        extra: raw.path("time.extra").u32(),
        team_id: raw.path("team.id").u64().unwrap_or(0),
        team_name: raw.path("team.name").text(),
        player_id: raw.path("player.id").u64().unwrap_or(0),
        player_name: raw.path("player.name").text(),
        kind: raw.get("type").text(),
        detail: raw.get("detail").text(),
        comments: raw.get("comments").string(),
        assist_id: raw.path("assist.id").u64(),
        assist_name: raw.path("assist.name").string(),
    }
}

pub fn map_fixture_statistics(record: &Value) -> FixtureStatistics {
    let raw = Raw::new(record);
    FixtureStatistics {
        team_id: raw.path("team.id").u64().unwrap_or(0),
        team_name: raw.path("team.name").text(),
        statistics: raw
            .get("statistics")
            .items()
            .iter()
            .map(|stat| {
                let stat = Raw::new(stat);
                Statistic {
                    kind: stat.get("type").text(),
                    value: map_stat_value(stat.get("value")),
                }
            })
            .collect(),
    }
}

fn map_stat_value(value: Raw) -> StatValue {
    match value.value() {
        None => StatValue::Missing,
        Some(Value::Number(_)) => value
            .i64()
            .map(StatValue::Count)
            .unwrap_or_else(|| StatValue::Text(value.text())),
        Some(_) => value.string().map(StatValue::Text).unwrap_or_default(),
    }
}

pub fn map_lineup(record: &Value) -> TeamLineup {
    let raw = Raw::new(record);
    let players = |key: &str, with_grid: bool| -> Vec<LineupPlayer> {
        raw.get(key)
            .items()
            .iter()
            .map(|entry| map_lineup_player(Raw::new(entry).get("player"), with_grid))
            .collect()
    };

    TeamLineup {
        team_id: raw.path("team.id").u64().unwrap_or(0),
        team_name: raw.path("team.name").text(),
        formation: raw.get("formation").string(),
        starters: players("startXI", true),
        substitutes: players("substitutes", false),
        coach: raw.path("coach.name").string(),
    }
}

fn map_lineup_player(player: Raw, with_grid: bool) -> LineupPlayer {
    LineupPlayer {
        id: player.get("id").u64().unwrap_or(0),
        name: player.get("name").text(),
        number: player.get("number").u32(),
        position: player.get("pos").string(),
        grid: if with_grid { player.get("grid").string() } else { None },
    }
}

// ---------------------------------------------------------------------------
// Team season statistics
// ---------------------------------------------------------------------------

/// The single object returned by `teams/statistics`.
pub fn map_team_statistics(record: &Value) -> TeamStatistics {
    let raw = Raw::new(record);
    let fixtures = raw.get("fixtures");
    let goals = raw.get("goals");
    let biggest = raw.get("biggest");

    TeamStatistics {
        league: map_embedded_league(raw.get("league")),
        team: map_team_block(raw.get("team")),
        form: raw.get("form").string(),
        fixtures: FixtureCounts {
            played: map_home_away(fixtures.get("played")),
            wins: map_home_away(fixtures.get("wins")),
            draws: map_home_away(fixtures.get("draws")),
            losses: map_home_away(fixtures.get("loses")),
        },
        goals: TeamGoals {
            scored: map_goal_stats(goals.get("for")),
            conceded: map_goal_stats(goals.get("against")),
        },
        clean_sheet: map_home_away(raw.get("clean_sheet")),
        failed_to_score: map_home_away(raw.get("failed_to_score")),
        cards: TeamCards {
            yellow: map_card_stats(raw.path("cards.yellow")),
            red: map_card_stats(raw.path("cards.red")),
        },
        biggest: BiggestResults {
            wins: map_scorelines(biggest.get("wins")),
            losses: map_scorelines(biggest.get("loses")),
            streak: Streaks {
                wins: biggest.path("streak.wins").u32().unwrap_or(0),
                draws: biggest.path("streak.draws").u32().unwrap_or(0),
                losses: biggest.path("streak.loses").u32().unwrap_or(0),
            },
        },
        lineups: raw
            .get("lineups")
            .items()
            .iter()
            .map(|usage| {
                let usage = Raw::new(usage);
                FormationUsage {
                    formation: usage.get("formation").text(),
                    played: usage.get("played").u32().unwrap_or(0),
                }
            })
            .collect(),
    }
}

fn map_home_away(block: Raw) -> HomeAway {
    HomeAway {
        home: block.get("home").u32().unwrap_or(0),
        away: block.get("away").u32().unwrap_or(0),
        total: block.get("total").u32().unwrap_or(0),
    }
}

fn map_goal_stats(block: Raw) -> GoalStats {
    let totals = map_home_away(block.get("total"));
    GoalStats {
        home: totals.home,
        away: totals.away,
        total: totals.total,
        average: block.path("average.total").f64().unwrap_or(0.0),
        minute: map_minute_buckets(block.get("minute")),
    }
}

fn map_card_stats(block: Raw) -> CardStats {
    let minute = map_minute_buckets(block);
    CardStats {
        total: minute.iter().map(|b| b.total).sum(),
        minute,
    }
}

/// `{"0-15": {"total": 3, "percentage": "12.5%"}, ...}` in kick-off order.
fn map_minute_buckets(block: Raw) -> Vec<MinuteBucket> {
    let Some(Value::Object(map)) = block.value() else {
        return Vec::new();
    };
    let mut buckets: Vec<MinuteBucket> = map
        .iter()
        .map(|(range, bucket)| {
            let bucket = Raw::new(bucket);
            MinuteBucket {
                range: range.clone(),
                total: bucket.get("total").u32().unwrap_or(0),
                percentage: bucket.get("percentage").string(),
            }
        })
        .collect();
    buckets.sort_by_key(|b| bucket_start(&b.range));
    buckets
}

fn bucket_start(range: &str) -> u32 {
    range
        .split('-')
        .next()
        .and_then(|start| start.trim().parse().ok())
        .unwrap_or(u32::MAX)
}

fn map_scorelines(block: Raw) -> Scorelines {
    Scorelines {
        home: block.get("home").string(),
        away: block.get("away").string(),
    }
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// A `players`/`players/top*` record flattened over its first statistics
/// block.
pub fn map_player_season_stats(record: &Value) -> PlayerSeasonStats {
    let raw = Raw::new(record);
    let stats = raw.get("statistics").first_or_self();
    let count = |path: &str| stats.path(path).u32().unwrap_or(0);

    PlayerSeasonStats {
        player: map_player_block(raw.get("player"), stats),
        team_id: stats.path("team.id").u64().unwrap_or(0),
        team_name: stats.path("team.name").text(),
        appearances: stats.get("games").any_of(&APPEARANCE_KEYS).u32().unwrap_or(0),
        minutes: count("games.minutes"),
        position: stats.path("games.position").string(),
        rating: stats.path("games.rating").f64(),
        goals: count("goals.total"),
        assists: count("goals.assists"),
        yellow: count("cards.yellow"),
        red: count("cards.red"),
        passes: count("passes.total"),
        key_passes: count("passes.key"),
        pass_accuracy: stats.path("passes.accuracy").f64().map(normalize_accuracy),
    }
}

/// True when the record's first statistics block carries an appearance
/// count under either spelling.
pub fn has_appearances(record: &Value) -> bool {
    Raw::new(record)
        .get("statistics")
        .first_or_self()
        .get("games")
        .any_of(&APPEARANCE_KEYS)
        .is_present()
}

pub fn has_passes(record: &Value) -> bool {
    Raw::new(record)
        .get("statistics")
        .first_or_self()
        .path("passes.total")
        .is_present()
}
