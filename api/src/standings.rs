//! League table extraction and the re-sorted home/away views.

use crate::raw::Raw;
use crate::TeamStanding;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Which sub-record of a standing the numbers are taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Split {
    #[default]
    All,
    Home,
    Away,
}

impl Split {
    pub fn key(self) -> &'static str {
        match self {
            Split::All => "all",
            Split::Home => "home",
            Split::Away => "away",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortCriterion {
    #[default]
    Points,
    GoalsFor,
    GoalsAgainst,
    GoalDiff,
    Played,
    Wins,
    Draws,
    Losses,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 8] = [
        SortCriterion::Points,
        SortCriterion::GoalsFor,
        SortCriterion::GoalsAgainst,
        SortCriterion::GoalDiff,
        SortCriterion::Played,
        SortCriterion::Wins,
        SortCriterion::Draws,
        SortCriterion::Losses,
    ];

    fn key(self, standing: &TeamStanding) -> i64 {
        match self {
            SortCriterion::Points => i64::from(standing.points),
            SortCriterion::GoalsFor => i64::from(standing.goals_for),
            SortCriterion::GoalsAgainst => i64::from(standing.goals_against),
            SortCriterion::GoalDiff => standing.goal_difference(),
            SortCriterion::Played => i64::from(standing.played),
            SortCriterion::Wins => i64::from(standing.win),
            SortCriterion::Draws => i64::from(standing.draw),
            SortCriterion::Losses => i64::from(standing.lose),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortCriterion::Points => "points",
            SortCriterion::GoalsFor => "goals_for",
            SortCriterion::GoalsAgainst => "goals_against",
            SortCriterion::GoalDiff => "goal_diff",
            SortCriterion::Played => "played",
            SortCriterion::Wins => "wins",
            SortCriterion::Draws => "draws",
            SortCriterion::Losses => "losses",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

/// How a table should be presented: which split, ordered how.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandingsView {
    pub split: Split,
    pub sort: SortCriterion,
    pub direction: SortDirection,
}

impl StandingsView {
    /// The upstream table as-is: overall numbers, upstream order and ranks.
    pub fn is_upstream(&self) -> bool {
        *self == StandingsView::default()
    }
}

/// Locate the team records of a `standings` response.
///
/// `league.standings` is an array of groups for cups and split leagues and a
/// flat array for some competitions. Only the first group is ever returned.
pub fn select_group(records: &[Value]) -> &[Value] {
    let standings = records
        .first()
        .map(Raw::new)
        .unwrap_or_default()
        .path("league.standings");

    match standings.items().first() {
        Some(Value::Array(group)) => group.as_slice(),
        _ => standings.items(),
    }
}

/// Stable sort by `criterion`, then renumber ranks `1..=N` in the new order.
pub fn sort_and_rerank(rows: &mut [TeamStanding], criterion: SortCriterion, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let (a, b) = (criterion.key(a), criterion.key(b));
        match direction {
            SortDirection::Desc => b.cmp(&a),
            SortDirection::Asc => a.cmp(&b),
        }
    });
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position as u32 + 1;
    }
}

// ---------------------------------------------------------------------------
// Parsing from command-line words
// ---------------------------------------------------------------------------

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "overall" => Ok(Split::All),
            "home" => Ok(Split::Home),
            "away" => Ok(Split::Away),
            other => Err(format!("unknown split '{other}' (expected all, home or away)")),
        }
    }
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('-', "_");
        SortCriterion::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = SortCriterion::ALL.iter().map(|c| c.label()).collect();
                format!("unknown sort criterion '{s}' (expected one of {})", known.join(", "))
            })
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desc" | "descending" => Ok(SortDirection::Desc),
            "asc" | "ascending" => Ok(SortDirection::Asc),
            other => Err(format!("unknown order '{other}' (expected desc or asc)")),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(rank: u32, points: i32, gf: u32, ga: u32, played: u32) -> TeamStanding {
        TeamStanding {
            rank,
            points,
            goals_for: gf,
            goals_against: ga,
            played,
            win: points as u32 / 3,
            draw: points as u32 % 3,
            lose: played.saturating_sub(points as u32 / 3 + points as u32 % 3),
            ..Default::default()
        }
    }

    #[test]
    fn nested_standings_yield_only_the_first_group() {
        let response = vec![json!({"league": {"standings": [
            [{"rank": 1}, {"rank": 2}, {"rank": 3}, {"rank": 4}],
            [{"rank": 1}, {"rank": 2}, {"rank": 3}, {"rank": 4}, {"rank": 5}]
        ]}})];
        assert_eq!(select_group(&response).len(), 4);
    }

    #[test]
    fn flat_standings_are_used_directly() {
        let response = vec![json!({"league": {"standings": [{"rank": 1}, {"rank": 2}]}})];
        assert_eq!(select_group(&response).len(), 2);
    }

    #[test]
    fn missing_standings_yield_nothing() {
        assert!(select_group(&[]).is_empty());
        assert!(select_group(&[json!({"league": {}})]).is_empty());
    }

    #[test]
    fn every_criterion_and_direction_reranks_contiguously() {
        let base = vec![
            row(1, 80, 70, 30, 38),
            row(2, 75, 82, 41, 38),
            row(3, 75, 60, 20, 37),
            row(4, 40, 35, 60, 38),
        ];
        for criterion in SortCriterion::ALL {
            for direction in [SortDirection::Desc, SortDirection::Asc] {
                let mut rows = base.clone();
                sort_and_rerank(&mut rows, criterion, direction);
                let ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
                assert_eq!(ranks, vec![1, 2, 3, 4], "{criterion} {direction:?}");

                let keys: Vec<i64> = rows.iter().map(|r| criterion.key(r)).collect();
                let ordered = keys.windows(2).all(|w| match direction {
                    SortDirection::Desc => w[0] >= w[1],
                    SortDirection::Asc => w[0] <= w[1],
                });
                assert!(ordered, "{criterion} {direction:?}: {keys:?}");
            }
        }
    }

    #[test]
    fn sorting_is_stable_for_ties() {
        let mut rows = vec![row(1, 75, 70, 30, 38), row(2, 75, 82, 41, 38)];
        rows[0].team.id = 10;
        rows[1].team.id = 20;
        sort_and_rerank(&mut rows, SortCriterion::Points, SortDirection::Desc);
        assert_eq!(rows[0].team.id, 10);
    }

    #[test]
    fn goal_difference_sort_uses_computed_value() {
        let mut rows = vec![row(1, 80, 50, 45, 38), row(2, 60, 70, 20, 38)];
        sort_and_rerank(&mut rows, SortCriterion::GoalDiff, SortDirection::Desc);
        assert_eq!(rows[0].goals_for, 70);
        assert_eq!(rows[0].rank, 1);
    }

    #[test]
    fn parses_command_line_words() {
        assert_eq!("home".parse::<Split>(), Ok(Split::Home));
        assert_eq!("goal-diff".parse::<SortCriterion>(), Ok(SortCriterion::GoalDiff));
        assert_eq!("ASC".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("league".parse::<Split>().is_err());
    }
}
