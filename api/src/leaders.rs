//! Leaderboard helpers: metric ordering, the yellow/red card merge and pass
//! accuracy scaling.

use crate::raw::Raw;
use crate::PlayerSeasonStats;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

/// Page cap for leaderboards built by walking the `players` endpoint.
pub const MAX_PAGES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderMetric {
    Goals,
    Assists,
    Yellow,
    Red,
    Cards, // yellow + red
    Appearances,
    Passes,
}

impl LeaderMetric {
    pub fn value(self, row: &PlayerSeasonStats) -> u32 {
        match self {
            LeaderMetric::Goals => row.goals,
            LeaderMetric::Assists => row.assists,
            LeaderMetric::Yellow => row.yellow,
            LeaderMetric::Red => row.red,
            LeaderMetric::Cards => row.yellow + row.red,
            LeaderMetric::Appearances => row.appearances,
            LeaderMetric::Passes => row.passes,
        }
    }
}

/// Stable descending sort on `metric`.
pub fn rank_by(rows: &mut [PlayerSeasonStats], metric: LeaderMetric) {
    rows.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardKind {
    Yellow,
    Red,
    #[default]
    Both,
}

impl CardKind {
    pub fn metric(self) -> LeaderMetric {
        match self {
            CardKind::Yellow => LeaderMetric::Yellow,
            CardKind::Red => LeaderMetric::Red,
            CardKind::Both => LeaderMetric::Cards,
        }
    }
}

impl FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yellow" => Ok(CardKind::Yellow),
            "red" => Ok(CardKind::Red),
            "both" | "all" => Ok(CardKind::Both),
            other => Err(format!("unknown card type '{other}' (expected yellow, red or both)")),
        }
    }
}

/// Pass accuracy arrives either as a fraction or as a percentage. Anything
/// at or below 1.0 is read as a fraction, so a genuine 1% becomes 100%.
pub fn normalize_accuracy(value: f64) -> f64 {
    if value <= 1.0 { value * 100.0 } else { value }
}

/// Merge the top-yellow and top-red lists into one list keyed by player id.
///
/// The yellow record wins: when a player is in both lists, the red list only
/// contributes `cards.red`, and only if the yellow record has none (absent or
/// `null`). Players found only in the red list are appended in red-list
/// order. Records without a player id are kept as they are and never merged.
pub fn merge_card_lists(yellow: Vec<Value>, red: Vec<Value>) -> Vec<Value> {
    let mut merged = yellow;
    let mut index: HashMap<u64, usize> = HashMap::new();
    for (position, record) in merged.iter().enumerate() {
        if let Some(id) = player_id(record) {
            index.entry(id).or_insert(position);
        }
    }

    for record in red {
        let Some(id) = player_id(&record) else {
            merged.push(record);
            continue;
        };
        match index.get(&id) {
            Some(&position) => {
                let primary = &mut merged[position];
                let has_red = Raw::new(primary)
                    .get("statistics")
                    .first_or_self()
                    .path("cards.red")
                    .is_present();
                let red_count = Raw::new(&record)
                    .get("statistics")
                    .first_or_self()
                    .path("cards.red")
                    .value()
                    .cloned();
                if let (false, Some(count)) = (has_red, red_count) {
                    splice_red(primary, count);
                }
            }
            None => {
                index.insert(id, merged.len());
                merged.push(record);
            }
        }
    }
    merged
}

fn player_id(record: &Value) -> Option<u64> {
    Raw::new(record).path("player.id").u64().filter(|id| *id != 0)
}

fn splice_red(record: &mut Value, count: Value) {
    let Some(stats) = record.get_mut("statistics") else {
        return;
    };
    let stats = if stats.is_array() { stats.get_mut(0) } else { Some(stats) };
    let Some(Value::Object(stats)) = stats else {
        return;
    };
    let cards = stats
        .entry("cards")
        .or_insert_with(|| Value::Object(Map::new()));
    if !cards.is_object() {
        *cards = Value::Object(Map::new());
    }
    if let Value::Object(cards) = cards {
        cards.insert("red".into(), count);
    }
}
