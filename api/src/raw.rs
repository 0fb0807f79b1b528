//! Schema-tolerant navigation over upstream JSON.
//!
//! Upstream records are deeply nested and not always consistent: ids go
//! missing, numbers arrive as strings, `statistics` is sometimes an object and
//! sometimes a one-element array, and some keys are misspelled on the wire.
//! Every mapper walks records through [`Raw`] so those quirks are handled in
//! exactly one place.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

/// A borrowed view of a JSON node that may not exist.
///
/// Lookups never fail: walking into a missing key, a `null`, or the wrong
/// shape yields another empty `Raw`, and the typed accessors return `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw<'a>(Option<&'a Value>);

impl<'a> From<&'a Value> for Raw<'a> {
    fn from(value: &'a Value) -> Self {
        Raw(Some(value))
    }
}

impl<'a> Raw<'a> {
    pub fn new(value: &'a Value) -> Self {
        Raw(Some(value))
    }

    /// The underlying node, with `null` treated as absent.
    pub fn value(self) -> Option<&'a Value> {
        self.0.filter(|v| !v.is_null())
    }

    pub fn is_present(self) -> bool {
        self.value().is_some()
    }

    pub fn get(self, key: &str) -> Raw<'a> {
        Raw(self.0.and_then(|v| v.get(key)))
    }

    pub fn at(self, index: usize) -> Raw<'a> {
        Raw(self.0.and_then(|v| v.get(index)))
    }

    /// Walk a dotted path, e.g. `"league.standings"`. Numeric segments index
    /// into arrays.
    pub fn path(self, dotted: &str) -> Raw<'a> {
        dotted.split('.').fold(self, |node, segment| match segment.parse::<usize>() {
            Ok(index) if node.0.is_some_and(Value::is_array) => node.at(index),
            _ => node.get(segment),
        })
    }

    /// The first of several candidate keys that holds a non-null value.
    /// Used for fields upstream spells more than one way.
    pub fn any_of(self, keys: &[&str]) -> Raw<'a> {
        keys.iter()
            .map(|key| self.get(key))
            .find(|node| node.is_present())
            .unwrap_or_default()
    }

    /// Upstream wraps per-competition blocks in an array even when there is
    /// only one; take the first element, or the node itself if it is not an
    /// array.
    pub fn first_or_self(self) -> Raw<'a> {
        match self.0 {
            Some(Value::Array(items)) => Raw(items.first()),
            other => Raw(other),
        }
    }

    pub fn items(self) -> &'a [Value] {
        match self.0 {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    pub fn str(self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }

    /// Strings verbatim, numbers and booleans rendered; `None` for anything
    /// else.
    pub fn string(self) -> Option<String> {
        match self.value()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Like [`Raw::string`] but defaulting to the empty string.
    pub fn text(self) -> String {
        self.string().unwrap_or_default()
    }

    pub fn i64(self) -> Option<i64> {
        match self.value()? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn u64(self) -> Option<u64> {
        self.i64().and_then(|n| u64::try_from(n).ok())
    }

    pub fn u32(self) -> Option<u32> {
        self.i64().and_then(|n| u32::try_from(n).ok())
    }

    pub fn i32(self) -> Option<i32> {
        self.i64().and_then(|n| i32::try_from(n).ok())
    }

    /// Numbers, numeric strings and percentages (`"55%"` → `55.0`).
    pub fn f64(self) -> Option<f64> {
        match self.value()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }
    }

    pub fn bool(self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    /// Python-style truthiness, which is how upstream's `results` count is
    /// meant to be read.
    pub fn is_truthy(self) -> bool {
        match self.value() {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::Null) => false,
        }
    }
}

/// Parse an upstream timestamp. A trailing `Z` is rewritten to `+00:00`
/// before parsing so both UTC spellings are accepted.
pub fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = s.trim();
    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_owned(),
    };
    DateTime::parse_from_rfc3339(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn missing_paths_never_panic() {
        let value = json!({"league": {"standings": [[{"rank": 1}]]}});
        let raw = Raw::new(&value);
        assert_eq!(raw.path("league.standings.0.0.rank").u32(), Some(1));
        assert!(!raw.path("league.standings.3.0.rank").is_present());
        assert!(!raw.path("team.venue.name").is_present());
        assert_eq!(raw.get("nope").text(), "");
    }

    #[test]
    fn numbers_may_arrive_as_strings() {
        let value = json!({"a": "42", "b": 7.0, "c": "1.45", "d": "64%", "e": null});
        let raw = Raw::new(&value);
        assert_eq!(raw.get("a").u32(), Some(42));
        assert_eq!(raw.get("b").u32(), Some(7));
        assert_eq!(raw.get("c").f64(), Some(1.45));
        assert_eq!(raw.get("d").f64(), Some(64.0));
        assert_eq!(raw.get("e").u32(), None);
    }

    #[test]
    fn any_of_reconciles_spellings() {
        let old = json!({"appearences": 12});
        let new = json!({"appearances": 9});
        let keys = ["appearences", "appearances"];
        assert_eq!(Raw::new(&old).any_of(&keys).u32(), Some(12));
        assert_eq!(Raw::new(&new).any_of(&keys).u32(), Some(9));
    }

    #[test]
    fn first_or_self_unwraps_single_element_arrays() {
        let wrapped = json!([{"games": {"minutes": 90}}]);
        let flat = json!({"games": {"minutes": 90}});
        assert_eq!(Raw::new(&wrapped).first_or_self().path("games.minutes").u32(), Some(90));
        assert_eq!(Raw::new(&flat).first_or_self().path("games.minutes").u32(), Some(90));
    }

    #[test]
    fn truthiness_matches_results_semantics() {
        assert!(Raw::new(&json!(3)).is_truthy());
        assert!(!Raw::new(&json!(0)).is_truthy());
        assert!(!Raw::new(&Value::Null).is_truthy());
        assert!(!Raw::default().is_truthy());
        assert!(!Raw::new(&json!({"red": null})).get("red").is_present());
    }

    #[test]
    fn datetime_accepts_z_and_offsets() {
        let utc = parse_datetime("2023-08-11T19:00:00Z").expect("Z suffix should parse");
        assert_eq!(utc.offset().local_minus_utc(), 0);
        assert_eq!(utc.hour(), 19);

        let local = parse_datetime("2023-08-11T21:00:00+02:00").expect("offset should parse");
        assert_eq!(local.day(), 11);
        assert_eq!(local.offset().local_minus_utc(), 7200);

        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("").is_none());
    }
}
