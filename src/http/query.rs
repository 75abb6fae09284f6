//! Query string handling
//!
//! Decodes `application/x-www-form-urlencoded` query strings and interprets
//! the numeric directives (`delay`, `status`) leniently: only a leading run of
//! digits counts, and anything unparseable reads as "not supplied".

use hyper::Uri;
use serde_json::{Map, Value};

/// Decoded query parameters in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn from_uri(uri: &Uri) -> Self {
        uri.query().map_or_else(Self::default, Self::parse)
    }

    pub fn parse(query: &str) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value for `name` read as a leading integer
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(parse_leading_int)
    }

    /// Non-negative delay in milliseconds, or `default` when absent or unusable
    pub fn delay_ms(&self, default: u64) -> u64 {
        self.get_int("delay")
            .and_then(|ms| u64::try_from(ms).ok())
            .unwrap_or(default)
    }

    /// JSON object view; a name given more than once maps to an array
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in &self.pairs {
            let value = Value::String(value.clone());
            match map.get_mut(key) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key.clone(), value);
                }
            }
        }
        map
    }
}

/// Parse the integer at the start of `raw`
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. Returns `None` when there are no digits or the value overflows.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
