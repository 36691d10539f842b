//! Duration parsing across the encodings upstreams use.
//!
//! Accepted: integer milliseconds (anything above 1000), integer or float
//! seconds, `M:SS` / `MM:SS` strings, and numeric strings of either kind.
//! Everything else is "unknown", never an error.

use serde_json::Value;

use super::lookup::lookup;

/// How a candidate duration field is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Millis,
    /// Guess from the value itself (see [`parse_duration`])
    Auto,
}

/// Candidate duration fields in priority order.
pub const DURATION_FIELDS: &[(&str, DurationUnit)] = &[
    ("durationSec", DurationUnit::Seconds),
    ("duration_ms", DurationUnit::Millis),
    ("durationMs", DurationUnit::Millis),
    ("duration", DurationUnit::Auto),
    ("length", DurationUnit::Auto),
];

/// Values above this are taken to be milliseconds.
const MILLIS_THRESHOLD: f64 = 1000.0;

/// Resolve the duration of a raw record in whole seconds.
pub fn resolve_duration(raw: &Value) -> Option<u32> {
    DURATION_FIELDS.iter().find_map(|(path, unit)| {
        let value = lookup(raw, path)?;
        match unit {
            DurationUnit::Seconds => value.as_f64().and_then(seconds),
            DurationUnit::Millis => value.as_f64().and_then(|ms| seconds(ms / 1000.0)),
            DurationUnit::Auto => parse_duration(value),
        }
    })
}

/// Parse a duration of unknown encoding into whole seconds.
pub fn parse_duration(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_number),
        Value::String(s) => {
            let s = s.trim();
            parse_clock(s).or_else(|| s.parse::<f64>().ok().and_then(from_number))
        }
        _ => None,
    }
}

fn from_number(n: f64) -> Option<u32> {
    if n > MILLIS_THRESHOLD {
        seconds(n / 1000.0)
    } else {
        seconds(n)
    }
}

fn seconds(n: f64) -> Option<u32> {
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    Some(n.round().min(u32::MAX as f64) as u32)
}

/// `M:SS` or `MM:SS`.
fn parse_clock(s: &str) -> Option<u32> {
    let (mins, secs) = s.split_once(':')?;
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());

    if !(1..=2).contains(&mins.len()) || secs.len() != 2 || !all_digits(mins) || !all_digits(secs)
    {
        return None;
    }

    let mins: u32 = mins.parse().ok()?;
    let secs: u32 = secs.parse().ok()?;
    if secs > 59 {
        return None;
    }
    Some(mins * 60 + secs)
}
