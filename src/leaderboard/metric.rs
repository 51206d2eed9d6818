//! Performance counter parsing.
//!
//! Creators report views and likes the way platforms display them, so the
//! same counter can arrive as `12300`, `"12,300"` or `"12.3K"`. Parsing never
//! fails: anything unreadable counts as zero so a leaderboard can always be
//! rendered.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;

/// A raw view or like counter as submitted by a creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Already numeric
    Number(f64),
    /// Display text such as "1.1M" or "1,234"
    Text(String),
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Text("0".to_string())
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Number(value as f64)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

fn leading_float() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").ok())
        .as_ref()
}

fn leading_integer() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[+-]?\d+").ok()).as_ref()
}

/// Parse a counter into a whole number.
pub fn parse_metric(value: &MetricValue) -> u64 {
    match value {
        MetricValue::Number(n) => clamp_count(*n),
        MetricValue::Text(s) => parse_metric_str(s),
    }
}

/// Parse a textual counter into a whole number.
///
/// A `K` anywhere in the text scales the leading number by a thousand, an `M`
/// by a million (`K` wins when both appear). Without a suffix, thousands
/// separators are stripped and the leading integer is used. Negative counts
/// become zero and counts too large for a `u64` saturate.
pub fn parse_metric_str(raw: &str) -> u64 {
    if raw.contains('K') {
        return clamp_count(parse_leading_float(raw) * THOUSAND);
    }
    if raw.contains('M') {
        return clamp_count(parse_leading_float(raw) * MILLION);
    }

    let stripped = raw.replace(',', "");
    leading_integer()
        .and_then(|re| re.find(&stripped))
        .map(|m| saturating_count(m.as_str().trim()))
        .unwrap_or(0)
}

/// Digits with an optional sign, as matched by the leading-integer pattern.
fn saturating_count(digits: &str) -> u64 {
    match digits.strip_prefix('-') {
        Some(_) => 0,
        None => digits.parse::<u64>().unwrap_or(u64::MAX),
    }
}

fn parse_leading_float(raw: &str) -> f64 {
    leading_float()
        .and_then(|re| re.find(raw))
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Round to the nearest count; NaN, infinities and negatives become zero.
fn clamp_count(n: f64) -> u64 {
    if n.is_finite() && n > 0.0 {
        n.round() as u64
    } else {
        0
    }
}

/// Render a total the way the campaign KPI card shows it ("150.0K", "1.2M").
pub fn format_compact(total: u64) -> String {
    let n = total as f64;
    if n > MILLION {
        format!("{:.1}M", n / MILLION)
    } else {
        format!("{:.1}K", n / THOUSAND)
    }
}
