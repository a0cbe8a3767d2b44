use crate::results::RecommendationItem;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+").expect("number pattern should be valid"));

/// Estimated savings of a recommendation in milliseconds
///
/// A finite `savings_ms` wins. Otherwise the human-readable `savings`
/// string is parsed; an item with neither counts as zero.
pub fn estimate_savings_ms(item: &RecommendationItem) -> f64 {
    if let Some(ms) = item.savings_ms {
        if ms.is_finite() {
            return ms;
        }
    }

    match &item.savings {
        Some(text) => parse_duration_ms(text),
        None => 0.0,
    }
}

/// Parses a display duration such as "1.2 s", "300 ms" or "1,5 s" into milliseconds
///
/// Strings without a number yield zero. A number with no unit is taken as
/// milliseconds. The whole first run of digits and dots must be a valid
/// number, so "1.2.3 s" yields zero rather than a prefix like 1.2.
pub fn parse_duration_ms(text: &str) -> f64 {
    let normalized = text.replace(',', ".").to_lowercase();

    let value = match NUMBER
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        Some(value) if value.is_finite() => value,
        _ => return 0.0,
    };

    // "ms" has to be checked first since it also contains "s"
    if normalized.contains("ms") {
        value
    } else if normalized.contains('s') {
        value * 1000.0
    } else {
        value
    }
}

/// Formats milliseconds the way the analyzer displays durations
///
/// Only used when an audit carries no display value of its own.
pub fn format_savings(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.1} s", ms / 1000.0)
    } else {
        format!("{} ms", ms.round() as i64)
    }
}
