//! Cleanup and parsing of the locale-specific text found in pbinfo markup.
//!
//! Every parser here is best-effort: `None` means "leave the field at its
//! zero value". Failures on non-empty input are reported as warnings so that
//! upstream format drift shows up in the logs without failing a retrieval.

use std::sync::LazyLock;
use std::time::Duration;

use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// The site renders "not specified" as a lone dash.
const ABSENT_MARKER: &str = "-";

/// Decimal multipliers, as the site uses them (`64 MB` is 64 000 000 bytes).
const SIZE_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Unit words accepted after a time limit value.
const SECOND_WORDS: &[&str] = &[
    "s", "sec", "secunda", "secunde", "second", "seconds",
];

/// Trim surrounding whitespace and map the absent marker (`-`) to an empty string.
pub fn normalize_text(text: &str) -> &str {
    let text = text.trim();
    if text == ABSENT_MARKER { "" } else { text }
}

/// Lowercase and strip diacritics, so `Ușoară` and `usoara` compare equal.
///
/// Covers the Romanian letters (ă, â, î, ș, ț and the legacy cedilla forms
/// ş, ţ) along with any other letter whose canonical decomposition carries
/// combining marks.
pub fn fold_diacritics(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Parse a human-readable decimal size such as `64 MB` or `1.5GB` into bytes.
pub fn parse_human_size(text: &str) -> Option<u64> {
    static SIZE_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(r"^(\d+(?:\.\d+)?)\s?([kKmMgGtTpP])?[iI]?[bB]?$").unwrap()
    });

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let Some(caps) = SIZE_RE.captures(text) else {
        warn!(raw = text, "Unrecognized size format");
        return None;
    };

    let value: f64 = caps[1].parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        None => 1.0,
        Some(unit) => match unit.as_str() {
            "k" => 1e3,
            "m" => 1e6,
            "g" => 1e9,
            "t" => 1e12,
            "p" => 1e15,
            _ => return None,
        },
    };

    Some((value * multiplier) as u64)
}

/// Render a byte count with four significant digits and a decimal unit (`64MB`).
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    format!("{}{}", significant_digits(value, 4), SIZE_UNITS[unit])
}

fn significant_digits(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let integral = value.abs().log10().floor() as i32 + 1;
    let decimals = (digits - integral).max(0) as usize;
    let formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Parse a time limit such as `0.1 secunde` into a duration.
///
/// Only the leading token is read, as a count of seconds. A trailing unit
/// word other than a seconds spelling is still read as seconds, with a
/// warning, since the site has never been seen using another unit.
pub fn parse_seconds(text: &str) -> Option<Duration> {
    let mut tokens = text.split_whitespace();
    let raw = tokens.next()?;

    let duration = match raw.parse::<f64>().ok().map(Duration::try_from_secs_f64) {
        Some(Ok(duration)) => duration,
        _ => {
            warn!(raw = text, "Unparsable time limit");
            return None;
        }
    };

    if let Some(unit) = tokens.next() {
        let unit = fold_diacritics(unit);
        let unit = unit.trim_end_matches('.');
        if !SECOND_WORDS.contains(&unit) {
            warn!(raw = text, unit, "Unexpected time limit unit, reading as seconds");
        }
    }

    Some(duration)
}
