use std::borrow::Cow;
use std::time::{Duration, Instant};

/// Marker appended to content cut by [`truncate_at_word`].
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Format a `Duration` as a human-readable string with automatic unit scaling.
///
/// Produces output like `1.94ms` or `2.34s` using Rust's Debug format.
pub fn fmt_duration(d: Duration) -> String {
    format!("{d:.2?}")
}

/// Log a warning if the elapsed time since `start` exceeds `threshold`.
pub fn log_if_slow(start: Instant, threshold: Duration, label: &str) {
    let elapsed = start.elapsed();
    if elapsed > threshold {
        tracing::warn!(
            duration = fmt_duration(elapsed),
            threshold = fmt_duration(threshold),
            "Slow request: {label}"
        );
    }
}

/// Render `content` as text, cutting it at the last space within `limit` bytes.
///
/// Content at or under the limit is returned whole. Without a space to cut
/// at, the cut falls on the limit itself.
pub fn truncate_at_word(content: &[u8], limit: usize) -> Cow<'_, str> {
    if content.len() <= limit {
        return String::from_utf8_lossy(content);
    }

    let head = &content[..limit];
    let cut = head.iter().rposition(|&b| b == b' ').unwrap_or(limit);
    let mut text = String::from_utf8_lossy(&content[..cut]).into_owned();
    text.push_str(TRUNCATION_MARKER);
    Cow::Owned(text)
}
