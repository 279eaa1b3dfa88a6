//! Utility functions shared by the pipeline and the CLI

/// Truncate a string to at most `max_chars` Unicode scalar values.
/// Returns the longest prefix that fits, always on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Format a millisecond duration as `m:ss.mmm`.
pub fn format_duration_ms(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1000;
    let ms = millis % 1000;
    format!("{}:{:02}.{:03}", minutes, seconds, ms)
}
