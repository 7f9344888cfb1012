//! Helpers for normalizing user text and rendering timestamps.

use chrono::{DateTime, Local, TimeZone};
use unicode_normalization::UnicodeNormalization;

/// Normalize a participant name: trim, collapse inner whitespace, NFC.
///
/// Returns `None` for names that are blank once trimmed.
pub fn normalize_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = String::new();
    for token in trimmed.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(token.nfc());
    }
    Some(out)
}

/// Renders when a saved session was last written, relative to `now`.
///
/// `today 14:05`, `yesterday 09:30`, otherwise `3 Oct 18:12`.
pub fn format_saved_at<Tz: TimeZone>(ts: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let time = ts.format("%H:%M");
    let day = ts.date_naive();
    let today = now.date_naive();
    if day == today {
        return format!("today {time}");
    }
    if Some(day) == today.pred_opt() {
        return format!("yesterday {time}");
    }
    format!("{} {time}", ts.format("%-d %b"))
}

/// [`format_saved_at`] in the local timezone.
pub fn format_saved_at_local<Tz: TimeZone>(ts: &DateTime<Tz>) -> String {
    let local = ts.with_timezone(&Local);
    format_saved_at(&local, &Local::now())
}
