use super::enums::Transition;
use chrono::{NaiveDate, NaiveDateTime};

/// Format a timestamp the way a US-English locale prints it,
/// e.g. `7/21/2025, 10:00:00 AM`
pub fn format_local_timestamp(time: NaiveDateTime) -> String {
    time.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Format a due date for display next to a task or goal
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render a progress value (0-100) as a fixed-width bar
pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress as usize * width + 50) / 100;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Checkbox glyph for a task row
pub fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// How far through its transition a row is drawn, from 0.0 (start) to 1.0
/// (fully settled). Rows without a transition are always settled.
pub fn transition_ratio(transition: Option<Transition>, elapsed_ms: u128, duration_ms: u128) -> f64 {
    match transition {
        None => 1.0,
        Some(_) if duration_ms == 0 => 1.0,
        Some(_) => (elapsed_ms as f64 / duration_ms as f64).min(1.0),
    }
}
