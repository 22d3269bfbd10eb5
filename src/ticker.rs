use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 100;

/// Length of the fade-in / fade-out of a list row
pub const TRANSITION_MS: u64 = 400;

/// How long a fired reminder stays in the status line
pub const TOAST_SECS: u64 = 8;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Get row transition duration
pub fn transition_duration() -> Duration {
    Duration::from_millis(TRANSITION_MS)
}

/// Get toast display duration
pub fn toast_duration() -> Duration {
    Duration::from_secs(TOAST_SECS)
}
