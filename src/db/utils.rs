//! Database utility functions.

use chrono::Utc;

use super::Timestamp;

/// Current time in milliseconds since the Unix epoch.
pub fn current_timestamp() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Next `updated_at` for an entity last written at `previous`.
///
/// Always strictly greater than `previous`, even when two writes land in the
/// same millisecond or the clock steps backwards.
pub fn next_updated_at(previous: Timestamp) -> Timestamp {
    current_timestamp().max(previous.saturating_add(1))
}
