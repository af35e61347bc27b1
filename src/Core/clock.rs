use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time in nanoseconds since the UNIX epoch.
///
/// A clock set before 1970 reads as 0 rather than failing.
pub fn timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
