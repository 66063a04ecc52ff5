use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{LocalResult, TimeZone, Utc};

/// Milliseconds since UNIX epoch.
pub type EpochMs = i64;

/// One hour in milliseconds.
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Returns current unix epoch milliseconds.
pub fn now_ms() -> EpochMs {
    let dur = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock set before UNIX_EPOCH");
    dur.as_millis() as i64
}

/// Earliest publish timestamp still eligible for scanning, given a lookback
/// window in whole hours. With a zero window the cutoff is `now` itself.
pub fn cutoff_ms(now: EpochMs, lookback_hours: i64) -> EpochMs {
    now - lookback_hours * MS_PER_HOUR
}

/// Renders an epoch-ms timestamp as UTC for log lines.
pub fn utc_string(ms: EpochMs) -> String {
    match Utc.timestamp_millis_opt(ms) {
        LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        _ => format!("{ms}ms"),
    }
}
