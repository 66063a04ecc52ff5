#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared triage domain for the dependents watch daemon.

pub mod model;
pub mod schedule;
pub mod triage;

mod time;

pub use time::{cutoff_ms, now_ms, utc_string, EpochMs, MS_PER_HOUR};
