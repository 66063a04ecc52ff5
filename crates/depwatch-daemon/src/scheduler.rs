//! Aligned-tick scheduler driving one triage cycle at a time.

use std::time::Duration;

use depwatch_core::schedule::next_tick_ms;
use depwatch_core::{now_ms, utc_string};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::Config;
use crate::cycle::{run_cycle, DependentsSource, ScanSink};

/// Minute of the hour the triage tick fires at.
pub const TICK_MINUTE_OFFSET: i64 = 52;

/// What to do when a cycle fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failed cycle and wait for the next tick.
    Continue,
    /// Propagate the failure out of the scheduler, ending the process.
    Exit,
}

/// Drives triage cycles on the aligned cadence until shutdown is requested.
///
/// One sequential loop: the next tick is computed only after the previous
/// cycle finished, so cycles can never overlap. A shutdown observed while
/// sleeping skips the pending tick; an in-flight cycle always runs to
/// completion first.
pub async fn run(
    config: &Config,
    source: &impl DependentsSource,
    sink: &impl ScanSink,
    policy: FailurePolicy,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    loop {
        let now = now_ms();
        let next = next_tick_ms(now, config.lookback_hours, TICK_MINUTE_OFFSET);
        info!(next = %utc_string(next), "next triage tick");

        let wait = Duration::from_millis((next - now) as u64);
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = sleep(wait) => {}
        }

        if let Err(e) = run_cycle(
            source,
            sink,
            &config.target,
            now_ms(),
            config.lookback_hours,
        )
        .await
        {
            error!(error = %e, "triage cycle failed");
            if policy == FailurePolicy::Exit {
                return Err(e.into());
            }
        }
    }

    info!("scheduler stopped");
    Ok(())
}
