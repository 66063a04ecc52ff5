//! One triage cycle: cutoff, fetch, walk, dispatch.

use async_trait::async_trait;
use depwatch_core::model::DependentsPage;
use depwatch_core::triage::select_for_scan;
use depwatch_core::{cutoff_ms, utc_string, EpochMs};
use thiserror::Error;
use tracing::info;

use crate::registry::FetchError;
use crate::scanner::ScanError;

/// Upstream listing of dependents. The seam lets tests substitute transports.
#[async_trait]
pub trait DependentsSource: Send + Sync {
    /// Fetches the current dependents page for `target`.
    async fn fetch_dependents(&self, target: &str) -> Result<DependentsPage, FetchError>;
}

/// Outbound submission of one package to the scanner.
#[async_trait]
pub trait ScanSink: Send + Sync {
    /// Submits `package` for analysis.
    async fn submit(&self, package: &str) -> Result<(), ScanError>;
}

/// Why a cycle ended early.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The dependents fetch failed; nothing was dispatched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A dispatch failed; later selected packages were not attempted.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Counts from one completed cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleReport {
    /// Packages on the fetched page.
    pub listed: usize,
    /// Packages that passed the triage walk.
    pub selected: usize,
    /// Packages submitted to the scanner; equals `selected` on success.
    pub dispatched: usize,
}

/// Runs one full triage cycle against `target`.
///
/// A fetch failure aborts before any dispatch; the first dispatch failure
/// aborts the remainder, leaving later packages unattempted. No retries at
/// this layer.
pub async fn run_cycle(
    source: &impl DependentsSource,
    sink: &impl ScanSink,
    target: &str,
    now: EpochMs,
    lookback_hours: i64,
) -> Result<CycleReport, CycleError> {
    let cutoff = cutoff_ms(now, lookback_hours);
    info!(now, cutoff = %utc_string(cutoff), "starting triage cycle");

    info!(dependency = %target, "getting dependents");
    let page = source.fetch_dependents(target).await?;

    let selected = select_for_scan(&page.packages, cutoff);
    let mut dispatched = 0;
    for pkg in &selected {
        sink.submit(&pkg.name).await?;
        dispatched += 1;
    }

    let report = CycleReport {
        listed: page.packages.len(),
        selected: selected.len(),
        dispatched,
    };
    info!(
        listed = report.listed,
        selected = report.selected,
        dispatched = report.dispatched,
        "triage cycle complete"
    );
    Ok(report)
}
