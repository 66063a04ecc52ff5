//! The triage walk: which dependents out of one page deserve a scan.

use tracing::warn;

use crate::model::PackageRecord;
use crate::time::EpochMs;

/// Selects the packages worth scanning out of one dependents page.
///
/// Single forward pass over `packages`, which the registry returns newest
/// first. The walk stops at the first record published before `cutoff`;
/// everything behind it is assumed older still. Scoped packages are skipped
/// but do not stop the walk. Input order is preserved in the output.
pub fn select_for_scan(packages: &[PackageRecord], cutoff: EpochMs) -> Vec<&PackageRecord> {
    let mut selected = Vec::new();
    let mut prev_ts: Option<EpochMs> = None;

    for pkg in packages {
        // The descending-order contract cannot be verified upstream; note
        // violations here without changing the walk.
        if let Some(prev) = prev_ts {
            if pkg.date.ts > prev {
                warn!(
                    package = %pkg.name,
                    ts = pkg.date.ts,
                    prev_ts = prev,
                    "dependents page out of publish-time order"
                );
            }
        }
        prev_ts = Some(pkg.date.ts);

        if pkg.date.ts < cutoff {
            break;
        }
        if pkg.is_scoped() {
            continue;
        }
        selected.push(pkg);
    }

    selected
}
