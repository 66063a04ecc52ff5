use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::time::EpochMs;

/// One page of the registry's dependents listing for a target package.
///
/// Decoded from the JSON variant of the browse endpoint. The registry
/// returns `packages` in descending publish-time order; that ordering is an
/// upstream contract this model records but does not enforce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentsPage {
    /// Page heading, unused by triage.
    #[serde(default)]
    pub title: String,
    /// Which package this page answers for. Must match the requested target.
    pub dependency: String,
    /// Dependent packages, newest first.
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
}

/// A dependent package as reported by the registry at fetch time.
///
/// A value snapshot: records are created fresh on each fetch and discarded
/// when the cycle ends. Only `name` and `date.ts` drive triage; the rest is
/// carried for log context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name, possibly scope-prefixed (`@org/name`).
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub maintainers: Vec<String>,
    #[serde(default)]
    pub publisher: Publisher,
    /// Publish time; absent decodes as the epoch and so sorts below any
    /// realistic cutoff.
    #[serde(default)]
    pub date: PublishDate,
    #[serde(default)]
    pub version: String,
}

impl PackageRecord {
    /// Scoped names are excluded from scanning by policy.
    pub fn is_scoped(&self) -> bool {
        self.name.starts_with('@')
    }
}

/// Who published the dependent package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Publisher {
    /// Registry account name.
    #[serde(default)]
    pub name: String,
    /// Avatar URLs by size; shape varies, kept opaque.
    #[serde(default)]
    pub avatars: BTreeMap<String, serde_json::Value>,
}

/// Publish time as reported by the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishDate {
    /// Milliseconds since epoch; the sort and filter key for triage.
    #[serde(default)]
    pub ts: EpochMs,
    /// Human-readable relative form, e.g. "a day ago".
    #[serde(default)]
    pub rel: String,
}
