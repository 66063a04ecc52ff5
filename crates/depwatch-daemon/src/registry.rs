//! Client for the registry's dependents-listing endpoint.

use async_trait::async_trait;
use depwatch_core::model::DependentsPage;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;

use crate::cycle::DependentsSource;

/// Browse endpoint prefix; the target name is appended as a path segment.
pub const DEFAULT_BASE_URL: &str = "https://www.npmjs.com/browse/depended";

/// Feature-gating header that switches the browse endpoint to its JSON
/// variant.
const JSON_VARIANT_HEADER: &str = "x-spiferack";

/// Client tag sent with every registry request.
const CLIENT_TAG: &str = "depwatch (dependents)";

/// Failure modes of one dependents fetch. Any of these aborts the cycle
/// before any dispatch happens.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never completed (includes timeouts).
    #[error("requesting dependents of {target}: {source}")]
    Transport {
        /// The watched package.
        target: String,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The registry answered with a non-200 status.
    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus {
        /// Status received.
        status: StatusCode,
        /// Final request URL.
        url: String,
    },
    /// The body did not decode into a dependents page.
    #[error("decoding dependents page from {url}: {source}")]
    Decode {
        /// Final request URL.
        url: String,
        /// Underlying decode failure.
        #[source]
        source: reqwest::Error,
    },
    /// The page answers for a different package than requested.
    #[error("wanted dependents of {wanted}, got {got}")]
    Mismatch {
        /// The requested target.
        wanted: String,
        /// What the page claims to answer for.
        got: String,
    },
    /// The page carries no packages at all.
    #[error("registry returned 0 dependents for {target}")]
    Empty {
        /// The watched package.
        target: String,
    },
}

/// HTTP client for the dependents listing.
pub struct RegistryClient {
    http: Client,
    base_url: String,
}

impl RegistryClient {
    /// Client against the production registry.
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Client against an alternate endpoint.
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DependentsSource for RegistryClient {
    /// Fetches the current dependents page for `target`.
    ///
    /// The page comes back exactly as received; descending publish-time
    /// order is the registry's contract, not re-checked here.
    async fn fetch_dependents(&self, target: &str) -> Result<DependentsPage, FetchError> {
        let url = format!("{}/{}", self.base_url, target);
        let res = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(JSON_VARIANT_HEADER, "1")
            .header(header::USER_AGENT, CLIENT_TAG)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                target: target.to_string(),
                source,
            })?;

        let status = res.status();
        let url = res.url().to_string();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus { status, url });
        }

        let page: DependentsPage = res
            .json()
            .await
            .map_err(|source| FetchError::Decode { url, source })?;
        validate_page(&page, target)?;
        Ok(page)
    }
}

/// Rejects pages that answer for the wrong target or carry no packages.
fn validate_page(page: &DependentsPage, target: &str) -> Result<(), FetchError> {
    if page.dependency != target {
        return Err(FetchError::Mismatch {
            wanted: target.to_string(),
            got: page.dependency.clone(),
        });
    }
    if page.packages.is_empty() {
        return Err(FetchError::Empty {
            target: target.to_string(),
        });
    }
    Ok(())
}
