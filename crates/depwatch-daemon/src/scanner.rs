//! Client for the scanner's per-package analysis endpoint.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::info;

use crate::cycle::ScanSink;

/// Analysis endpoint prefix; the package name is appended as a path segment.
pub const DEFAULT_BASE_URL: &str = "https://dprk-research.kmsec.uk/api/scanner/analyse/package";

/// Landing here after redirects means the credential was rejected.
const LOGIN_PATH: &str = "/login";

/// Failure modes of one dispatch. Any of these aborts the rest of the cycle.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The request never completed (includes timeouts).
    #[error("sending {package} to scanner: {source}")]
    Transport {
        /// Package being dispatched.
        package: String,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The scanner answered with a non-200 status.
    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus {
        /// Package being dispatched.
        package: String,
        /// Status received.
        status: StatusCode,
        /// Final request URL.
        url: String,
    },
    /// The request was redirected to the login page: the api key is invalid
    /// or expired. Needs operator intervention, unlike the other variants.
    #[error("api key rejected: dispatch of {package} was redirected to {path}")]
    AuthRedirect {
        /// Package being dispatched.
        package: String,
        /// The login path the client landed on.
        path: String,
    },
}

/// HTTP client for scan submissions.
pub struct ScannerClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ScannerClient {
    /// Client against the production scanner.
    pub fn new(http: Client, api_key: String) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL, api_key)
    }

    /// Client against an alternate endpoint.
    pub fn with_base_url(http: Client, base_url: impl Into<String>, api_key: String) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ScanSink for ScannerClient {
    async fn submit(&self, package: &str) -> Result<(), ScanError> {
        let url = format!("{}/{}", self.base_url, package);
        let res = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, self.api_key.as_str())
            .send()
            .await
            .map_err(|source| ScanError::Transport {
                package: package.to_string(),
                source,
            })?;

        classify(package, res.status(), res.url().path(), res.url().as_str())?;
        info!(package, "sent to scanner");
        Ok(())
    }
}

/// Classifies the terminal response of one dispatch.
///
/// The login check runs first: a redirect to the login page is a credential
/// problem whatever status that page itself serves.
fn classify(
    package: &str,
    status: StatusCode,
    final_path: &str,
    final_url: &str,
) -> Result<(), ScanError> {
    if final_path == LOGIN_PATH {
        return Err(ScanError::AuthRedirect {
            package: package.to_string(),
            path: final_path.to_string(),
        });
    }
    if status != StatusCode::OK {
        return Err(ScanError::UnexpectedStatus {
            package: package.to_string(),
            status,
            url: final_url.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_accepted() {
        let out = classify(
            "pkg",
            StatusCode::OK,
            "/api/scanner/analyse/package/pkg",
            "https://scanner.test/api/scanner/analyse/package/pkg",
        );
        assert!(out.is_ok());
    }

    #[test]
    fn test_login_redirect_is_auth_failure() {
        let err = classify("pkg", StatusCode::OK, "/login", "https://scanner.test/login")
            .unwrap_err();
        assert!(matches!(err, ScanError::AuthRedirect { .. }));
    }

    #[test]
    fn test_login_redirect_wins_over_bad_status() {
        // Whatever the login page serves, the classification stays a
        // credential failure, never a generic status failure.
        let err = classify(
            "pkg",
            StatusCode::FORBIDDEN,
            "/login",
            "https://scanner.test/login",
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::AuthRedirect { .. }));
    }

    #[test]
    fn test_non_ok_status_rejected() {
        let err = classify(
            "pkg",
            StatusCode::INTERNAL_SERVER_ERROR,
            "/api/scanner/analyse/package/pkg",
            "https://scanner.test/api/scanner/analyse/package/pkg",
        )
        .unwrap_err();
        match err {
            ScanError::UnexpectedStatus { status, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
