//! HTTP(S) transport backed by `reqwest`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::FetchResponse;

use super::Transport;

// ============================================================================
// Constants
// ============================================================================

/// User agent sent with every request.
const USER_AGENT: &str = concat!("tab-session/", env!("CARGO_PKG_VERSION"));

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// HttpTransport
// ============================================================================

/// [`Transport`] that performs a plain `GET`, following redirects.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport with a default client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Creates a transport around an existing client.
    #[inline]
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        debug!(url = %url, "HTTP GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch_failed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch_failed(format!("malformed response: {e}")))?;

        trace!(url = %url, status, len = body.len(), "HTTP response read");
        Ok(FetchResponse::new(status, body.to_vec()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_builds() {
        let transport = HttpTransport::new().expect("client builds");
        assert!(format!("{transport:?}").contains("HttpTransport"));
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("tab-session/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let transport = HttpTransport::new().expect("client builds");
        // Port 9 on localhost is the discard service and is closed on test hosts.
        let err = transport.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(err.is_fetch_error());
    }
}
