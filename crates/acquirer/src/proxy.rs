//! Proxy validation.

use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::apis::PROXY_PROBE_URL;
use crate::error::AcquirerError;

/// Deadline for the proxy probe request.
const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Validated proxy configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProxyConfig {
    /// No proxy; connect directly.
    #[default]
    Direct,
    /// A candidate proxy that answered the probe with a 2xx.
    Proxied(String),
}

/// Probe a candidate proxy and accept it only if the echo endpoint answers
/// with a 2xx within the deadline. Any failure falls back to a direct
/// connection.
pub async fn validate_proxy(candidate: &str) -> ProxyConfig {
    match probe(candidate).await {
        Ok(()) => {
            info!(proxy = candidate, "proxy probe passed");
            ProxyConfig::Proxied(candidate.to_string())
        }
        Err(e) => {
            warn!(proxy = candidate, error = %e, "proxy probe failed; connecting directly");
            ProxyConfig::Direct
        }
    }
}

async fn probe(candidate: &str) -> Result<(), AcquirerError> {
    let client = Client::builder()
        .proxy(reqwest::Proxy::all(candidate)?)
        .timeout(PROBE_TIMEOUT)
        .build()?;
    let response = client.get(PROXY_PROBE_URL).send().await?;
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AcquirerError::Status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_candidate_falls_back_to_direct() {
        // Proxy::all rejects the scheme before any network traffic happens.
        let config = validate_proxy("not a proxy url").await;
        assert_eq!(config, ProxyConfig::Direct);
    }

    #[test]
    fn default_is_direct() {
        assert_eq!(ProxyConfig::default(), ProxyConfig::Direct);
    }
}
