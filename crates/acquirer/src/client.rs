use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER, USER_AGENT};
use tracing::debug;

use crate::apis::SITE_URL;
use crate::error::AcquirerError;
use crate::proxy::ProxyConfig;

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Timeout applied to data and identity requests.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared HTTP client, honoring the session's validated proxy.
pub(crate) fn build_client(proxy: &ProxyConfig) -> Result<Client, AcquirerError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(30));
    if let ProxyConfig::Proxied(addr) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(addr)?);
    }
    builder.build().map_err(AcquirerError::from)
}

/// Produce a fresh header set for one outbound request.
///
/// Headers are rebuilt from the session's current cookie state on every call;
/// nothing is mutated in place and no header map is shared between requests.
pub(crate) fn request_headers(cookie: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_UA));
    headers.insert(REFERER, HeaderValue::from_static(SITE_URL));
    if let Some(cookie) = cookie {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(e) => {
                // Sending no Cookie header beats sending a mangled one.
                debug!(error = %e, "invalid cookie value; skipping Cookie header");
            }
        }
    }
    headers
}
