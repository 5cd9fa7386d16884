//! Identity resolution via redirect following.

use reqwest::Client;
use tracing::error;
use url::Url;

use crate::client::{REQUEST_TIMEOUT, request_headers};
use crate::error::AcquirerError;
use crate::throttle;

/// Follow redirects from `url` and take the last path segment of the final
/// URL as the identifier (account `sec_uid` or work id).
pub(crate) async fn resolve_redirect(
    client: &Client,
    cookie: Option<&str>,
    url: &str,
) -> Result<String, AcquirerError> {
    let response = client
        .get(url)
        .headers(request_headers(cookie))
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(AcquirerError::from)?;
    throttle::pause().await;

    let status = response.status();
    if !status.is_success() {
        error!(%url, %status, "identity resolution returned an unexpected status");
        return Err(AcquirerError::Status(status));
    }

    path_tail(response.url())
        .ok_or_else(|| AcquirerError::Protocol(format!("resolved URL has no path: {}", response.url())))
}

/// Last path segment of a URL, ignoring a trailing slash.
fn path_tail(url: &Url) -> Option<String> {
    url.path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_ignores_trailing_slash() {
        let url = Url::parse("https://www.douyin.com/user/MS4wLjABAAAAxyz/").unwrap();
        assert_eq!(path_tail(&url).unwrap(), "MS4wLjABAAAAxyz");
    }

    #[test]
    fn tail_takes_last_segment() {
        let url = Url::parse("https://www.douyin.com/video/7123456789012345678").unwrap();
        assert_eq!(path_tail(&url).unwrap(), "7123456789012345678");
    }

    #[test]
    fn tail_is_none_for_bare_root() {
        let url = Url::parse("https://www.douyin.com/").unwrap();
        assert_eq!(path_tail(&url), None);
    }

    #[test]
    fn tail_ignores_query_parameters() {
        let url =
            Url::parse("https://www.douyin.com/user/MS4wLjABAAAAxyz?from_tab_name=main").unwrap();
        assert_eq!(path_tail(&url).unwrap(), "MS4wLjABAAAAxyz");
    }
}
