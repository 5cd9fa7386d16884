use thiserror::Error;

/// Error taxonomy for the session engine.
///
/// Retryable errors degrade into an empty page once the retry budget is
/// exhausted; fatal errors abort the workflow immediately.
#[derive(Debug, Error)]
pub enum AcquirerError {
    #[error("invalid link: {0}")]
    InvalidLink(String),
    #[error("missing required session field: {0}")]
    Configuration(&'static str),
    #[error("cookie is not set")]
    CookieMissing,
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status code: {0}")]
    Status(reqwest::StatusCode),
    #[error("http error: {0}")]
    Http(reqwest::Error),
    #[error("malformed response body: {0}")]
    Protocol(String),
    #[error("failed to resolve account identifier")]
    IdentityUnresolved,
    #[error("no data obtained for this account")]
    NoData,
}

impl AcquirerError {
    /// Whether the retry policy may attempt the operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Status(_) | Self::Http(_) | Self::Protocol(_)
        )
    }
}

impl From<reqwest::Error> for AcquirerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl From<serde_json::Error> for AcquirerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(AcquirerError::Timeout.is_retryable());
        assert!(AcquirerError::Protocol("bad json".into()).is_retryable());
        assert!(AcquirerError::Status(reqwest::StatusCode::FORBIDDEN).is_retryable());
        assert!(!AcquirerError::CookieMissing.is_retryable());
        assert!(!AcquirerError::Configuration("api").is_retryable());
        assert!(!AcquirerError::InvalidLink("x".into()).is_retryable());
    }
}
