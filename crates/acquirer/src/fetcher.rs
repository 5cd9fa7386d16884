//! Cursor-based page retrieval.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::error;

use crate::apis::{APP_ID, FAVORITE_API, POST_API};
use crate::client::{REQUEST_TIMEOUT, request_headers};
use crate::error::AcquirerError;
use crate::models::PostsPage;
use crate::sign::Signer;
use crate::throttle;

/// Items requested per page.
pub(crate) const PAGE_SIZE: u32 = 35;

/// Which of the two bulk endpoints a session crawls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Posts,
    Favorites,
}

impl ApiKind {
    pub(crate) fn endpoint(self) -> &'static str {
        match self {
            Self::Posts => POST_API,
            Self::Favorites => FAVORITE_API,
        }
    }
}

impl std::str::FromStr for ApiKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(Self::Posts),
            "favorite" => Ok(Self::Favorites),
            other => Err(format!(
                "batch kind must be \"post\" or \"favorite\", got {other:?}"
            )),
        }
    }
}

/// One page of works for an account, addressed by cursor.
///
/// Seam for the crawl loop; production uses [`WorksApi`], tests substitute
/// scripted sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, account_id: &str, cursor: i64) -> Result<PostsPage, AcquirerError>;
}

/// Signed fetcher against the vendor's works endpoints.
pub struct WorksApi {
    client: Client,
    endpoint: &'static str,
    signer: Arc<dyn Signer>,
    cookie: String,
}

impl WorksApi {
    pub(crate) fn new(
        client: Client,
        api: ApiKind,
        signer: Arc<dyn Signer>,
        cookie: String,
    ) -> Self {
        Self {
            client,
            endpoint: api.endpoint(),
            signer,
            cookie,
        }
    }
}

#[async_trait]
impl PageSource for WorksApi {
    async fn fetch_page(&self, account_id: &str, cursor: i64) -> Result<PostsPage, AcquirerError> {
        let params = [
            ("aid", APP_ID.to_string()),
            ("sec_user_id", account_id.to_string()),
            ("count", PAGE_SIZE.to_string()),
            ("max_cursor", cursor.to_string()),
            ("cookie_enabled", "true".to_string()),
            ("platform", "PC".to_string()),
            ("downlink", "10".to_string()),
        ];
        let query = encode_query(&params);
        let signature = self.signer.sign(&query);
        let url = format!(
            "{}?{}&X-Bogus={}",
            self.endpoint,
            query,
            urlencoding::encode(&signature)
        );

        let response = self
            .client
            .get(url)
            .headers(request_headers(Some(&self.cookie)))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(AcquirerError::from)?;
        throttle::pause().await;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "works endpoint returned an unexpected status");
            return Err(AcquirerError::Status(status));
        }

        let body = response.text().await.map_err(AcquirerError::from)?;
        // Two-step decode so undecodable bodies and missing fields are
        // reported with their respective payloads.
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            error!(%body, error = %e, "works endpoint returned an undecodable body");
            AcquirerError::Protocol(format!("undecodable body: {e}"))
        })?;
        let page: PostsPage = serde_json::from_value(value.clone()).map_err(|e| {
            error!(payload = %value, error = %e, "works payload is missing expected fields");
            AcquirerError::Protocol(format!("missing expected fields: {e}"))
        })?;
        Ok(page)
    }
}

/// Urlencode the ordered parameter set; the signature is computed over this
/// exact string, so ordering must match what is sent.
fn encode_query(params: &[(&str, String)]) -> String {
    let mut query = String::new();
    for (key, value) in params {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(key);
        query.push('=');
        query.push_str(&urlencoding::encode(value));
    }
    query
}
