//! Live room resolution.

use reqwest::Client;
use tracing::{info, warn};

use crate::apis::{APP_ID, WEBCAST_ENTER_API};
use crate::client::{REQUEST_TIMEOUT, request_headers};
use crate::error::AcquirerError;
use crate::links;
use crate::models::LiveEnterResponse;
use crate::sanitize;
use crate::sign::Signer;
use crate::token::TokenProvider;

/// Broadcast status code meaning the stream has ended.
const STATUS_ENDED: i32 = 4;

/// Quality keys tried in order when picking the stream URL.
const PREFERRED_QUALITIES: [&str; 2] = ["FULL_HD1", "HD1"];

/// A resolved, currently running live room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRoom {
    pub room_id: String,
    pub nickname: String,
    pub title: String,
    pub stream_url: String,
}

/// Outcome of resolving a live link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveOutcome {
    Live(LiveRoom),
    /// The broadcast has ended; no stream URL is meaningful.
    Ended,
}

/// Resolve a live link to status, title and stream URL. Single attempt; any
/// failure is surfaced, not retried.
pub(crate) async fn resolve_live(
    client: &Client,
    signer: &dyn Signer,
    tokens: &dyn TokenProvider,
    cookie: &str,
    link: &str,
) -> Result<LiveOutcome, AcquirerError> {
    let room_id = links::live_room_id(link).ok_or_else(|| {
        warn!(%link, "live link did not match the expected pattern");
        AcquirerError::InvalidLink(link.to_string())
    })?;

    let (ms_token, ttwid) = tokens.mint();
    let cookie = format!("{cookie}; msToken={ms_token}; ttwid={ttwid}");

    let params = [
        ("aid", APP_ID.to_string()),
        ("device_platform", "web".to_string()),
        ("web_rid", room_id.clone()),
    ];
    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let signature = signer.sign(&query);
    let url = format!(
        "{WEBCAST_ENTER_API}?{query}&X-Bogus={}",
        urlencoding::encode(&signature)
    );

    let response = client
        .get(url)
        .headers(request_headers(Some(&cookie)))
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(AcquirerError::from)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquirerError::Status(status));
    }

    let body = response.text().await.map_err(AcquirerError::from)?;
    parse_live_response(&room_id, &body)
}

/// Parse the enter-room payload into a [`LiveOutcome`].
fn parse_live_response(room_id: &str, body: &str) -> Result<LiveOutcome, AcquirerError> {
    let response: LiveEnterResponse = serde_json::from_str(body)
        .map_err(|e| AcquirerError::Protocol(format!("live payload: {e}")))?;

    let room = response
        .data
        .data
        .first()
        .ok_or_else(|| AcquirerError::Protocol("no room data in live payload".to_string()))?;

    if room.status == STATUS_ENDED {
        info!(room_id, "broadcast has ended");
        return Ok(LiveOutcome::Ended);
    }

    let stream_url = room
        .stream_url
        .as_ref()
        .and_then(|s| {
            PREFERRED_QUALITIES
                .iter()
                .find_map(|q| s.flv_pull_url.get(*q))
                .or_else(|| s.flv_pull_url.values().next())
        })
        .cloned()
        .ok_or_else(|| AcquirerError::Protocol("no stream url in live payload".to_string()))?;

    Ok(LiveOutcome::Live(LiveRoom {
        room_id: room_id.to_string(),
        nickname: sanitize::clean(&room.owner.nickname),
        title: sanitize::clean(&room.title),
        stream_url,
    }))
}
