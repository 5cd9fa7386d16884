//! Link classification.
//!
//! Four mutually exclusive patterns are tried in a fixed precedence that
//! differs between the crawl-target path and the single-work path. A
//! non-match is an ordinary outcome callers branch on, not an error.

use std::sync::LazyLock;

use regex::Regex;

/// Short share link embedded anywhere in the input text.
static SHARE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https://v\.douyin\.com/[A-Za-z0-9]+/)").unwrap());

/// Canonical account link, optionally carrying a `modal_id` work id.
static ACCOUNT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://www\.douyin\.com/user/([a-zA-Z0-9_-]+)(?:\?modal_id=([0-9]{19}))?.*$")
        .unwrap()
});

/// Canonical single-work link (video or image note).
static WORK_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://www\.douyin\.com/(?:video|note)/([0-9]{19})$").unwrap());

/// Live room link.
static LIVE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://live\.douyin\.com/([0-9]+)$").unwrap());

/// Classified crawl target for the bulk workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlTarget {
    /// Share link; the account id must be resolved by following the redirect.
    NeedsRedirect(String),
    /// Account link; the `sec_uid` was extracted directly, no network needed.
    PreResolved {
        sec_uid: String,
        /// A `modal_id` work id piggybacking on the account link, kept for
        /// reuse by the single-work resolver.
        modal_work_id: Option<String>,
    },
}

/// Classified link for the single-work workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkLink {
    /// The 19-digit work id is embedded in the link itself.
    Direct(String),
    /// Share link; the work id must be resolved by following the redirect.
    NeedsRedirect(String),
}

/// Classify an input string as a crawl target.
///
/// Precedence: share link first, then account link. Anything else is `None`
/// and the caller must fail the workflow.
pub fn classify_target(input: &str) -> Option<CrawlTarget> {
    if let Some(caps) = SHARE_LINK.captures(input) {
        return Some(CrawlTarget::NeedsRedirect(caps[1].to_string()));
    }
    if let Some(caps) = ACCOUNT_LINK.captures(input) {
        return Some(CrawlTarget::PreResolved {
            sec_uid: caps[1].to_string(),
            modal_work_id: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }
    None
}

/// Classify an input string as a single-work link.
///
/// Precedence: work link first (id available without any network call), then
/// share link, then account link — the last only counts when it carries a
/// `modal_id` work id.
pub fn classify_work(input: &str) -> Option<WorkLink> {
    if let Some(caps) = WORK_LINK.captures(input) {
        return Some(WorkLink::Direct(caps[1].to_string()));
    }
    if let Some(caps) = SHARE_LINK.captures(input) {
        return Some(WorkLink::NeedsRedirect(caps[1].to_string()));
    }
    if let Some(caps) = ACCOUNT_LINK.captures(input) {
        if let Some(modal_id) = caps.get(2) {
            return Some(WorkLink::Direct(modal_id.as_str().to_string()));
        }
    }
    None
}

/// Extract the numeric room id from a live link.
pub fn live_room_id(input: &str) -> Option<String> {
    LIVE_LINK
        .captures(input)
        .map(|caps| caps[1].to_string())
}
