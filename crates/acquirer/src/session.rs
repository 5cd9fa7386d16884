//! Session state and the two workflows.
//!
//! A [`Session`] owns every piece of mutable crawl state end-to-end; nothing
//! is shared between concurrent workflows. The bulk crawl walks
//! `Validating → Resolving → Paging → Filtering → Done`, failing fast on
//! configuration problems and degrading transient failures into an early,
//! logged end of data.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::client::build_client;
use crate::error::AcquirerError;
use crate::fetcher::{ApiKind, PageSource, WorksApi};
use crate::links::{self, CrawlTarget, WorkLink};
use crate::live::{self, LiveOutcome};
use crate::models::{Aweme, TYPE_IMAGE_GALLERY, TYPE_VIDEO};
use crate::proxy::ProxyConfig;
use crate::resolver;
use crate::retry::{DEFAULT_ATTEMPTS, with_retries};
use crate::sanitize;
use crate::sign::{Signer, XBogus};
use crate::token::{RandomTokens, TokenProvider};

/// Inclusive publish-date window, at calendar-date granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            // The platform's public launch window; nothing predates it.
            earliest: NaiveDate::from_ymd_opt(2016, 9, 20).unwrap(),
            latest: Local::now().date_naive(),
        }
    }
}

impl DateRange {
    pub fn new(earliest: NaiveDate, latest: NaiveDate) -> Result<Self, AcquirerError> {
        if earliest > latest {
            return Err(AcquirerError::Configuration("dateRange"));
        }
        Ok(Self { earliest, latest })
    }

    /// Parse `YYYY/MM/DD` bounds; a missing bound keeps its default.
    pub fn parse(earliest: Option<&str>, latest: Option<&str>) -> Result<Self, AcquirerError> {
        let defaults = Self::default();
        let earliest = match earliest {
            Some(s) => NaiveDate::parse_from_str(s, "%Y/%m/%d")
                .map_err(|_| AcquirerError::Configuration("earliest date"))?,
            None => defaults.earliest,
        };
        let latest = match latest {
            Some(s) => NaiveDate::parse_from_str(s, "%Y/%m/%d")
                .map_err(|_| AcquirerError::Configuration("latest date"))?,
            None => defaults.latest,
        };
        Self::new(earliest, latest)
    }

    /// Whether a Unix timestamp falls inside the window, judged on the local
    /// calendar date.
    pub(crate) fn contains(&self, timestamp: i64) -> bool {
        let Some(utc) = DateTime::from_timestamp(timestamp, 0) else {
            return false;
        };
        let date = utc.with_timezone(&Local).date_naive();
        self.earliest <= date && date <= self.latest
    }
}

/// A classified work reference: creation timestamp plus vendor id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRef {
    pub created_at: i64,
    pub id: String,
}

/// Orchestrator progression for one bulk crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Validating,
    Resolving,
    Paging,
    Filtering,
    Done,
    Failed,
}

/// Result of a finished bulk crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub account_name: String,
    pub videos: Vec<String>,
    pub images: Vec<String>,
}

/// Builder for [`Session`]; invalid input is rejected here, at construction
/// time, never logged and ignored.
#[derive(Default)]
pub struct SessionBuilder {
    api: Option<ApiKind>,
    target: Option<String>,
    cookie: Option<String>,
    date_range: Option<DateRange>,
    proxy: ProxyConfig,
    signer: Option<Arc<dyn Signer>>,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl SessionBuilder {
    pub fn api(mut self, api: ApiKind) -> Self {
        self.api = Some(api);
        self
    }

    pub fn target(mut self, url: impl Into<String>) -> Self {
        self.target = Some(url.into());
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        let cookie = cookie.into();
        if !cookie.is_empty() {
            self.cookie = Some(cookie);
        }
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// A proxy already validated by [`crate::proxy::validate_proxy`].
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn build(self) -> Result<Session, AcquirerError> {
        // A target may be absent (single-work and live workflows do not
        // need one), but a present target that matches no pattern is
        // rejected here rather than logged and ignored.
        let target = match self.target {
            Some(raw) => Some(links::classify_target(&raw).ok_or_else(|| {
                warn!(url = %raw, "input matched no link pattern");
                AcquirerError::InvalidLink(raw)
            })?),
            None => None,
        };
        let client = build_client(&self.proxy)?;

        Ok(Session {
            api: self.api,
            target,
            date_range: self.date_range.unwrap_or_default(),
            cookie: self.cookie,
            client,
            signer: self.signer.unwrap_or_else(|| Arc::new(XBogus)),
            tokens: self.tokens.unwrap_or_else(|| Arc::new(RandomTokens)),
            state: SessionState::Uninitialized,
            resolved_id: None,
            cursor: 0,
            finished: false,
            account_name: None,
            videos: Vec::new(),
            images: Vec::new(),
        })
    }
}

/// One crawl invocation's worth of state.
pub struct Session {
    api: Option<ApiKind>,
    target: Option<CrawlTarget>,
    date_range: DateRange,
    cookie: Option<String>,
    client: Client,
    signer: Arc<dyn Signer>,
    tokens: Arc<dyn TokenProvider>,

    state: SessionState,
    resolved_id: Option<String>,
    cursor: i64,
    finished: bool,
    account_name: Option<String>,
    videos: Vec<WorkRef>,
    images: Vec<WorkRef>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.api)
            .field("target", &self.target)
            .field("state", &self.state)
            .field("resolved_id", &self.resolved_id)
            .field("cursor", &self.cursor)
            .field("finished", &self.finished)
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn account_name(&self) -> Option<&str> {
        self.account_name.as_deref()
    }

    pub fn videos(&self) -> &[WorkRef] {
        &self.videos
    }

    pub fn images(&self) -> &[WorkRef] {
        &self.images
    }

    /// Bulk workflow: enumerate, classify and date-filter every work of the
    /// target account.
    pub async fn run_crawl(&mut self) -> Result<CrawlSummary, AcquirerError> {
        let Some(api) = self.api else {
            warn!("api kind is not set; refusing to crawl");
            self.state = SessionState::Failed;
            return Err(AcquirerError::Configuration("apiKind"));
        };
        let cookie = self.cookie.clone().unwrap_or_default();
        let source = WorksApi::new(self.client.clone(), api, Arc::clone(&self.signer), cookie);
        self.run_crawl_with(&source).await
    }

    /// The crawl state machine against any page source.
    pub async fn run_crawl_with(
        &mut self,
        source: &dyn PageSource,
    ) -> Result<CrawlSummary, AcquirerError> {
        self.state = SessionState::Validating;
        self.reset_transients();
        if self.api.is_none() {
            warn!("api kind is not set; refusing to crawl");
            self.state = SessionState::Failed;
            return Err(AcquirerError::Configuration("apiKind"));
        }
        if self.target.is_none() {
            warn!("crawl target is not set; refusing to crawl");
            self.state = SessionState::Failed;
            return Err(AcquirerError::Configuration("target"));
        }
        if self.cookie.is_none() {
            warn!("cookie is not set; refusing to crawl");
            self.state = SessionState::Failed;
            return Err(AcquirerError::CookieMissing);
        }

        self.state = SessionState::Resolving;
        if let Err(e) = self.resolve_identity().await {
            self.state = SessionState::Failed;
            return Err(e);
        }

        self.state = SessionState::Paging;
        self.crawl_pages(source).await;

        self.state = SessionState::Filtering;
        if self.account_name.is_none() {
            warn!("no data obtained for this account");
            self.state = SessionState::Failed;
            return Err(AcquirerError::NoData);
        }
        self.apply_date_filter();

        self.state = SessionState::Done;
        Ok(self.summary())
    }

    /// Single-work workflow: turn a work/share/account-modal link into a
    /// work id, following the redirect only when the id is not embedded.
    pub async fn resolve_work(&mut self, text: &str) -> Result<String, AcquirerError> {
        if self.cookie.is_none() {
            warn!("cookie is not set; refusing to resolve work");
            return Err(AcquirerError::CookieMissing);
        }
        match links::classify_work(text) {
            Some(WorkLink::Direct(id)) => {
                info!(id, "work id embedded in link");
                Ok(id)
            }
            Some(WorkLink::NeedsRedirect(url)) => {
                let client = self.client.clone();
                let cookie = self.cookie.clone();
                with_retries(DEFAULT_ATTEMPTS, || {
                    resolver::resolve_redirect(&client, cookie.as_deref(), &url)
                })
                .await
                .ok_or(AcquirerError::IdentityUnresolved)
            }
            None => {
                warn!(%text, "invalid work link");
                Err(AcquirerError::InvalidLink(text.to_string()))
            }
        }
    }

    /// Live workflow: resolve a live-room link to status, title and stream
    /// URL. Single attempt.
    pub async fn resolve_live(&mut self, link: &str) -> Result<LiveOutcome, AcquirerError> {
        let Some(cookie) = self.cookie.clone() else {
            warn!("cookie is not set; refusing live request");
            return Err(AcquirerError::CookieMissing);
        };
        live::resolve_live(
            &self.client,
            self.signer.as_ref(),
            self.tokens.as_ref(),
            &cookie,
            link,
        )
        .await
    }

    /// Clear per-crawl state. An id extracted directly from an account link
    /// survives; a redirect-resolved id does not and is resolved again.
    fn reset_transients(&mut self) {
        self.cursor = 0;
        self.finished = false;
        self.account_name = None;
        self.videos.clear();
        self.images.clear();
        self.resolved_id = match &self.target {
            Some(CrawlTarget::PreResolved { sec_uid, .. }) => Some(sec_uid.clone()),
            _ => None,
        };
    }

    async fn resolve_identity(&mut self) -> Result<(), AcquirerError> {
        if let Some(id) = &self.resolved_id {
            info!(id, "account id already resolved");
            return Ok(());
        }
        let Some(CrawlTarget::NeedsRedirect(url)) = &self.target else {
            return Err(AcquirerError::IdentityUnresolved);
        };
        let url = url.clone();
        let client = self.client.clone();
        let cookie = self.cookie.clone();
        match with_retries(DEFAULT_ATTEMPTS, || {
            resolver::resolve_redirect(&client, cookie.as_deref(), &url)
        })
        .await
        {
            Some(id) => {
                info!(%url, id, "resolved account id");
                self.resolved_id = Some(id);
                Ok(())
            }
            None => Err(AcquirerError::IdentityUnresolved),
        }
    }

    /// Fetch pages in cursor order until an empty page (or an exhausted
    /// retry budget, treated the same) ends the crawl.
    async fn crawl_pages(&mut self, source: &dyn PageSource) {
        let Some(account_id) = self.resolved_id.clone() else {
            return;
        };
        while !self.finished {
            let cursor = self.cursor;
            let page = with_retries(DEFAULT_ATTEMPTS, || {
                source.fetch_page(&account_id, cursor)
            })
            .await;
            match page {
                Some(page) => {
                    let stuck = !page.aweme_list.is_empty() && page.max_cursor == cursor;
                    self.cursor = page.max_cursor;
                    self.classify_page(page.aweme_list);
                    if stuck && !self.finished {
                        warn!(cursor, "cursor did not advance; stopping the crawl");
                        self.finished = true;
                    }
                }
                None => {
                    warn!(cursor, "page retry budget exhausted; treating as end of data");
                    self.classify_page(Vec::new());
                }
            }
        }
    }

    /// Partition one page of raw records into videos and image galleries.
    fn classify_page(&mut self, items: Vec<Aweme>) {
        if items.is_empty() {
            info!("no further works returned; crawl complete");
            self.finished = true;
            return;
        }
        if self.account_name.is_none() {
            let name = sanitize::clean(&items[0].author.nickname);
            info!(name, "account display name");
            self.account_name = Some(name);
        }
        for item in items {
            match item.aweme_type {
                TYPE_IMAGE_GALLERY => self.images.push(WorkRef {
                    created_at: item.create_time,
                    id: item.aweme_id,
                }),
                TYPE_VIDEO => self.videos.push(WorkRef {
                    created_at: item.create_time,
                    id: item.aweme_id,
                }),
                _ => warn!(item = ?item, "unknown work type; dropping"),
            }
        }
    }

    /// Restrict both collections to the configured publish-date window.
    /// Applied once after the crawl loop; idempotent by construction.
    fn apply_date_filter(&mut self) {
        let range = self.date_range;
        self.videos.retain(|work| range.contains(work.created_at));
        self.images.retain(|work| range.contains(work.created_at));
    }

    fn summary(&self) -> CrawlSummary {
        let account_name = self.account_name.clone().unwrap_or_default();
        info!(
            account = %account_name,
            videos = self.videos.len(),
            images = self.images.len(),
            "crawl summary"
        );
        for work in &self.videos {
            debug!(id = %work.id, "video");
        }
        for work in &self.images {
            debug!(id = %work.id, "image gallery");
        }
        CrawlSummary {
            account_name,
            videos: self.videos.iter().map(|w| w.id.clone()).collect(),
            images: self.images.iter().map(|w| w.id.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::models::{Author, PostsPage};

    /// Page source driven by a prepared script; returns an empty page once
    /// the script runs out.
    struct ScriptedSource {
        pages: Mutex<VecDeque<Result<PostsPage, AcquirerError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<PostsPage, AcquirerError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(
            &self,
            _account_id: &str,
            _cursor: i64,
        ) -> Result<PostsPage, AcquirerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.lock().unwrap().pop_front().unwrap_or(Ok(PostsPage {
                max_cursor: 0,
                aweme_list: Vec::new(),
            }))
        }
    }

    fn aweme(id: &str, aweme_type: i64, create_time: i64) -> Aweme {
        Aweme {
            aweme_id: id.to_string(),
            create_time,
            aweme_type,
            author: Author {
                nickname: "测试昵称".to_string(),
            },
        }
    }

    fn page(max_cursor: i64, items: Vec<Aweme>) -> PostsPage {
        PostsPage {
            max_cursor,
            aweme_list: items,
        }
    }

    fn session() -> Session {
        Session::builder()
            .api(ApiKind::Posts)
            .target("https://www.douyin.com/user/MS4wLjABAAAAxyz")
            .cookie("sessionid=test")
            .build()
            .unwrap()
    }

    fn local_timestamp(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .unwrap()
            .timestamp()
    }

    #[tokio::test]
    async fn crawl_requires_api_kind() {
        let mut session = Session::builder()
            .target("https://www.douyin.com/user/MS4wLjABAAAAxyz")
            .cookie("c=1")
            .build()
            .unwrap();
        let source = ScriptedSource::new(Vec::new());
        let err = session.run_crawl_with(&source).await.unwrap_err();
        assert!(matches!(err, AcquirerError::Configuration("apiKind")));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn crawl_requires_a_target() {
        let mut session = Session::builder()
            .api(ApiKind::Posts)
            .cookie("c=1")
            .build()
            .unwrap();
        let source = ScriptedSource::new(Vec::new());
        let err = session.run_crawl_with(&source).await.unwrap_err();
        assert!(matches!(err, AcquirerError::Configuration("target")));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[test]
    fn builder_rejects_unclassifiable_target() {
        let err = Session::builder()
            .api(ApiKind::Posts)
            .target("https://example.com/nothing")
            .cookie("c=1")
            .build()
            .unwrap_err();
        assert!(matches!(err, AcquirerError::InvalidLink(_)));
    }

    #[tokio::test]
    async fn crawl_without_cookie_fails_fast() {
        let mut session = Session::builder()
            .api(ApiKind::Posts)
            .target("https://www.douyin.com/user/MS4wLjABAAAAxyz")
            .build()
            .unwrap();
        let source = ScriptedSource::new(Vec::new());
        let err = session.run_crawl_with(&source).await.unwrap_err();
        assert!(matches!(err, AcquirerError::CookieMissing));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn crawl_partitions_videos_and_images() {
        // Page 1: 30 videos and 10 image galleries; page 2: empty.
        let ts = local_timestamp(2023, 5, 10, 12, 0, 0);
        let mut items = Vec::new();
        for i in 0..30 {
            items.push(aweme(&format!("v{i:019}"), TYPE_VIDEO, ts));
        }
        for i in 0..10 {
            items.push(aweme(&format!("g{i:019}"), TYPE_IMAGE_GALLERY, ts));
        }
        let source = ScriptedSource::new(vec![Ok(page(100, items))]);

        let mut session = session();
        let summary = session.run_crawl_with(&source).await.unwrap();
        assert_eq!(summary.videos.len(), 30);
        assert_eq!(summary.images.len(), 10);
        assert_eq!(summary.account_name, "测试昵称");
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_work_type_is_dropped() {
        let ts = local_timestamp(2023, 5, 10, 12, 0, 0);
        let items = vec![
            aweme("7000000000000000001", TYPE_VIDEO, ts),
            aweme("7000000000000000002", 5, ts),
        ];
        let source = ScriptedSource::new(vec![Ok(page(50, items))]);

        let mut session = session();
        let summary = session.run_crawl_with(&source).await.unwrap();
        assert_eq!(summary.videos, vec!["7000000000000000001".to_string()]);
        assert!(summary.images.is_empty());
    }

    #[tokio::test]
    async fn crawl_stops_at_first_empty_page() {
        let ts = local_timestamp(2023, 5, 10, 12, 0, 0);
        let source = ScriptedSource::new(vec![
            Ok(page(10, vec![aweme("7000000000000000001", TYPE_VIDEO, ts)])),
            Ok(page(10, Vec::new())),
            // Must never be fetched.
            Ok(page(20, vec![aweme("7000000000000000009", TYPE_VIDEO, ts)])),
        ]);

        let mut session = session();
        let summary = session.run_crawl_with(&source).await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(summary.videos, vec!["7000000000000000001".to_string()]);
    }

    #[tokio::test]
    async fn exhausted_retries_end_the_crawl_keeping_prior_pages() {
        let ts = local_timestamp(2023, 5, 10, 12, 0, 0);
        let mut script: Vec<Result<PostsPage, AcquirerError>> = vec![Ok(page(
            10,
            vec![aweme("7000000000000000001", TYPE_VIDEO, ts)],
        ))];
        for _ in 0..5 {
            script.push(Err(AcquirerError::Timeout));
        }
        let source = ScriptedSource::new(script);

        let mut session = session();
        let summary = session.run_crawl_with(&source).await.unwrap();
        // 1 successful page + 5 failed attempts for the second page.
        assert_eq!(source.calls(), 6);
        assert_eq!(summary.videos, vec!["7000000000000000001".to_string()]);
        assert_eq!(session.state(), SessionState::Done);
    }

    #[tokio::test]
    async fn empty_first_page_means_no_data() {
        let source = ScriptedSource::new(vec![Ok(page(0, Vec::new()))]);
        let mut session = session();
        let err = session.run_crawl_with(&source).await.unwrap_err();
        assert!(matches!(err, AcquirerError::NoData));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn stuck_cursor_terminates_the_loop() {
        let ts = local_timestamp(2023, 5, 10, 12, 0, 0);
        // Non-empty pages that never advance the cursor.
        let source = ScriptedSource::new(vec![
            Ok(page(0, vec![aweme("7000000000000000001", TYPE_VIDEO, ts)])),
            Ok(page(0, vec![aweme("7000000000000000001", TYPE_VIDEO, ts)])),
        ]);

        let mut session = session();
        let summary = session.run_crawl_with(&source).await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(summary.videos.len(), 1);
    }

    #[tokio::test]
    async fn rerun_resets_accumulated_state() {
        let ts = local_timestamp(2023, 5, 10, 12, 0, 0);
        let mut session = session();

        let first = ScriptedSource::new(vec![Ok(page(
            10,
            vec![aweme("7000000000000000001", TYPE_VIDEO, ts)],
        ))]);
        session.run_crawl_with(&first).await.unwrap();
        assert_eq!(session.videos().len(), 1);

        let second = ScriptedSource::new(vec![Ok(page(
            10,
            vec![aweme("7000000000000000002", TYPE_VIDEO, ts)],
        ))]);
        let summary = session.run_crawl_with(&second).await.unwrap();
        assert_eq!(summary.videos, vec!["7000000000000000002".to_string()]);
    }

    #[tokio::test]
    async fn embedded_work_id_needs_no_network() {
        let mut session = session();
        let id = session
            .resolve_work("https://www.douyin.com/video/7123456789012345678")
            .await
            .unwrap();
        assert_eq!(id, "7123456789012345678");
    }

    #[tokio::test]
    async fn resolve_work_requires_cookie() {
        let mut session = Session::builder()
            .api(ApiKind::Posts)
            .target("https://www.douyin.com/user/MS4wLjABAAAAxyz")
            .build()
            .unwrap();
        let err = session
            .resolve_work("https://www.douyin.com/video/7123456789012345678")
            .await
            .unwrap_err();
        assert!(matches!(err, AcquirerError::CookieMissing));
    }

    #[tokio::test]
    async fn resolve_work_rejects_unclassifiable_text() {
        let mut session = session();
        let err = session.resolve_work("random words").await.unwrap_err();
        assert!(matches!(err, AcquirerError::InvalidLink(_)));
    }

    #[test]
    fn default_range_starts_at_platform_launch() {
        let range = DateRange::default();
        assert_eq!(range.earliest, NaiveDate::from_ymd_opt(2016, 9, 20).unwrap());
        assert_eq!(range.latest, Local::now().date_naive());
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        let earliest = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let latest = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert!(DateRange::new(earliest, latest).is_err());
    }

    #[test]
    fn range_parses_slash_dates() {
        let range = DateRange::parse(Some("2020/01/02"), Some("2021/12/31")).unwrap();
        assert_eq!(range.earliest, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(range.latest, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
        assert!(DateRange::parse(Some("02-01-2020"), None).is_err());
    }

    #[rstest]
    // Midnight on the earliest day is inside the window.
    #[case((2023, 1, 10, 0, 0, 0), true)]
    // Last second of the latest day is inside the window.
    #[case((2023, 1, 20, 23, 59, 59), true)]
    #[case((2023, 1, 9, 23, 59, 59), false)]
    #[case((2023, 1, 21, 0, 0, 0), false)]
    #[case((2023, 1, 15, 12, 0, 0), true)]
    fn date_bounds_are_inclusive(#[case] when: (i32, u32, u32, u32, u32, u32), #[case] kept: bool) {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
        )
        .unwrap();
        let (y, m, d, h, min, s) = when;
        assert_eq!(range.contains(local_timestamp(y, m, d, h, min, s)), kept);
    }

    #[test]
    fn date_filter_is_idempotent_and_order_preserving() {
        let mut session = session();
        session.date_range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
        )
        .unwrap();
        session.videos = vec![
            WorkRef {
                created_at: local_timestamp(2023, 1, 9, 12, 0, 0),
                id: "early".to_string(),
            },
            WorkRef {
                created_at: local_timestamp(2023, 1, 12, 12, 0, 0),
                id: "kept-1".to_string(),
            },
            WorkRef {
                created_at: local_timestamp(2023, 1, 18, 12, 0, 0),
                id: "kept-2".to_string(),
            },
            WorkRef {
                created_at: local_timestamp(2023, 1, 21, 12, 0, 0),
                id: "late".to_string(),
            },
        ];

        session.apply_date_filter();
        let once: Vec<String> = session.videos.iter().map(|w| w.id.clone()).collect();
        assert_eq!(once, vec!["kept-1".to_string(), "kept-2".to_string()]);

        session.apply_date_filter();
        let twice: Vec<String> = session.videos.iter().map(|w| w.id.clone()).collect();
        assert_eq!(once, twice);
    }
}
