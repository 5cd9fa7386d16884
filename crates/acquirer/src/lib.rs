//! Session engine for enumerating and classifying the published works of a
//! Douyin account, with single-work and live-room resolution.
//!
//! The entry point is [`Session`], built via [`Session::builder`]. A session
//! owns all mutable crawl state; run independent sessions for independent
//! crawls.

mod apis;
mod client;
mod error;
mod fetcher;
mod links;
mod live;
mod models;
mod proxy;
mod resolver;
mod retry;
mod sanitize;
mod session;
mod sign;
mod throttle;
mod token;

pub use error::AcquirerError;
pub use fetcher::{ApiKind, PageSource};
pub use links::{CrawlTarget, WorkLink, classify_target, classify_work, live_room_id};
pub use live::{LiveOutcome, LiveRoom};
pub use models::{Aweme, Author, PostsPage};
pub use proxy::{ProxyConfig, validate_proxy};
pub use sanitize::clean;
pub use session::{CrawlSummary, DateRange, Session, SessionBuilder, SessionState, WorkRef};
pub use sign::{Signer, XBogus};
pub use token::{RandomTokens, TokenProvider};
