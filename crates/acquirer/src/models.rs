//! Vendor wire models.
//!
//! Field names are byte-exact with the vendor API; only the fields the
//! engine depends on are modelled.

use std::collections::HashMap;

use serde::Deserialize;

/// Work type code for videos.
pub const TYPE_VIDEO: i64 = 0;
/// Work type code for image galleries.
pub const TYPE_IMAGE_GALLERY: i64 = 68;

/// One page of an account's works.
#[derive(Deserialize, Debug, Clone)]
pub struct PostsPage {
    pub max_cursor: i64,
    pub aweme_list: Vec<Aweme>,
}

/// A raw work record as returned by the pagination endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct Aweme {
    pub aweme_id: String,
    pub create_time: i64,
    pub aweme_type: i64,
    pub author: Author,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Author {
    pub nickname: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LiveEnterResponse {
    pub data: LiveEnterData,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LiveEnterData {
    pub data: Vec<LiveRoomData>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LiveRoomData {
    pub status: i32,
    pub owner: LiveOwner,
    pub title: String,
    pub stream_url: Option<LiveStreamUrl>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LiveOwner {
    pub nickname: String,
}

/// `flv_pull_url` maps quality keys (`FULL_HD1`, `HD1`, ...) to stream URLs.
#[derive(Deserialize, Debug)]
pub(crate) struct LiveStreamUrl {
    pub flv_pull_url: HashMap<String, String>,
}
