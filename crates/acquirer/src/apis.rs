//! Vendor endpoint constants.

pub(crate) const SITE_URL: &str = "https://www.douyin.com/";

pub(crate) const POST_API: &str = "https://www.douyin.com/aweme/v1/web/aweme/post/";
pub(crate) const FAVORITE_API: &str = "https://www.douyin.com/aweme/v1/web/aweme/favorite/";

pub(crate) const WEBCAST_ENTER_API: &str = "https://live.douyin.com/webcast/room/web/enter/";

/// Echo endpoint used to probe candidate proxies.
pub(crate) const PROXY_PROBE_URL: &str = "http://httpbin.org/";

pub(crate) const APP_ID: &str = "6383";
