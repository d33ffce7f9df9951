use serde::Serialize;
use std::fmt;
use url::Url;

/// Canonical, scheme-insensitive identity of a URL
///
/// A `CrawlKey` is the URL's authority, path, and query concatenated in that
/// order with the scheme omitted, so `http://example.com/x` and
/// `https://example.com/x` share a key. It is the sole identity used for
/// deduplication: two URLs with the same key are the same page.
///
/// The parts are joined with no separators; a query string appends directly
/// without its `?`. The key is an identity token, not a reparsable URL, and
/// reports print it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CrawlKey(String);

impl CrawlKey {
    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CrawlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces the canonical dedup key for a URL
///
/// Never fails: a URL with no authority (e.g. `mailto:`) yields a key from
/// its path alone. Such URLs are rejected later by scheduling, not here.
///
/// Host case, default ports, dot segments, and percent-encoding are already
/// canonicalized by `Url`'s parser, so the key inherits that normalization.
///
/// # Examples
///
/// ```
/// use sitegraph::url::crawl_key;
/// use url::Url;
///
/// let http = Url::parse("http://example.com/page").unwrap();
/// let https = Url::parse("https://example.com/page").unwrap();
/// assert_eq!(crawl_key(&http), crawl_key(&https));
/// assert_eq!(crawl_key(&http).as_str(), "example.com/page");
/// ```
pub fn crawl_key(url: &Url) -> CrawlKey {
    let mut key = String::from(url.authority());
    key.push_str(url.path());
    if let Some(query) = url.query() {
        key.push_str(query);
    }
    CrawlKey(key)
}
