//! URL handling for sitegraph
//!
//! This module provides the canonical dedup key (authority + path + query,
//! scheme-insensitive) and the href resolution pipeline that turns raw anchor
//! attributes into absolute, fetchable URLs.

mod key;
mod resolve;

pub use key::{crawl_key, CrawlKey};
pub use resolve::resolve_hrefs;
