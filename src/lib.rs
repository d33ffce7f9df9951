//! Sitegraph: a concurrent same-host site mapper
//!
//! This crate crawls a website starting from one URL, follows every hyperlink
//! that stays on the same host, and reports every page visited together with
//! the links discovered on each page. Fetching runs on a bounded pool of
//! concurrent tasks; each distinct page is fetched at most once per crawl.

pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Errors that end a whole crawl
///
/// Individual page failures never surface here; they are logged and the
/// affected page is simply absent from the result.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("crawl interrupted before completion")]
    Interrupted,
}

/// A transport-level failure while fetching a single page
///
/// The message is a plain string rather than an underlying client error so
/// that alternative `PageFetcher` implementations (including test doubles)
/// can construct it directly.
#[derive(Debug, Error)]
#[error("fetch of {url} failed: {message}")]
pub struct FetchError {
    /// The URL whose fetch failed
    pub url: String,
    /// Human-readable description of the failure
    pub message: String,
}

/// Result type alias for single-page fetch operations
pub type FetchResult = std::result::Result<crawler::FetchOutcome, FetchError>;

// Re-export commonly used types
pub use crawler::{crawl, Crawl, CrawlResult, Crawler, VisitedPage, DEFAULT_CONCURRENCY};
pub use crawler::{FetchOutcome, HttpFetcher, PageFetcher};
pub use self::url::{crawl_key, CrawlKey};
