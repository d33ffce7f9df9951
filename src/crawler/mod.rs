//! Crawler module for concurrent site traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with manual redirect handling
//! - HTML anchor extraction
//! - Scheduling with at-most-once fetch per canonical key
//! - Completion tracking across in-flight tasks

mod counter;
mod engine;
mod fetcher;
mod parser;

pub use engine::{Crawl, CrawlResult, Crawler, VisitedPage, DEFAULT_CONCURRENCY};
pub use fetcher::{FetchOutcome, HttpFetcher, PageFetcher, DEFAULT_TIMEOUT};
pub use parser::extract_hrefs;

use crate::CrawlError;
use std::sync::Arc;
use url::Url;

/// Runs a complete crawl in one call
///
/// This is the main entry point for a single traversal. It will:
/// 1. Seed the scheduler with `start`
/// 2. Fetch every reachable page on the start URL's host, at most
///    `max_concurrency` at a time
/// 3. Resolve each page's anchors and feed them back into scheduling
/// 4. Return once no discovered work remains
///
/// # Arguments
///
/// * `start` - The URL the traversal begins from
/// * `fetcher` - The page fetcher to use; [`HttpFetcher`] for real traffic
/// * `max_concurrency` - Upper bound on simultaneous fetches
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Every page visited, with its resolved links
/// * `Err(CrawlError)` - The wait for completion was interrupted
pub async fn crawl<F>(
    start: Url,
    fetcher: F,
    max_concurrency: usize,
) -> Result<CrawlResult, CrawlError>
where
    F: PageFetcher + 'static,
{
    Crawl::new(start, Arc::new(fetcher), max_concurrency)
        .run()
        .await
}
