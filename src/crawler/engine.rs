//! Crawl engine
//!
//! This module owns the crawl's moving parts: the scheduled-key set that
//! guarantees each page is fetched at most once, the semaphore that bounds
//! how many fetches run concurrently, and the task counter that tells the
//! caller when the traversal has drained. Fetching and anchor extraction are
//! delegated to the fetcher and parser modules.

use crate::crawler::counter::{TaskCounter, TaskGuard};
use crate::crawler::fetcher::{FetchOutcome, PageFetcher};
use crate::crawler::parser::extract_hrefs;
use crate::url::{crawl_key, resolve_hrefs, CrawlKey};
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use url::{ParseError, Url};

/// Default size of the fetch worker pool
pub const DEFAULT_CONCURRENCY: usize = 32;

/// The recorded outcome of fetching one page
///
/// Created exactly once per distinct [`CrawlKey`] that was actually fetched,
/// not merely discovered. `links` holds the keys of the page's distinct
/// resolved links; cross-host targets are listed even though they are never
/// scheduled, because the list describes what the page points to, not what
/// was crawled.
#[derive(Debug, Clone)]
pub struct VisitedPage {
    /// Canonical identity of the page
    pub page_key: CrawlKey,
    /// The URL as it was fetched
    pub page_url: Url,
    /// Keys of the page's resolved links, in no guaranteed order
    pub links: Vec<CrawlKey>,
}

/// Everything one crawl pass produced
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The URL the crawl started from
    pub start: Url,
    /// Every page fetched; ordering is a scheduling artifact
    pub visited: Vec<VisitedPage>,
}

/// A reusable handle that runs one fresh [`Crawl`] per call
///
/// The fetcher and concurrency bound are shared across calls; each call gets
/// its own scheduled set, counter, and result.
pub struct Crawler<F> {
    fetcher: Arc<F>,
    max_concurrency: usize,
}

impl<F: PageFetcher + 'static> Crawler<F> {
    /// Creates a crawler with the default concurrency bound
    pub fn new(fetcher: F) -> Self {
        Self::with_concurrency(fetcher, DEFAULT_CONCURRENCY)
    }

    /// Creates a crawler with an explicit concurrency bound
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrency` is zero.
    pub fn with_concurrency(fetcher: F, max_concurrency: usize) -> Self {
        assert!(max_concurrency > 0, "max_concurrency must be at least 1");
        Self {
            fetcher: Arc::new(fetcher),
            max_concurrency,
        }
    }

    /// Crawls every same-host page reachable from `start`
    pub async fn crawl(&self, start: Url) -> Result<CrawlResult, CrawlError> {
        Crawl::new(start, Arc::clone(&self.fetcher), self.max_concurrency)
            .run()
            .await
    }
}

/// A single crawl pass over one site
///
/// Single-use by contract: [`Crawl::run`] panics if called a second time on
/// the same instance, since reusing the scheduled set would silently skip
/// every page of the first pass. Use a [`Crawler`] for repeated crawls.
pub struct Crawl<F> {
    start: Url,
    shared: Arc<Shared<F>>,
    started: AtomicBool,
}

/// State shared by every fetch task of one crawl
struct Shared<F> {
    start_authority: String,
    fetcher: Arc<F>,
    workers: Semaphore,
    tasks: Arc<TaskCounter>,
    scheduled: Mutex<HashSet<CrawlKey>>,
    visited: Mutex<Vec<VisitedPage>>,
}

impl<F: PageFetcher + 'static> Crawl<F> {
    /// Creates a crawl rooted at `start` with a worker pool of
    /// `max_concurrency` permits
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrency` is zero; a crawl with no permits could
    /// never fetch anything.
    pub fn new(start: Url, fetcher: Arc<F>, max_concurrency: usize) -> Self {
        assert!(max_concurrency > 0, "max_concurrency must be at least 1");
        let shared = Shared {
            start_authority: start.authority().to_string(),
            fetcher,
            workers: Semaphore::new(max_concurrency),
            tasks: Arc::new(TaskCounter::new()),
            scheduled: Mutex::new(HashSet::new()),
            visited: Mutex::new(Vec::new()),
        };

        Self {
            start,
            shared: Arc::new(shared),
            started: AtomicBool::new(false),
        }
    }

    /// Runs the crawl to completion and returns the visited pages
    ///
    /// Individual page failures are logged and dropped; the only error this
    /// returns is [`CrawlError::Interrupted`], when Ctrl-C arrives before
    /// the traversal drains. The seed goes through the ordinary scheduling
    /// path, so a start URL without a host produces an empty result rather
    /// than an error.
    ///
    /// # Panics
    ///
    /// Panics if called more than once on the same instance.
    pub async fn run(&self) -> Result<CrawlResult, CrawlError> {
        if self.started.swap(true, Ordering::SeqCst) {
            panic!("a crawl can only be run once; create a new Crawl for another pass");
        }

        tracing::info!("Starting crawl of {}", self.start);
        Shared::schedule(&self.shared, self.start.clone());

        tokio::select! {
            _ = self.shared.tasks.wait_for_zero() => {}
            _ = interrupted() => {
                tracing::warn!("Crawl of {} interrupted", self.start);
                return Err(CrawlError::Interrupted);
            }
        }

        let visited = std::mem::take(&mut *self.shared.visited.lock().unwrap());
        tracing::info!(
            "Crawl of {} complete: {} pages visited",
            self.start,
            visited.len()
        );

        Ok(CrawlResult {
            start: self.start.clone(),
            visited,
        })
    }
}

impl<F: PageFetcher + 'static> Shared<F> {
    /// Claims `url`'s key and spawns a fetch task for it
    ///
    /// A no-op when the URL has no host, sits on a different authority than
    /// the start, or its key is already claimed. The claim is the atomic
    /// check-and-insert under the scheduled-set lock: whoever wins the insert
    /// is the only caller that spawns. The counter increment happens here,
    /// before the spawn, so the barrier never observes a gap between "decided
    /// to fetch" and "task accounted for".
    fn schedule(shared: &Arc<Self>, url: Url) {
        // URLs without a host cannot be fetched. Hrefs were already scheme-
        // filtered; this catches exotic redirect targets.
        if url.host_str().is_none() {
            tracing::debug!("Not scheduling {}: no host", url);
            return;
        }

        // Exact authority match, port included. www.example.com and
        // example.com are different hosts here.
        if url.authority() != shared.start_authority {
            tracing::debug!("Not scheduling {}: off-host", url);
            return;
        }

        let key = crawl_key(&url);
        if !shared.scheduled.lock().unwrap().insert(key) {
            return;
        }

        let guard = TaskGuard::new(Arc::clone(&shared.tasks));
        let task_shared = Arc::clone(shared);

        tokio::spawn(async move {
            // Moving the guard in ties the decrement to every exit path of
            // the task, including panics and never-polled drops.
            let _done = guard;
            Self::visit(&task_shared, url).await;
        });
    }

    /// Fetches one page and feeds its discoveries back into scheduling
    async fn visit(shared: &Arc<Self>, page: Url) {
        // The task exists immediately but runs its fetch only once a pool
        // permit frees up. The semaphore is never closed.
        let Ok(_permit) = shared.workers.acquire().await else {
            return;
        };

        tracing::debug!("Fetching {}", page);

        let outcome = match shared.fetcher.fetch(&page).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Dropping {}: {}", page, e);
                return;
            }
        };

        match outcome {
            FetchOutcome::Redirect { status, location } => {
                Self::follow_redirect(shared, page, status, location);
            }
            FetchOutcome::Success { status, body } => {
                Self::record_page(shared, page, status, &body);
            }
        }
    }

    /// Handles a 3xx response for `origin`
    ///
    /// The origin led somewhere else, so it is recorded as visited with no
    /// links of its own and the target is scheduled like any discovered URL.
    /// A missing or unparseable `Location` drops the page entirely; a
    /// relative `Location` has no authority to hold against the host filter,
    /// so the origin is recorded but the target is not followed.
    fn follow_redirect(shared: &Arc<Self>, origin: Url, status: u16, location: Option<String>) {
        let Some(location) = location else {
            tracing::warn!(
                "Dropping {}: {} redirect without a Location header",
                origin,
                status
            );
            return;
        };

        match Url::parse(&location) {
            Ok(target) => {
                tracing::debug!("{} redirected ({}) to {}", origin, status, target);
                shared.record_visited(origin, Vec::new());
                Self::schedule(shared, target);
            }
            Err(ParseError::RelativeUrlWithoutBase) => {
                tracing::debug!(
                    "{} redirected ({}) to relative target {:?}, not followed",
                    origin,
                    status,
                    location
                );
                shared.record_visited(origin, Vec::new());
            }
            Err(e) => {
                tracing::warn!(
                    "Dropping {}: unparseable redirect Location {:?}: {}",
                    origin,
                    location,
                    e
                );
            }
        }
    }

    /// Records a fetched page and schedules its same-host discoveries
    ///
    /// Every non-redirect status lands here; 4xx and 5xx bodies are parsed
    /// like any other.
    fn record_page(shared: &Arc<Self>, page: Url, status: u16, body: &str) {
        let hrefs = extract_hrefs(body);
        let resolved = resolve_hrefs(&page, &hrefs);

        // The link list keeps cross-host targets; the host filter applies to
        // scheduling only.
        let links: Vec<CrawlKey> = resolved.iter().map(crawl_key).collect();

        tracing::debug!(
            "Visited {} ({}): {} anchors, {} distinct links",
            page,
            status,
            hrefs.len(),
            resolved.len()
        );

        for target in resolved {
            Self::schedule(shared, target);
        }

        shared.record_visited(page, links);
    }

    fn record_visited(&self, page: Url, links: Vec<CrawlKey>) {
        let record = VisitedPage {
            page_key: crawl_key(&page),
            page_url: page,
            links,
        };
        self.visited.lock().unwrap().push(record);
    }
}

/// Resolves when the process receives Ctrl-C
///
/// If no signal handler can be installed the future stays pending and the
/// crawl is left to finish on its own.
async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {}
        Err(_) => std::future::pending().await,
    }
}
