//! Page fetching
//!
//! The engine is written against the `PageFetcher` contract: a single GET
//! that reports the page body, a redirect, or a transport failure, without
//! following redirects itself. `HttpFetcher` is the reqwest-backed
//! implementation used by the CLI; tests drive the engine with canned
//! fetchers instead.

use crate::{FetchError, FetchResult};
use reqwest::{header, redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
const USER_AGENT: &str = concat!("sitegraph/", env!("CARGO_PKG_VERSION"));

/// Outcome of fetching a single page
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Any non-redirect response, 4xx and 5xx included. The body is parsed
    /// for links regardless of status
    Success {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// A response with a status in [300, 400)
    Redirect {
        /// HTTP status code
        status: u16,
        /// Raw `Location` header value, if the server sent one
        location: Option<String>,
    },
}

/// Contract for fetching one page
///
/// Implementations must not follow redirects; what a redirect means is the
/// engine's decision. Transport-level problems (connect failure, timeout,
/// unreadable body) are the error case; every received response is an `Ok`
/// outcome, whatever its status.
pub trait PageFetcher: Send + Sync {
    /// Issues a GET for `url`
    fn fetch(&self, url: &Url) -> impl Future<Output = FetchResult> + Send;
}

/// HTTP implementation of [`PageFetcher`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default request timeout
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a fetcher with a custom per-request timeout
    ///
    /// # Arguments
    ///
    /// * `timeout` - Total time allowed per request, body read included
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::none()) // Handle redirects manually
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            return Ok(FetchOutcome::Redirect {
                status: status.as_u16(),
                location,
            });
        }

        let body = response.text().await.map_err(|e| FetchError {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(FetchOutcome::Success {
            status: status.as_u16(),
            body,
        })
    }
}
