//! Report generation from crawl results
//!
//! This module turns a [`CrawlResult`] into the deterministic report the
//! binary prints: pages sorted by key, each page's links sorted beneath it.
//! The same structure serializes to JSON for machine consumers.

use crate::crawler::CrawlResult;
use crate::url::CrawlKey;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// A crawl result arranged for presentation
///
/// Page and link ordering is sorted by key, so two crawls of the same site
/// render identically no matter how scheduling interleaved them.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// The URL the crawl started from
    pub start: Url,

    /// Number of pages fetched
    pub total_visited: usize,

    /// Wall-clock duration of the crawl in milliseconds
    pub crawl_time_ms: u64,

    /// Visited pages, sorted by key
    pub visited: Vec<ReportPage>,
}

/// One visited page as it appears in the report
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    /// Canonical identity of the page
    pub page: CrawlKey,

    /// The URL as it was fetched
    pub url: Url,

    /// The page's resolved links, sorted by key
    pub links: Vec<CrawlKey>,
}

impl CrawlReport {
    /// Builds a report from a crawl result and the time the crawl took
    ///
    /// # Arguments
    ///
    /// * `result` - The finished crawl
    /// * `elapsed` - Wall-clock duration of the crawl
    pub fn new(result: &CrawlResult, elapsed: Duration) -> Self {
        let mut visited: Vec<ReportPage> = result
            .visited
            .iter()
            .map(|page| {
                let mut links = page.links.clone();
                links.sort();
                ReportPage {
                    page: page.page_key.clone(),
                    url: page.page_url.clone(),
                    links,
                }
            })
            .collect();
        visited.sort_by(|a, b| a.page.cmp(&b.page));

        Self {
            start: result.start.clone(),
            total_visited: visited.len(),
            crawl_time_ms: elapsed.as_millis() as u64,
            visited,
        }
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Crawl starting from {} complete", self.start)?;
        writeln!(f)?;
        writeln!(f, "Visited:")?;
        for page in &self.visited {
            writeln!(f, "    {}", page.page)?;
            for link in &page.links {
                writeln!(f, "        - {}", link)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(f, "    Total visited: {}", self.total_visited)?;
        write!(
            f,
            "    Crawl time: {:.2?}",
            Duration::from_millis(self.crawl_time_ms)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::VisitedPage;
    use crate::url::crawl_key;

    fn key(url: &str) -> CrawlKey {
        crawl_key(&Url::parse(url).unwrap())
    }

    fn sample_result() -> CrawlResult {
        // Deliberately out of order to exercise the sorting.
        CrawlResult {
            start: Url::parse("http://example.com/").unwrap(),
            visited: vec![
                VisitedPage {
                    page_key: key("http://example.com/about"),
                    page_url: Url::parse("http://example.com/about").unwrap(),
                    links: vec![],
                },
                VisitedPage {
                    page_key: key("http://example.com/"),
                    page_url: Url::parse("http://example.com/").unwrap(),
                    links: vec![key("http://other.test/x"), key("http://example.com/about")],
                },
            ],
        }
    }

    #[test]
    fn test_pages_and_links_are_sorted() {
        let report = CrawlReport::new(&sample_result(), Duration::from_millis(5));

        let pages: Vec<&str> = report.visited.iter().map(|p| p.page.as_str()).collect();
        assert_eq!(pages, vec!["example.com/", "example.com/about"]);

        let links: Vec<&str> = report.visited[0]
            .links
            .iter()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(links, vec!["example.com/about", "other.test/x"]);
    }

    #[test]
    fn test_render_text_format() {
        let report = CrawlReport::new(&sample_result(), Duration::from_millis(1234));

        let expected = "\
Crawl starting from http://example.com/ complete

Visited:
    example.com/
        - example.com/about
        - other.test/x
    example.com/about

Summary:
    Total visited: 2
    Crawl time: 1.23s";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_empty_result_renders() {
        let result = CrawlResult {
            start: Url::parse("http://example.com/").unwrap(),
            visited: vec![],
        };
        let report = CrawlReport::new(&result, Duration::from_millis(5));

        let rendered = report.to_string();
        assert!(rendered.contains("Total visited: 0"));
        assert!(rendered.contains("Visited:\n\nSummary:"));
    }

    #[test]
    fn test_json_shape() {
        let report = CrawlReport::new(&sample_result(), Duration::from_millis(42));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["start"], "http://example.com/");
        assert_eq!(value["total_visited"], 2);
        assert_eq!(value["crawl_time_ms"], 42);
        assert_eq!(value["visited"][0]["page"], "example.com/");
        assert_eq!(value["visited"][0]["url"], "http://example.com/");
        assert_eq!(value["visited"][0]["links"][0], "example.com/about");
        assert_eq!(value["visited"][1]["links"], serde_json::json!([]));
    }
}
