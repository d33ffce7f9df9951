//! Output module for presenting crawl results
//!
//! This module handles:
//! - Arranging results into a deterministic, sorted report
//! - Rendering the report as text or JSON

mod report;

pub use report::{CrawlReport, ReportPage};
