//! Anchor extraction from HTML
//!
//! The crawler needs exactly one thing from a page's markup: the raw `href`
//! attribute of every `<a>` element, in document order. Resolution against
//! the page URL happens separately in [`crate::url::resolve_hrefs`].
//!
//! Extraction is synchronous; `scraper`'s DOM is not `Send` and must never
//! be held across an await in the fetch tasks.

use scraper::{Html, Selector};

/// Extracts the raw `href` attribute of every anchor element
///
/// Values come back unresolved and untrimmed, in document order. An `<a>`
/// with no `href` attribute contributes an empty string, preserving "one
/// entry per anchor"; the resolver discards those later.
///
/// html5ever recovers from arbitrarily broken markup, so extraction itself
/// never fails.
///
/// # Example
///
/// ```
/// use sitegraph::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/a".to_string(), "/b".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(selector) = Selector::parse("a") {
        for anchor in document.select(&selector) {
            let href = anchor.value().attr("href").unwrap_or_default();
            hrefs.push(href.to_string());
        }
    }

    hrefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_document_order() {
        let html = r#"<html><body>
            <a href="/first">1</a>
            <p><a href="/second">2</a></p>
            <a href="/third">3</a>
        </body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["/first", "/second", "/third"]);
    }

    #[test]
    fn test_anchor_without_href_contributes_empty_string() {
        let html = r#"<html><body><a name="top">Anchor</a><a href="/page">Link</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["", "/page"]);
    }

    #[test]
    fn test_no_anchors() {
        let html = r#"<html><body><p>No links here</p></body></html>"#;
        assert!(extract_hrefs(html).is_empty());
    }

    #[test]
    fn test_values_are_raw() {
        let html = r#"<html><body>
            <a href="mailto:test@example.com">Mail</a>
            <a href="javascript:void(0)">JS</a>
            <a href="/page#section">Fragment</a>
        </body></html>"#;
        assert_eq!(
            extract_hrefs(html),
            vec!["mailto:test@example.com", "javascript:void(0)", "/page#section"]
        );
    }

    #[test]
    fn test_duplicates_not_collapsed_here() {
        let html = r#"<html><body><a href="/same">A</a><a href="/same">B</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["/same", "/same"]);
    }

    #[test]
    fn test_other_href_bearing_elements_ignored() {
        let html = r#"<html><head><link rel="stylesheet" href="/style.css"></head>
            <body><area href="/map"><a href="/page">Link</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["/page"]);
    }

    #[test]
    fn test_recovers_from_broken_markup() {
        // The tree builder reopens the unclosed anchor inside the div, so its
        // href is extracted twice. Resolution collapses the duplicate later.
        let html = r#"<html><body><a href="/ok">unclosed<div><a href="/also-ok">"#;
        assert_eq!(extract_hrefs(html), vec!["/ok", "/ok", "/also-ok"]);
    }

    #[test]
    fn test_whitespace_in_href_preserved() {
        let html = r#"<html><body><a href="  /padded">Link</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["  /padded"]);
    }
}
