use std::collections::HashSet;
use url::Url;

/// Resolves a page's raw anchor hrefs into absolute, fetchable URLs
///
/// For each href: the fragment is stripped, empties are discarded, leading
/// whitespace is trimmed, and the value is parsed as an absolute URL or
/// resolved against `base` per RFC 3986. Only `http` and `https` results are
/// kept. A malformed href is dropped on its own; it never fails the batch.
///
/// The output is a set, so identical resolved URLs from different hrefs
/// collapse here. No host filtering happens at this stage; cross-host links
/// are legitimate members of a page's link list.
pub fn resolve_hrefs(base: &Url, hrefs: &[String]) -> HashSet<Url> {
    let mut resolved = HashSet::new();

    for href in hrefs {
        if let Some(url) = resolve_href(base, href) {
            resolved.insert(url);
        }
    }

    resolved
}

/// Resolves one raw href against its page's URL
///
/// Returns None if the href should be excluded:
/// - Empty once the fragment is stripped (covers fragment-only anchors)
/// - Unparseable even after resolution against the base
/// - A scheme other than http or https (javascript:, mailto:, tel:, ...)
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    // Everything from the first '#' on names a position inside a page, not a
    // different page.
    let href = match href.find('#') {
        Some(i) => &href[..i],
        None => href,
    };

    if href.is_empty() {
        return None;
    }

    // Tolerate sloppy markup. A whitespace-only href becomes the empty
    // reference, which resolves to the base itself (a self-link).
    let href = href.trim_start();

    // The parser percent-encodes illegal characters as it goes; whatever it
    // still rejects is dropped.
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(href).ok()?,
        Err(_) => return None,
    };

    if url.scheme() == "http" || url.scheme() == "https" {
        Some(url)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/dir/page").unwrap()
    }

    fn resolve(hrefs: &[&str]) -> HashSet<Url> {
        let hrefs: Vec<String> = hrefs.iter().map(|s| s.to_string()).collect();
        resolve_hrefs(&base(), &hrefs)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_absolute_href_kept_as_is() {
        let resolved = resolve(&["http://example.com/other"]);
        assert!(resolved.contains(&url("http://example.com/other")));
    }

    #[test]
    fn test_rooted_href_resolves_against_authority() {
        let resolved = resolve(&["/top"]);
        assert!(resolved.contains(&url("http://example.com/top")));
    }

    #[test]
    fn test_relative_href_resolves_against_directory() {
        let resolved = resolve(&["sibling"]);
        assert!(resolved.contains(&url("http://example.com/dir/sibling")));
    }

    #[test]
    fn test_fragment_stripped() {
        let resolved = resolve(&["/top#section"]);
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains(&url("http://example.com/top")));
    }

    #[test]
    fn test_fragment_only_href_dropped() {
        assert!(resolve(&["#section"]).is_empty());
    }

    #[test]
    fn test_empty_href_dropped() {
        assert!(resolve(&[""]).is_empty());
    }

    #[test]
    fn test_whitespace_only_href_is_self_link() {
        let resolved = resolve(&["   "]);
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains(&base()));
    }

    #[test]
    fn test_leading_whitespace_tolerated() {
        let resolved = resolve(&["  /top"]);
        assert!(resolved.contains(&url("http://example.com/top")));
    }

    #[test]
    fn test_mailto_dropped() {
        assert!(resolve(&["mailto:test@example.com"]).is_empty());
    }

    #[test]
    fn test_javascript_dropped() {
        assert!(resolve(&["javascript:void(0)"]).is_empty());
    }

    #[test]
    fn test_tel_dropped() {
        assert!(resolve(&["tel:+1234567890"]).is_empty());
    }

    #[test]
    fn test_space_gets_percent_encoded() {
        let resolved = resolve(&["/a b"]);
        assert!(resolved.contains(&url("http://example.com/a%20b")));
    }

    #[test]
    fn test_one_bad_href_does_not_fail_the_batch() {
        let resolved = resolve(&["/good", "http://", "/also-good"]);
        assert_eq!(resolved.len(), 2);
        assert!(resolved.contains(&url("http://example.com/good")));
        assert!(resolved.contains(&url("http://example.com/also-good")));
    }

    #[test]
    fn test_duplicate_targets_collapse() {
        let resolved = resolve(&["/top", "http://example.com/top#frag"]);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_cross_host_href_kept() {
        let resolved = resolve(&["http://other.example/page"]);
        assert!(resolved.contains(&url("http://other.example/page")));
    }

    #[test]
    fn test_https_href_kept() {
        let resolved = resolve(&["https://example.com/secure"]);
        assert!(resolved.contains(&url("https://example.com/secure")));
    }
}
