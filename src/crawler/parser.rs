//! HTML parsing collaborator: link and title extraction
//!
//! The engine consumes already-extracted links; this module is the default
//! extractor the [`HttpFetcher`](crate::crawler::HttpFetcher) delegates to.

use scraper::{Html, Selector};
use url::Url;

/// Extracts the outbound links of an HTML body, in document order
///
/// Included: `<a href="...">` targets, resolved against `base_url`.
///
/// Excluded:
/// - `<a ... download>` links
/// - `javascript:`, `mailto:`, `tel:` links
/// - data URIs
/// - hrefs that fail to resolve against the base
///
/// The returned strings are absolute but otherwise raw; normalization
/// happens when a link is offered to the frontier.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base_url) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

/// Extracts the page title, if the document has a non-empty one
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Resolves a link href to an absolute URL string, or drops it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let trimmed = href.trim();

    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    for skipped in ["javascript:", "mailto:", "tel:", "data:"] {
        if lower.starts_with(skipped) {
            return None;
        }
    }

    base_url.join(trimmed).ok().map(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/section/").unwrap()
    }

    #[test]
    fn test_extract_absolute_links() {
        let html = r#"<html><body><a href="http://example.org/page">x</a></body></html>"#;
        assert_eq!(extract_links(html, &base()), vec!["http://example.org/page"]);
    }

    #[test]
    fn test_resolve_relative_links() {
        let html = r#"<html><body><a href="child">x</a><a href="/root">y</a></body></html>"#;
        assert_eq!(
            extract_links(html, &base()),
            vec!["http://example.com/section/child", "http://example.com/root"]
        );
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"<a href="/b">b</a><a href="/a">a</a><a href="/c">c</a>"#;
        assert_eq!(
            extract_links(html, &base()),
            vec![
                "http://example.com/b",
                "http://example.com/a",
                "http://example.com/c"
            ]
        );
    }

    #[test]
    fn test_skip_non_navigational_schemes() {
        let html = r#"
            <a href="javascript:void(0)">x</a>
            <a href="mailto:a@example.com">y</a>
            <a href="tel:+123">z</a>
            <a href="data:text/plain,hi">w</a>
            <a href="/keep">keep</a>
        "#;
        assert_eq!(extract_links(html, &base()), vec!["http://example.com/keep"]);
    }

    #[test]
    fn test_skip_download_links() {
        let html = r#"<a href="/file.zip" download>dl</a><a href="/page">p</a>"#;
        assert_eq!(extract_links(html, &base()), vec!["http://example.com/page"]);
    }

    #[test]
    fn test_extract_title() {
        let html = "<html><head><title> Hello </title></head><body></body></html>";
        assert_eq!(extract_title(html), Some("Hello".to_string()));
    }

    #[test]
    fn test_missing_or_empty_title() {
        assert_eq!(extract_title("<html><body></body></html>"), None);
        assert_eq!(
            extract_title("<html><head><title>  </title></head></html>"),
            None
        );
    }
}
