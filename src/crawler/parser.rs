//! HTML parser for extracting outbound links
//!
//! Extraction returns hrefs exactly as written, in document order.
//! Resolution and classification happen later, against the page the
//! links were found on.

use scraper::{Html, Selector};

/// Extracts every `<a href>` value from an HTML document
///
/// # Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, in document order
///
/// **Exclude:**
/// - `<a>` without an `href` attribute
/// - `<link>`, `<script src>`, `<img src>` and other resource references
///
/// The HTML5 parser recovers from malformed markup, so broken documents
/// yield whatever links survive recovery rather than an error.
///
/// # Example
///
/// ```
/// use sumi_linkcheck::crawler::extract_links;
///
/// let html = r##"<p><a href="/about">About</a> <a href="#top">Top</a></p>"##;
/// assert_eq!(extract_links(html), vec!["/about", "#top"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Returns true if a Content-Type header denotes an HTML document
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("text/html"))
        .unwrap_or(false)
}
