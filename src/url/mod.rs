//! URL handling module for Sumi-Linkcheck
//!
//! This module provides URL canonicalization, host extraction, and link
//! classification relative to the site being checked.

mod domain;
mod normalize;

use crate::state::LinkType;
use url::Url;

// Re-export main functions
pub use domain::{extract_host, host_key};
pub use normalize::{canonicalize, parse_http_url};

/// A raw href after resolution and classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLink {
    /// Same site as the base URL; verified and possibly traversed
    Internal(Url),

    /// Another site; verified, never traversed
    External(Url),

    /// Could not be resolved into a valid URL; counted as external and
    /// recorded as malformed without touching the network
    Malformed(String),

    /// Fragment-only or non-HTTP(S) reference; never verified or traversed
    Anchor {
        /// The href as written
        href: String,
        /// Why the link cannot be verified
        reason: String,
    },
}

impl ClassifiedLink {
    /// Returns the link type recorded for this link
    pub fn link_type(&self) -> LinkType {
        match self {
            Self::Internal(_) => LinkType::Internal,
            Self::External(_) | Self::Malformed(_) => LinkType::External,
            Self::Anchor { .. } => LinkType::Anchor,
        }
    }

    /// Returns the canonical target URL, if the link resolved to HTTP(S)
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Internal(url) | Self::External(url) => Some(url),
            _ => None,
        }
    }

    /// Returns the string recorded as `link_url`
    ///
    /// Resolved links use their canonical URL; everything else keeps the href
    /// as written.
    pub fn link_url(&self) -> &str {
        match self {
            Self::Internal(url) | Self::External(url) => url.as_str(),
            Self::Malformed(href) => href,
            Self::Anchor { href, .. } => href,
        }
    }
}

/// Classifies a raw href found on `source`
///
/// Rules are applied in order:
/// 1. Empty, fragment-only, or non-HTTP(S) scheme → anchor
/// 2. Resolve against the source page; failure → malformed (external)
/// 3. Host key equal to `base_host` (case-insensitive, exact) → internal
/// 4. Otherwise → external; subdomains of the base host are external
///
/// # Arguments
///
/// * `base_host` - Host key of the base URL, as returned by [`host_key`]
/// * `source` - Canonical URL of the page the href was found on
/// * `raw_href` - The href attribute value as written
///
/// # Examples
///
/// ```
/// use sumi_linkcheck::url::{classify_link, host_key, ClassifiedLink};
/// use sumi_linkcheck::LinkType;
/// use url::Url;
///
/// let source = Url::parse("https://example.com/docs/").unwrap();
/// let base = host_key(&source).unwrap();
///
/// let link = classify_link(&base, &source, "intro");
/// assert_eq!(link.link_type(), LinkType::Internal);
/// assert_eq!(link.link_url(), "https://example.com/docs/intro");
///
/// let link = classify_link(&base, &source, "https://blog.example.com/");
/// assert_eq!(link.link_type(), LinkType::External);
///
/// let link = classify_link(&base, &source, "mailto:team@example.com");
/// assert_eq!(link.link_type(), LinkType::Anchor);
/// ```
pub fn classify_link(base_host: &str, source: &Url, raw_href: &str) -> ClassifiedLink {
    let href = raw_href.trim();

    if href.is_empty() {
        return anchor(href, "empty href");
    }

    if href.starts_with('#') {
        return anchor(href, "fragment-only link");
    }

    if let Some(scheme) = explicit_scheme(href) {
        if !is_http_scheme(scheme) {
            return anchor(href, &format!("{} scheme", scheme.to_ascii_lowercase()));
        }
    }

    let resolved = match source.join(href) {
        Ok(url) => url,
        Err(_) => return ClassifiedLink::Malformed(href.to_string()),
    };

    if !is_http_scheme(resolved.scheme()) {
        return anchor(href, &format!("{} scheme", resolved.scheme()));
    }

    let target_host = match host_key(&resolved) {
        Some(host) => host,
        None => return ClassifiedLink::Malformed(href.to_string()),
    };

    let canonical = canonicalize(&resolved);
    if target_host.eq_ignore_ascii_case(base_host) {
        ClassifiedLink::Internal(canonical)
    } else {
        ClassifiedLink::External(canonical)
    }
}

fn anchor(href: &str, reason: &str) -> ClassifiedLink {
    ClassifiedLink::Anchor {
        href: href.to_string(),
        reason: reason.to_string(),
    }
}

fn is_http_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

/// Returns the scheme of an href written with one (`mailto:`, `HTTPS:` …)
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`,
/// terminated by `:` before any `/`, `?` or `#`.
fn explicit_scheme(href: &str) -> Option<&str> {
    let end = href.find(':')?;
    let candidate = &href[..end];

    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}
