use crate::UrlError;
use url::Url;

/// Parses an absolute HTTP(S) URL
///
/// # Arguments
///
/// * `url_str` - The URL string to parse
///
/// # Returns
///
/// * `Ok(Url)` - Parsed URL, already canonical
/// * `Err(UrlError)` - Not a URL, not HTTP(S), or without a host
///
/// # Examples
///
/// ```
/// use sumi_linkcheck::url::parse_http_url;
///
/// let url = parse_http_url("HTTPS://Example.COM/Docs#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/Docs");
/// ```
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(canonicalize(&url))
}

/// Returns the canonical form of a URL, used as the visited-set key
///
/// Parsing already lowercases the scheme and host and drops default ports;
/// canonicalization additionally strips the fragment. Paths, query strings
/// and trailing slashes are left exactly as written.
///
/// # Examples
///
/// ```
/// use sumi_linkcheck::url::canonicalize;
/// use url::Url;
///
/// let url = Url::parse("https://EXAMPLE.com:443/Page/?q=1#top").unwrap();
/// assert_eq!(canonicalize(&url).as_str(), "https://example.com/Page/?q=1");
/// ```
pub fn canonicalize(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical
}
