use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_linkcheck::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Builds the key two URLs must share to be on the same site
///
/// The key is the lowercase host plus any non-default port, so
/// `http://example.com` and `https://example.com:443` match while
/// `blog.example.com` and `example.com:8080` do not.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_linkcheck::url::host_key;
///
/// let url = Url::parse("https://Example.com/").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = extract_host(url)?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
