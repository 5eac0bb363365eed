use crate::UrlError;
use url::Url;

/// Normalizes a URL string into the structured form the frontier stores
///
/// Every URL enters the engine through this function exactly once, so that
/// dedup and history-membership comparisons are well-defined and cheap.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject anything relative or malformed
/// 2. Require a host (the host and port filters need one)
/// 3. Lowercase the host and resolve dot segments (done by the parser)
/// 4. Elide the scheme's default port (done by the parser)
/// 5. Empty path becomes `/`
/// 6. Remove the fragment (everything after `#`)
///
/// The scheme is preserved as-is: whether a scheme is crawlable is an
/// admission filter, not a rewrite. Query strings are preserved verbatim so
/// that two URLs differing only in query parameters stay distinct.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use gatewalk::url::normalize_url;
///
/// let url = normalize_url("HTTP://EXAMPLE.COM/a/../b#frag").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/b");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
