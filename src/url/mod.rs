//! URL handling module for gatewalk
//!
//! This module provides URL normalization plus extraction of the attributes
//! the admission filters test: port and file extension.

mod normalize;

use url::Url;

// Re-export main functions
pub use normalize::normalize_url;

/// Returns the port a URL addresses, falling back to the scheme's default
///
/// The port filter dimension always tests a concrete number, so URLs without
/// an explicit port are resolved through the scheme's known default
/// (80 for http, 443 for https). Schemes without a known default yield 0.
///
/// # Examples
///
/// ```
/// use gatewalk::url::port_of;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/").unwrap();
/// assert_eq!(port_of(&url), 80);
///
/// let url = Url::parse("https://example.com:8443/").unwrap();
/// assert_eq!(port_of(&url), 8443);
/// ```
pub fn port_of(url: &Url) -> u16 {
    url.port_or_known_default().unwrap_or(0)
}

/// Extracts the file extension of a URL's path, lowercased
///
/// Returns the text after the last `.` in the final path segment, or an
/// empty string when the segment has no extension. The empty string is a
/// regular filter value: whether extensionless URLs are admitted depends
/// solely on the configured extension rules.
///
/// # Examples
///
/// ```
/// use gatewalk::url::extension_of;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/doc.PDF").unwrap();
/// assert_eq!(extension_of(&url), "pdf");
///
/// let url = Url::parse("http://example.com/about").unwrap();
/// assert_eq!(extension_of(&url), "");
/// ```
pub fn extension_of(url: &Url) -> String {
    let last_segment = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        // A leading dot is a hidden file, not an extension
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}
