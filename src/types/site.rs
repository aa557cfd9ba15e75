//! Site identifier derivation.
//!
//! Rules are partitioned by site: the page's hostname, or for pages loaded
//! from disk (which have no network origin) the decoded filesystem path.

use url::Url;

/// Derives the persistence partition key for a page URL.
///
/// - `file:` URLs yield the percent-decoded filesystem path.
/// - Other URLs yield the hostname.
/// - Strings that do not parse as URLs are returned verbatim, so an
///   already-derived identifier passes through unchanged.
pub fn site_id(page_url: &str) -> String {
    match Url::parse(page_url) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|_| url.path().to_string()),
        Ok(url) => url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| page_url.to_string()),
        Err(_) => page_url.to_string(),
    }
}
