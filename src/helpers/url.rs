//! URL helper functions

use chrono::{DateTime, Datelike, Utc};

use crate::config::BlogConfig;

/// Path of a post relative to the blog URI: `/{year}/{MM}/{slug}`
pub fn post_url_path(date: &DateTime<Utc>, slug: &str) -> String {
    format!("/{}/{:02}/{}", date.year(), date.month(), slug)
}

/// Generate a path under the blog URI
///
/// # Examples
/// ```ignore
/// url_for(&config, "/category/rust") // -> "/blog/category/rust"
/// ```
pub fn url_for(config: &BlogConfig, path: &str) -> String {
    let root = config.base_uri();
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Join a site origin, the blog URI and a path without doubling slashes
///
/// # Examples
/// ```ignore
/// full_url("https://example.com/", "/blog", "/2024/01/hello") // -> "https://example.com/blog/2024/01/hello"
/// ```
pub fn full_url(site_url: &str, uri: &str, path: &str) -> String {
    let base = site_url.trim_end_matches('/');
    let uri = uri.trim_matches('/');
    let path = path.trim_start_matches('/');

    let mut url = base.to_string();
    if !uri.is_empty() {
        url.push('/');
        url.push_str(uri);
    }
    if !path.is_empty() {
        url.push('/');
        url.push_str(path);
    }
    url
}
