//! URL and `Referer` construction for catalog requests.

use crate::error::ScraperError;

/// Appends `params` to `base` as a query string, keeping any query `base`
/// already carries.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base` is not an absolute URL.
pub fn build_url(base: &str, params: &[(&str, &str)]) -> Result<String, ScraperError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| ScraperError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url.to_string())
}

/// `Referer` header for a request, relative to the configured site root.
///
/// `path` is joined with a single `/`; an empty `path` yields the site root
/// with a trailing slash.
#[must_use]
pub fn referer_for(site_root: &str, path: &str) -> String {
    format!(
        "{}/{}",
        site_root.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(super) fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
