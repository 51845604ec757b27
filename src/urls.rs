//! URL building with query-parameter merging.

use url::Url;

use crate::error::{Error, Result};

/// Merge extra query parameters into a base URL.
///
/// Parameters already present in the base URL survive; a key present on
/// both sides yields multiple values for that key, not a replacement.
/// When anything is merged the full query is re-encoded in canonical
/// sorted-by-key form. Blank keys in `params` are skipped silently.
pub fn build_url(base: &str, params: &[(String, String)]) -> Result<Url> {
    if base.trim().is_empty() {
        return Err(Error::EmptyUrl);
    }
    let mut url = Url::parse(base).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    if params.is_empty() {
        return Ok(url);
    }

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.extend(
        params
            .iter()
            .filter(|(key, _)| !key.trim().is_empty())
            .cloned(),
    );
    // Stable sort: repeated keys keep base-then-extra value order.
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(&pairs);
    }
    Ok(url)
}

/// Validate that a URL is non-blank, parseable, and carries a scheme and
/// host. Syntactic only; nothing is contacted.
pub fn validate_url(raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(Error::EmptyUrl);
    }
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    if !url.has_host() {
        return Err(Error::InvalidUrl("URL must include a host".to_string()));
    }
    Ok(())
}
