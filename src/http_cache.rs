use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use tracing::debug;

use crate::error::LoadError;

static CACHE: Mutex<Option<HashMap<String, CacheEntry>>> = Mutex::new(None);

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: Instant,
}

/// GET with conditional revalidation against the last body seen for `url`.
/// Entries live for the life of the process.
pub fn fetch_text_cached(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
) -> Result<String, LoadError> {
    let cached_entry = {
        let mut guard = CACHE.lock().expect("http cache lock poisoned");
        guard.get_or_insert_with(HashMap::new).get(url).cloned()
    };

    let mut req = client.get(url);
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().map_err(|err| LoadError::from_reqwest(url, err))?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(mut entry) = cached_entry {
            debug!(
                url,
                age_secs = entry.fetched_at.elapsed().as_secs(),
                "not modified"
            );
            let body = entry.body.clone();
            entry.fetched_at = Instant::now();
            store_entry(url, entry);
            return Ok(body);
        }
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let header_text = |name: HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let etag = header_text(ETAG);
    let last_modified = header_text(LAST_MODIFIED);

    let body = resp.text().map_err(|err| LoadError::from_reqwest(url, err))?;
    if etag.is_some() || last_modified.is_some() {
        store_entry(
            url,
            CacheEntry {
                body: body.clone(),
                etag,
                last_modified,
                fetched_at: Instant::now(),
            },
        );
    }
    Ok(body)
}

fn store_entry(url: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().expect("http cache lock poisoned");
    guard
        .get_or_insert_with(HashMap::new)
        .insert(url.to_string(), entry);
}
