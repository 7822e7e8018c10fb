//! `Last-Modified` / `If-Modified-Since` handling.

use chrono::{DateTime, NaiveDateTime, Utc};
use salvo::http::header::{HeaderMap, IF_MODIFIED_SINCE};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    Stream,
    NotModified,
}

/// ## Summary
/// Decides whether the client's copy is current.
///
/// Not modified iff both timestamps are known and `last_modified`, truncated
/// to whole seconds, is not after `if_modified_since`.
#[must_use]
pub fn evaluate(
    last_modified: Option<DateTime<Utc>>,
    if_modified_since: Option<DateTime<Utc>>,
) -> CacheDecision {
    match (last_modified, if_modified_since) {
        (Some(modified), Some(since)) if modified.timestamp() <= since.timestamp() => {
            CacheDecision::NotModified
        }
        _ => CacheDecision::Stream,
    }
}

/// ## Summary
/// Parses an HTTP date in IMF-fixdate, RFC 2822, RFC 850 or asctime form.
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, IMF_FIXDATE)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc2822(value).map(|dt| dt.with_timezone(&Utc)))
        .or_else(|_| NaiveDateTime::parse_from_str(value, RFC_850).map(|naive| naive.and_utc()))
        .or_else(|_| NaiveDateTime::parse_from_str(value, ASCTIME).map(|naive| naive.and_utc()))
        .ok()
}

/// Formats a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
#[must_use]
pub fn format_http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(IMF_FIXDATE).to_string()
}

/// The request's `If-Modified-Since`, with unparseable values treated as absent.
#[must_use]
pub fn if_modified_since(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let raw = headers.get(IF_MODIFIED_SINCE)?.to_str().ok()?;
    let parsed = parse_http_date(raw);
    if parsed.is_none() {
        tracing::debug!(value = %raw, "Ignoring unparseable If-Modified-Since");
    }
    parsed
}
