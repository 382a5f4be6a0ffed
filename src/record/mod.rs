//! Page-record interception: cookies and query parameters.
//!
//! Outside the capture pipeline, the recorder also snapshots page state.
//! This module parses cookie headers into redacted records and extracts
//! query parameters from URLs. The redaction policy is injected — the
//! engine never decides what counts as sensitive — and the produced
//! envelopes share the tagged-message pattern of the privileged channel.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use url::Url;

/// One intercepted cookie, with its value already passed through the
/// redactor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieEntry {
    pub key: String,
    pub value: String,
}

/// Kind of page state carried by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Cookies,
}

/// Where the record was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Client,
}

/// A timestamped batch of intercepted page state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Capture time in milliseconds since the epoch.
    pub timestamp: i64,
    pub record_type: RecordType,
    pub source: RecordSource,
    pub items: Vec<CookieEntry>,
}

/// Envelope posted to the record sink, tagged with a `type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordEnvelope {
    AddRecord { payload: PageRecord },
}

/// Parses a `Cookie:`-style header into redacted entries.
///
/// Segments are split on `;`, keys and values trimmed, and segments with an
/// empty key skipped. A segment without `=` yields an empty value. The
/// redactor sees `(key, value)` and returns the value to record.
pub fn parse_cookie_header<F>(header: &str, redact: F) -> Vec<CookieEntry>
where
    F: Fn(&str, &str) -> String,
{
    header
        .split(';')
        .filter_map(|segment| {
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (segment.trim(), ""),
            };
            if key.is_empty() {
                return None;
            }
            Some(CookieEntry {
                key: key.to_string(),
                value: redact(key, value),
            })
        })
        .collect()
}

/// Builds the `ADD_RECORD` envelope for the current cookie state.
pub fn intercept_cookies<F>(header: &str, redact: F) -> RecordEnvelope
where
    F: Fn(&str, &str) -> String,
{
    RecordEnvelope::AddRecord {
        payload: PageRecord {
            timestamp: Utc::now().timestamp_millis(),
            record_type: RecordType::Cookies,
            source: RecordSource::Client,
            items: parse_cookie_header(header, redact),
        },
    }
}

/// Extracts query parameters from a URL.
///
/// Relative URLs resolve against `origin`. Parse failures are logged and
/// yield an empty map; this never fails the caller.
pub fn extract_query_params(raw: &str, origin: &str) -> BTreeMap<String, String> {
    let parsed = Url::parse(raw).or_else(|_| {
        Url::parse(origin).and_then(|base| base.join(raw))
    });

    match parsed {
        Ok(url) => url.query_pairs().into_owned().collect(),
        Err(err) => {
            log::error!("failed to extract query parameters from '{raw}': {err}");
            BTreeMap::new()
        }
    }
}
