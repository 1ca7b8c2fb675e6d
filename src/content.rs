use crate::types::{ExtractedContent, RawEntry};

/// RFC-822-ish rendering used in the mail body, e.g.
/// `Tue, 02 Jan 2024 03:04:05 UTC`.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Sentinel used when an entry carries no usable timestamp at all.
const UNKNOWN_TIMESTAMP: &str = "UNKNOWN";

/// Derives the best-available timestamp and body for an entry.
///
/// The timestamp degrades through published → updated → `"UNKNOWN"` and
/// never fails. The body takes the first non-empty of content → summary;
/// if both are absent or empty the entry has nothing worth sending and
/// the result is `None`.
pub fn extract(entry: &RawEntry) -> Option<ExtractedContent> {
    let timestamp = entry
        .published
        .or(entry.updated)
        .map(|t| t.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string());

    let body = [entry.content.as_deref(), entry.summary.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())?;

    Some(ExtractedContent {
        timestamp,
        body: body.to_string(),
    })
}
