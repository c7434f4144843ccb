//! Spreadsheet reader: story URLs out of a Google Sheets cell feed.
//!
//! The feed is the legacy XML cell listing at
//! `https://spreadsheets.google.com/feeds/cells/{id}/od6/private/full`;
//! each cell carries its value in an `inputValue` attribute.

use regex::Regex;
use url::Url;

use crate::error::{SubmitError, SubmitResult};

/// Root of the cell feed endpoint.
pub const CELL_FEED_ROOT: &str = "https://spreadsheets.google.com/feeds/cells";

/// Cell feed URL for a spreadsheet document id.
pub fn cell_feed_url(spreadsheet_id: &str) -> String {
    format!("{CELL_FEED_ROOT}/{spreadsheet_id}/od6/private/full")
}

/// Document id from a sheet URL of the form
/// `https://docs.google.com/spreadsheets/d/{id}/...`.
pub fn spreadsheet_id(sheet_url: &str) -> SubmitResult<String> {
    let invalid = || SubmitError::InvalidSheetUrl {
        url: sheet_url.to_string(),
    };

    let parsed = Url::parse(sheet_url).map_err(|_| invalid())?;
    let mut segments = parsed.path_segments().ok_or_else(invalid)?;
    match (segments.next(), segments.next(), segments.next()) {
        (Some("spreadsheets"), Some("d"), Some(id)) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(invalid()),
    }
}

/// Whether a cell value looks like a story link.
pub fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// All URL-shaped cell values from a cell feed, in feed order.
///
/// Duplicates are preserved (order determines per-row processing order);
/// cells without an extractable value are skipped silently.
pub fn extract_urls(feed_xml: &str) -> Vec<String> {
    let cell_pattern = Regex::new(r#"<gs:cell\b[^>]*\binputValue="([^"]*)""#).unwrap();

    cell_pattern
        .captures_iter(feed_xml)
        .filter_map(|cap| cap.get(1))
        .map(|value| decode_entities(value.as_str()))
        .filter(|value| is_url(value))
        .collect()
}

/// Decode the XML attribute entities the feed escapes.
fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
