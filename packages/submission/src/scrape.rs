//! Fence-based extraction of identifiers from service page markup.
//!
//! The service embeds ids as inline HTML attributes and JSON fragments
//! with no extraction API. Each fence below is a reverse-engineered
//! constant; the value is the substring between the fence and the next
//! `"`. Changing a fence breaks compatibility with the live markup.

use crate::types::StoryIdentifiers;

/// Marks the story id: `data-post-id="{id}"`.
pub const POST_ID_FENCE: &str = "data-post-id=\"";

/// Marks the author id: `data-user-id="{id}"`.
pub const USER_ID_FENCE: &str = "data-user-id=\"";

/// Marks the author display name inside inline JSON: `"creator":["{name}"`.
pub const CREATOR_FENCE: &str = "creator\":[\"";

/// Marks the publication id: `data-collection-id="{id}"`.
pub const COLLECTION_ID_FENCE: &str = "data-collection-id=\"";

/// Value following `fence`, up to the next `"`.
///
/// An unterminated value runs to the end of the document, matching how
/// the live markup has always been scanned.
fn fence_value<'a>(markup: &'a str, fence: &str) -> Option<&'a str> {
    let (_, tail) = markup.split_once(fence)?;
    match tail.find('"') {
        Some(end) => Some(&tail[..end]),
        None => Some(tail),
    }
}

/// Scan story-page markup for the three story identifiers.
///
/// Absent fences yield empty strings. Soft fail: the caller decides
/// whether empty ids are fatal.
pub fn extract_story_identifiers(markup: &str) -> StoryIdentifiers {
    StoryIdentifiers {
        story_id: fence_value(markup, POST_ID_FENCE).unwrap_or("").to_string(),
        author_id: fence_value(markup, USER_ID_FENCE).unwrap_or("").to_string(),
        author_name: fence_value(markup, CREATOR_FENCE).unwrap_or("").to_string(),
    }
}

/// Scan publication-page markup for the collection id.
///
/// Unlike the story fields, a miss here is an error for the caller
/// (surfaced as "publication not found").
pub fn extract_publication_id(markup: &str) -> Option<String> {
    fence_value(markup, COLLECTION_ID_FENCE).map(str::to_string)
}

/// Extraction strategy seam.
///
/// The fence scan is a fragile coupling to the remote markup format;
/// keeping it behind a trait lets the strategy change without touching
/// the orchestrator.
pub trait PageExtractor: Send + Sync {
    /// Extract the story identifiers from story-page markup.
    fn story_identifiers(&self, markup: &str) -> StoryIdentifiers;

    /// Extract the publication id from publication-page markup.
    fn publication_id(&self, markup: &str) -> Option<String>;
}

/// Default extractor: substring fence scanning.
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceExtractor;

impl PageExtractor for FenceExtractor {
    fn story_identifiers(&self, markup: &str) -> StoryIdentifiers {
        extract_story_identifiers(markup)
    }

    fn publication_id(&self, markup: &str) -> Option<String> {
        extract_publication_id(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_three_story_fields() {
        let markup = r#"<div data-post-id="123" data-user-id="u9"></div>
            <script>{"creator":["Ada Lovelace"],"other":1}</script>"#;

        let ids = extract_story_identifiers(markup);
        assert_eq!(ids.story_id, "123");
        assert_eq!(ids.author_id, "u9");
        assert_eq!(ids.author_name, "Ada Lovelace");
    }

    #[test]
    fn missing_fences_are_soft_misses() {
        let markup = r#"<div data-post-id="123"></div>"#;

        let ids = extract_story_identifiers(markup);
        assert_eq!(ids.story_id, "123");
        assert_eq!(ids.author_id, "");
        assert_eq!(ids.author_name, "");
    }

    #[test]
    fn unterminated_value_runs_to_end_of_document() {
        let ids = extract_story_identifiers("x data-post-id=\"abc");
        assert_eq!(ids.story_id, "abc");
    }

    #[test]
    fn publication_id_found() {
        let markup = r#"<body data-collection-id="col-77">"#;
        assert_eq!(extract_publication_id(markup).as_deref(), Some("col-77"));
    }

    #[test]
    fn publication_id_absent_is_none() {
        assert_eq!(extract_publication_id("<body></body>"), None);
    }

    #[test]
    fn only_first_occurrence_is_read() {
        let markup = r#"data-post-id="first" data-post-id="second""#;
        let ids = extract_story_identifiers(markup);
        assert_eq!(ids.story_id, "first");
    }
}
