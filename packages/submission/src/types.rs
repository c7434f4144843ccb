//! Data model for publication story requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmitError;

/// Request type the service expects for publication submissions.
pub const SUBMIT_REQUEST_TYPE: &str = "submit_post_to_publication";

/// One of the user's saved email templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: u8,
    pub name: String,
    pub body: String,
}

/// The publication requests are submitted to.
///
/// Defaults to the sentinel unset id and the service root; only a
/// successful resolution replaces a stored identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationIdentity {
    pub id: String,
    pub url: String,
}

impl PublicationIdentity {
    /// Whether the identity still holds the sentinel unset id.
    pub fn is_unset(&self) -> bool {
        self.id == crate::settings::UNSET_PUBLICATION_ID
    }
}

/// The template used when the caller does not pick one.
///
/// `cached_body` is a denormalized copy of the selected template's body,
/// refreshed whenever the selection changes or the selected template is
/// edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultTemplateSelection {
    pub template_id: u8,
    pub cached_body: String,
}

/// Identifiers scraped from a story page.
///
/// Ephemeral, derived per request. An absent field is an empty string
/// (a soft miss, not an error); the caller decides whether that is
/// fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryIdentifiers {
    pub story_id: String,
    pub author_id: String,
    pub author_name: String,
}

/// Terminal success/failure record for one submitted story.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome {
    pub story_url: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub raw_response: Option<Value>,
}

impl RequestOutcome {
    /// Build an outcome from a parsed service response.
    ///
    /// The response shape is undocumented; `success` and `error` are
    /// read if present and the whole blob is passed through verbatim.
    pub fn from_response(story_url: impl Into<String>, response: Value) -> Self {
        let success = response
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let error_message = response
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            story_url: story_url.into(),
            success,
            error_message,
            raw_response: Some(response),
        }
    }

    /// Build a failure outcome from a submission error.
    pub fn failure(story_url: impl Into<String>, error: &SubmitError) -> Self {
        Self {
            story_url: story_url.into(),
            success: false,
            error_message: Some(error.to_string()),
            raw_response: None,
        }
    }
}

/// Wire body for the per-author request endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub bid_amount: u32,
    pub bid_currency: u32,
    pub collection_id: String,
    pub comment: String,
    pub post_id: String,
    #[serde(rename = "type")]
    pub request_type: String,
}

impl SubmissionPayload {
    /// Build the payload for one story. Bid fields are fixed by the
    /// service contract.
    pub fn new(
        collection_id: impl Into<String>,
        post_id: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            bid_amount: 0,
            bid_currency: 1,
            collection_id: collection_id.into(),
            comment: comment.into(),
            post_id: post_id.into(),
            request_type: SUBMIT_REQUEST_TYPE.to_string(),
        }
    }
}
