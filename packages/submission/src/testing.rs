//! Testing utilities including a mock remote service.
//!
//! Useful for testing hosts of this library without network calls.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{TransportError, TransportResult};
use crate::remote::{RemoteService, RESPONSE_PREAMBLE_LEN};
use crate::types::SubmissionPayload;

/// Wrap a JSON value the way the service does: behind the fixed-length
/// garbage preamble.
pub fn service_body(response: &Value) -> String {
    let preamble = "])}while(1);</x>";
    debug_assert_eq!(preamble.len(), RESPONSE_PREAMBLE_LEN);
    format!("{preamble}{response}")
}

/// One recorded call to [`MockRemote::submit_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub author_id: String,
    pub payload: SubmissionPayload,
}

/// A mock remote service with canned pages and responses.
///
/// Pages and responses are configured builder-style; submissions are
/// recorded for assertions.
#[derive(Default)]
pub struct MockRemote {
    pages: RwLock<HashMap<String, String>>,
    page_failures: RwLock<HashSet<String>>,
    responses: RwLock<HashMap<String, String>>,
    submit_failures: RwLock<HashSet<String>>,
    submissions: RwLock<Vec<RecordedSubmission>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` for GETs of `url`.
    pub fn with_page(self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), markup.into());
        self
    }

    /// Fail GETs of `url` with a transport error.
    pub fn with_page_failure(self, url: impl Into<String>) -> Self {
        self.page_failures.write().unwrap().insert(url.into());
        self
    }

    /// Answer submissions for `author_id` with a raw body (use
    /// [`service_body`] for well-formed ones).
    pub fn with_response(self, author_id: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(author_id.into(), body.into());
        self
    }

    /// Fail submissions for `author_id` with a transport error.
    pub fn with_submit_failure(self, author_id: impl Into<String>) -> Self {
        self.submit_failures.write().unwrap().insert(author_id.into());
        self
    }

    /// Every submission made so far, in call order.
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.read().unwrap().clone()
    }
}

#[async_trait]
impl RemoteService for MockRemote {
    async fn fetch_page(&self, url: &str) -> TransportResult<String> {
        if self.page_failures.read().unwrap().contains(url) {
            return Err(TransportError::Request(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("mock fetch failure for {url}"),
            ))));
        }
        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 404,
                url: url.to_string(),
            })
    }

    async fn submit_request(
        &self,
        author_id: &str,
        payload: &SubmissionPayload,
    ) -> TransportResult<String> {
        if self.submit_failures.read().unwrap().contains(author_id) {
            return Err(TransportError::Request(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("mock submit failure for author {author_id}"),
            ))));
        }

        self.submissions.write().unwrap().push(RecordedSubmission {
            author_id: author_id.to_string(),
            payload: payload.clone(),
        });

        Ok(self
            .responses
            .read()
            .unwrap()
            .get(author_id)
            .cloned()
            .unwrap_or_else(|| service_body(&serde_json::json!({"success": true}))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_body_carries_the_full_preamble() {
        let body = service_body(&serde_json::json!({"success": true}));
        assert_eq!(&body[..RESPONSE_PREAMBLE_LEN], "])}while(1);</x>");
        assert!(crate::remote::parse_service_response(&body).is_ok());
    }

    #[tokio::test]
    async fn unknown_pages_are_status_errors() {
        let remote = MockRemote::new();
        assert!(matches!(
            remote.fetch_page("https://nowhere").await,
            Err(TransportError::Status { status: 404, .. })
        ));
    }
}
