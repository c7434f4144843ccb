//! Remote service seam: page fetches and request submission.
//!
//! [`RemoteService`] is the trait the orchestrator talks through;
//! [`http::HttpService`] is the production implementation and the
//! `testing` module provides a recording mock.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{SubmitError, SubmitResult, TransportResult};
use crate::types::SubmissionPayload;

/// Root URL of the publishing service.
pub const SERVICE_ROOT: &str = "https://medium.com/";

/// Anti-forgery header the request endpoint requires.
pub const XSRF_HEADER: &str = "x-xsrf-token";

/// Token value the service accepts for extension-style clients.
pub const DEFAULT_XSRF_TOKEN: &str = "xsrf";

/// Length of the garbage preamble the service prefixes to every JSON
/// response body.
pub const RESPONSE_PREAMBLE_LEN: usize = 16;

/// Network operations the orchestrator needs.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetch a page and return its markup.
    async fn fetch_page(&self, url: &str) -> TransportResult<String>;

    /// POST a publication request to the author's request endpoint and
    /// return the raw response body, preamble included.
    async fn submit_request(
        &self,
        author_id: &str,
        payload: &SubmissionPayload,
    ) -> TransportResult<String>;

    /// Root URL used when building story URLs from bare post ids.
    fn service_root(&self) -> &str {
        SERVICE_ROOT
    }
}

/// Parse a service response body: strip the fixed-length preamble,
/// then parse the remainder as JSON.
///
/// A body too short for the preamble (or cut mid-character) is a
/// [`SubmitError::Truncated`]; malformed JSON surfaces as a parse
/// error. Neither panics.
pub fn parse_service_response(body: &str) -> SubmitResult<Value> {
    let json = body
        .get(RESPONSE_PREAMBLE_LEN..)
        .ok_or(SubmitError::Truncated)?;
    serde_json::from_str(json).map_err(SubmitError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_the_preamble_before_parsing() {
        let body = format!("])}}while(1);</x>{}", r#"{"success":true}"#);
        let parsed = parse_service_response(&body).unwrap();
        assert_eq!(parsed, json!({"success": true}));
    }

    #[test]
    fn short_body_is_truncated_not_a_panic() {
        assert!(matches!(
            parse_service_response("short"),
            Err(SubmitError::Truncated)
        ));
    }

    #[test]
    fn garbage_after_preamble_is_a_parse_error() {
        let body = "x".repeat(RESPONSE_PREAMBLE_LEN) + "<html>nope</html>";
        assert!(matches!(
            parse_service_response(&body),
            Err(SubmitError::Parse(_))
        ));
    }
}
