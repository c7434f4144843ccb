//! HTTP implementation of the remote service seam.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{TransportError, TransportResult};
use crate::remote::{RemoteService, DEFAULT_XSRF_TOKEN, SERVICE_ROOT, XSRF_HEADER};
use crate::types::SubmissionPayload;

/// Reqwest-backed remote service client.
///
/// # Example
///
/// ```rust,ignore
/// let remote = HttpService::new().with_xsrf_token("token-from-session");
/// let markup = remote.fetch_page("https://medium.com/@a/some-story").await?;
/// ```
pub struct HttpService {
    client: reqwest::Client,
    service_root: String,
    xsrf_token: String,
}

impl Default for HttpService {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpService {
    /// Create a client with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            service_root: SERVICE_ROOT.trim_end_matches('/').to_string(),
            xsrf_token: DEFAULT_XSRF_TOKEN.to_string(),
        }
    }

    /// Use a custom reqwest client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point at a different service root (tests, mirrors).
    pub fn with_service_root(mut self, root: impl Into<String>) -> Self {
        self.service_root = root.into().trim_end_matches('/').to_string();
        self
    }

    /// Send a specific anti-forgery token.
    pub fn with_xsrf_token(mut self, token: impl Into<String>) -> Self {
        self.xsrf_token = token.into();
        self
    }

    fn requests_endpoint(&self, author_id: &str) -> String {
        format!("{}/_/api/users/{}/requests", self.service_root, author_id)
    }
}

#[async_trait]
impl RemoteService for HttpService {
    async fn fetch_page(&self, url: &str) -> TransportResult<String> {
        debug!(url = %url, "page fetch starting");
        let response = self.client.get(url).send().await.map_err(|error| {
            warn!(url = %url, error = %error, "page fetch failed");
            TransportError::Request(Box::new(error))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "page fetch returned an error status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|error| TransportError::Request(Box::new(error)))
    }

    async fn submit_request(
        &self,
        author_id: &str,
        payload: &SubmissionPayload,
    ) -> TransportResult<String> {
        let endpoint = self.requests_endpoint(author_id);
        debug!(endpoint = %endpoint, post_id = %payload.post_id, "submitting publication request");

        let response = self
            .client
            .post(&endpoint)
            .header(XSRF_HEADER, &self.xsrf_token)
            .json(payload)
            .send()
            .await
            .map_err(|error| {
                warn!(endpoint = %endpoint, error = %error, "request submission failed");
                TransportError::Request(Box::new(error))
            })?;

        // No status check here: the service reports failures inside the
        // JSON body, which the caller parses either way.
        response
            .text()
            .await
            .map_err(|error| TransportError::Request(Box::new(error)))
    }

    fn service_root(&self) -> &str {
        &self.service_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_the_author_id() {
        let service = HttpService::new();
        assert_eq!(
            service.requests_endpoint("7"),
            "https://medium.com/_/api/users/7/requests"
        );
    }

    #[test]
    fn service_root_is_normalized() {
        let service = HttpService::new().with_service_root("https://example.test/");
        assert_eq!(service.service_root(), "https://example.test");
        assert_eq!(
            service.requests_endpoint("abc"),
            "https://example.test/_/api/users/abc/requests"
        );
    }
}
