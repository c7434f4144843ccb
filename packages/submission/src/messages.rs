//! Host-to-core message contract.
//!
//! View hosts (browser action buttons, a CLI, anything else) talk to
//! the orchestrator through these tagged messages rather than calling
//! its methods directly, so the wire shape stays stable across hosts.

use serde::{Deserialize, Serialize};

use crate::error::{SubmitError, SubmitResult};
use crate::orchestrator::Orchestrator;
use crate::remote::RemoteService;
use crate::scrape::PageExtractor;
use crate::settings::SettingsStore;
use crate::types::RequestOutcome;

// Any handle works in the story path; the service routes
// /{handle}/{post id} by the id alone.
const HOME_STORY_HANDLE: &str = "@elysian";

/// Story URL for a bare post id from a home-feed card.
pub fn home_story_url(service_root: &str, post_id: &str) -> String {
    format!(
        "{}/{}/{}",
        service_root.trim_end_matches('/'),
        HOME_STORY_HANDLE,
        post_id
    )
}

/// Messages a host may dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "kebab-case")]
pub enum HostMessage {
    /// Request the story the host is currently showing.
    #[serde(rename_all = "camelCase")]
    QuickRequest { template_id: u8 },

    /// Request a story known only by its post id.
    #[serde(rename_all = "camelCase")]
    HomeQuickRequest { post_id: String, template_id: u8 },

    /// List the saved template names.
    GetTemplates,
}

/// Host-side context a message is dispatched against.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    /// URL of the story the host currently has in view, when any.
    pub active_story_url: Option<String>,
}

impl HostContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_story(url: impl Into<String>) -> Self {
        Self {
            active_story_url: Some(url.into()),
        }
    }
}

/// Replies to host messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostResponse {
    Outcome(RequestOutcome),
    Templates(Vec<String>),
}

impl<S: SettingsStore, R: RemoteService, E: PageExtractor> Orchestrator<S, R, E> {
    /// Dispatch one host message.
    pub async fn handle(
        &self,
        message: HostMessage,
        context: &HostContext,
    ) -> SubmitResult<HostResponse> {
        match message {
            HostMessage::QuickRequest { template_id } => {
                let story_url = context
                    .active_story_url
                    .as_deref()
                    .ok_or(SubmitError::NoActiveStory)?;
                Ok(HostResponse::Outcome(
                    self.submit_one(story_url, template_id).await,
                ))
            }
            HostMessage::HomeQuickRequest {
                post_id,
                template_id,
            } => {
                let story_url = home_story_url(self.remote().service_root(), &post_id);
                Ok(HostResponse::Outcome(
                    self.submit_one(&story_url, template_id).await,
                ))
            }
            HostMessage::GetTemplates => {
                let names = self.settings().template_names().await?;
                Ok(HostResponse::Templates(names))
            }
        }
    }
}
