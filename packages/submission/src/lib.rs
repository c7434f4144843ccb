//! Publication story-request library.
//!
//! Requests Medium stories into a publication, one at a time or in
//! bulk from a spreadsheet of links: scrape the story page for its
//! identifiers, render the chosen email template, POST to the
//! service's per-author request endpoint, and report one outcome per
//! story. The remote API is undocumented; the fence constants and wire
//! shapes here mirror what the live service actually speaks.
//!
//! # Usage
//!
//! ```rust,ignore
//! use submission::{HttpService, MemorySettings, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(MemorySettings::new(), HttpService::new());
//! orchestrator.settings().seed_defaults().await?;
//!
//! let outcome = orchestrator.submit_one("https://medium.com/@a/story", 1).await;
//! println!("{}: success={}", outcome.story_url, outcome.success);
//! ```
//!
//! # Modules
//!
//! - [`orchestrator`] - the request pipeline (submit one / batch / spreadsheet)
//! - [`settings`] - flat key-value settings with a typed facade
//! - [`scrape`] - fence-based page identifier extraction
//! - [`template`] - placeholder substitution for email bodies
//! - [`sheet`] - story URLs out of a spreadsheet cell feed
//! - [`remote`] - the network seam and its HTTP implementation
//! - [`messages`] - the host-to-core message contract
//! - [`testing`] - mock collaborators for hosts and tests

pub mod error;
pub mod messages;
pub mod orchestrator;
pub mod remote;
pub mod scrape;
pub mod settings;
pub mod sheet;
pub mod template;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use error::{SettingsError, SubmitError, TransportError};
pub use messages::{home_story_url, HostContext, HostMessage, HostResponse};
pub use orchestrator::Orchestrator;
pub use remote::{
    http::HttpService, parse_service_response, RemoteService, DEFAULT_XSRF_TOKEN, SERVICE_ROOT,
};
pub use scrape::{
    extract_publication_id, extract_story_identifiers, FenceExtractor, PageExtractor,
};
pub use settings::{
    file::FileSettings, memory::MemorySettings, Settings, SettingsStore, DEFAULT_TEMPLATE_CONTENT,
    TEMPLATE_COUNT,
};
pub use types::{
    DefaultTemplateSelection, EmailTemplate, PublicationIdentity, RequestOutcome,
    StoryIdentifiers, SubmissionPayload,
};
