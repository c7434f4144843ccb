//! Typed errors for the submission library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Errors never cross the
//! story-submission boundary: the orchestrator converts every failure
//! into a `RequestOutcome` for its caller.

use thiserror::Error;

/// Errors that can occur while submitting a story request.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Page fetch or request transport failed
    #[error("fetch failed: {0}")]
    Transport(#[from] TransportError),

    /// Settings read or write failed
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Service response was not valid JSON after the preamble
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Service response body shorter than the fixed garbage preamble
    #[error("response body shorter than the service preamble")]
    Truncated,

    /// Publication page had no collection id
    #[error("publication not found at {url}")]
    PublicationNotFound { url: String },

    /// Spreadsheet URL did not contain a document id
    #[error("invalid spreadsheet URL: {url}")]
    InvalidSheetUrl { url: String },

    /// Spreadsheet cell feed could not be fetched
    #[error("spreadsheet feed rejected ({0}); check the link and that you are signed in")]
    SheetFeed(#[source] TransportError),

    /// A quick request was dispatched without an active story
    #[error("no active story to request")]
    NoActiveStory,
}

/// Errors raised by the HTTP layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be sent or the body could not be read
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Page fetch returned a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

/// Errors raised by the settings store and its typed facade.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying storage failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A required key is absent (store not seeded)
    #[error("settings key missing: {key}")]
    MissingKey { key: String },

    /// A stored value could not be interpreted
    #[error("malformed value for {key}: {value:?}")]
    Malformed { key: String, value: String },

    /// Template id outside the fixed range
    #[error("no template with id {id}")]
    UnknownTemplate { id: u8 },
}

/// Result type alias for submission operations.
pub type SubmitResult<T> = std::result::Result<T, SubmitError>;

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Result type alias for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
