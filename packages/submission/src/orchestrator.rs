//! Request orchestration: resolve parameters, submit, report outcomes.
//!
//! One story moves through `ResolvingParameters → Submitting →
//! Completed(outcome)`; nothing is persisted between steps, and a
//! process exit before completion simply loses the submission. Every
//! failure is caught at the single-story boundary and reported as a
//! [`RequestOutcome`]; a story's error never aborts its batch
//! siblings, and nothing here retries.

use futures::stream::{FuturesUnordered, Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{SubmitError, SubmitResult};
use crate::remote::{parse_service_response, RemoteService};
use crate::scrape::{FenceExtractor, PageExtractor};
use crate::settings::{Settings, SettingsStore};
use crate::sheet;
use crate::template;
use crate::types::{PublicationIdentity, RequestOutcome, SubmissionPayload};

/// Drives story submissions against a settings store and the remote
/// service. Generic over both plus the page-extraction strategy, so
/// tests can swap any seam.
pub struct Orchestrator<S, R, E = FenceExtractor> {
    settings: Settings<S>,
    remote: R,
    extractor: E,
}

impl<S: SettingsStore, R: RemoteService> Orchestrator<S, R> {
    pub fn new(store: S, remote: R) -> Self {
        Self {
            settings: Settings::new(store),
            remote,
            extractor: FenceExtractor,
        }
    }
}

impl<S: SettingsStore, R: RemoteService, E: PageExtractor> Orchestrator<S, R, E> {
    /// Swap the page-extraction strategy.
    pub fn with_extractor<E2: PageExtractor>(self, extractor: E2) -> Orchestrator<S, R, E2> {
        Orchestrator {
            settings: self.settings,
            remote: self.remote,
            extractor,
        }
    }

    /// Typed settings facade shared with the host.
    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    /// The remote service seam.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Submit one story to the publication.
    ///
    /// Never returns an error: every failure becomes a failure outcome
    /// for this story alone.
    pub async fn submit_one(&self, story_url: &str, template_id: u8) -> RequestOutcome {
        match self.submit_inner(story_url, template_id).await {
            Ok(response) => {
                let outcome = RequestOutcome::from_response(story_url, response);
                if outcome.success {
                    info!(url = %story_url, "story requested");
                } else {
                    warn!(
                        url = %story_url,
                        error = outcome.error_message.as_deref().unwrap_or("unknown"),
                        "service rejected the request"
                    );
                }
                outcome
            }
            Err(error) => {
                warn!(url = %story_url, error = %error, "story submission failed");
                RequestOutcome::failure(story_url, &error)
            }
        }
    }

    async fn submit_inner(&self, story_url: &str, template_id: u8) -> SubmitResult<Value> {
        let publication = self.settings.publication().await?;

        let markup = self.remote.fetch_page(story_url).await?;
        let ids = self.extractor.story_identifiers(&markup);
        if ids.story_id.is_empty() {
            // Not fatal: the remote rejects the request itself and its
            // error lands in the outcome.
            debug!(url = %story_url, "no story id in page markup");
        }

        let body = self.settings.template_body(template_id).await?;
        let comment = template::render(&body, &template::variables_for(&ids.author_name));

        let payload = SubmissionPayload::new(publication.id, ids.story_id, comment);
        let raw = self.remote.submit_request(&ids.author_id, &payload).await?;
        parse_service_response(&raw)
    }

    /// Submit every story concurrently, yielding outcomes in
    /// completion order.
    ///
    /// Exactly one outcome is produced per input URL; callers that
    /// need full-batch semantics collect until the counts match.
    pub fn submit_batch<I>(
        &self,
        story_urls: I,
        template_id: u8,
    ) -> impl Stream<Item = RequestOutcome> + Unpin + '_
    where
        I: IntoIterator<Item = String>,
    {
        story_urls
            .into_iter()
            .map(move |url| async move { self.submit_one(&url, template_id).await })
            .collect::<FuturesUnordered<_>>()
    }

    /// Submit a batch and collect every outcome (completion order).
    pub async fn submit_batch_collect(
        &self,
        story_urls: Vec<String>,
        template_id: u8,
    ) -> Vec<RequestOutcome> {
        let requested = story_urls.len();
        let outcomes: Vec<RequestOutcome> =
            self.submit_batch(story_urls, template_id).collect().await;
        info!(
            requested,
            failed = outcomes.iter().filter(|outcome| !outcome.success).count(),
            "batch complete"
        );
        outcomes
    }

    /// Submit every story linked from a spreadsheet, using the default
    /// template.
    ///
    /// A feed that cannot be resolved is one error for the whole
    /// sheet; individual story failures still arrive as outcomes.
    pub async fn submit_spreadsheet<'a>(
        &'a self,
        sheet_url: &str,
    ) -> SubmitResult<impl Stream<Item = RequestOutcome> + Unpin + 'a> {
        let id = sheet::spreadsheet_id(sheet_url)?;
        let feed_url = sheet::cell_feed_url(&id);
        debug!(sheet = %sheet_url, feed = %feed_url, "fetching spreadsheet cell feed");

        let feed = self
            .remote
            .fetch_page(&feed_url)
            .await
            .map_err(SubmitError::SheetFeed)?;
        let story_urls = sheet::extract_urls(&feed);
        info!(sheet = %sheet_url, stories = story_urls.len(), "spreadsheet resolved");

        let template_id = self.settings.default_template_id_lenient().await?;
        Ok(self.submit_batch(story_urls, template_id))
    }

    /// Resolve a publication URL to its collection id and store it.
    ///
    /// A page without the id fence fails with `PublicationNotFound`
    /// and leaves any previously stored identity untouched.
    pub async fn resolve_publication(
        &self,
        publication_url: &str,
    ) -> SubmitResult<PublicationIdentity> {
        let markup = self.remote.fetch_page(publication_url).await?;
        let id = self
            .extractor
            .publication_id(&markup)
            .ok_or_else(|| SubmitError::PublicationNotFound {
                url: publication_url.to_string(),
            })?;

        let identity = PublicationIdentity {
            id,
            url: publication_url.to_string(),
        };
        self.settings.set_publication(&identity).await?;
        info!(url = %publication_url, id = %identity.id, "default publication updated");
        Ok(identity)
    }
}
