//! Flat key-value settings: publication identity, email templates, and
//! the default template selection.
//!
//! The store itself is pure storage with no logic. The typed
//! [`Settings`] facade layers the domain operations (seeding, template
//! edits, the cached default body) over the raw keys.

pub mod file;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{SettingsError, SettingsResult};
use crate::remote::SERVICE_ROOT;
use crate::types::{DefaultTemplateSelection, EmailTemplate, PublicationIdentity};

/// Fixed number of email templates.
pub const TEMPLATE_COUNT: u8 = 3;

/// Template used when the stored selection is unusable.
pub const DEFAULT_TEMPLATE_ID: u8 = 1;

/// Sentinel id meaning "no publication resolved yet".
pub const UNSET_PUBLICATION_ID: &str = "0";

/// Body every template starts with.
pub const DEFAULT_TEMPLATE_CONTENT: &str =
    "Hi. I came across your Medium story and would love to add it to my publication";

pub const KEY_DEFAULT_TEMPLATE_ID: &str = "default_template_id";
pub const KEY_DEFAULT_TEMPLATE_CONTENT: &str = "default_template_content";
pub const KEY_PUB_ID: &str = "pub_id";
pub const KEY_PUB_URL: &str = "pub_url";

/// Storage key for a template body.
pub fn template_key(id: u8) -> String {
    format!("template_{id}")
}

/// Storage key for a template name.
pub fn template_name_key(id: u8) -> String {
    format!("template_name_{id}")
}

/// Asynchronous flat key-value storage.
///
/// Implementations must provide read-your-writes within a session;
/// nothing here depends on cross-device propagation timing.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Values for the requested keys. Absent keys are simply missing
    /// from the returned map.
    async fn get(&self, keys: &[&str]) -> SettingsResult<HashMap<String, String>>;

    /// Store every entry of `values`.
    async fn set(&self, values: HashMap<String, String>) -> SettingsResult<()>;
}

fn single(key: &str, value: impl Into<String>) -> HashMap<String, String> {
    HashMap::from([(key.to_string(), value.into())])
}

/// Typed facade over a [`SettingsStore`].
pub struct Settings<S> {
    store: S,
}

impl<S: SettingsStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Seed first-run defaults without overwriting anything the user
    /// has set. A key holding an empty string counts as unset.
    pub async fn seed_defaults(&self) -> SettingsResult<()> {
        let mut defaults: Vec<(String, String)> = Vec::new();
        for id in 1..=TEMPLATE_COUNT {
            defaults.push((template_name_key(id), format!("Template {id}")));
            defaults.push((template_key(id), DEFAULT_TEMPLATE_CONTENT.to_string()));
        }
        defaults.push((
            KEY_DEFAULT_TEMPLATE_ID.to_string(),
            DEFAULT_TEMPLATE_ID.to_string(),
        ));
        defaults.push((
            KEY_DEFAULT_TEMPLATE_CONTENT.to_string(),
            DEFAULT_TEMPLATE_CONTENT.to_string(),
        ));
        defaults.push((KEY_PUB_ID.to_string(), UNSET_PUBLICATION_ID.to_string()));
        defaults.push((KEY_PUB_URL.to_string(), SERVICE_ROOT.to_string()));

        let keys: Vec<&str> = defaults.iter().map(|(key, _)| key.as_str()).collect();
        let existing = self.store.get(&keys).await?;

        let missing: HashMap<String, String> = defaults
            .into_iter()
            .filter(|(key, _)| !existing.get(key).is_some_and(|value| !value.is_empty()))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        self.store.set(missing).await
    }

    /// All templates, in id order.
    pub async fn templates(&self) -> SettingsResult<Vec<EmailTemplate>> {
        let name_keys: Vec<String> = (1..=TEMPLATE_COUNT).map(template_name_key).collect();
        let body_keys: Vec<String> = (1..=TEMPLATE_COUNT).map(template_key).collect();
        let keys: Vec<&str> = name_keys
            .iter()
            .chain(body_keys.iter())
            .map(String::as_str)
            .collect();
        let values = self.store.get(&keys).await?;

        (1..=TEMPLATE_COUNT)
            .map(|id| {
                Ok(EmailTemplate {
                    id,
                    name: require(&values, &template_name_key(id))?.to_string(),
                    body: require(&values, &template_key(id))?.to_string(),
                })
            })
            .collect()
    }

    /// Template names in id order (the `get-templates` contract).
    pub async fn template_names(&self) -> SettingsResult<Vec<String>> {
        Ok(self
            .templates()
            .await?
            .into_iter()
            .map(|template| template.name)
            .collect())
    }

    /// Body of one template.
    pub async fn template_body(&self, id: u8) -> SettingsResult<String> {
        check_template_id(id)?;
        let key = template_key(id);
        let values = self.store.get(&[key.as_str()]).await?;
        Ok(require(&values, &key)?.to_string())
    }

    /// Rename a template.
    pub async fn update_template_name(&self, id: u8, name: &str) -> SettingsResult<()> {
        check_template_id(id)?;
        self.store.set(single(&template_name_key(id), name)).await
    }

    /// Replace a template's body. When the template is the current
    /// default, the denormalized default body is refreshed with it.
    pub async fn update_template_body(&self, id: u8, body: &str) -> SettingsResult<()> {
        check_template_id(id)?;
        self.store.set(single(&template_key(id), body)).await?;

        let values = self.store.get(&[KEY_DEFAULT_TEMPLATE_ID]).await?;
        let is_default = values
            .get(KEY_DEFAULT_TEMPLATE_ID)
            .and_then(|value| value.parse::<u8>().ok())
            == Some(id);
        if is_default {
            self.store
                .set(single(KEY_DEFAULT_TEMPLATE_CONTENT, body))
                .await?;
        }
        Ok(())
    }

    /// Make a template the default, copying its body into the
    /// denormalized default slot.
    pub async fn set_default_template(&self, id: u8) -> SettingsResult<()> {
        let body = self.template_body(id).await?;
        self.store
            .set(HashMap::from([
                (KEY_DEFAULT_TEMPLATE_ID.to_string(), id.to_string()),
                (KEY_DEFAULT_TEMPLATE_CONTENT.to_string(), body),
            ]))
            .await
    }

    /// Current default selection, strictly typed.
    pub async fn default_selection(&self) -> SettingsResult<DefaultTemplateSelection> {
        let values = self
            .store
            .get(&[KEY_DEFAULT_TEMPLATE_ID, KEY_DEFAULT_TEMPLATE_CONTENT])
            .await?;
        let raw_id = require(&values, KEY_DEFAULT_TEMPLATE_ID)?;
        let template_id = raw_id.parse().map_err(|_| SettingsError::Malformed {
            key: KEY_DEFAULT_TEMPLATE_ID.to_string(),
            value: raw_id.to_string(),
        })?;
        Ok(DefaultTemplateSelection {
            template_id,
            cached_body: require(&values, KEY_DEFAULT_TEMPLATE_CONTENT)?.to_string(),
        })
    }

    /// Default template id for batch paths: a missing or malformed
    /// stored id falls back to template 1 rather than failing the
    /// whole batch.
    pub async fn default_template_id_lenient(&self) -> SettingsResult<u8> {
        let values = self.store.get(&[KEY_DEFAULT_TEMPLATE_ID]).await?;
        match values
            .get(KEY_DEFAULT_TEMPLATE_ID)
            .and_then(|value| value.parse::<u8>().ok())
            .filter(|id| (1..=TEMPLATE_COUNT).contains(id))
        {
            Some(id) => Ok(id),
            None => {
                warn!(
                    fallback = DEFAULT_TEMPLATE_ID,
                    "stored default template id missing or malformed"
                );
                Ok(DEFAULT_TEMPLATE_ID)
            }
        }
    }

    /// Stored publication identity.
    pub async fn publication(&self) -> SettingsResult<PublicationIdentity> {
        let values = self.store.get(&[KEY_PUB_ID, KEY_PUB_URL]).await?;
        Ok(PublicationIdentity {
            id: require(&values, KEY_PUB_ID)?.to_string(),
            url: require(&values, KEY_PUB_URL)?.to_string(),
        })
    }

    /// Replace the stored publication identity. Callers only invoke
    /// this after a successful resolution.
    pub async fn set_publication(&self, identity: &PublicationIdentity) -> SettingsResult<()> {
        self.store
            .set(HashMap::from([
                (KEY_PUB_ID.to_string(), identity.id.clone()),
                (KEY_PUB_URL.to_string(), identity.url.clone()),
            ]))
            .await
    }
}

fn require<'v>(values: &'v HashMap<String, String>, key: &str) -> SettingsResult<&'v str> {
    values
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| SettingsError::MissingKey {
            key: key.to_string(),
        })
}

fn check_template_id(id: u8) -> SettingsResult<()> {
    if (1..=TEMPLATE_COUNT).contains(&id) {
        Ok(())
    } else {
        Err(SettingsError::UnknownTemplate { id })
    }
}
