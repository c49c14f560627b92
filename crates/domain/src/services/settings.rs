//! Section-scoped read and update operations over a [`SettingsStore`].
//!
//! Callers never see record creation: the first read or write of an owner
//! key creates its record implicitly.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::cache::SettingsCache;
use super::store::{SettingsStore, StoreError};
use crate::models::{
    apply_defaults, validate_section, FieldError, OwnerKey, SectionValue, SettingsRecord,
    SettingsScope, SettingsSection, SettingsSnapshot,
};

/// How an update combines with the value already stored in a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// The incoming value becomes the whole section.
    #[default]
    Replace,
    /// Incoming top-level keys overwrite stored ones; other stored keys stay.
    ShallowMerge,
}

impl UpdatePolicy {
    /// Combines `current` with `incoming`.
    pub fn apply(&self, current: SectionValue, incoming: SectionValue) -> SectionValue {
        match self {
            UpdatePolicy::Replace => incoming,
            UpdatePolicy::ShallowMerge => {
                let mut merged = current;
                merged.extend(incoming);
                merged
            }
        }
    }
}

/// Tunables for [`SettingsService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub update_policy: UpdatePolicy,
    /// Reject keys a section does not declare.
    pub strict_validation: bool,
    /// Lifetime of cached records; `None` disables caching.
    pub cache_ttl: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            update_policy: UpdatePolicy::Replace,
            strict_validation: false,
            cache_ttl: Some(Duration::from_secs(60)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("section '{section}' is not part of {scope} settings")]
    SectionNotInScope {
        section: SettingsSection,
        scope: SettingsScope,
    },

    #[error("invalid {section} settings")]
    Validation {
        section: SettingsSection,
        errors: Vec<FieldError>,
    },

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    config: ServiceConfig,
    cache: Option<SettingsCache>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>, config: ServiceConfig) -> Self {
        let cache = config.cache_ttl.map(SettingsCache::new);
        Self {
            store,
            config,
            cache,
        }
    }

    /// Current value of `section`, or an empty map if never set.
    pub async fn get_section(
        &self,
        owner: OwnerKey,
        section: SettingsSection,
    ) -> Result<SectionValue, SettingsError> {
        ensure_in_scope(owner, section)?;
        let record = self.load(owner).await?;
        Ok(record.section(section))
    }

    /// Every section of the owner's scope plus the last update time.
    pub async fn get_all(&self, owner: OwnerKey) -> Result<SettingsSnapshot, SettingsError> {
        let record = self.load(owner).await?;
        Ok(record.snapshot())
    }

    /// Validates `value`, stores it according to the update policy and
    /// returns the stored section.
    ///
    /// On any error the previously stored value is left intact.
    pub async fn update_section(
        &self,
        owner: OwnerKey,
        section: SettingsSection,
        value: Value,
    ) -> Result<SectionValue, SettingsError> {
        ensure_in_scope(owner, section)?;

        let incoming = match value {
            Value::Object(map) => map,
            other => {
                return Err(SettingsError::Validation {
                    section,
                    errors: vec![FieldError::new(
                        "non_field_errors",
                        format!("Expected a JSON object but got {}", json_kind(&other)),
                    )],
                });
            }
        };

        if let Err(errors) = validate_section(section, &incoming, self.config.strict_validation) {
            warn!(
                owner = %owner,
                section = %section,
                fields = errors.len(),
                "Rejected settings update"
            );
            return Err(SettingsError::Validation { section, errors });
        }

        let mut next = match self.config.update_policy {
            UpdatePolicy::Replace => incoming,
            policy @ UpdatePolicy::ShallowMerge => {
                let current = self.store.get_or_create(owner).await?.section(section);
                policy.apply(current, incoming)
            }
        };
        apply_defaults(section, &mut next);

        match self.store.save_section(owner, section, &next).await {
            Ok(record) => {
                let stored = record.section(section);
                if let Some(cache) = &self.cache {
                    cache.put(record).await;
                }
                Ok(stored)
            }
            Err(e) => {
                if let Some(cache) = &self.cache {
                    cache.invalidate(&owner).await;
                }
                Err(e.into())
            }
        }
    }

    /// Checks that the backing store is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    async fn load(&self, owner: OwnerKey) -> Result<SettingsRecord, StoreError> {
        if let Some(cache) = &self.cache {
            if let Some(record) = cache.get(&owner).await {
                debug!(owner = %owner, "Settings served from cache");
                return Ok(record);
            }
        }

        let record = self.store.get_or_create(owner).await?;
        if let Some(cache) = &self.cache {
            cache.put(record.clone()).await;
        }
        Ok(record)
    }
}

fn ensure_in_scope(owner: OwnerKey, section: SettingsSection) -> Result<(), SettingsError> {
    if owner.allows(section) {
        Ok(())
    } else {
        Err(SettingsError::SectionNotInScope {
            section,
            scope: owner.scope,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
