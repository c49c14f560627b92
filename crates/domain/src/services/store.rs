//! Storage contracts for settings records and owner lookup.
//!
//! The PostgreSQL implementations live in the persistence crate. The
//! in-memory implementations here back development setups and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{OwnerKey, ResellerProfile, SectionValue, SettingsRecord, SettingsSection};

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),

    #[error("could not create settings record for {owner} after {attempts} attempts")]
    RaceExhausted { owner: OwnerKey, attempts: u32 },

    #[error("stored settings are corrupt: {0}")]
    Corrupt(String),
}

/// Get-or-create persistence for settings records.
///
/// Implementations guarantee at most one record per owner key and write a
/// single section atomically.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the owner's record, creating an empty one if absent.
    async fn get_or_create(&self, owner: OwnerKey) -> Result<SettingsRecord, StoreError>;

    /// Stores `value` as the content of `section`, creating the record first
    /// if absent. Other sections are left untouched.
    async fn save_section(
        &self,
        owner: OwnerKey,
        section: SettingsSection,
        value: &SectionValue,
    ) -> Result<SettingsRecord, StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Resolves the reseller profile linked to a user account.
#[async_trait]
pub trait ResellerProfileDirectory: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<ResellerProfile>, StoreError>;
}

/// Settings store held in process memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    records: RwLock<HashMap<OwnerKey, SettingsRecord>>,
    unavailable: AtomicBool,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every call with [`StoreError::Unavailable`].
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_available(false);
        store
    }

    /// Toggles simulated outages.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("in-memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_or_create(&self, owner: OwnerKey) -> Result<SettingsRecord, StoreError> {
        self.check_available()?;

        if let Some(record) = self.records.read().await.get(&owner) {
            return Ok(record.clone());
        }

        let mut records = self.records.write().await;
        Ok(records
            .entry(owner)
            .or_insert_with(|| SettingsRecord::empty(owner))
            .clone())
    }

    async fn save_section(
        &self,
        owner: OwnerKey,
        section: SettingsSection,
        value: &SectionValue,
    ) -> Result<SettingsRecord, StoreError> {
        self.check_available()?;

        let mut records = self.records.write().await;
        let record = records
            .entry(owner)
            .or_insert_with(|| SettingsRecord::empty(owner));
        record.sections.insert(section, value.clone());
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

/// Reseller profiles held in process memory, keyed by user id.
#[derive(Debug, Default)]
pub struct InMemoryResellerProfiles {
    profiles: RwLock<HashMap<Uuid, ResellerProfile>>,
}

impl InMemoryResellerProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: ResellerProfile) {
        self.profiles.write().await.insert(profile.user_id, profile);
    }
}

#[async_trait]
impl ResellerProfileDirectory for InMemoryResellerProfiles {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<ResellerProfile>, StoreError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn value(v: serde_json::Value) -> SectionValue {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_record() {
        let store = InMemorySettingsStore::new();
        let first = store.get_or_create(OwnerKey::platform()).await.unwrap();
        let second = store.get_or_create(OwnerKey::platform()).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_creates_one_record() {
        let store = Arc::new(InMemorySettingsStore::new());
        let owner = OwnerKey::reseller(Uuid::new_v4());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.get_or_create(owner).await.unwrap().id })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_section_creates_record_and_touches_updated_at() {
        let store = InMemorySettingsStore::new();
        let owner = OwnerKey::platform();

        let record = store
            .save_section(owner, SettingsSection::Security, &value(json!({"two_factor_enabled": true})))
            .await
            .unwrap();

        assert_eq!(record.section(SettingsSection::Security)["two_factor_enabled"], true);
        assert!(record.updated_at >= record.created_at);
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemorySettingsStore::unavailable();
        let owner = OwnerKey::platform();

        assert!(matches!(
            store.get_or_create(owner).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());

        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_profile_lookup_by_user() {
        let profiles = InMemoryResellerProfiles::new();
        let user_id = Uuid::new_v4();
        profiles
            .insert(ResellerProfile {
                id: Uuid::new_v4(),
                user_id,
                partner_code: "EVO-0001".to_string(),
                is_active: true,
                is_verified: false,
                created_at: Utc::now(),
            })
            .await;

        assert!(profiles.find_by_user(user_id).await.unwrap().is_some());
        assert!(profiles.find_by_user(Uuid::new_v4()).await.unwrap().is_none());
    }
}
