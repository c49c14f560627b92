//! Repository for sectioned settings records.

use async_trait::async_trait;
use domain::models::{OwnerKey, SectionValue, SettingsRecord, SettingsSection};
use domain::services::{SettingsStore, StoreError};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::warn;

use crate::entities::SettingsRecordEntity;
use crate::metrics::QueryTimer;

/// Rounds of insert-then-read before record creation gives up.
pub const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Repository for settings record database operations.
#[derive(Clone)]
pub struct SettingsRecordRepository {
    pool: PgPool,
}

impl SettingsRecordRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds the record of an owner.
    /// Returns None if it has not been created yet.
    pub async fn find_by_owner(
        &self,
        owner: OwnerKey,
    ) -> Result<Option<SettingsRecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_settings_record");
        let result = sqlx::query_as::<_, SettingsRecordEntity>(
            r#"
            SELECT id, scope, owner_id, sections, created_at, updated_at
            FROM settings_records
            WHERE scope = $1 AND owner_id = $2
            "#,
        )
        .bind(owner.scope.as_str())
        .bind(owner.owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Inserts an empty record for an owner.
    /// Returns None if another writer created it first.
    pub async fn insert_empty(
        &self,
        owner: OwnerKey,
    ) -> Result<Option<SettingsRecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_settings_record");
        let result = sqlx::query_as::<_, SettingsRecordEntity>(
            r#"
            INSERT INTO settings_records (scope, owner_id)
            VALUES ($1, $2)
            ON CONFLICT (scope, owner_id) DO NOTHING
            RETURNING id, scope, owner_id, sections, created_at, updated_at
            "#,
        )
        .bind(owner.scope.as_str())
        .bind(owner.owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Writes one section, creating the record if absent.
    ///
    /// Only the named key of `sections` changes, so concurrent writes to
    /// different sections of a record do not overwrite each other.
    /// `updated_at` is taken under the row lock, so it increases in commit
    /// order.
    pub async fn upsert_section(
        &self,
        owner: OwnerKey,
        section: SettingsSection,
        value: &SectionValue,
    ) -> Result<SettingsRecordEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_settings_section");
        let result = sqlx::query_as::<_, SettingsRecordEntity>(
            r#"
            INSERT INTO settings_records (scope, owner_id, sections)
            VALUES ($1, $2, jsonb_build_object($3::text, $4::jsonb))
            ON CONFLICT (scope, owner_id) DO UPDATE SET
                sections = settings_records.sections || jsonb_build_object($3::text, $4::jsonb),
                updated_at = clock_timestamp()
            RETURNING id, scope, owner_id, sections, created_at, updated_at
            "#,
        )
        .bind(owner.scope.as_str())
        .bind(owner.owner_id)
        .bind(section.as_str())
        .bind(Json(value))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl SettingsStore for SettingsRecordRepository {
    async fn get_or_create(&self, owner: OwnerKey) -> Result<SettingsRecord, StoreError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            if let Some(entity) = self.find_by_owner(owner).await.map_err(store_error)? {
                return entity.try_into();
            }

            if let Some(entity) = self.insert_empty(owner).await.map_err(store_error)? {
                return entity.try_into();
            }

            warn!(owner = %owner, attempt, "Lost settings record creation race");
        }

        Err(StoreError::RaceExhausted {
            owner,
            attempts: MAX_CREATE_ATTEMPTS,
        })
    }

    async fn save_section(
        &self,
        owner: OwnerKey,
        section: SettingsSection,
        value: &SectionValue,
    ) -> Result<SettingsRecord, StoreError> {
        self.upsert_section(owner, section, value)
            .await
            .map_err(store_error)?
            .try_into()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}

/// Maps a driver error onto the storage error taxonomy.
pub(crate) fn store_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Corrupt(e.to_string())
        }
        other => StoreError::Unavailable(other.to_string()),
    }
}
