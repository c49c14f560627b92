//! Repository for reseller profile lookups.

use async_trait::async_trait;
use domain::models::ResellerProfile;
use domain::services::{ResellerProfileDirectory, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::settings_record::store_error;
use crate::entities::ResellerProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for reseller profile database operations.
#[derive(Clone)]
pub struct ResellerProfileRepository {
    pool: PgPool,
}

impl ResellerProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds the profile linked to a user account.
    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ResellerProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reseller_profile_by_user");
        let result = sqlx::query_as::<_, ResellerProfileEntity>(
            r#"
            SELECT id, user_id, partner_code, is_active, is_verified, created_at
            FROM reseller_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl ResellerProfileDirectory for ResellerProfileRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<ResellerProfile>, StoreError> {
        Ok(self
            .find_by_user_id(user_id)
            .await
            .map_err(store_error)?
            .map(ResellerProfile::from))
    }
}
