//! Reseller profile entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the reseller_profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ResellerProfileEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub partner_code: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ResellerProfileEntity> for domain::models::ResellerProfile {
    fn from(entity: ResellerProfileEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            partner_code: entity.partner_code,
            is_active: entity.is_active,
            is_verified: entity.is_verified,
            created_at: entity.created_at,
        }
    }
}
