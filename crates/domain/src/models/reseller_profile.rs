//! Reseller profile domain model.
//!
//! Only the fields the settings endpoints need to resolve the caller's
//! owner key are modelled here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A reseller profile linked to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResellerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Public partner code used in referral links.
    pub partner_code: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
