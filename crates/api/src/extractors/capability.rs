//! Capability checks for settings endpoints.
//!
//! Each extractor authenticates the caller, checks one [`Capability`] and
//! resolves the settings owner key the handler acts on. Checks run before any
//! settings are read or written.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::OwnerKey;
use tracing::warn;

use super::user_auth::UserAuth;
use crate::app::AppState;
use crate::error::ApiError;

/// What a caller must be to reach an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any valid access token; read-only view of the platform record.
    Authenticated,
    /// Staff or superuser; manages the platform record.
    Staff,
    /// A user with a reseller profile; manages that profile's record.
    OwnerOfRecord,
}

impl Capability {
    /// Checks the capability and returns the owner key the caller may use.
    pub async fn grant(self, state: &AppState, auth: &UserAuth) -> Result<OwnerKey, ApiError> {
        match self {
            Capability::Authenticated => Ok(OwnerKey::platform()),
            Capability::Staff => {
                if auth.privileges.is_elevated() {
                    Ok(OwnerKey::platform())
                } else {
                    warn!(user_id = %auth.user_id, "Non-staff user denied platform settings");
                    Err(ApiError::Forbidden(
                        "Staff privileges are required to manage platform settings".to_string(),
                    ))
                }
            }
            Capability::OwnerOfRecord => {
                let profile = state
                    .profiles
                    .find_by_user(auth.user_id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;
                Ok(OwnerKey::reseller(profile.id))
            }
        }
    }
}

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    capability: Capability,
) -> Result<(UserAuth, OwnerKey), ApiError> {
    let auth = UserAuth::from_request_parts(parts, state).await?;
    let owner = capability.grant(state, &auth).await?;
    Ok((auth, owner))
}

/// Caller holding [`Capability::Authenticated`].
#[derive(Debug, Clone)]
pub struct PlatformReader {
    pub auth: UserAuth,
    pub owner: OwnerKey,
}

/// Caller holding [`Capability::Staff`].
#[derive(Debug, Clone)]
pub struct PlatformStaff {
    pub auth: UserAuth,
    pub owner: OwnerKey,
}

/// Caller holding [`Capability::OwnerOfRecord`].
#[derive(Debug, Clone)]
pub struct RecordOwner {
    pub auth: UserAuth,
    pub owner: OwnerKey,
}

#[async_trait]
impl FromRequestParts<AppState> for PlatformReader {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let (auth, owner) = authorize(parts, state, Capability::Authenticated).await?;
        Ok(Self { auth, owner })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for PlatformStaff {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let (auth, owner) = authorize(parts, state, Capability::Staff).await?;
        Ok(Self { auth, owner })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RecordOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let (auth, owner) = authorize(parts, state, Capability::OwnerOfRecord).await?;
        Ok(Self { auth, owner })
    }
}
