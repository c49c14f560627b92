//! Platform settings endpoint handlers.
//!
//! The platform record is a singleton managed by staff. Each section is read
//! and replaced independently.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use domain::models::{SectionValue, SettingsScope, SettingsSnapshot};
use serde_json::Value;
use tracing::info;

use super::parse_section;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::PlatformStaff;
use crate::middleware::record_settings_update;

/// Every platform section plus the last update time.
///
/// GET /api/v1/admin/settings
pub async fn get_all_settings(
    State(state): State<AppState>,
    access: PlatformStaff,
) -> Result<Json<SettingsSnapshot>, ApiError> {
    let snapshot = state.settings.get_all(access.owner).await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/admin/settings/:section
pub async fn get_settings_section(
    State(state): State<AppState>,
    access: PlatformStaff,
    Path(section): Path<String>,
) -> Result<Json<SectionValue>, ApiError> {
    let section = parse_section(&section, SettingsScope::Platform)?;
    let value = state.settings.get_section(access.owner, section).await?;
    Ok(Json(value))
}

/// Replaces one section with the request body and echoes the stored value.
///
/// PUT /api/v1/admin/settings/:section
pub async fn update_settings_section(
    State(state): State<AppState>,
    access: PlatformStaff,
    Path(section): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SectionValue>, ApiError> {
    let section = parse_section(&section, SettingsScope::Platform)?;
    let Json(value) = payload?;

    let stored = state
        .settings
        .update_section(access.owner, section, value)
        .await?;

    info!(
        user_id = %access.auth.user_id,
        scope = %access.owner.scope,
        section = %section,
        "Platform settings updated"
    );
    record_settings_update(access.owner.scope, section);

    Ok(Json(stored))
}
