//! Platform context endpoint handler.

use axum::{extract::State, Json};
use domain::models::SettingsSection;
use domain::services::PlatformContext;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::PlatformReader;

/// Resolved display values (currency, language, branding) for clients.
///
/// GET /api/v1/platform/context
pub async fn get_platform_context(
    State(state): State<AppState>,
    access: PlatformReader,
) -> Result<Json<PlatformContext>, ApiError> {
    let general = state
        .settings
        .get_section(access.owner, SettingsSection::General)
        .await?;
    Ok(Json(PlatformContext::from_general(&general)))
}
