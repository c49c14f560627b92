//! Reseller settings endpoint handlers.
//!
//! Requests and responses wrap the section in an envelope keyed by the
//! section name, e.g. `{"preferences": {...}}`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use domain::models::{SectionValue, SettingsScope, SettingsSection};
use serde_json::{Map, Value};
use tracing::info;

use super::parse_section;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::RecordOwner;
use crate::middleware::record_settings_update;

/// GET /api/v1/reseller/settings/:section
pub async fn get_reseller_section(
    State(state): State<AppState>,
    access: RecordOwner,
    Path(section): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let section = parse_section(&section, SettingsScope::Reseller)?;
    let value = state.settings.get_section(access.owner, section).await?;
    Ok(Json(envelope(section, value)))
}

/// PUT /api/v1/reseller/settings/:section
///
/// A body without the section key stores an empty object.
pub async fn update_reseller_section(
    State(state): State<AppState>,
    access: RecordOwner,
    Path(section): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let section = parse_section(&section, SettingsScope::Reseller)?;
    let Json(body) = payload?;

    let value = match body {
        Value::Object(mut fields) => fields
            .remove(section.as_str())
            .unwrap_or_else(|| Value::Object(Map::new())),
        _ => {
            return Err(ApiError::validation(format!(
                "Expected a JSON object with a '{}' key",
                section
            )))
        }
    };

    let stored = state
        .settings
        .update_section(access.owner, section, value)
        .await?;

    info!(
        user_id = %access.auth.user_id,
        profile_id = %access.owner.owner_id,
        section = %section,
        "Reseller settings updated"
    );
    record_settings_update(access.owner.scope, section);

    Ok(Json(envelope(section, stored)))
}

fn envelope(section: SettingsSection, value: SectionValue) -> Value {
    let mut body = Map::new();
    body.insert(section.as_str().to_string(), Value::Object(value));
    Value::Object(body)
}
