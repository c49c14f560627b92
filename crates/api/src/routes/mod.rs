//! HTTP route handlers.

pub mod health;
pub mod platform_context;
pub mod platform_settings;
pub mod reseller_settings;

use domain::models::{SettingsScope, SettingsSection};

use crate::error::ApiError;

/// Parses a section path segment, rejecting names outside `scope`.
pub(crate) fn parse_section(name: &str, scope: SettingsScope) -> Result<SettingsSection, ApiError> {
    name.parse::<SettingsSection>()
        .ok()
        .filter(|section| section.scope() == scope)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown settings section '{}'", name)))
}
