//! Display values derived from the platform `general` section.

use serde::Serialize;

use crate::models::SectionValue;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_PLATFORM_NAME: &str = "Evolve Platform";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Platform-wide values every page or client needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformContext {
    pub default_currency: String,
    pub currency_symbol: String,
    pub default_language: String,
    pub platform_name: String,
    pub platform_url: String,
    pub support_email: String,
    pub timezone: String,
}

impl PlatformContext {
    /// Resolves a stored `general` section, filling missing keys with defaults.
    pub fn from_general(general: &SectionValue) -> Self {
        let text = |key: &str, default: &str| -> String {
            general
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or(default)
                .to_string()
        };

        let default_currency = text("default_currency", DEFAULT_CURRENCY);
        let currency_symbol = currency_symbol(&default_currency).to_string();

        Self {
            currency_symbol,
            default_currency,
            default_language: text("default_language", DEFAULT_LANGUAGE),
            platform_name: text("platform_name", DEFAULT_PLATFORM_NAME),
            platform_url: text("platform_url", ""),
            support_email: text("support_email", ""),
            timezone: text("timezone", DEFAULT_TIMEZONE),
        }
    }
}

/// Display symbol for a currency code; unknown codes fall back to `$`.
pub fn currency_symbol(code: &str) -> &'static str {
    match code {
        "EUR" => "€",
        "GBP" => "£",
        "KES" => "KSh",
        _ => "$",
    }
}
