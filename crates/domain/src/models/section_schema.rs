//! Shape and value rules for each settings section.
//!
//! Platform sections declare their recognised keys with a JSON type and
//! value constraints. Unrecognised keys pass through untouched unless the
//! caller asks for strict checking. The reseller `preferences` section is an
//! opaque object.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use super::settings::{SectionValue, SettingsSection};

/// Currencies the platform can price in.
pub const SUPPORTED_CURRENCIES: &[&str] = &["USD", "EUR", "KES", "GBP"];

/// Interface languages the platform ships.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "sw"];

/// Lower bound for the configurable password length.
pub const MIN_PASSWORD_LENGTH: i64 = 6;

/// Password length stored when a `security` update leaves it unset.
pub const DEFAULT_PASSWORD_MIN_LENGTH: i64 = 8;

lazy_static! {
    static ref CURRENCY_CODE_REGEX: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();
}

/// JSON type a recognised key must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    Integer,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Integer => value.as_i64().is_some(),
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "Not a valid string.",
            FieldKind::Bool => "Must be a valid boolean.",
            FieldKind::Integer => "A valid integer is required.",
        }
    }
}

/// A recognised key of a section.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// A section with a declared set of keys.
pub trait SectionSchema: DeserializeOwned + Validate {
    const FIELDS: &'static [FieldSpec];
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `general` section.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeneralSettings {
    #[validate(length(max = 255, message = "Platform name must be at most 255 characters"))]
    pub platform_name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_url_or_blank"))]
    pub platform_url: Option<String>,
    #[validate(custom(function = "shared::validation::validate_email_or_blank"))]
    pub support_email: Option<String>,
    #[validate(length(max = 64, message = "Timezone must be at most 64 characters"))]
    pub timezone: Option<String>,
    #[validate(custom(function = "validate_currency_code"))]
    pub default_currency: Option<String>,
    #[validate(custom(function = "validate_language_code"))]
    pub default_language: Option<String>,
}

impl SectionSchema for GeneralSettings {
    const FIELDS: &'static [FieldSpec] = &[
        field("platform_name", FieldKind::String),
        field("platform_url", FieldKind::String),
        field("support_email", FieldKind::String),
        field("timezone", FieldKind::String),
        field("default_currency", FieldKind::String),
        field("default_language", FieldKind::String),
    ];
}

/// `security` section.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SecuritySettings {
    pub two_factor_enabled: Option<bool>,
    #[validate(range(
        min = 6,
        message = "Ensure this value is greater than or equal to 6."
    ))]
    pub password_min_length: Option<i64>,
}

impl SectionSchema for SecuritySettings {
    const FIELDS: &'static [FieldSpec] = &[
        field("two_factor_enabled", FieldKind::Bool),
        field("password_min_length", FieldKind::Integer),
    ];
}

/// `notifications` section.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotificationsSettings {
    #[validate(length(max = 255, message = "Sender name must be at most 255 characters"))]
    pub email_sender_name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_email_or_blank"))]
    pub email_sender_address: Option<String>,
    pub enable_system_emails: Option<bool>,
}

impl SectionSchema for NotificationsSettings {
    const FIELDS: &'static [FieldSpec] = &[
        field("email_sender_name", FieldKind::String),
        field("email_sender_address", FieldKind::String),
        field("enable_system_emails", FieldKind::Bool),
    ];
}

/// `integrations` section.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IntegrationsSettings {
    #[validate(custom(function = "shared::validation::validate_url_or_blank"))]
    pub webhook_url: Option<String>,
    #[validate(custom(function = "shared::validation::validate_url_or_blank"))]
    pub slack_webhook_url: Option<String>,
    pub api_enabled: Option<bool>,
}

impl SectionSchema for IntegrationsSettings {
    const FIELDS: &'static [FieldSpec] = &[
        field("webhook_url", FieldKind::String),
        field("slack_webhook_url", FieldKind::String),
        field("api_enabled", FieldKind::Bool),
    ];
}

/// Fills declared defaults for keys missing from a section value.
pub fn apply_defaults(section: SettingsSection, value: &mut SectionValue) {
    if section == SettingsSection::Security {
        value
            .entry("password_min_length")
            .or_insert_with(|| Value::from(DEFAULT_PASSWORD_MIN_LENGTH));
    }
}

/// Validates a three-letter currency code from the supported set.
pub fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if !CURRENCY_CODE_REGEX.is_match(code) {
        let mut err = ValidationError::new("currency_format");
        err.message = Some("Currency must be a 3-letter ISO 4217 code".into());
        return Err(err);
    }
    shared::validation::validate_choice(code, SUPPORTED_CURRENCIES)
}

/// Validates an interface language code from the supported set.
pub fn validate_language_code(code: &str) -> Result<(), ValidationError> {
    shared::validation::validate_choice(code, SUPPORTED_LANGUAGES)
}

/// Checks `payload` against the rules of `section`.
///
/// With `strict` set, keys a section does not declare are rejected; otherwise
/// they are accepted and stored as-is.
pub fn validate_section(
    section: SettingsSection,
    payload: &SectionValue,
    strict: bool,
) -> Result<(), Vec<FieldError>> {
    match section {
        SettingsSection::General => check::<GeneralSettings>(payload, strict),
        SettingsSection::Security => check::<SecuritySettings>(payload, strict),
        SettingsSection::Notifications => check::<NotificationsSettings>(payload, strict),
        SettingsSection::Integrations => check::<IntegrationsSettings>(payload, strict),
        SettingsSection::Preferences => Ok(()),
    }
}

fn check<T: SectionSchema>(payload: &SectionValue, strict: bool) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for (key, value) in payload {
        match T::FIELDS.iter().find(|f| f.name == key) {
            Some(_) if value.is_null() => {
                errors.push(FieldError::new(key, "This field may not be null."));
            }
            Some(field) if !field.kind.matches(value) => {
                errors.push(FieldError::new(key, field.kind.expected()));
            }
            Some(_) => {}
            None if strict => {
                errors.push(FieldError::new(key, "Unknown field."));
            }
            None => {}
        }
    }

    if !errors.is_empty() {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(errors);
    }

    let typed: T = serde_json::from_value(Value::Object(payload.clone()))
        .map_err(|e| vec![FieldError::new("non_field_errors", e.to_string())])?;

    typed.validate().map_err(field_errors)
}

fn field_errors(errors: ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}
