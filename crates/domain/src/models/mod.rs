//! Domain models for the settings platform.

pub mod reseller_profile;
pub mod section_schema;
pub mod settings;

pub use reseller_profile::ResellerProfile;
pub use section_schema::{
    apply_defaults, validate_section, FieldError, SUPPORTED_CURRENCIES, SUPPORTED_LANGUAGES,
};
pub use settings::{
    OwnerKey, SectionValue, SettingsRecord, SettingsScope, SettingsSection, SettingsSnapshot,
    UnknownName,
};
