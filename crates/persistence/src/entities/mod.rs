//! Database entity definitions.
//!
//! Entities map directly to database rows.

pub mod reseller_profile;
pub mod settings_record;

pub use reseller_profile::ResellerProfileEntity;
pub use settings_record::SettingsRecordEntity;
