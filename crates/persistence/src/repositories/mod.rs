//! Repository implementations for database operations.

pub mod reseller_profile;
pub mod settings_record;

pub use reseller_profile::ResellerProfileRepository;
pub use settings_record::{SettingsRecordRepository, MAX_CREATE_ATTEMPTS};
