//! Domain services for sectioned settings.
//!
//! Services contain business logic that operates on domain models.

pub mod cache;
pub mod platform_context;
pub mod settings;
pub mod store;

pub use cache::SettingsCache;
pub use platform_context::{currency_symbol, PlatformContext};
pub use settings::{ServiceConfig, SettingsError, SettingsService, UpdatePolicy};
pub use store::{
    InMemoryResellerProfiles, InMemorySettingsStore, ResellerProfileDirectory, SettingsStore,
    StoreError,
};
