//! Custom Axum extractors.
//!
//! Extractors for authenticating callers and checking their capabilities.

pub mod capability;
pub mod user_auth;

pub use capability::{Capability, PlatformReader, PlatformStaff, RecordOwner};
pub use user_auth::UserAuth;
