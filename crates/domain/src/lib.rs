//! Domain layer for the Evolve settings backend.
//!
//! This crate contains:
//! - Domain models (settings records, sections, reseller profiles)
//! - Section validation rules
//! - Storage contracts and the settings service

pub mod models;
pub mod services;
