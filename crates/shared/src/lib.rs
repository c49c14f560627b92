//! Shared utilities for the Evolve settings backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT access token validation
//! - Reusable field validators

pub mod jwt;
pub mod validation;
