//! HTTP adapter for the Evolve sectioned settings service.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
