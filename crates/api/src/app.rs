use axum::{middleware, routing::get, Router};
use domain::services::{ResellerProfileDirectory, SettingsService, SettingsStore};
use persistence::repositories::{ResellerProfileRepository, SettingsRecordRepository};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware, trace_id,
};
use crate::routes::{health, platform_context, platform_settings, reseller_settings};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub settings: Arc<SettingsService>,
    pub profiles: Arc<dyn ResellerProfileDirectory>,
    /// Present when backed by PostgreSQL; used for pool gauges.
    pub pool: Option<PgPool>,
}

/// Builds the application backed by PostgreSQL repositories.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let store = Arc::new(SettingsRecordRepository::new(pool.clone()));
    let profiles = Arc::new(ResellerProfileRepository::new(pool.clone()));
    let state = build_state(config, store, profiles, Some(pool))?;
    Ok(router(state))
}

/// Builds the application over arbitrary storage backends.
pub fn create_app_with(
    config: Config,
    store: Arc<dyn SettingsStore>,
    profiles: Arc<dyn ResellerProfileDirectory>,
) -> Result<Router, JwtError> {
    let state = build_state(config, store, profiles, None)?;
    Ok(router(state))
}

fn build_state(
    config: Config,
    store: Arc<dyn SettingsStore>,
    profiles: Arc<dyn ResellerProfileDirectory>,
    pool: Option<PgPool>,
) -> Result<AppState, JwtError> {
    let jwt = JwtConfig::with_leeway(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.leeway_secs,
    )?;
    let settings = SettingsService::new(store, config.settings.service_config());

    Ok(AppState {
        config: Arc::new(config),
        jwt: Arc::new(jwt),
        settings: Arc::new(settings),
        profiles,
        pool,
    })
}

fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Routes requiring a valid access token; capability checks happen in the
    // handler extractors
    let protected_routes = Router::new()
        .route(
            "/api/v1/admin/settings",
            get(platform_settings::get_all_settings),
        )
        .route(
            "/api/v1/admin/settings/:section",
            get(platform_settings::get_settings_section)
                .put(platform_settings::update_settings_section),
        )
        .route(
            "/api/v1/reseller/settings/:section",
            get(reseller_settings::get_reseller_section)
                .put(reseller_settings::update_reseller_section),
        )
        .route(
            "/api/v1/platform/context",
            get(platform_context::get_platform_context),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
