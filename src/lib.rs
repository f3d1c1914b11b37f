//! Storefront Admin API
//!
//! Bulk CSV loader and read-only REST API behind the e-commerce admin
//! dashboard.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod loader;
pub mod middleware_helpers;
pub mod openapi;
pub mod schema;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::handlers::AppServices;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: AppConfig) -> Self {
        let services = AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

fn configured_origins(cfg: &AppConfig) -> Option<Vec<HeaderValue>> {
    cfg.cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty())
}

/// CORS from config: explicit origins win, then permissive in development
/// or when overridden, otherwise same-origin only.
pub fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    if let Some(origins) = configured_origins(cfg) {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// Full HTTP surface: welcome, health, `/api` routes and the OpenAPI document
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .nest("/api", handlers::api_routes())
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
