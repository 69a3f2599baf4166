use axum::http::Method;
use axum::{routing::get, Router};
use minigql_core::Executor;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::*;
use crate::config::ServerConfig;
use crate::error::AppResult;
use crate::schema::build_schema;
use crate::store::UserStore;

pub fn create_router(executor: Executor, config: ServerConfig) -> Router {
    let route = config.route.clone();
    let state = AppState {
        executor,
        config: Arc::new(config),
    };

    Router::new()
        .route(&route, get(graphql_get).post(graphql_post))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
}

/// Builds the demo schema over the seeded store in the configured style and
/// mounts it.
pub fn create_app(config: ServerConfig) -> AppResult<Router> {
    let store = Arc::new(UserStore::seeded());
    let schema = build_schema(config.schema_style, store)?;
    tracing::info!(
        style = %config.schema_style,
        types = schema.types().count(),
        "schema ready"
    );
    let executor = Executor::new(Arc::new(schema));
    Ok(create_router(executor, config))
}
