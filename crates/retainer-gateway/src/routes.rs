//! HTTP route definitions

use crate::error::GatewayError;
use crate::router::{self, Route};
use crate::{middleware, pipeline, AppState};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/resources/{*topic}", any(resource_handler))
        .fallback(route_not_found)
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        // Outside routing so preflights never reach authentication
        .layer(axum_middleware::from_fn(middleware::cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any method on `/resources/{topic}`
async fn resource_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    match router::classify(request.method(), request.uri().path()) {
        Route::Resource(route) => pipeline::process(&state, route, request).await.into_response(),
        Route::NotAResource => GatewayError::RouteNotFound.into_response(),
    }
}

/// Everything outside the resource prefix
async fn route_not_found() -> GatewayError {
    GatewayError::RouteNotFound
}
