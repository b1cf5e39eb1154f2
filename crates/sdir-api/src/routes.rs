//! API routes.

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::handlers::{
    analyze_script, clear_session, export_prompts, get_segment, get_session, get_settings, health,
    ready, render_segment, update_segment_prompt, update_settings,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let session_routes = Router::new()
        .route("/analyze", post(analyze_script))
        .route("/session", get(get_session).delete(clear_session))
        .route("/segments/:segment_id", get(get_segment))
        .route("/segments/:segment_id/prompt", patch(update_segment_prompt))
        .route("/export", get(export_prompts));

    let render_routes = Router::new()
        .route("/segments/:segment_id/render", post(render_segment))
        .route("/settings", get(get_settings).put(update_settings));

    let api_routes = Router::new()
        .merge(session_routes)
        .merge(render_routes)
        .layer(TimeoutLayer::new(state.config.request_timeout));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
