//! HTTP API server with observability for the warehouse receipts system.
//!
//! Provides JSON endpoints for resources, units, receipt documents and the
//! warehouse listing, with structured logging (tracing) and Prometheus
//! metrics. Handlers only parse primitives and map errors to status codes;
//! every rule lives in the `domain` and `queries` crates.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use inventory_store::{InventoryStore, Resource, Unit};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

use routes::{receipts, references, warehouse};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: InventoryStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/resources",
            get(references::list::<S, Resource>).post(references::create::<S, Resource>),
        )
        .route(
            "/resources/{id}",
            get(references::get::<S, Resource>)
                .put(references::update::<S, Resource>)
                .delete(references::delete::<S, Resource>),
        )
        .route(
            "/units",
            get(references::list::<S, Unit>).post(references::create::<S, Unit>),
        )
        .route(
            "/units/{id}",
            get(references::get::<S, Unit>)
                .put(references::update::<S, Unit>)
                .delete(references::delete::<S, Unit>),
        )
        .route(
            "/receipts",
            get(receipts::list::<S>).post(receipts::create::<S>),
        )
        .route("/receipts/new", get(receipts::new_form::<S>))
        .route(
            "/receipts/{id}",
            get(receipts::get::<S>)
                .put(receipts::update::<S>)
                .delete(receipts::delete::<S>),
        )
        .route("/receipts/{id}/edit", get(receipts::edit_form::<S>))
        .route("/warehouse", get(warehouse::list::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over the given store.
pub fn create_default_state<S: InventoryStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
