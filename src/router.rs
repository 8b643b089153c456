use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        // Device registry routes
        .route(
            "/",
            get(handlers::devices::list_devices).post(handlers::devices::create_device),
        )
        .route(
            "/:id/",
            get(handlers::devices::get_device)
                .put(handlers::devices::update_device)
                .delete(handlers::devices::delete_device),
        )
        .route(
            "/:id",
            get(handlers::devices::get_device)
                .put(handlers::devices::update_device)
                .delete(handlers::devices::delete_device),
        )
        .route("/health", get(handlers::healthcheck))
        // Demo pages
        .route("/demo", get(handlers::pages::index))
        .route("/demo/index", get(handlers::pages::index))
        .route("/demo/100Days", get(handlers::pages::hundred_days))
        .route("/demo/chuck", get(handlers::pages::chuck))
        .route(
            "/demo/pokemon",
            get(handlers::pages::pokemon_form).post(handlers::pages::pokemon_search),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
