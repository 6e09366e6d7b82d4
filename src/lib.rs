pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use db::SessionFactory;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionFactory>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self { sessions }
    }
}

/// Builds the HTTP router. Only the announcement routes get a per-request session.
pub fn app(state: AppState) -> Router {
    let ann = Router::new()
        .route("/ann", post(routes::announcements::create_announcement))
        .route(
            "/ann/{ann_id}",
            get(routes::announcements::get_announcement)
                .patch(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::session::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(ann)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
