//! JSON API over the dashboard views.

mod error;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use mediadash_core::{Dashboard, View};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().route("/health", get(health));
    for view in View::ALL {
        router = router.route(
            view.path(),
            get(move |State(state): State<AppState>| render_view(state, view)),
        );
    }
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sources": state.dashboard.sources().configured_sources(),
    }))
}

async fn render_view(state: AppState, view: View) -> Result<Json<Value>, ApiError> {
    match state.dashboard.render(view).await {
        Ok(value) => Ok(Json(value)),
        Err(e) => {
            warn!(view = %view, source = e.source_name(), error = %e, "View failed");
            Err(e.into())
        }
    }
}
