mod events;
mod exports;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use nmcoast_api::{CountsClient, GeocodeClient};
use nmcoast_viewer::{Debouncer, ViewerApp};

use crate::pages;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Mutex<ViewerApp>>,
    pub counts: Arc<CountsClient>,
    pub geocoder: Arc<GeocodeClient>,
    pub debouncer: Arc<Debouncer>,
    pub max_concurrent_count_fetches: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    counters: usize,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/api/health", get(health))
        .route("/api/state", get(events::state))
        .route("/api/event", post(events::dispatch))
        .route("/export/counters/{format}", get(exports::metadata))
        .route("/export/raw", get(exports::raw))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let app = state.app.lock().await;
    Json(HealthData {
        status: "ok",
        counters: app.store().len(),
    })
}
