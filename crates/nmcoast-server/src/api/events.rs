//! The JSON event/state bridge between the map page and the viewer.
//!
//! The page is a dumb surface: it forwards gestures here and re-renders from
//! the returned state. All behavior lives in `ViewerApp`; this module only
//! routes events and performs the network calls the viewer asks for, outside
//! the state lock.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::Deserialize;

use nmcoast_viewer::app::AddressLookup;
use nmcoast_viewer::RenderState;

use super::AppState;

/// A UI gesture forwarded by the page.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    SearchInput { text: String },
    KeyDown,
    KeyUp,
    Enter,
    Escape,
    ResultClick { index: usize },
    MarkerClick { counter_id: i64 },
    MarkerDoubleClick { counter_id: i64 },
    OutsideClick,
}

/// `GET /api/state` — snapshot without dispatching anything.
pub async fn state(State(state): State<AppState>) -> Json<RenderState> {
    let mut app = state.app.lock().await;
    Json(app.render_state(Instant::now()))
}

/// `POST /api/event` — dispatch one gesture and return the updated state.
pub async fn dispatch(
    State(state): State<AppState>,
    Json(event): Json<UiEvent>,
) -> Json<RenderState> {
    match event {
        UiEvent::SearchInput { text } => {
            state.app.lock().await.search_input(&text);
            let app = Arc::clone(&state.app);
            state.debouncer.schedule(move || async move {
                app.lock().await.evaluate_search();
            });
        }
        UiEvent::KeyDown => state.app.lock().await.key_down(),
        UiEvent::KeyUp => state.app.lock().await.key_up(),
        UiEvent::Enter => {
            let lookup = state.app.lock().await.enter();
            if let Some(AddressLookup(query)) = lookup {
                geocode(&state, &query).await;
            }
        }
        UiEvent::ResultClick { index } => {
            let lookup = state.app.lock().await.activate_result(index);
            if let Some(AddressLookup(query)) = lookup {
                geocode(&state, &query).await;
            }
        }
        UiEvent::Escape => state.app.lock().await.escape(),
        UiEvent::MarkerClick { counter_id } => state.app.lock().await.marker_click(counter_id),
        UiEvent::MarkerDoubleClick { counter_id } => {
            state.app.lock().await.marker_double_click(counter_id);
        }
        UiEvent::OutsideClick => state.app.lock().await.outside_click(),
    }

    let mut app = state.app.lock().await;
    Json(app.render_state(Instant::now()))
}

/// Run the address lookup the viewer requested. Failures collapse to the
/// same "nothing found" notice; details go to the log.
async fn geocode(state: &AppState, query: &str) {
    match state.geocoder.search(query).await {
        Ok(Some(place)) => {
            state
                .app
                .lock()
                .await
                .apply_geocoded(&place, Instant::now());
        }
        Ok(None) => state.app.lock().await.geocode_unavailable(query),
        Err(e) => {
            tracing::error!(error = %e, query, "geocoding failed");
            state.app.lock().await.geocode_unavailable(query);
        }
    }
}
