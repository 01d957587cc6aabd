//! Download endpoints for metadata and raw-data exports.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use nmcoast_viewer::export::raw_data_archive;
use nmcoast_viewer::{ExportFile, RawExportStart};

use super::{ApiError, AppState};

/// `GET /export/counters/{format}` — serialize the counter store.
///
/// Unknown formats are logged by the viewer and answered with 404.
pub async fn metadata(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, ApiError> {
    let file = {
        state.app.lock().await.metadata_export(&format)
    }
    .map_err(|e| {
        tracing::error!(error = %e, "metadata export failed");
        ApiError::new("internal_error", "metadata export failed")
    })?;

    match file {
        Some(file) => Ok(download(file)),
        None => Err(ApiError::new(
            "not_found",
            format!("unknown export format: {format}"),
        )),
    }
}

/// `GET /export/raw` — fetch and bundle raw data for the selected counter.
///
/// A second request while one runs gets 409 and does nothing. Any upstream
/// failure aborts the whole export; the permit releases either way.
pub async fn raw(State(state): State<AppState>) -> Result<Response, ApiError> {
    let start = { state.app.lock().await.begin_raw_export() };
    match start {
        RawExportStart::NoSelection => Err(ApiError::new(
            "bad_request",
            "select a counter before exporting raw data",
        )),
        RawExportStart::AlreadyRunning => Err(ApiError::new(
            "conflict",
            "a raw data export is already in progress",
        )),
        RawExportStart::Started {
            counter_id,
            permit,
        } => {
            let result =
                raw_data_archive(&state.counts, counter_id, state.max_concurrent_count_fetches)
                    .await;
            drop(permit);

            match result {
                Ok(file) => Ok(download(file)),
                Err(e) => {
                    tracing::error!(error = %e, counter_id, "raw data export failed");
                    state.app.lock().await.raw_export_failed();
                    Err(ApiError::new("bad_gateway", "raw data export failed"))
                }
            }
        }
    }
}

fn download(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response()
}
