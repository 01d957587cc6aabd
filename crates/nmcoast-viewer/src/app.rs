//! The viewer application state and its event handlers.
//!
//! `ViewerApp` owns what used to be ambient page state: the counter store,
//! the marker layer, the search panel, the current selection, and the export
//! in-flight flag. UI gestures arrive as calls to the named handler methods
//! below; the page reads everything back through [`ViewerApp::render_state`].
//!
//! Network work never happens while holding the app: handlers return what
//! the caller should fetch (an address to geocode, a counter to export) and
//! the results come back through `apply_*` calls.

use std::time::{Duration, Instant};

use serde::Serialize;

use nmcoast_api::GeocodedPlace;
use nmcoast_core::{Counter, CounterStore};

use crate::dashboard;
use crate::export::{self, ExportError, ExportFile, ExportFormat, ExportPermit, ExportSlot};
use crate::map::{CameraMove, Marker, MarkerLayer, ADDRESS_ZOOM, COUNTER_ZOOM};
use crate::search::{SearchPanel, SearchResult};
use crate::selection::Selection;

/// A query the caller should geocode, produced by Enter on the synthetic
/// address entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookup(pub String);

/// Outcome of asking to start a raw-data export.
#[derive(Debug)]
pub enum RawExportStart {
    /// The slot was claimed; fetch and archive `counter_id`, then drop the
    /// permit.
    Started {
        counter_id: i64,
        permit: ExportPermit,
    },
    /// Nothing is selected; raw export is not valid.
    NoSelection,
    /// An export is already running; the request is a no-op.
    AlreadyRunning,
}

/// The temporary address pin as the page sees it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPinView {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Serializable snapshot of everything the page renders.
///
/// `camera`, `open_url`, and `notice` are one-shot effects: they are cleared
/// from the app once reported.
#[derive(Debug, Serialize)]
pub struct RenderState {
    pub markers: Vec<Marker>,
    pub search_pin: Option<SearchPinView>,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub active_index: isize,
    pub results_open: bool,
    pub selected: Option<Counter>,
    pub panel_open: bool,
    pub export_in_flight: bool,
    pub camera: Option<CameraMove>,
    pub open_url: Option<String>,
    pub notice: Option<String>,
    pub counter_total: usize,
}

/// All viewer state, with explicit handlers instead of ambient globals.
#[derive(Debug)]
pub struct ViewerApp {
    store: CounterStore,
    markers: MarkerLayer,
    search: SearchPanel,
    selection: Selection,
    export_slot: ExportSlot,
    dashboard_url: String,
    search_pin_ttl: Duration,
    camera: Option<CameraMove>,
    open_url: Option<String>,
    notice: Option<String>,
}

impl ViewerApp {
    #[must_use]
    pub fn new(dashboard_url: impl Into<String>, search_pin_ttl: Duration) -> Self {
        Self {
            store: CounterStore::default(),
            markers: MarkerLayer::default(),
            search: SearchPanel::default(),
            selection: Selection::default(),
            export_slot: ExportSlot::default(),
            dashboard_url: dashboard_url.into(),
            search_pin_ttl,
            camera: None,
            open_url: None,
            notice: None,
        }
    }

    /// Replace the store wholesale and rebuild all markers.
    ///
    /// Selection and search reset: the previous ids may no longer exist.
    pub fn load_counters(&mut self, counters: Vec<Counter>) {
        tracing::info!(count = counters.len(), "counter store loaded");
        self.store.replace_all(counters);
        self.markers.rebuild(self.store.as_slice());
        self.selection.clear();
        self.search = SearchPanel::default();
        self.camera = None;
    }

    /// Record the search box text. Evaluation is debounced by the caller.
    pub fn search_input(&mut self, text: &str) {
        self.search.set_query(text);
    }

    /// Recompute search results for the current query.
    ///
    /// Clearing the query also resets every marker to the default style.
    pub fn evaluate_search(&mut self) {
        if self.search.query().trim().is_empty() {
            self.markers.clear_highlights();
        }
        self.search.evaluate(&self.store);
    }

    pub fn key_down(&mut self) {
        self.search.step(1);
    }

    pub fn key_up(&mut self) {
        self.search.step(-1);
    }

    /// Activate the currently indexed result.
    ///
    /// A counter hit selects that counter; the synthetic address entry is
    /// returned for the caller to geocode. With nothing indexed, Enter does
    /// nothing.
    pub fn enter(&mut self) -> Option<AddressLookup> {
        match self.search.active().cloned() {
            Some(SearchResult::Counter { counter_id, .. }) => {
                self.select_counter(counter_id);
                None
            }
            Some(SearchResult::Address { query }) => Some(AddressLookup(query)),
            None => None,
        }
    }

    /// Activate a result chosen with the mouse: index it, then treat it like
    /// Enter.
    pub fn activate_result(&mut self, index: usize) -> Option<AddressLookup> {
        self.search.set_active(index);
        self.enter()
    }

    /// Dismiss the result list without clearing the query text.
    pub fn escape(&mut self) {
        self.search.dismiss();
    }

    /// Click on a counter marker (or activation of a counter search result).
    pub fn marker_click(&mut self, counter_id: i64) {
        self.select_counter(counter_id);
    }

    /// Double-click on a counter marker: emit the dashboard deep link as a
    /// one-shot open-url effect.
    pub fn marker_double_click(&mut self, counter_id: i64) {
        if self.store.get(counter_id).is_none() {
            tracing::warn!(counter_id, "double-click on unknown counter");
            return;
        }
        self.open_url = Some(dashboard::deep_link(&self.dashboard_url, counter_id));
    }

    /// Click outside all interactive regions: clear selection and highlight
    /// unless an export is in flight.
    pub fn outside_click(&mut self) {
        if self.selection.dismiss_outside(self.export_slot.is_busy()) {
            self.markers.clear_highlights();
        }
    }

    fn select_counter(&mut self, counter_id: i64) {
        let Some(counter) = self.store.get(counter_id) else {
            tracing::warn!(counter_id, "selection of unknown counter ignored");
            return;
        };
        let (latitude, longitude) = (counter.latitude, counter.longitude);

        self.selection.select(counter_id);
        self.markers.highlight_only(counter_id);
        self.camera = Some(CameraMove {
            latitude,
            longitude,
            zoom: COUNTER_ZOOM,
        });
        self.search.dismiss();
    }

    /// Place the temporary pin for a geocoded address and move the camera.
    pub fn apply_geocoded(&mut self, place: &GeocodedPlace, now: Instant) {
        self.markers.place_search_pin(
            &place.display_name,
            place.latitude,
            place.longitude,
            self.search_pin_ttl,
            now,
        );
        self.camera = Some(CameraMove {
            latitude: place.latitude,
            longitude: place.longitude,
            zoom: ADDRESS_ZOOM,
        });
        self.search.dismiss();
    }

    /// The geocoder had no result (or failed); tell the user and move on.
    pub fn geocode_unavailable(&mut self, query: &str) {
        self.notice = Some(format!("No location found for \"{query}\""));
        self.search.dismiss();
    }

    /// Serialize the counter store for download, or `Ok(None)` for an
    /// unknown format name (logged and skipped).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialize`] if a record fails to serialize.
    pub fn metadata_export(&self, format: &str) -> Result<Option<ExportFile>, ExportError> {
        let Some(format) = ExportFormat::parse(format) else {
            tracing::warn!(format, "unknown export format requested; skipping");
            return Ok(None);
        };
        let today = chrono::Utc::now().date_naive();
        export::metadata_export(&self.store, format, today).map(Some)
    }

    /// Ask to start a raw-data export for the current selection.
    pub fn begin_raw_export(&self) -> RawExportStart {
        let Some(counter_id) = self.selection.current() else {
            return RawExportStart::NoSelection;
        };
        match self.export_slot.try_acquire() {
            Some(permit) => RawExportStart::Started {
                counter_id,
                permit,
            },
            None => RawExportStart::AlreadyRunning,
        }
    }

    /// Record a failed raw-data export: generic notice, details to the log.
    pub fn raw_export_failed(&mut self) {
        self.notice = Some("Raw data export failed. Please try again.".to_owned());
    }

    /// Snapshot everything the page renders, consuming one-shot effects.
    pub fn render_state(&mut self, now: Instant) -> RenderState {
        self.markers.prune_expired_pin(now);

        RenderState {
            markers: self.markers.markers().to_vec(),
            search_pin: self.markers.search_pin().map(|pin| SearchPinView {
                label: pin.label.clone(),
                latitude: pin.latitude,
                longitude: pin.longitude,
            }),
            query: self.search.query().to_owned(),
            results: self.search.results().to_vec(),
            active_index: self.search.active_index(),
            results_open: self.search.is_open(),
            selected: self
                .selection
                .current()
                .and_then(|id| self.store.get(id))
                .cloned(),
            panel_open: self.selection.panel_open(),
            export_in_flight: self.export_slot.is_busy(),
            camera: self.camera.take(),
            open_url: self.open_url.take(),
            notice: self.notice.take(),
            counter_total: self.store.len(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &CounterStore {
        &self.store
    }

    #[must_use]
    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    #[must_use]
    pub fn export_in_flight(&self) -> bool {
        self.export_slot.is_busy()
    }
}
