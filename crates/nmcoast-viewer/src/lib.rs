//! Viewer state and behavior for the NM COAST counter map.
//!
//! Everything the interactive page shows is derived from [`app::ViewerApp`]:
//! the marker layer, the search panel, the current selection, and export
//! progress. UI gestures arrive as calls to named handler methods and all
//! side effects stay inside this crate, exported only as serializable render
//! state.

pub mod app;
pub mod dashboard;
pub mod debounce;
pub mod export;
pub mod map;
pub mod search;
pub mod selection;

pub use app::{AddressLookup, RawExportStart, RenderState, ViewerApp};
pub use debounce::Debouncer;
pub use export::{ExportError, ExportFile, ExportFormat, ExportPermit, ExportSlot};
pub use map::{CameraMove, Marker, MarkerLayer, MarkerStyle};
pub use search::{SearchPanel, SearchResult};
