//! Marker view-state for the map surface.
//!
//! One marker per counter, created when the store loads and replaced only on
//! reload. The page-side mapping SDK renders exactly what this layer reports;
//! it keeps no state of its own.

use std::time::{Duration, Instant};

use serde::Serialize;

use nmcoast_core::Counter;

/// Zoom level used when the camera moves to a selected counter.
pub const COUNTER_ZOOM: f64 = 16.0;
/// Zoom level used when the camera moves to a geocoded address.
pub const ADDRESS_ZOOM: f64 = 14.0;

/// Visual style of a counter marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    Default,
    Highlighted,
}

/// View-state for one counter marker.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub counter_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub style: MarkerStyle,
}

/// A one-shot camera instruction for the page.
#[derive(Debug, Clone, Serialize)]
pub struct CameraMove {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

/// Temporary pin placed for an address lookup; pruned once expired.
#[derive(Debug, Clone)]
pub struct SearchPin {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    expires_at: Instant,
}

/// All marker state shown on the map.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    search_pin: Option<SearchPin>,
}

impl MarkerLayer {
    /// Rebuild the layer 1:1 from a freshly loaded counter set.
    pub fn rebuild(&mut self, counters: &[Counter]) {
        self.markers = counters
            .iter()
            .map(|c| Marker {
                counter_id: c.counter_id,
                latitude: c.latitude,
                longitude: c.longitude,
                title: c.counter_name.clone(),
                style: MarkerStyle::Default,
            })
            .collect();
        self.search_pin = None;
    }

    /// Reset every marker to the default style, then highlight `counter_id`.
    ///
    /// Returns `false` (leaving nothing highlighted) if the id is unknown.
    /// The reset-first order keeps the single-highlight invariant across any
    /// event sequence.
    pub fn highlight_only(&mut self, counter_id: i64) -> bool {
        self.clear_highlights();
        match self.markers.iter_mut().find(|m| m.counter_id == counter_id) {
            Some(marker) => {
                marker.style = MarkerStyle::Highlighted;
                true
            }
            None => false,
        }
    }

    /// Reset every marker to the default style.
    pub fn clear_highlights(&mut self) {
        for marker in &mut self.markers {
            marker.style = MarkerStyle::Default;
        }
    }

    /// The currently highlighted counter, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<i64> {
        self.markers
            .iter()
            .find(|m| m.style == MarkerStyle::Highlighted)
            .map(|m| m.counter_id)
    }

    /// Place (or replace) the temporary address pin.
    pub fn place_search_pin(
        &mut self,
        label: &str,
        latitude: f64,
        longitude: f64,
        ttl: Duration,
        now: Instant,
    ) {
        self.search_pin = Some(SearchPin {
            label: label.to_owned(),
            latitude,
            longitude,
            expires_at: now + ttl,
        });
    }

    /// Drop the address pin once its lifetime has passed.
    pub fn prune_expired_pin(&mut self, now: Instant) {
        if self
            .search_pin
            .as_ref()
            .is_some_and(|pin| now >= pin.expires_at)
        {
            self.search_pin = None;
        }
    }

    #[must_use]
    pub fn search_pin(&self) -> Option<&SearchPin> {
        self.search_pin.as_ref()
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}
