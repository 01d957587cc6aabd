//! Wire models for the counts API and the in-memory counter store.
//!
//! All types mirror the JSON the upstream REST API produces. The store is
//! replaced wholesale on (re)load and never partially mutated.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A physical traffic-counting device at a fixed location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    pub counter_id: i64,
    pub counter_code: String,
    pub counter_name: String,
    pub vendor: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub counter_notes: Option<String>,
}

/// Traffic category measured by a datastream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatastreamType {
    #[serde(rename = "Pedestrian")]
    Pedestrian,
    #[serde(rename = "Roadway Cyclist")]
    RoadwayCyclist,
    #[serde(rename = "Sidewalk Cyclist")]
    SidewalkCyclist,
    #[serde(rename = "Combined")]
    Combined,
}

impl std::fmt::Display for DatastreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatastreamType::Pedestrian => write!(f, "Pedestrian"),
            DatastreamType::RoadwayCyclist => write!(f, "Roadway Cyclist"),
            DatastreamType::SidewalkCyclist => write!(f, "Sidewalk Cyclist"),
            DatastreamType::Combined => write!(f, "Combined"),
        }
    }
}

/// Direction of travel a datastream records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatastreamDirection {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
    #[serde(rename = "NB")]
    Northbound,
    #[serde(rename = "SB")]
    Southbound,
    #[serde(rename = "EB")]
    Eastbound,
    #[serde(rename = "WB")]
    Westbound,
    #[serde(rename = "COMBINED")]
    Combined,
}

impl std::fmt::Display for DatastreamDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DatastreamDirection::In => "IN",
            DatastreamDirection::Out => "OUT",
            DatastreamDirection::Northbound => "NB",
            DatastreamDirection::Southbound => "SB",
            DatastreamDirection::Eastbound => "EB",
            DatastreamDirection::Westbound => "WB",
            DatastreamDirection::Combined => "COMBINED",
        };
        write!(f, "{s}")
    }
}

/// One categorized channel of a counter's raw measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datastream {
    pub datastream_id: i64,
    pub counter_id: i64,
    pub datastream_type: DatastreamType,
    pub datastream_name: String,
    pub datastream_direction: DatastreamDirection,
    #[serde(default)]
    pub datastream_notes: Option<String>,
}

/// A single recorded activity event logged by a datastream.
///
/// The `maxday`/`maxhour`/`gap`/`zero`/`stat` fields are upstream QA/QC pass
/// flags (1 = pass, 0 = fail) and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Count {
    pub count_id: i64,
    pub datastream_id: i64,
    /// Upstream timestamps carry no offset.
    pub date_time: NaiveDateTime,
    #[serde(default)]
    pub raw_count: Option<i64>,
    #[serde(default)]
    pub maxday: Option<i32>,
    #[serde(default)]
    pub maxhour: Option<i32>,
    #[serde(default)]
    pub gap: Option<i32>,
    #[serde(default)]
    pub zero: Option<i32>,
    #[serde(default)]
    pub stat: Option<i32>,
    #[serde(default)]
    pub cleaned_count: Option<f64>,
}

/// Ordered, in-memory collection of counter records.
///
/// Populated once from the startup fetch; `replace_all` swaps the entire set.
/// Iteration preserves upstream order.
#[derive(Debug, Clone, Default)]
pub struct CounterStore {
    counters: Vec<Counter>,
}

impl CounterStore {
    #[must_use]
    pub fn new(counters: Vec<Counter>) -> Self {
        Self { counters }
    }

    /// Swap the full counter set. There is no partial update path.
    pub fn replace_all(&mut self, counters: Vec<Counter>) {
        self.counters = counters;
    }

    #[must_use]
    pub fn get(&self, counter_id: i64) -> Option<&Counter> {
        self.counters.iter().find(|c| c.counter_id == counter_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Counter> {
        self.counters.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Counter] {
        &self.counters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
