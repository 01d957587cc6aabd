//! The search panel: query text, derived result list, and the keyboard
//! selection index.

use serde::Serialize;

use nmcoast_core::{search, CounterStore};

/// One entry in the result list: a counter hit, or the synthetic
/// "search as address" fallback appended for address-looking queries.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResult {
    Counter {
        counter_id: i64,
        counter_name: String,
        vendor: String,
    },
    Address {
        query: String,
    },
}

/// State of the search box and its result list.
///
/// Results are ephemeral: recomputed on each debounced evaluation and
/// discarded on dismissal. The query text survives Escape.
#[derive(Debug, Default)]
pub struct SearchPanel {
    query: String,
    results: Vec<SearchResult>,
    active_index: isize,
    open: bool,
}

impl SearchPanel {
    /// Record the current query text. Evaluation happens separately, after
    /// the debounce delay.
    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_owned();
    }

    /// Recompute the result list from the store for the current query.
    ///
    /// An empty query closes the list. The active index resets to -1 on every
    /// evaluation.
    pub fn evaluate(&mut self, store: &CounterStore) {
        self.active_index = -1;

        if self.query.trim().is_empty() {
            self.results.clear();
            self.open = false;
            return;
        }

        self.results = search::search(store, &self.query)
            .into_iter()
            .map(|c| SearchResult::Counter {
                counter_id: c.counter_id,
                counter_name: c.counter_name.clone(),
                vendor: c.vendor.clone(),
            })
            .collect();

        if search::should_offer_address_lookup(&self.query) {
            self.results.push(SearchResult::Address {
                query: self.query.trim().to_owned(),
            });
        }

        self.open = true;
    }

    /// Step the active index (Down = +1, Up = -1), clamped to
    /// `[-1, result_count - 1]`.
    pub fn step(&mut self, delta: isize) {
        self.active_index = search::step_result_index(self.active_index, delta, self.results.len());
    }

    /// Point the index at a specific result (mouse choice). Out-of-range
    /// indices clear it.
    pub fn set_active(&mut self, index: usize) {
        self.active_index = if index < self.results.len() {
            index as isize
        } else {
            -1
        };
    }

    /// The currently indexed result, if the index points at one.
    #[must_use]
    pub fn active(&self) -> Option<&SearchResult> {
        usize::try_from(self.active_index)
            .ok()
            .and_then(|i| self.results.get(i))
    }

    /// Close the result list without clearing the query text.
    pub fn dismiss(&mut self) {
        self.results.clear();
        self.active_index = -1;
        self.open = false;
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    #[must_use]
    pub fn active_index(&self) -> isize {
        self.active_index
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }
}
