//! Free-text matching over the counter store and the keyboard index contract
//! for the result list.

use crate::counters::{Counter, CounterStore};

/// Queries longer than this (after trimming) that contain at least one letter
/// also get a "search as address" fallback entry.
pub const MIN_ADDRESS_QUERY_LEN: usize = 2;

/// Case-insensitive OR-match against name, id, notes, and vendor.
///
/// The id matches as a decimal string, so "12" hits counter 112 as well —
/// same substring semantics as the text fields.
#[must_use]
pub fn matches_query(counter: &Counter, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }

    counter.counter_name.to_lowercase().contains(&needle)
        || counter.counter_id.to_string().contains(&needle)
        || counter.vendor.to_lowercase().contains(&needle)
        || counter
            .counter_notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(&needle))
}

/// Filter the store against a free-text query, preserving store order.
///
/// An empty or whitespace-only query yields no results.
#[must_use]
pub fn search<'a>(store: &'a CounterStore, query: &str) -> Vec<&'a Counter> {
    store.iter().filter(|c| matches_query(c, query)).collect()
}

/// Whether the query should also be offered as an address lookup.
#[must_use]
pub fn should_offer_address_lookup(query: &str) -> bool {
    let trimmed = query.trim();
    trimmed.chars().count() > MIN_ADDRESS_QUERY_LEN && trimmed.chars().any(char::is_alphabetic)
}

/// Step the active result index by `delta`, clamped to `[-1, count - 1]`.
///
/// `-1` means "nothing indexed"; a result list of size zero can never move
/// past it.
#[must_use]
pub fn step_result_index(current: isize, delta: isize, result_count: usize) -> isize {
    let upper = result_count as isize - 1;
    (current + delta).clamp(-1, upper.max(-1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::Counter;

    fn counter(id: i64, name: &str, vendor: &str, notes: Option<&str>) -> Counter {
        Counter {
            counter_id: id,
            counter_code: format!("C{id}"),
            counter_name: name.to_owned(),
            vendor: vendor.to_owned(),
            latitude: 35.2,
            longitude: -80.8,
            counter_notes: notes.map(ToOwned::to_owned),
        }
    }

    fn store() -> CounterStore {
        CounterStore::new(vec![
            counter(1, "Bank of America Stadium", "SensorCorp", Some("Main entrance")),
            counter(2, "Stadium South Gate", "SensorCorp", None),
            counter(14, "Freedom Park Main Entrance", "TrailTech", Some("Park main entrance")),
            counter(140, "Little Sugar Creek Greenway", "TrailTech", Some("Trailhead counter")),
        ])
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let store = store();
        let hits = search(&store, "STADIUM");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn id_matches_as_substring() {
        let store = store();
        let ids: Vec<i64> = search(&store, "14").iter().map(|c| c.counter_id).collect();
        assert_eq!(ids, vec![14, 140]);
    }

    #[test]
    fn notes_and_vendor_participate_with_or_semantics() {
        let store = store();
        assert_eq!(search(&store, "trailhead").len(), 1);
        assert_eq!(search(&store, "trailtech").len(), 2);
    }

    #[test]
    fn empty_query_yields_nothing() {
        let store = store();
        assert!(search(&store, "").is_empty());
        assert!(search(&store, "   ").is_empty());
    }

    #[test]
    fn every_hit_matches_at_least_one_field() {
        let store = store();
        for query in ["gate", "14", "sensor", "ENTRANCE", "zzz"] {
            for hit in search(&store, query) {
                assert!(matches_query(hit, query), "hit {} does not match {query:?}", hit.counter_id);
            }
        }
    }

    #[test]
    fn address_lookup_needs_length_and_a_letter() {
        assert!(should_offer_address_lookup("123 Main St"));
        assert!(should_offer_address_lookup("elm"));
        assert!(!should_offer_address_lookup("el"));
        assert!(!should_offer_address_lookup("12345"));
        assert!(!should_offer_address_lookup("  ab  "));
    }

    #[test]
    fn down_presses_clamp_to_last_result() {
        let mut index = -1;
        for _ in 0..10 {
            index = step_result_index(index, 1, 4);
        }
        assert_eq!(index, 3);
    }

    #[test]
    fn n_downs_from_start_is_min_of_n_and_last() {
        for n in 0..8_isize {
            let mut index = -1;
            for _ in 0..n {
                index = step_result_index(index, 1, 5);
            }
            assert_eq!(index, n.min(4));
        }
    }

    #[test]
    fn up_presses_never_go_below_minus_one() {
        let mut index = 2;
        for _ in 0..10 {
            index = step_result_index(index, -1, 4);
        }
        assert_eq!(index, -1);
    }

    #[test]
    fn empty_result_list_pins_index_at_minus_one() {
        assert_eq!(step_result_index(-1, 1, 0), -1);
        assert_eq!(step_result_index(-1, -1, 0), -1);
    }
}
