//! Deep links into the downstream dashboard.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Build the dashboard URL for one counter: the counter id travels as a
/// URL-encoded filter document. Opened by the page in a new browser context.
#[must_use]
pub fn deep_link(dashboard_url: &str, counter_id: i64) -> String {
    let filter = format!("{{\"counter_id\":{counter_id}}}");
    format!(
        "{}?filters={}",
        dashboard_url.trim_end_matches('/'),
        utf8_percent_encode(&filter, NON_ALPHANUMERIC)
    )
}
