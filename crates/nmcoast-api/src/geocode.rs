//! Forward geocoding through a Nominatim-compatible search endpoint.
//!
//! Query text in, place name plus coordinates out. Only the top-ranked hit is
//! requested; an empty result list is `None`, not an error.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ClientError;

const USER_AGENT: &str = "nmcoast/0.1 (counter-map)";

/// A geocoded place returned to the viewer.
#[derive(Debug, Clone)]
pub struct GeocodedPlace {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct PlaceRecord {
    display_name: String,
    lat: String,
    lon: String,
}

/// Client for the geocoding service.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a new client for the geocoder at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Geocodes free-form query text to the top-ranked place, if any.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or non-2xx HTTP status.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    /// - [`ClientError::Malformed`] if the coordinates are not numeric.
    pub async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>, ClientError> {
        let url = self
            .base_url
            .join("search")
            .map_err(|e| ClientError::InvalidBaseUrl(format!("search: {e}")))?;

        let response = self
            .client
            .get(url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let records: Vec<PlaceRecord> =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!("geocode({query})"),
                source: e,
            })?;

        records.into_iter().next().map(parse_place).transpose()
    }
}

fn parse_place(record: PlaceRecord) -> Result<GeocodedPlace, ClientError> {
    let latitude = record
        .lat
        .parse::<f64>()
        .map_err(|_| ClientError::Malformed(format!("non-numeric latitude: {}", record.lat)))?;
    let longitude = record
        .lon
        .parse::<f64>()
        .map_err(|_| ClientError::Malformed(format!("non-numeric longitude: {}", record.lon)))?;
    Ok(GeocodedPlace {
        display_name: record.display_name,
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_place_accepts_numeric_strings() {
        let place = parse_place(PlaceRecord {
            display_name: "Raleigh, NC".to_owned(),
            lat: "35.7796".to_owned(),
            lon: "-78.6382".to_owned(),
        })
        .expect("numeric coordinates");
        assert!((place.latitude - 35.7796).abs() < 1e-9);
        assert!((place.longitude + 78.6382).abs() < 1e-9);
    }

    #[test]
    fn parse_place_rejects_non_numeric_coordinates() {
        let result = parse_place(PlaceRecord {
            display_name: "x".to_owned(),
            lat: "north".to_owned(),
            lon: "-78.6".to_owned(),
        });
        assert!(matches!(result, Err(ClientError::Malformed(_))));
    }
}
