//! HTTP clients for the external services the counter map consumes: the
//! counts REST API and a Nominatim-compatible geocoder.

pub mod client;
pub mod error;
pub mod geocode;

pub use client::CountsClient;
pub use error::ClientError;
pub use geocode::{GeocodeClient, GeocodedPlace};
