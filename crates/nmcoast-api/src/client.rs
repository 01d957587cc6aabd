//! HTTP client for the counts REST API.
//!
//! Wraps `reqwest` with typed response deserialization and contextual error
//! reporting. The API serves plain JSON arrays with no envelope; any non-2xx
//! status surfaces as [`ClientError::Http`].

use std::time::Duration;

use reqwest::{Client, Url};

use nmcoast_core::{Count, Counter, Datastream};

use crate::error::ClientError;

const USER_AGENT: &str = "nmcoast/0.1 (counter-map)";

/// Client for the counts REST API.
///
/// Holds the HTTP client and base URL. Point `base_url` at a mock server in
/// tests.
pub struct CountsClient {
    client: Client,
    base_url: Url,
}

impl CountsClient {
    /// Creates a new client for the API at `base_url`.
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

        // Ensure the base ends with exactly one slash so joins append path
        // segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Fetches the full counter list (`GET /counters/`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or non-2xx HTTP status.
    /// - [`ClientError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_counters(&self) -> Result<Vec<Counter>, ClientError> {
        let url = self.endpoint("counters/")?;
        self.request_json(&url, "list_counters").await
    }

    /// Fetches the datastreams for one counter
    /// (`GET /counters/{id}/datastreams/`).
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_counters`]; an unknown counter id is an HTTP 404
    /// and surfaces as [`ClientError::Http`].
    pub async fn list_datastreams(&self, counter_id: i64) -> Result<Vec<Datastream>, ClientError> {
        let url = self.endpoint(&format!("counters/{counter_id}/datastreams/"))?;
        self.request_json(&url, &format!("list_datastreams(counter_id={counter_id})"))
            .await
    }

    /// Fetches the count records for one datastream
    /// (`GET /datastreams/{id}/counts`).
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_counters`].
    pub async fn list_counts(&self, datastream_id: i64) -> Result<Vec<Count>, ClientError> {
        let url = self.endpoint(&format!("datastreams/{datastream_id}/counts"))?;
        self.request_json(&url, &format!("list_counts(datastream_id={datastream_id})"))
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{path}: {e}")))
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body.
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
