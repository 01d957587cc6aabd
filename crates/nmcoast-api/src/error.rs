use thiserror::Error;

/// Errors returned by the counts API and geocoder clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The response parsed but its content is unusable (e.g. non-numeric
    /// coordinates from the geocoder).
    #[error("malformed response: {0}")]
    Malformed(String),
}
