//! EAN-DB client error types.

/// Errors from EAN-DB calls.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The client could not be constructed from its configuration.
    #[error("configuration error: {reason}")]
    NotConfigured {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// The registry has no record for this barcode.
    #[error("EAN-DB has no record for {ean}")]
    NotFound {
        /// The barcode that was looked up.
        ean: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("EAN-DB request timed out after {timeout_secs}s")]
    Timeout {
        /// The configured per-request timeout.
        timeout_secs: u64,
    },

    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// EAN-DB returned a non-2xx status.
    #[error("EAN-DB {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },

    /// A downloaded image could not be stored under the media root.
    #[error("failed to store image {url}: {reason}")]
    ImageStore { url: String, reason: String },
}
