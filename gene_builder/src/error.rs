// src/error.rs

use thiserror::Error;

/// Errors surfaced by the data source and the per-gene pipeline.
#[derive(Debug, Error)]
pub enum GeneBuilderError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("exceeded {attempts} attempts for {url}")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no transcript of {gene} produced any output")]
    EmptyRun { gene: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
