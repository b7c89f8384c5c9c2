//! Crate-level error types.
//!
//! Only the outer edges (fetching, decoding, configuration) can fail. Problems
//! with a single test record are represented by [`MalformedHistoryError`],
//! which ingestion collects and reports instead of propagating.

use thiserror::Error;

/// Errors raised while acquiring or decoding builder history, or while
/// loading configuration.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The results endpoint replied with a non-2xx HTTP status code.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// A connection to the results endpoint could not be established or the
    /// body could not be read.
    #[error("connection failed to {url}: {detail}")]
    Connect { url: String, detail: String },

    /// The payload for a builder could not be decoded into run and result data.
    #[error("could not decode results for builder '{builder}': {detail}")]
    Decode { builder: String, detail: String },

    /// The configuration file is unreadable or invalid.
    #[error("invalid configuration at {path}: {detail}")]
    Config { path: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub(crate) fn decode(builder: &str, detail: impl Into<String>) -> Self {
        DashboardError::Decode {
            builder: builder.to_string(),
            detail: detail.into(),
        }
    }
}

/// A single test's result sequence disagrees in length with the run sequence
/// of the payload that carried it. The entry is dropped; the rest of the
/// payload is still ingested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("history for '{test}' has {actual} results but {expected} runs")]
pub struct MalformedHistoryError {
    pub test: String,
    pub expected: usize,
    pub actual: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_mentions_status_and_url() {
        let err = DashboardError::Http {
            status: 404,
            url: "http://example.test/results.json".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from http://example.test/results.json");
    }

    #[test]
    fn malformed_history_display() {
        let err = MalformedHistoryError {
            test: "a/test.html".into(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "history for 'a/test.html' has 2 results but 3 runs"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DashboardError = io.into();
        assert!(matches!(err, DashboardError::Io(_)));
    }
}
