//! Aggregates test run history from CI builders into an index keyed by test
//! name, and answers search queries over it.
//!
//! ```rust,ignore
//! let source = HttpHistorySource::new(&config.fetch);
//! let mut dashboard = Dashboard::new(config.builders);
//! let report = dashboard.load(&source).await;
//! let rows = dashboard.rows("fast/css", SearchMode::Substring, 0, 50);
//! ```

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod decode;
pub mod error;
pub mod index;
pub mod ingest;
pub mod model;
pub mod query;
pub mod report;
pub mod source;
pub mod util;

pub use dashboard::{Dashboard, LoadReport, SearchMode, TestOverview};
pub use error::{DashboardError, MalformedHistoryError};
pub use index::TestIndex;
pub use ingest::{ingest, IngestOutcome, RawHistoryPayload};
pub use model::{Builder, BuilderHistory, ResultCode, RunId, Test, TestResultHistory};
pub use source::{HistorySource, HttpHistorySource};
