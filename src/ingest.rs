//! History ingestion: merge one builder's decoded payload into a [`TestIndex`].
//!
//! Each `(test name, result codes)` entry is checked against the payload's
//! run sequence. An entry whose length disagrees is skipped and reported as a
//! [`MalformedHistoryError`]; it is never registered in the index. Valid
//! entries overwrite whatever that builder previously reported for the test
//! and leave other builders' entries untouched.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::MalformedHistoryError;
use crate::index::TestIndex;
use crate::model::{Builder, BuilderHistory, ResultCode, RunId, TestResultHistory};

/// A builder's history as produced by the fetch/decode step: one run
/// sequence plus one result code per run for each test name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHistoryPayload {
    pub runs: Vec<RunId>,
    pub results_by_test_name: HashMap<String, Vec<ResultCode>>,
}

/// What one call to [`ingest`] wrote, plus the entries it had to drop.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub history: BuilderHistory,
    /// Dropped entries, ordered by test name.
    pub skipped: Vec<MalformedHistoryError>,
}

impl IngestOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn ingested_count(&self) -> usize {
        self.history.results_by_test.len()
    }
}

/// Merge `payload` for `builder` into `index`.
///
/// Never fails: malformed entries are collected in
/// [`IngestOutcome::skipped`] and logged. Ingesting the same payload twice
/// leaves the index as it was after the first call.
pub fn ingest(builder: &Builder, payload: RawHistoryPayload, index: &mut TestIndex) -> IngestOutcome {
    let RawHistoryPayload {
        runs,
        results_by_test_name,
    } = payload;
    let expected = runs.len();
    let shared_runs: Arc<[RunId]> = Arc::from(runs.as_slice());

    let mut results_by_test = HashMap::with_capacity(results_by_test_name.len());
    let mut skipped = Vec::new();

    for (name, codes) in results_by_test_name {
        if codes.len() != expected {
            warn!(
                builder = %builder.name,
                test = %name,
                expected,
                actual = codes.len(),
                "skipping malformed history"
            );
            skipped.push(MalformedHistoryError {
                test: name,
                expected,
                actual: codes.len(),
            });
            continue;
        }

        let test = index.find_or_create_test(&name);
        let history = TestResultHistory::new(shared_runs.clone(), codes);
        index
            .results_for_test(&test)
            .insert(builder.clone(), history.clone());
        results_by_test.insert(test, history);
    }

    skipped.sort_by(|a, b| a.test.cmp(&b.test));
    index.record_runs(builder, runs.clone());

    debug!(
        builder = %builder.name,
        runs = expected,
        ingested = results_by_test.len(),
        skipped = skipped.len(),
        "ingested builder history"
    );

    IngestOutcome {
        history: BuilderHistory {
            builder: builder.clone(),
            runs,
            results_by_test,
        },
        skipped,
    }
}
