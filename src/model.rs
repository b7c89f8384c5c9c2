//! Core data types: tests, builders, runs and per-run result histories.
//!
//! ## Run ordering
//! Every run sequence and every history in this crate lists the newest run at
//! index 0. The only property the index relies on is the positional alignment
//! `history[i] <-> runs[i]`.

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Test
// ---------------------------------------------------------------------------

/// A test, identified by its fully-qualified slash-delimited name.
///
/// Tests are interned by [`TestIndex`](crate::index::TestIndex): every clone
/// handed out for the same name shares one allocation, so [`Test::ptr_eq`]
/// holds for two lookups of the same name. Equality, ordering and hashing
/// are by name.
#[derive(Clone)]
pub struct Test {
    name: Arc<str>,
}

impl Test {
    pub(crate) fn new(name: &str) -> Self {
        Test { name: Arc::from(name) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both handles refer to the same interned entity.
    pub fn ptr_eq(a: &Test, b: &Test) -> bool {
        Arc::ptr_eq(&a.name, &b.name)
    }
}

impl PartialEq for Test {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Test {}

impl Hash for Test {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Test {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Test {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Test").field(&self.name()).finish()
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Test {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// A CI builder producing test runs.
///
/// Identity is the name alone; `url` is endpoint metadata used by
/// [`HttpHistorySource`](crate::source::HttpHistorySource).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Builder {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Self {
        Builder {
            name: name.into(),
            url: None,
        }
    }

    pub fn with_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Builder {
            name: name.into(),
            url: Some(url.into()),
        }
    }
}

impl PartialEq for Builder {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Builder {}

impl Hash for Builder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Builder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Builder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Runs and result codes
// ---------------------------------------------------------------------------

/// Opaque identifier of one executed build (usually a build number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl From<u64> for RunId {
    fn from(n: u64) -> Self {
        RunId(n.to_string())
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        RunId(s.to_string())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single test in a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Pass,
    /// Text or audio mismatch.
    Fail,
    /// Pixel or image mismatch.
    Image,
    Crash,
    Timeout,
    Skip,
    /// Expected output was missing.
    Missing,
    /// The run produced no data for this test.
    NoData,
}

impl ResultCode {
    /// Decode a one-letter wire code. Returns `None` for unknown letters.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "P" => Some(ResultCode::Pass),
            "F" | "A" | "L" => Some(ResultCode::Fail),
            "I" | "Z" => Some(ResultCode::Image),
            "C" => Some(ResultCode::Crash),
            "T" => Some(ResultCode::Timeout),
            "X" => Some(ResultCode::Skip),
            "O" => Some(ResultCode::Missing),
            "N" => Some(ResultCode::NoData),
            _ => None,
        }
    }

    /// The canonical one-letter wire code.
    pub fn code(self) -> char {
        match self {
            ResultCode::Pass => 'P',
            ResultCode::Fail => 'F',
            ResultCode::Image => 'I',
            ResultCode::Crash => 'C',
            ResultCode::Timeout => 'T',
            ResultCode::Skip => 'X',
            ResultCode::Missing => 'O',
            ResultCode::NoData => 'N',
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ResultCode::Fail
                | ResultCode::Image
                | ResultCode::Crash
                | ResultCode::Timeout
                | ResultCode::Missing
        )
    }
}

// ---------------------------------------------------------------------------
// Histories
// ---------------------------------------------------------------------------

/// Result codes of one test on one builder, positionally aligned with the
/// run sequence of the payload they came from. Gaps are explicit
/// [`ResultCode::NoData`] entries.
///
/// The run sequence travels with the history: a later payload for the same
/// builder that omits this test leaves both untouched. Serializes as the
/// result list alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResultHistory {
    runs: Arc<[RunId]>,
    results: Vec<ResultCode>,
}

impl Serialize for TestResultHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.results.serialize(serializer)
    }
}

/// Counts over one [`TestResultHistory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub passes: usize,
    pub failures: usize,
    pub skipped: usize,
    pub no_data: usize,
}

impl HistorySummary {
    /// Passes over runs that produced a pass/fail verdict, or `None` when
    /// there were none.
    pub fn pass_rate(&self) -> Option<f64> {
        let decided = self.passes + self.failures;
        if decided == 0 {
            None
        } else {
            Some(self.passes as f64 / decided as f64)
        }
    }
}

impl TestResultHistory {
    pub fn new(runs: impl Into<Arc<[RunId]>>, results: Vec<ResultCode>) -> Self {
        TestResultHistory {
            runs: runs.into(),
            results,
        }
    }

    /// Run sequence this history was ingested with; `runs()[i]` is the run
    /// that produced `results()[i]`.
    pub fn runs(&self) -> &[RunId] {
        &self.runs
    }

    /// Result for the run at `run_index`; `NoData` past the end.
    pub fn result_at(&self, run_index: usize) -> ResultCode {
        self.results
            .get(run_index)
            .copied()
            .unwrap_or(ResultCode::NoData)
    }

    pub fn results(&self) -> &[ResultCode] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> HistorySummary {
        let mut summary = HistorySummary::default();
        for code in &self.results {
            match code {
                ResultCode::Pass => summary.passes += 1,
                ResultCode::Skip => summary.skipped += 1,
                ResultCode::NoData => summary.no_data += 1,
                c if c.is_failure() => summary.failures += 1,
                _ => {}
            }
        }
        summary
    }

    pub fn pass_rate(&self) -> Option<f64> {
        self.summary().pass_rate()
    }
}

/// One builder's run sequence plus the histories ingested from one payload.
#[derive(Debug, Clone)]
pub struct BuilderHistory {
    pub builder: Builder,
    pub runs: Vec<RunId>,
    pub results_by_test: HashMap<Test, TestResultHistory>,
}
