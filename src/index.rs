//! The test record store.
//!
//! [`TestIndex`] interns tests by name and keeps, for each test, the latest
//! history every builder reported for it. It is owned by one
//! [`Dashboard`](crate::dashboard::Dashboard) and mutated only by
//! [`ingest`](crate::ingest::ingest). Entries are never removed.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Builder, RunId, Test, TestResultHistory};

/// Per-builder histories for one test, ordered by builder name.
pub type BuilderResults = BTreeMap<Builder, TestResultHistory>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestIndex {
    tests: HashMap<String, Test>,
    results: HashMap<Test, BuilderResults>,
    runs: BTreeMap<Builder, Vec<RunId>>,
}

impl TestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Return the test registered under `name`, registering it first if this
    /// is the first time the name is seen.
    pub fn find_or_create_test(&mut self, name: &str) -> Test {
        if let Some(test) = self.tests.get(name) {
            return test.clone();
        }
        let test = Test::new(name);
        self.tests.insert(name.to_string(), test.clone());
        test
    }

    pub fn find_test(&self, name: &str) -> Option<Test> {
        self.tests.get(name).cloned()
    }

    /// Mutable per-builder map for `test`, created empty if absent.
    pub fn results_for_test(&mut self, test: &Test) -> &mut BuilderResults {
        self.results.entry(test.clone()).or_default()
    }

    pub(crate) fn record_runs(&mut self, builder: &Builder, runs: Vec<RunId>) {
        self.runs.insert(builder.clone(), runs);
    }

    // -----------------------------------------------------------------------
    // Lookups
    //
    // Unknown tests and builders yield empty results, never errors.
    // -----------------------------------------------------------------------

    /// Every registered test, in no particular order.
    pub fn all_tests(&self) -> Vec<Test> {
        self.tests.values().cloned().collect()
    }

    pub fn results_for(&self, test: &Test) -> BuilderResults {
        self.results.get(test).cloned().unwrap_or_default()
    }

    pub fn history_for(&self, test: &Test, builder: &Builder) -> Option<&TestResultHistory> {
        self.results.get(test)?.get(builder)
    }

    /// Run sequence from the latest ingestion for `builder`.
    ///
    /// Histories that payload omitted keep the runs they were ingested with;
    /// use [`TestResultHistory::runs`] to label a single history.
    pub fn runs_for_builder(&self, builder: &Builder) -> &[RunId] {
        self.runs.get(builder).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Builders that have been ingested at least once, ordered by name.
    pub fn builders(&self) -> Vec<Builder> {
        self.runs.keys().cloned().collect()
    }

    pub fn tests_for_builder(&self, builder: &Builder) -> Vec<Test> {
        self.results
            .iter()
            .filter(|(_, by_builder)| by_builder.contains_key(builder))
            .map(|(test, _)| test.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
