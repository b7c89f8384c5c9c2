//! The dashboard controller.
//!
//! [`Dashboard`] owns the [`TestIndex`] for one session. [`Dashboard::load`]
//! starts every builder's fetch at once, ingests each payload on the calling
//! task as soon as it arrives, and returns only after every fetch has
//! settled. Queries run against the index afterwards, so they never observe
//! a partially loaded view.

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::index::TestIndex;
use crate::ingest::{ingest, IngestOutcome, RawHistoryPayload};
use crate::model::{Builder, HistorySummary, RunId, Test, TestResultHistory};
use crate::query::{self, Page};
use crate::source::HistorySource;
use crate::util::{average, median};

/// How a non-empty search string is matched against test names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Substring,
    Prefix,
}

/// Result of loading one builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuilderLoadStatus {
    Loaded { ingested: usize, skipped: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuilderLoad {
    pub builder: String,
    #[serde(flatten)]
    pub status: BuilderLoadStatus,
}

/// Per-builder results of one [`Dashboard::load`], ordered by builder name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub builders: Vec<BuilderLoad>,
}

impl LoadReport {
    pub fn failed(&self) -> impl Iterator<Item = &BuilderLoad> {
        self.builders
            .iter()
            .filter(|b| matches!(b.status, BuilderLoadStatus::Failed { .. }))
    }

    pub fn total_skipped(&self) -> usize {
        self.builders
            .iter()
            .map(|b| match b.status {
                BuilderLoadStatus::Loaded { skipped, .. } => skipped,
                BuilderLoadStatus::Failed { .. } => 0,
            })
            .sum()
    }
}

/// One builder's column in a test row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuilderColumn {
    pub builder: String,
    pub runs: Vec<RunId>,
    pub results: TestResultHistory,
    pub summary: HistorySummary,
}

/// Everything needed to render one test row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOverview {
    pub test: Test,
    pub builders: Vec<BuilderColumn>,
    /// Mean of the per-builder pass rates, over builders with any verdict.
    pub average_pass_rate: Option<f64>,
    pub median_pass_rate: Option<f64>,
}

pub struct Dashboard {
    builders: Vec<Builder>,
    index: TestIndex,
    loaded: bool,
}

impl Dashboard {
    /// A dashboard over `builders`, not yet loaded.
    ///
    /// Builders are identified by name: a repeated name keeps the position
    /// of its first occurrence and the URL of its last.
    pub fn new(builders: Vec<Builder>) -> Self {
        let mut unique: Vec<Builder> = Vec::with_capacity(builders.len());
        for builder in builders {
            match unique.iter_mut().find(|b| **b == builder) {
                Some(existing) => *existing = builder,
                None => unique.push(builder),
            }
        }
        Dashboard {
            builders: unique,
            index: TestIndex::new(),
            loaded: false,
        }
    }

    pub fn builders(&self) -> &[Builder] {
        &self.builders
    }

    pub fn index(&self) -> &TestIndex {
        &self.index
    }

    /// True once a [`load`](Self::load) has waited out every builder.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Fetch every builder's history from `source` concurrently and ingest
    /// each payload as it arrives.
    ///
    /// A failed fetch is logged and recorded in the report; it never stops
    /// the other builders. Returns after every fetch has completed.
    pub async fn load<S: HistorySource>(&mut self, source: &S) -> LoadReport {
        let mut pending: FuturesUnordered<_> = self
            .builders
            .iter()
            .map(|builder| async move { (builder, source.fetch_history(builder).await) })
            .collect();

        let mut report = LoadReport::default();
        while let Some((builder, fetched)) = pending.next().await {
            let status = match fetched {
                Ok(payload) => {
                    let outcome = ingest(builder, payload, &mut self.index);
                    BuilderLoadStatus::Loaded {
                        ingested: outcome.ingested_count(),
                        skipped: outcome.skipped_count(),
                    }
                }
                Err(e) => {
                    warn!(builder = %builder.name, error = %e, "failed to load builder history");
                    BuilderLoadStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.builders.push(BuilderLoad {
                builder: builder.name.clone(),
                status,
            });
        }

        report.builders.sort_by(|a, b| a.builder.cmp(&b.builder));
        self.loaded = true;

        info!(
            builders = report.builders.len(),
            failed = report.failed().count(),
            skipped = report.total_skipped(),
            tests = self.index.len(),
            "dashboard loaded"
        );
        report
    }

    /// Ingest an already-fetched payload for `builder`.
    ///
    /// The builder is added to the dashboard's builder list on first sight.
    pub fn ingest_payload(&mut self, builder: &Builder, payload: RawHistoryPayload) -> IngestOutcome {
        if !self.builders.contains(builder) {
            self.builders.push(builder.clone());
        }
        ingest(builder, payload, &mut self.index)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Tests to show for the search box contents, sorted by name.
    ///
    /// A blank query shows every test.
    pub fn visible_tests(&self, search: &str, mode: SearchMode) -> Vec<Test> {
        let search = search.trim();
        let tests = if search.is_empty() {
            query::all_tests(&self.index)
        } else {
            match mode {
                SearchMode::Substring => query::tests_matching_search_string(&self.index, search),
                SearchMode::Prefix => query::tests_with_prefix(&self.index, search),
            }
        };
        query::sorted_by_name(tests)
    }

    pub fn overview(&self, test: &Test) -> TestOverview {
        let builders: Vec<BuilderColumn> = self
            .index
            .results_for(test)
            .into_iter()
            .map(|(builder, results)| BuilderColumn {
                runs: results.runs().to_vec(),
                summary: results.summary(),
                builder: builder.name,
                results,
            })
            .collect();

        let pass_rates: Vec<f64> = builders
            .iter()
            .filter_map(|column| column.summary.pass_rate())
            .collect();

        TestOverview {
            test: test.clone(),
            average_pass_rate: average(&pass_rates),
            median_pass_rate: median(&pass_rates),
            builders,
        }
    }

    /// One page of row overviews for the search box contents.
    pub fn rows(&self, search: &str, mode: SearchMode, page: usize, page_size: usize) -> Page<TestOverview> {
        let tests = self.visible_tests(search, mode);
        let page = query::paginate(&tests, page, page_size);
        Page {
            items: page.items.iter().map(|t| self.overview(t)).collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            page_count: page.page_count,
        }
    }
}
