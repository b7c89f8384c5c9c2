//! Query engine over a [`TestIndex`].
//!
//! Matching is binary (no ranking) and case-insensitive. An empty query
//! matches nothing here; showing everything for an empty search box is the
//! caller's decision (see [`Dashboard::visible_tests`]).
//!
//! [`Dashboard::visible_tests`]: crate::dashboard::Dashboard::visible_tests

use serde::Serialize;

use crate::index::TestIndex;
use crate::model::Test;
use crate::util::{contains_ignore_case, starts_with_ignore_case};

pub fn all_tests(index: &TestIndex) -> Vec<Test> {
    index.all_tests()
}

/// Tests whose full name contains `query`, ignoring case.
pub fn tests_matching_search_string(index: &TestIndex, query: &str) -> Vec<Test> {
    if query.is_empty() {
        return Vec::new();
    }
    index
        .all_tests()
        .into_iter()
        .filter(|t| contains_ignore_case(t.name(), query))
        .collect()
}

/// Tests whose full name starts with `prefix`, ignoring case.
pub fn tests_with_prefix(index: &TestIndex, prefix: &str) -> Vec<Test> {
    if prefix.is_empty() {
        return Vec::new();
    }
    index
        .all_tests()
        .into_iter()
        .filter(|t| starts_with_ignore_case(t.name(), prefix))
        .collect()
}

/// Ascending lexicographic order by full name.
pub fn sorted_by_name(mut tests: Vec<Test>) -> Vec<Test> {
    tests.sort();
    tests
}

/// One page of a materialized result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub page_count: usize,
}

/// Slice `items` into zero-based page `page`. A `page_size` of zero is
/// treated as one; a page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let page_count = total.div_ceil(page_size);
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total,
        page_count,
    }
}
