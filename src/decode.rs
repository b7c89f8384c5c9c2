//! Decoding of builder results files into [`RawHistoryPayload`]s.
//!
//! ## Accepted shape
//! ```json
//! ADD_RESULTS({
//!   "Mac10": {
//!     "buildNumbers": [102, 101, 100],
//!     "tests": {
//!       "fast": { "css": { "a.html": { "results": [[2, "P"], [1, "F"]] } } },
//!       "b/test.html": { "results": [[3, "P"]] }
//!     }
//!   }
//! });
//! ```
//! - The JSONP wrapper is only removed when a callback name is configured.
//! - The builder-name level is optional.
//! - `tests` may be a trie of path components, a flat map, or both; a node
//!   with a `results` key is a leaf named by its `/`-joined path.
//! - `results` is run-length encoded as `[count, code]` pairs.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::DashboardError;
use crate::ingest::RawHistoryPayload;
use crate::model::{ResultCode, RunId};

/// Upper bound on the expanded length of one test's results.
const MAX_EXPANDED_RESULTS: u64 = 100_000;

/// Decode a results file for `builder_name`.
///
/// Structural problems (invalid JSON, no run list, no tests object) fail the
/// whole payload. Individual tests with undecodable results are dropped and
/// logged; length mismatches are left for ingestion to reject.
pub fn decode_results(
    text: &str,
    builder_name: &str,
    jsonp_callback: Option<&str>,
) -> Result<RawHistoryPayload, DashboardError> {
    let body = match jsonp_callback {
        Some(callback) => strip_jsonp(text, callback),
        None => text.to_string(),
    };

    let root: Value = serde_json::from_str(&body)
        .map_err(|e| DashboardError::decode(builder_name, e.to_string()))?;
    let mut node = root
        .as_object()
        .ok_or_else(|| DashboardError::decode(builder_name, "top level is not an object"))?;
    if let Some(inner) = node.get(builder_name).and_then(Value::as_object) {
        node = inner;
    }

    let runs = node
        .get("buildNumbers")
        .or_else(|| node.get("runs"))
        .and_then(Value::as_array)
        .ok_or_else(|| DashboardError::decode(builder_name, "missing run list"))?
        .iter()
        .map(run_id)
        .collect::<Option<Vec<RunId>>>()
        .ok_or_else(|| DashboardError::decode(builder_name, "run ids must be numbers or strings"))?;

    let tests = node
        .get("tests")
        .and_then(Value::as_object)
        .ok_or_else(|| DashboardError::decode(builder_name, "missing tests object"))?;

    let mut results_by_test_name = HashMap::new();
    collect_tests(tests, "", builder_name, &mut results_by_test_name);

    Ok(RawHistoryPayload {
        runs,
        results_by_test_name,
    })
}

/// Remove whole-line `//` comments and a `callback( ... );` wrapper.
///
/// The wrapper is only removed when both the opening `callback(` and the
/// closing `)` are present; otherwise the comment-stripped text is returned.
pub fn strip_jsonp(text: &str, callback: &str) -> String {
    let without_comments = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n");

    let unwrapped = without_comments
        .trim_start()
        .strip_prefix(callback)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| {
            let rest = rest.trim_end();
            let rest = rest.strip_suffix(';').unwrap_or(rest);
            rest.strip_suffix(')')
        });

    match unwrapped {
        Some(inner) => inner.to_string(),
        None => without_comments,
    }
}

fn run_id(value: &Value) -> Option<RunId> {
    match value {
        Value::Number(n) => Some(RunId(n.to_string())),
        Value::String(s) => Some(RunId(s.clone())),
        _ => None,
    }
}

fn collect_tests(
    node: &Map<String, Value>,
    prefix: &str,
    builder_name: &str,
    out: &mut HashMap<String, Vec<ResultCode>>,
) {
    for (key, child) in node {
        let Some(child) = child.as_object() else {
            continue;
        };
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}/{key}")
        };

        match child.get("results") {
            Some(results) => match expand_run_lengths(results) {
                Ok(codes) => {
                    out.insert(name, codes);
                }
                Err(detail) => {
                    warn!(builder = builder_name, test = %name, %detail, "dropping undecodable results");
                }
            },
            None => collect_tests(child, &name, builder_name, out),
        }
    }
}

/// Expand `[[count, code], ...]` into one code per run.
pub fn expand_run_lengths(value: &Value) -> Result<Vec<ResultCode>, String> {
    let pairs = value
        .as_array()
        .ok_or_else(|| "results must be an array".to_string())?;

    let mut codes = Vec::new();
    let mut total: u64 = 0;
    for pair in pairs {
        let (count, code) = match pair.as_array().map(Vec::as_slice) {
            Some([count, code]) => (count, code),
            _ => return Err(format!("expected [count, code], got {pair}")),
        };
        let count = count
            .as_u64()
            .ok_or_else(|| format!("invalid run count {count}"))?;
        let code = code
            .as_str()
            .and_then(ResultCode::from_code)
            .ok_or_else(|| format!("unknown result code {code}"))?;

        total = total
            .checked_add(count)
            .filter(|t| *t <= MAX_EXPANDED_RESULTS)
            .ok_or_else(|| format!("more than {MAX_EXPANDED_RESULTS} results"))?;
        codes.extend(std::iter::repeat(code).take(count as usize));
    }
    Ok(codes)
}
