//! External tests for results-file decoding and its hand-off to ingestion.

use test_history_dashboard::decode::decode_results;
use test_history_dashboard::*;

use test_history_dashboard::ResultCode::{Crash, Fail, NoData, Pass, Timeout};

// -- Shapes ------------------------------------------------------------------

#[test]
fn test_flattens_nested_trie() {
    let text = r#"{
        "buildNumbers": [3, 2, 1],
        "tests": {
            "fast": {
                "css": { "a.html": { "results": [[3, "P"]] } },
                "dom": { "b.html": { "results": [[1, "C"], [2, "T"]] } }
            }
        }
    }"#;
    let payload = decode_results(text, "Mac10", None).unwrap();
    assert_eq!(payload.results_by_test_name.len(), 2);
    assert_eq!(payload.results_by_test_name["fast/css/a.html"], vec![Pass; 3]);
    assert_eq!(
        payload.results_by_test_name["fast/dom/b.html"],
        vec![Crash, Timeout, Timeout]
    );
}

#[test]
fn test_accepts_flat_names_and_runs_key() {
    let text = r#"{
        "runs": ["r2", "r1"],
        "tests": { "a/b/c.html": { "results": [[1, "N"], [1, "F"]], "times": [[2, 0]] } }
    }"#;
    let payload = decode_results(text, "Mac10", None).unwrap();
    assert_eq!(payload.runs, vec![RunId::from("r2"), RunId::from("r1")]);
    assert_eq!(payload.results_by_test_name["a/b/c.html"], vec![NoData, Fail]);
}

#[test]
fn test_builder_level_is_optional() {
    let wrapped = r#"{"version": 4, "Win7": {"buildNumbers": [1], "tests": {"x.html": {"results": [[1, "P"]]}}}}"#;
    let bare = r#"{"buildNumbers": [1], "tests": {"x.html": {"results": [[1, "P"]]}}}"#;
    assert_eq!(
        decode_results(wrapped, "Win7", None).unwrap(),
        decode_results(bare, "Win7", None).unwrap()
    );
}

#[test]
fn test_jsonp_only_stripped_when_configured() {
    let text = "ADD_RESULTS({\"buildNumbers\": [1], \"tests\": {}});";
    assert!(decode_results(text, "Mac10", Some("ADD_RESULTS")).is_ok());
    assert!(decode_results(text, "Mac10", None).is_err());
}

// -- Failures ----------------------------------------------------------------

#[test]
fn test_missing_runs_is_decode_error() {
    let err = decode_results(r#"{"tests": {}}"#, "Mac10", None).unwrap_err();
    match err {
        DashboardError::Decode { builder, detail } => {
            assert_eq!(builder, "Mac10");
            assert!(detail.contains("run list"), "{detail}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_tests_is_decode_error() {
    assert!(decode_results(r#"{"buildNumbers": [1]}"#, "Mac10", None).is_err());
}

#[test]
fn test_non_scalar_run_id_is_decode_error() {
    let text = r#"{"buildNumbers": [[1]], "tests": {}}"#;
    assert!(decode_results(text, "Mac10", None).is_err());
}

#[test]
fn test_undecodable_test_is_dropped_others_kept() {
    let text = r#"{
        "buildNumbers": [1, 2],
        "tests": {
            "good.html": { "results": [[2, "P"]] },
            "bad.html": { "results": [[2, "?"]] }
        }
    }"#;
    let payload = decode_results(text, "Mac10", None).unwrap();
    assert!(payload.results_by_test_name.contains_key("good.html"));
    assert!(!payload.results_by_test_name.contains_key("bad.html"));
}

// -- Hand-off to ingestion ---------------------------------------------------

#[test]
fn test_run_length_mismatch_is_rejected_by_ingest() {
    let text = r#"{
        "buildNumbers": [3, 2, 1],
        "tests": {
            "full.html": { "results": [[3, "P"]] },
            "short.html": { "results": [[2, "P"]] }
        }
    }"#;
    let payload = decode_results(text, "Mac10", None).unwrap();
    let mut index = TestIndex::new();
    let outcome = ingest(&Builder::new("Mac10"), payload, &mut index);

    assert_eq!(outcome.skipped_count(), 1);
    assert_eq!(outcome.skipped[0].test, "short.html");
    assert_eq!(outcome.skipped[0].expected, 3);
    assert_eq!(outcome.skipped[0].actual, 2);
    assert!(index.find_test("full.html").is_some());
    assert!(index.find_test("short.html").is_none());
}
