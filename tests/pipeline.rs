#[path = "common/mod.rs"]
mod common;

use common::*;
use tetl::TweetETL;

/// End to end: parse -> ingest -> dedupe -> all analyses, against a durable
/// store file.
#[test]
fn full_run_produces_summary() {
    let dir = scratch_dir();
    let input = dir.join("dump.csv");
    let store = dir.join("store.jsonl");

    let mut rows = basic_rows();
    // One duplicate of id 2 and one malformed row with an embedded comma.
    rows.push(csv_row("2", "alice", "2019-03-01 10:30:00", "still hacking #rust #etl", "51.5080", "-0.1290"));
    rows.push(csv_row("6", "mallory", "2019-03-01 13:00:00", "hi, there", "0", "0"));
    write_lines(&input, &rows);

    let summary = TweetETL::new()
        .store_path(&store)
        .progress(false)
        .run(&input)
        .unwrap();

    assert_eq!(summary.ingested, 6);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.dedupe.duplicate_groups, 1);
    assert_eq!(summary.dedupe.removed, 1);

    // Five unique records feed the analyses.
    assert_eq!(summary.analyses.concentration.total, 5);
    assert_eq!(summary.analyses.posters.ranked.len(), 3);
    assert_eq!(summary.analyses.span.earliest, "2019-03-01 10:00:00");
    assert_eq!(summary.analyses.span.latest, "2019-03-01 12:00:00");

    // The summary renders and serializes.
    let text = format!("{summary}");
    assert!(text.contains("ingested 6 records"));
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"duplicate_groups\":1"));
}

/// Analysis-only mode reuses a store written by a previous run.
#[test]
fn analyze_only_reuses_persisted_store() {
    let dir = scratch_dir();
    let input = dir.join("dump.csv");
    let store = dir.join("store.jsonl");
    write_lines(&input, &basic_rows());

    let summary = TweetETL::new()
        .store_path(&store)
        .progress(false)
        .run(&input)
        .unwrap();

    let report = TweetETL::new()
        .store_path(&store)
        .progress(false)
        .analyze()
        .unwrap();

    assert_eq!(report.concentration.total, summary.analyses.concentration.total);
    assert_eq!(report.posters.ranked, summary.analyses.posters.ranked);
    assert_eq!(report.unigrams.ranked, summary.analyses.unigrams.ranked);
    assert_eq!(report.geo.ranked, summary.analyses.geo.ranked);
}

#[test]
fn analyze_only_requires_a_store_path() {
    assert!(TweetETL::new().progress(false).analyze().is_err());
}

/// An in-memory run (no store_path) works the same way.
#[test]
fn in_memory_run() {
    let dir = scratch_dir();
    let input = dir.join("dump.csv");
    write_lines(&input, &basic_rows());

    let summary = TweetETL::new().progress(false).run(&input).unwrap();
    assert_eq!(summary.ingested, 5);
    assert_eq!(summary.dedupe.removed, 0);
    assert!((summary.analyses.hashtags.per_post - 0.6).abs() < 1e-9);
}

/// An empty input terminates the run with an explicit analysis failure
/// rather than a NaN-laced report.
#[test]
fn empty_input_fails_explicitly() {
    let dir = scratch_dir();
    let input = dir.join("empty.csv");
    write_lines(&input, &[]);

    let err = TweetETL::new().progress(false).run(&input).unwrap_err();
    assert!(format!("{err:#}").contains("analysis"));
}
