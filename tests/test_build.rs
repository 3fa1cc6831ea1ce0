//! Build pipeline tests: normalization, deduplication and the skip limit.
#![recursion_limit = "256"]

mod common;

use common::*;
use scryfall_store::{BlobBuilder, BuildOptions, NormalizeIssue, NormalizeOptions, StatPolicy, StoreError};
use serde_json::json;

fn options(max_skip_ratio: f64) -> BuildOptions {
    BuildOptions {
        max_skip_ratio,
        ..BuildOptions::default()
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[test]
fn sample_report() {
    let built = BlobBuilder::default()
        .build(&raw_records(sample_records()))
        .unwrap();
    let report = &built.report;
    assert_eq!(report.source_records, 5);
    assert_eq!(report.cards, 3);
    assert_eq!(report.printings, 5);
    assert_eq!(report.skipped_cards, 0);
    assert_eq!(report.duplicates_replaced, 0);
    assert_eq!(report.duplicates_dropped, 2);
    assert!(report.issues.is_empty());
    assert_eq!(report.skip_ratio(), 0.0);
}

#[test]
fn normalize_keeps_first_seen_card_order() {
    let (cards, printings, _) =
        BlobBuilder::default().normalize(&raw_records(sample_records()));
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Lightning Bolt", "Delver of Secrets", "Tarmogoyf"]);
    assert_eq!(printings.len(), 5);
    assert_eq!(printings[3].scryfall_id, uuid(BOLT_PROMO));
}

#[test]
fn english_replacement_is_counted() {
    let (cards, _, report) =
        BlobBuilder::default().normalize(&raw_records(vec![bolt_japanese(), bolt()]));
    assert_eq!(report.duplicates_replaced, 1);
    assert_eq!(report.duplicates_dropped, 0);
    assert_eq!(cards[0].scryfall_id, uuid(BOLT_A25));
}

#[test]
fn reversible_record_yields_a_card_per_face() {
    let (cards, printings, report) =
        BlobBuilder::default().normalize(&raw_records(vec![reversible(), bolt()]));
    assert_eq!(report.source_records, 2);
    assert_eq!(report.cards, 3);
    assert_eq!(report.skipped_cards, 0);
    assert_eq!(printings.len(), 2);
    let oracle_ids: Vec<_> = cards.iter().map(|c| c.oracle_id.unwrap()).collect();
    assert_eq!(
        oracle_ids,
        vec![
            uuid(REVERSIBLE_FRONT_ORACLE),
            uuid(REVERSIBLE_BACK_ORACLE),
            uuid(BOLT_ORACLE)
        ]
    );
}

#[test]
fn empty_input_builds_empty_blobs() {
    let built = BlobBuilder::default().build(&[]).unwrap();
    assert_eq!(built.report.source_records, 0);
    assert!(!built.card_blob.is_empty());
    assert!(!built.printing_blob.is_empty());
}

// ---------------------------------------------------------------------------
// Skips
// ---------------------------------------------------------------------------

#[test]
fn skip_limit_fails_the_build() {
    let records = raw_records(vec![bolt(), without_oracle()]);
    let err = BlobBuilder::default().build(&records).unwrap_err();
    assert!(matches!(
        err,
        StoreError::SkipRateExceeded { skipped: 1, total: 2, .. }
    ));
}

#[test]
fn skip_limit_is_inclusive() {
    let records = raw_records(vec![bolt(), without_oracle()]);
    let built = BlobBuilder::new(options(0.5)).build(&records).unwrap();
    assert_eq!(built.report.cards, 1);
    assert_eq!(built.report.skipped_cards, 1);
    // the printing survives even though the card was skipped
    assert_eq!(built.report.printings, 2);
    assert!(matches!(
        built.report.issues[0],
        NormalizeIssue::MissingOracleId { .. }
    ));
}

#[test]
fn unreadable_values_are_skipped() {
    let values = vec![bolt(), json!({ "name": "no id" }), delver()];
    let built = BlobBuilder::new(options(0.5)).build_values(values).unwrap();
    assert_eq!(built.report.source_records, 3);
    assert_eq!(built.report.skipped_cards, 1);
    assert_eq!(built.report.cards, 2);
    assert!(matches!(
        built.report.issues[0],
        NormalizeIssue::Unreadable { index: 1, .. }
    ));
}

#[test]
fn duplicate_printing_keeps_the_first() {
    let second = with(bolt(), json!({ "set": "2xm" }));
    let (_, printings, report) =
        BlobBuilder::default().normalize(&raw_records(vec![bolt(), second]));
    assert_eq!(printings.len(), 1);
    assert_eq!(printings[0].set_code, "a25");
    assert!(report
        .issues
        .iter()
        .any(|i| matches!(i, NormalizeIssue::DuplicatePrinting { .. })));
}

#[test]
fn strict_policy_skips_malformed_stats() {
    let mut values = sample_records();
    values[2] = with(tarmogoyf(), json!({ "power": "1.5?" }));
    let records = raw_records(values);

    let strict = BuildOptions {
        normalize: NormalizeOptions {
            stat_policy: StatPolicy::Strict,
        },
        ..options(0.5)
    };
    let built = BlobBuilder::new(strict).build(&records).unwrap();
    assert_eq!(built.report.skipped_cards, 1);
    assert_eq!(built.report.cards, 2);

    // the default policy keeps the card and records the issue
    let built = BlobBuilder::default().build(&records).unwrap();
    assert_eq!(built.report.skipped_cards, 0);
    assert_eq!(built.report.cards, 3);
    assert_eq!(built.report.issues.len(), 1);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn same_input_builds_identical_blobs() {
    let records = raw_records(sample_records());
    let a = BlobBuilder::default().build(&records).unwrap();
    let b = BlobBuilder::default().build(&records).unwrap();
    assert_eq!(a.card_blob, b.card_blob);
    assert_eq!(a.printing_blob, b.printing_blob);
}
