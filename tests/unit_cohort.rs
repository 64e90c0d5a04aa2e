// Unit tests for cohort aggregation and the document store.
//
// Covers vocabulary union versus summed unique counts, merging partial
// aggregates computed from separate batches, filters, and distinct
// metadata queries.

use std::collections::BTreeSet;

use wordprint::cohort::aggregate::{finish_all, merge_partials, partials};
use wordprint::cohort::{
    aggregate, aggregate_cohorts, aggregate_matching, CohortAccumulator, CohortFilter, CohortKey,
    GroupBy,
};
use wordprint::document::{DocumentMetadata, DocumentRecord, DocumentStore, MemoryStore};
use wordprint::error::AnalysisError;
use wordprint::stats::analyze;

fn record(
    author: &str,
    group: u32,
    course: u8,
    faculty: &str,
    tokens: &[&str],
) -> DocumentRecord {
    let mut metadata = DocumentMetadata::new(format!("{author} report"), author);
    metadata.group = Some(group);
    metadata.course = Some(course);
    metadata.faculty = Some(faculty.to_string());
    DocumentRecord {
        metadata,
        stats: analyze(tokens, 25).unwrap(),
        fingerprint: None,
        raw_chars: tokens.len() * 6,
        clean_chars: tokens.len() * 5,
    }
}

fn corpus() -> Vec<DocumentRecord> {
    vec![
        record("ann", 1304, 2, "FKTI", &["hello", "world"]),
        record("ann", 1304, 2, "FKTI", &["world", "peace"]),
        record("bob", 1304, 2, "FKTI", &["compiler", "parser", "world"]),
        record("cid", 1305, 2, "FKTI", &["lattice", "crystal", "phonon", "lattice"]),
        record("dan", 2201, 3, "FEL", &["circuit", "voltage"]),
        record("eve", 2201, 3, "FEL", &["voltage", "current", "hello"]),
    ]
}

fn strings(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// Vocabulary union
// ============================================================

#[test]
fn union_counts_shared_words_once() {
    let records = vec![
        record("ann", 1, 1, "F", &["hello", "world"]),
        record("ann", 1, 1, "F", &["world", "peace"]),
    ];
    let agg = aggregate_matching(&records, &CohortFilter::group(1)).unwrap();
    assert_eq!(agg.union_vocabulary, strings(&["hello", "world", "peace"]));
    assert_eq!(agg.union_unique_count, 3);
    for r in &records {
        assert_eq!(r.stats.unique_count, 2);
    }
}

#[test]
fn split_batches_merge_to_whole() {
    let records = corpus();
    let whole = aggregate(&records, |r| r.metadata.faculty.clone());

    for split in 0..=records.len() {
        let (left, right) = records.split_at(split);
        let merged = finish_all(merge_partials(
            partials(left, |r| r.metadata.faculty.clone()),
            partials(right, |r| r.metadata.faculty.clone()),
        ));
        assert_eq!(merged.len(), whole.len(), "split at {split}");
        for (key, agg) in &whole {
            let other = &merged[key];
            assert_eq!(other.union_unique_count, agg.union_unique_count, "split at {split}");
            assert_eq!(other.report_count, agg.report_count);
            assert!((other.avg_unique_count - agg.avg_unique_count).abs() < 0.001);
        }
    }
}

#[test]
fn accumulator_merge_is_associative() {
    let records = corpus();
    let acc = |slice: &[DocumentRecord]| {
        let mut a = CohortAccumulator::empty();
        for r in slice {
            a.push(r);
        }
        a
    };
    let (a, b, c) = (acc(&records[..2]), acc(&records[2..4]), acc(&records[4..]));

    let left = a.clone().merge(b.clone()).merge(c.clone());
    let right = a.merge(b.merge(c));
    assert_eq!(left.count(), records.len());
    assert_eq!(right.count(), records.len());

    // Float sums may differ in the last bits with grouping, so means are
    // compared with a tolerance.
    let (l, r) = (left.finish(()).unwrap(), right.finish(()).unwrap());
    assert_eq!(l.union_vocabulary, r.union_vocabulary);
    assert_eq!(l.report_count, r.report_count);
    for (x, y) in [
        (l.avg_percent_unique, r.avg_percent_unique),
        (l.avg_unique_count, r.avg_unique_count),
        (l.avg_total_tokens, r.avg_total_tokens),
        (l.avg_raw_chars, r.avg_raw_chars),
        (l.avg_clean_chars, r.avg_clean_chars),
    ] {
        assert!((x - y).abs() < 0.001, "{x} vs {y}");
    }
}

// ============================================================
// Filters and partitions
// ============================================================

#[test]
fn group_means() {
    let agg = aggregate_matching(&corpus(), &CohortFilter::group(1304)).unwrap();
    assert_eq!(agg.report_count, 3);
    // unique counts 2, 2, 3
    assert!((agg.avg_unique_count - 7.0 / 3.0).abs() < 0.001);
    assert!((agg.avg_total_tokens - 7.0 / 3.0).abs() < 0.001);
    assert_eq!(
        agg.union_vocabulary,
        strings(&["hello", "world", "peace", "compiler", "parser"])
    );
}

#[test]
fn no_match_is_empty_cohort() {
    let err = aggregate_matching(&corpus(), &CohortFilter::group(9999)).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyCohort { .. }));
}

#[test]
fn groups_within_course() {
    let filter = CohortFilter {
        course: Some(2),
        ..Default::default()
    };
    let cohorts = aggregate_cohorts(&corpus(), GroupBy::Group, &filter);
    let keys: Vec<CohortKey> = cohorts.keys().cloned().collect();
    assert_eq!(keys, vec![CohortKey::Group(1304), CohortKey::Group(1305)]);
    assert_eq!(cohorts[&CohortKey::Group(1305)].union_unique_count, 3);
}

#[test]
fn wildcard_filter_matches_everything() {
    let agg = aggregate_matching(&corpus(), &CohortFilter::default()).unwrap();
    assert_eq!(agg.report_count, 6);
}

// ============================================================
// Store
// ============================================================

#[test]
fn store_distinct_values_sorted() {
    let store = MemoryStore::from_records(corpus()).unwrap();
    assert_eq!(store.len().unwrap(), 6);
    assert_eq!(store.faculties().unwrap(), vec!["FEL", "FKTI"]);
    assert_eq!(store.courses().unwrap(), vec![2, 3]);
    assert!(store.departments().unwrap().is_empty());
}

#[test]
fn store_find_then_aggregate() {
    let store = MemoryStore::from_records(corpus()).unwrap();
    let filter = CohortFilter {
        faculty: Some("FEL".into()),
        ..Default::default()
    };
    let found = store.find(&filter).unwrap();
    assert_eq!(found.len(), 2);
    let agg = aggregate_matching(&found, &filter).unwrap();
    assert_eq!(agg.union_unique_count, 4);
}
