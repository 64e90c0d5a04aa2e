// Cross-document comparisons built on containment similarity.
//
// Author comparison unions each author's vocabulary (same monoid as cohort
// aggregation) and compares the unions pairwise. Duplicate scanning compares
// shingle fingerprints of individual documents.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, info};

use super::aggregate::{aggregate, CohortAggregate};
use crate::document::DocumentRecord;
use crate::error::{AnalysisError, Result};
use crate::stats::{containment, SimilarityMatrix};

/// Union vocabulary per key.
pub fn vocabularies<K, F>(
    records: &[DocumentRecord],
    key_of: F,
) -> BTreeMap<K, BTreeSet<String>>
where
    K: Ord + Clone + Send,
    F: Fn(&DocumentRecord) -> Option<K> + Sync,
{
    aggregate(records, key_of)
        .into_iter()
        .map(|(key, agg): (K, CohortAggregate<K>)| (key, agg.union_vocabulary))
        .collect()
}

/// Containment matrix between authors of one group.
///
/// With an empty `authors` list every author with a report in the group is
/// compared. A requested author without reports still gets a row: their
/// cells are `DegenerateComparison`, not zeros.
pub fn compare_authors(
    records: &[DocumentRecord],
    group: u32,
    authors: &[String],
) -> SimilarityMatrix {
    let wanted: BTreeSet<&str> = authors.iter().map(String::as_str).collect();
    let mut vocab = vocabularies(records, |r| {
        let m = &r.metadata;
        let selected = wanted.is_empty() || wanted.contains(m.author.as_str());
        (m.group == Some(group) && selected).then(|| m.author.clone())
    });
    for author in &wanted {
        vocab.entry(author.to_string()).or_default();
    }

    info!(group, authors = vocab.len(), "Comparing author vocabularies");
    SimilarityMatrix::compute(vocab.into_iter().collect())
}

/// Two documents whose fingerprints overlap at or above the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicatePair {
    /// Index into the scanned record slice; `left < right`.
    pub left: usize,
    pub right: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DuplicateScan {
    /// Pairs at or above the threshold, highest score first.
    pub pairs: Vec<DuplicatePair>,
    /// Records that could not take part: no fingerprint kept, or too short
    /// to produce a single shingle.
    pub skipped: Vec<usize>,
}

/// Find near-duplicate documents by fingerprint containment.
pub fn near_duplicates(records: &[DocumentRecord], threshold: f64) -> Result<DuplicateScan> {
    if !(0.0..=100.0).contains(&threshold) {
        return Err(AnalysisError::InvalidConfig(format!(
            "duplicate threshold must be within 0..=100, got {threshold}"
        )));
    }

    let mut sets: Vec<(usize, BTreeSet<u32>)> = Vec::new();
    let mut skipped = Vec::new();
    for (i, record) in records.iter().enumerate() {
        match &record.fingerprint {
            Some(fp) if !fp.is_empty() => sets.push((i, fp.distinct())),
            _ => skipped.push(i),
        }
    }

    let n = sets.len();
    let mut pairs: Vec<DuplicatePair> = (0..n)
        .into_par_iter()
        .flat_map_iter(|a| (a + 1..n).map(move |b| (a, b)))
        .filter_map(|(a, b)| {
            // Both sets are non-empty, so containment cannot be degenerate.
            let score = containment(&sets[a].1, &sets[b].1).ok()?;
            (score >= threshold).then(|| DuplicatePair {
                left: sets[a].0,
                right: sets[b].0,
                score,
            })
        })
        .collect();
    pairs.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then_with(|| (x.left, x.right).cmp(&(y.left, y.right)))
    });

    debug!(
        compared = n,
        skipped = skipped.len(),
        flagged = pairs.len(),
        "Duplicate scan finished"
    );
    Ok(DuplicateScan { pairs, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentMetadata;
    use crate::stats::{analyze, ShingleFingerprinter};

    fn record(author: &str, group: u32, tokens: &[&str]) -> DocumentRecord {
        let mut metadata = DocumentMetadata::new("report", author);
        metadata.group = Some(group);
        DocumentRecord {
            metadata,
            stats: analyze(tokens, 25).unwrap(),
            fingerprint: Some(ShingleFingerprinter::with_width(3).unwrap().fingerprint(tokens)),
            raw_chars: 0,
            clean_chars: 0,
        }
    }

    #[test]
    fn test_author_matrix_uses_union_vocabularies() {
        let records = vec![
            record("ann", 1, &["a", "b"]),
            record("ann", 1, &["c", "d"]),
            record("bob", 1, &["a", "b", "c", "x", "y"]),
            record("cid", 2, &["a"]),
        ];
        let m = compare_authors(&records, 1, &[]);
        assert_eq!(m.subjects(), ["ann".to_string(), "bob".to_string()]);
        // ann = {a,b,c,d}, bob = {a,b,c,x,y}: 3 shared / 4
        let score = *m.get("ann", "bob").unwrap().as_ref().unwrap();
        assert!((score - 75.0).abs() < 1e-9, "got {score}");
        assert!(m.get("ann", "ann").unwrap().as_ref().unwrap().is_nan());
    }

    #[test]
    fn test_requested_author_without_reports_is_degenerate() {
        let records = vec![record("ann", 1, &["a"]), record("bob", 1, &["a"])];
        let m = compare_authors(&records, 1, &["ann".into(), "ghost".into()]);
        assert_eq!(m.len(), 2);
        assert!(matches!(
            m.get("ann", "ghost").unwrap(),
            Err(AnalysisError::DegenerateComparison { .. })
        ));
        assert!(m.get("bob", "ann").is_none());
    }

    #[test]
    fn test_near_duplicates() {
        let shared = ["the", "quick", "brown", "fox", "jumps", "over"];
        let mut copy = shared.to_vec();
        copy.extend(["lazy", "dogs"]);
        let records = vec![
            record("ann", 1, &shared),
            record("bob", 1, &copy),
            record("cid", 1, &["entirely", "different", "words", "here"]),
            record("dan", 1, &["too", "short"]),
        ];
        let scan = near_duplicates(&records, 50.0).unwrap();
        assert_eq!(scan.skipped, vec![3]);
        assert_eq!(scan.pairs.len(), 1);
        assert_eq!((scan.pairs[0].left, scan.pairs[0].right), (0, 1));
        assert_eq!(scan.pairs[0].score, 100.0);
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(near_duplicates(&[], 150.0).is_err());
    }
}
