// Cohort aggregation: per-partition averages and vocabulary unions.
//
// Every partition is reduced through a CohortAccumulator. Accumulators form a
// commutative monoid: `empty()` is the identity and `merge` combines sums,
// counts and vocabularies (set union). That is what lets rayon fold disjoint
// slices on different workers and reduce them in any order, and what lets a
// caller aggregate two batches separately and merge them later without
// reprocessing either.
//
// The union vocabulary is not the sum of per-document unique counts: words
// shared between documents are counted once.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filter::{CohortFilter, CohortKey, GroupBy};
use crate::document::DocumentRecord;
use crate::error::{AnalysisError, Result};

/// Finished statistics for one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortAggregate<K> {
    pub key: K,
    pub report_count: usize,
    pub avg_total_tokens: f64,
    pub avg_unique_count: f64,
    pub avg_percent_unique: f64,
    pub avg_raw_chars: f64,
    pub avg_clean_chars: f64,
    pub union_vocabulary: BTreeSet<String>,
    pub union_unique_count: usize,
}

/// Running sums for one partition. Means are only taken in `finish`, so
/// merging never averages averages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortAccumulator {
    count: usize,
    total_tokens: usize,
    unique_count: usize,
    percent_unique: f64,
    raw_chars: usize,
    clean_chars: usize,
    vocabulary: BTreeSet<String>,
}

impl CohortAccumulator {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn push(&mut self, record: &DocumentRecord) {
        let stats = &record.stats;
        self.count += 1;
        self.total_tokens += stats.total_tokens;
        self.unique_count += stats.unique_count;
        self.percent_unique += stats.percent_unique;
        self.raw_chars += record.raw_chars;
        self.clean_chars += record.clean_chars;
        self.vocabulary.extend(stats.unique_tokens.iter().cloned());
    }

    /// Combine two partial accumulators.
    pub fn merge(mut self, mut other: Self) -> Self {
        // Union into whichever side is already larger.
        if other.vocabulary.len() > self.vocabulary.len() {
            std::mem::swap(&mut self.vocabulary, &mut other.vocabulary);
        }
        self.vocabulary.append(&mut other.vocabulary);

        self.count += other.count;
        self.total_tokens += other.total_tokens;
        self.unique_count += other.unique_count;
        self.percent_unique += other.percent_unique;
        self.raw_chars += other.raw_chars;
        self.clean_chars += other.clean_chars;
        self
    }

    /// Turn sums into means. None when nothing was accumulated.
    pub fn finish<K>(self, key: K) -> Option<CohortAggregate<K>> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(CohortAggregate {
            key,
            report_count: self.count,
            avg_total_tokens: self.total_tokens as f64 / n,
            avg_unique_count: self.unique_count as f64 / n,
            avg_percent_unique: self.percent_unique / n,
            avg_raw_chars: self.raw_chars as f64 / n,
            avg_clean_chars: self.clean_chars as f64 / n,
            union_unique_count: self.vocabulary.len(),
            union_vocabulary: self.vocabulary,
        })
    }
}

/// Unfinished per-key accumulators, mergeable across batches.
pub type Partials<K> = BTreeMap<K, CohortAccumulator>;

/// Accumulate `records` by `key_of`, in parallel. Records for which `key_of`
/// returns None are left out.
pub fn partials<K, F>(records: &[DocumentRecord], key_of: F) -> Partials<K>
where
    K: Ord + Send,
    F: Fn(&DocumentRecord) -> Option<K> + Sync,
{
    records
        .par_iter()
        .fold(Partials::new, |mut acc, record| {
            if let Some(key) = key_of(record) {
                acc.entry(key).or_default().push(record);
            }
            acc
        })
        .reduce(Partials::new, merge_partials)
}

/// Merge two sets of partials key by key.
pub fn merge_partials<K: Ord>(mut left: Partials<K>, right: Partials<K>) -> Partials<K> {
    for (key, acc) in right {
        let merged = match left.remove(&key) {
            Some(existing) => existing.merge(acc),
            None => acc,
        };
        left.insert(key, merged);
    }
    left
}

/// Finish every partition. Keys come out in ascending order.
pub fn finish_all<K: Ord + Clone>(partials: Partials<K>) -> BTreeMap<K, CohortAggregate<K>> {
    partials
        .into_iter()
        .filter_map(|(key, acc)| acc.finish(key.clone()).map(|agg| (key, agg)))
        .collect()
}

/// Partition `records` by `key_of` and aggregate each partition.
pub fn aggregate<K, F>(records: &[DocumentRecord], key_of: F) -> BTreeMap<K, CohortAggregate<K>>
where
    K: Ord + Clone + Send,
    F: Fn(&DocumentRecord) -> Option<K> + Sync,
{
    let result = finish_all(partials(records, key_of));
    debug!(
        records = records.len(),
        partitions = result.len(),
        "Aggregated cohorts"
    );
    result
}

/// Partition the records matching `filter` by a metadata field.
pub fn aggregate_cohorts(
    records: &[DocumentRecord],
    group_by: GroupBy,
    filter: &CohortFilter,
) -> BTreeMap<CohortKey, CohortAggregate<CohortKey>> {
    aggregate(records, |r| {
        if filter.matches(&r.metadata) {
            group_by.key_of(r)
        } else {
            None
        }
    })
}

/// Aggregate every record matching `filter` into a single cohort.
///
/// A filter that matches nothing is `EmptyCohort`, which is different from a
/// cohort whose documents happen to be small.
pub fn aggregate_matching(
    records: &[DocumentRecord],
    filter: &CohortFilter,
) -> Result<CohortAggregate<CohortFilter>> {
    let acc = records
        .par_iter()
        .filter(|r| filter.matches(&r.metadata))
        .fold(CohortAccumulator::empty, |mut acc, record| {
            acc.push(record);
            acc
        })
        .reduce(CohortAccumulator::empty, CohortAccumulator::merge);

    acc.finish(filter.clone())
        .ok_or_else(|| AnalysisError::EmptyCohort {
            filter: filter.to_string(),
        })
}

/// Leaderboard order: by `outer(key)` ascending, then by average unique
/// count descending, then by key.
///
/// With keys like `(group, author)` and `outer = |k| k.0` this ranks authors
/// within each group.
pub fn rank_within<K, P, F>(
    aggregates: impl IntoIterator<Item = CohortAggregate<K>>,
    outer: F,
) -> Vec<CohortAggregate<K>>
where
    K: Ord,
    P: Ord,
    F: Fn(&K) -> P,
{
    let mut ranked: Vec<CohortAggregate<K>> = aggregates.into_iter().collect();
    ranked.sort_by(|a, b| {
        outer(&a.key)
            .cmp(&outer(&b.key))
            .then_with(|| b.avg_unique_count.total_cmp(&a.avg_unique_count))
            .then_with(|| a.key.cmp(&b.key))
    });
    ranked
}
