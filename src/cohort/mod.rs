// Cohort statistics: documents partitioned by metadata and reduced to
// averages and vocabulary unions, plus comparisons between partitions.

pub mod aggregate;
pub mod compare;
pub mod filter;

pub use aggregate::{
    aggregate, aggregate_cohorts, aggregate_matching, rank_within, CohortAccumulator,
    CohortAggregate,
};
pub use compare::{compare_authors, near_duplicates, vocabularies, DuplicatePair, DuplicateScan};
pub use filter::{CohortFilter, CohortKey, GroupBy};
