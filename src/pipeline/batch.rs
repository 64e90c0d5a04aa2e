// Batch processing on the rayon pool.

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use super::Pipeline;
use crate::document::{DocumentRecord, RawDocument};
use crate::error::Result;

/// Outcome of a batch: one result per input document, in input order.
pub struct BatchOutcome {
    pub results: Vec<Result<DocumentRecord>>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// The successful records, dropping failures.
    pub fn into_records(self) -> Vec<DocumentRecord> {
        self.results.into_iter().filter_map(|r| r.ok()).collect()
    }
}

impl Pipeline {
    /// Process every document independently. A failure is logged and kept in
    /// its slot; the rest of the batch carries on.
    pub fn process_batch(&self, documents: &[RawDocument]) -> BatchOutcome {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(documents.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  Analyzing [{bar:30}] {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let results: Vec<Result<DocumentRecord>> = documents
            .par_iter()
            .progress_with(pb.clone())
            .map(|doc| {
                let result = self.process(doc);
                if let Err(e) = &result {
                    warn!(
                        title = %doc.metadata.title,
                        author = %doc.metadata.author,
                        error = %e,
                        "Failed to analyze document, skipping"
                    );
                }
                result
            })
            .collect();
        pb.finish_and_clear();

        let outcome = BatchOutcome { results };
        info!(
            documents = documents.len(),
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "Batch analyzed"
        );
        outcome
    }
}
