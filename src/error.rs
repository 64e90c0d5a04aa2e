// Error kinds for the analysis core.
//
// Each variant is terminal for the one invocation that raised it: a single
// empty document, degenerate pair or empty cohort never aborts its siblings.
// Application code wraps these in anyhow; the core returns them typed so
// callers can tell "could not compute" apart from a real zero.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The lemmatizer could not be built or could not answer.
    #[error("linguistic backend unavailable: {reason}")]
    LinguisticBackendUnavailable { reason: String },

    /// Normalization left no tokens, so per-token ratios are undefined.
    #[error("document has no tokens after normalization")]
    EmptyDocument,

    /// One side of a similarity comparison is an empty set.
    #[error("cannot compare sets of sizes {left} and {right}: containment needs two non-empty sets")]
    DegenerateComparison { left: usize, right: usize },

    /// A cohort filter matched zero documents.
    #[error("no documents match cohort {filter}")]
    EmptyCohort { filter: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    pub fn backend_unavailable(reason: impl Into<String>) -> Self {
        AnalysisError::LinguisticBackendUnavailable {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
