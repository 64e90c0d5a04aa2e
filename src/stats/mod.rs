// Per-document statistics: frequency profile, shingle fingerprint, and the
// containment similarity used to compare them.

pub mod fingerprint;
pub mod frequency;
pub mod similarity;

pub use fingerprint::{FingerprintSet, ShingleFingerprinter, DEFAULT_SHINGLE_WIDTH};
pub use frequency::{analyze, FrequencyStats, DEFAULT_TOP_K};
pub use similarity::{containment, SimilarityMatrix};
