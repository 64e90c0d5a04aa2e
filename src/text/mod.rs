// Text normalization: raw text to lemma tokens, plus the pluggable
// lemmatizer and stop-word capabilities it consumes.

pub mod language;
pub mod lemma;
pub mod normalize;
pub mod stopwords;
pub mod traits;

pub use language::Language;
pub use normalize::{NormalizedText, Normalizer, DEFAULT_PUNCTUATION};
pub use traits::{Analysis, Lemmatizer, StopWordFilter};
