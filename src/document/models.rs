// Document models: the input handed over by ingestion and the record that
// the pipeline derives from it.
//
// These types carry no storage concerns; any store that can hold the fields
// below (and filter on the metadata) can back the aggregation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::{FingerprintSet, FrequencyStats};

/// Descriptive fields used for display and grouping.
///
/// Only title and author are required. A missing group, course, department
/// or faculty keeps the document out of partitions keyed on that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub group: Option<u32>,
    #[serde(default)]
    pub course: Option<u8>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl DocumentMetadata {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            group: None,
            course: None,
            department: None,
            faculty: None,
            modified_at: None,
        }
    }
}

/// Raw input: the full text of a document and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// Everything kept about a document after analysis.
///
/// Never patched: an edit builds a fresh record from the new text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub metadata: DocumentMetadata,
    pub stats: FrequencyStats,
    /// Present only when fingerprinting was enabled at ingestion.
    #[serde(default)]
    pub fingerprint: Option<FingerprintSet>,
    /// Character count of the raw text.
    pub raw_chars: usize,
    /// Character count of the cleaned text (before tokenization).
    pub clean_chars: usize,
}

/// Store-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
