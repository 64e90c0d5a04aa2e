// Document pipeline: one raw document in, one DocumentRecord out.
//
// Normalization, frequency analysis and fingerprinting run back to back for
// each document. Batches fan out over the rayon pool; each document's result
// is kept separately so one bad document never sinks its batch.

pub mod batch;

use anyhow::Context;
use tracing::debug;

use crate::document::{DocumentId, DocumentRecord, DocumentStore, RawDocument};
use crate::error::{AnalysisError, Result};
use crate::stats::{analyze, ShingleFingerprinter};
use crate::text::Normalizer;

pub struct Pipeline {
    normalizer: Normalizer,
    top_k: usize,
    /// None when fingerprints are not kept on records.
    fingerprinter: Option<ShingleFingerprinter>,
    show_progress: bool,
}

impl Pipeline {
    pub fn new(
        normalizer: Normalizer,
        top_k: usize,
        fingerprinter: Option<ShingleFingerprinter>,
    ) -> Result<Self> {
        if top_k == 0 {
            return Err(AnalysisError::InvalidConfig(
                "top-k must be at least 1".into(),
            ));
        }
        Ok(Self {
            normalizer,
            top_k,
            fingerprinter,
            show_progress: false,
        })
    }

    /// Draw a progress bar during `process_batch`.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Derive a complete record from `raw`.
    pub fn process(&self, raw: &RawDocument) -> Result<DocumentRecord> {
        let normalized = self.normalizer.normalize(&raw.text)?;
        let stats = analyze(&normalized.tokens, self.top_k)?;
        let fingerprint = self
            .fingerprinter
            .map(|fp| fp.fingerprint(&normalized.tokens));

        debug!(
            title = %raw.metadata.title,
            tokens = stats.total_tokens,
            unique = stats.unique_count,
            shingles = fingerprint.as_ref().map_or(0, |f| f.len()),
            "Processed document"
        );

        Ok(DocumentRecord {
            metadata: raw.metadata.clone(),
            stats,
            fingerprint,
            raw_chars: raw.text.chars().count(),
            clean_chars: normalized.clean_text.chars().count(),
        })
    }

    /// Replace a stored record after its document was edited. Statistics are
    /// recomputed from the new text; nothing of the old record is kept.
    pub fn reprocess(
        &self,
        store: &dyn DocumentStore,
        id: DocumentId,
        raw: &RawDocument,
    ) -> anyhow::Result<DocumentRecord> {
        let record = self
            .process(raw)
            .with_context(|| format!("Failed to analyze edited document {id}"))?;
        store.replace(id, record.clone())?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentMetadata, MemoryStore};
    use crate::text::lemma::DictionaryLemmatizer;
    use crate::text::stopwords::StopWordList;

    fn pipeline(fingerprints: bool) -> Pipeline {
        let normalizer = Normalizer::with_defaults(
            Box::new(StopWordList::from_words(["the", "a"])),
            Box::new(DictionaryLemmatizer::default()),
        )
        .unwrap();
        let fp = fingerprints.then(|| ShingleFingerprinter::with_width(2).unwrap());
        Pipeline::new(normalizer, 3, fp).unwrap()
    }

    fn raw(text: &str) -> RawDocument {
        RawDocument::new(text, DocumentMetadata::new("t", "ann"))
    }

    #[test]
    fn test_process_counts_characters() {
        let record = pipeline(true).process(&raw("The cat, a hat!")).unwrap();
        assert_eq!(record.raw_chars, 15);
        assert_eq!(record.clean_chars, "the cat a hat".len());
        assert_eq!(record.stats.total_tokens, 2);
        assert_eq!(record.fingerprint.unwrap().len(), 1);
    }

    #[test]
    fn test_fingerprints_optional() {
        let record = pipeline(false).process(&raw("one two three")).unwrap();
        assert!(record.fingerprint.is_none());
    }

    #[test]
    fn test_only_stop_words_is_empty_document() {
        let err = pipeline(true).process(&raw("The a THE!")).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyDocument);
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let normalizer = Normalizer::with_defaults(
            Box::new(StopWordList::default()),
            Box::new(DictionaryLemmatizer::default()),
        )
        .unwrap();
        assert!(matches!(
            Pipeline::new(normalizer, 0, None),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_reprocess_replaces_wholesale() {
        let p = pipeline(true);
        let store = MemoryStore::new();
        let id = store.insert(p.process(&raw("alpha beta")).unwrap()).unwrap();

        let updated = p.reprocess(&store, id, &raw("gamma gamma delta")).unwrap();
        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.stats.total_tokens, 3);
        assert!(!stored.stats.unique_tokens.contains("alpha"));
    }
}
