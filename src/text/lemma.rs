// Lemmatizer backends.
//
// SnowballLemmatizer reduces words to Snowball stems: cheap, always available,
// one candidate per word. DictionaryLemmatizer reads a lemma table from disk
// and can offer several ranked candidates per surface form, which is how a
// real morphological dictionary behaves.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rust_stemmers::Stemmer;
use tracing::info;

use super::language::Language;
use super::traits::{Analysis, Lemmatizer};
use crate::error::{AnalysisError, Result};

/// Upper bound on re-stemming passes; real words settle in two or three.
const MAX_STEM_PASSES: usize = 8;

/// Stem-based backend built on `rust-stemmers`.
///
/// A single Snowball pass is not a fixed point ("agreed" -> "agre" -> "agr"),
/// so the stemmer is reapplied until the output stops changing. Stemming a
/// stem then returns it unchanged.
pub struct SnowballLemmatizer {
    stemmer: Stemmer,
}

impl SnowballLemmatizer {
    pub fn new(language: Language) -> Self {
        Self {
            stemmer: Stemmer::create(language.stemmer_algorithm()),
        }
    }

    fn stable_stem(&self, token: &str) -> String {
        let mut current = token.to_string();
        for _ in 0..MAX_STEM_PASSES {
            let next = self.stemmer.stem(&current).into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

impl Lemmatizer for SnowballLemmatizer {
    fn analyses(&self, token: &str) -> Result<Vec<Analysis>> {
        Ok(vec![Analysis::new(self.stable_stem(token), 1.0)])
    }
}

/// Table-driven backend: `form<TAB>lemma[<TAB>score]` per line.
///
/// Lines starting with `#` and blank lines are skipped. A form may appear on
/// several lines; its candidates keep file order, and the score (default 1.0)
/// decides which one wins.
#[derive(Debug, Default)]
pub struct DictionaryLemmatizer {
    entries: HashMap<String, Vec<Analysis>>,
}

impl DictionaryLemmatizer {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalysisError::backend_unavailable(format!(
                "cannot read lemma dictionary {}: {e}",
                path.display()
            ))
        })?;
        let lemmatizer = Self::parse(&content).map_err(|e| match e {
            AnalysisError::LinguisticBackendUnavailable { reason } => {
                AnalysisError::backend_unavailable(format!("{}: {reason}", path.display()))
            }
            other => other,
        })?;
        info!(
            path = %path.display(),
            forms = lemmatizer.entries.len(),
            "Loaded lemma dictionary"
        );
        Ok(lemmatizer)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut dict = Self::default();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (form, lemma) = match (fields.next(), fields.next()) {
                (Some(form), Some(lemma)) if !form.is_empty() && !lemma.is_empty() => {
                    (form, lemma)
                }
                _ => {
                    return Err(AnalysisError::backend_unavailable(format!(
                        "line {}: expected form<TAB>lemma",
                        lineno + 1
                    )))
                }
            };
            let score = match fields.next() {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|score| score.is_finite())
                    .ok_or_else(|| {
                        AnalysisError::backend_unavailable(format!(
                            "line {}: bad score '{raw}'",
                            lineno + 1
                        ))
                    })?,
                None => 1.0,
            };
            dict.insert(form, lemma, score);
        }
        Ok(dict)
    }

    pub fn insert(&mut self, form: &str, lemma: &str, score: f64) {
        self.entries
            .entry(form.to_lowercase())
            .or_default()
            .push(Analysis::new(lemma.to_lowercase(), score));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn analyses(&self, token: &str) -> Result<Vec<Analysis>> {
        Ok(self.entries.get(token).cloned().unwrap_or_default())
    }
}
