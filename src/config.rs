use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::error::AnalysisError;
use crate::pipeline::Pipeline;
use crate::stats::{ShingleFingerprinter, DEFAULT_SHINGLE_WIDTH, DEFAULT_TOP_K};
use crate::text::lemma::{DictionaryLemmatizer, SnowballLemmatizer};
use crate::text::stopwords::StopWordList;
use crate::text::{Language, Lemmatizer, Normalizer, DEFAULT_PUNCTUATION};

/// Which lemmatizer backend to build.
#[derive(Debug, Clone, PartialEq)]
pub enum LemmatizerBackend {
    /// Snowball stemmer for the configured language (default)
    Snowball,
    /// Lemma table loaded from a TSV file (WORDPRINT_LEMMA_DICT)
    Dictionary(PathBuf),
}

/// Central configuration loaded from environment variables.
///
/// A .env file is loaded at startup via dotenvy, so every setting can live
/// there instead of the shell environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Stop-word list and stemmer language (WORDPRINT_LANGUAGE)
    pub language: Language,
    /// Length of the most-frequent list per document (WORDPRINT_TOP_K)
    pub top_k: usize,
    /// Tokens per shingle (WORDPRINT_SHINGLE_WIDTH)
    pub shingle_width: usize,
    /// Keep fingerprints on records (WORDPRINT_FINGERPRINTS)
    pub fingerprints: bool,
    /// Stop words added to the language list (WORDPRINT_EXTRA_STOP_WORDS, comma-separated)
    pub extra_stop_words: Vec<String>,
    /// Characters stripped before tokenizing (WORDPRINT_PUNCTUATION)
    pub punctuation: String,
    pub lemmatizer: LemmatizerBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::English,
            top_k: DEFAULT_TOP_K,
            shingle_width: DEFAULT_SHINGLE_WIDTH,
            fingerprints: true,
            extra_stop_words: Vec::new(),
            punctuation: DEFAULT_PUNCTUATION.to_string(),
            lemmatizer: LemmatizerBackend::Snowball,
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Unset variables keep
    /// their defaults; malformed ones are errors.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` uses the process
    /// environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(lang) = lookup("WORDPRINT_LANGUAGE") {
            config.language = lang
                .parse()
                .context("WORDPRINT_LANGUAGE is not a supported language")?;
        }
        if let Some(k) = lookup("WORDPRINT_TOP_K") {
            config.top_k = k
                .trim()
                .parse()
                .with_context(|| format!("WORDPRINT_TOP_K must be a number, got '{k}'"))?;
        }
        if let Some(w) = lookup("WORDPRINT_SHINGLE_WIDTH") {
            config.shingle_width = w
                .trim()
                .parse()
                .with_context(|| format!("WORDPRINT_SHINGLE_WIDTH must be a number, got '{w}'"))?;
        }
        if let Some(flag) = lookup("WORDPRINT_FINGERPRINTS") {
            config.fingerprints = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => anyhow::bail!("WORDPRINT_FINGERPRINTS must be true or false, got '{other}'"),
            };
        }
        if let Some(extra) = lookup("WORDPRINT_EXTRA_STOP_WORDS") {
            config.extra_stop_words = extra
                .split(',')
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
        }
        if let Some(punct) = lookup("WORDPRINT_PUNCTUATION") {
            config.punctuation = punct;
        }
        if let Some(path) = lookup("WORDPRINT_LEMMA_DICT").filter(|p| !p.trim().is_empty()) {
            config.lemmatizer = LemmatizerBackend::Dictionary(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the analysis core cannot work with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.top_k == 0 {
            return Err(AnalysisError::InvalidConfig(
                "WORDPRINT_TOP_K must be at least 1".into(),
            ));
        }
        ShingleFingerprinter::with_width(self.shingle_width)?;
        Ok(())
    }

    /// Build the configured lemmatizer backend.
    pub fn lemmatizer(&self) -> Result<Box<dyn Lemmatizer>, AnalysisError> {
        match &self.lemmatizer {
            LemmatizerBackend::Snowball => Ok(Box::new(SnowballLemmatizer::new(self.language))),
            LemmatizerBackend::Dictionary(path) => Ok(Box::new(DictionaryLemmatizer::load(path)?)),
        }
    }

    pub fn stop_words(&self) -> StopWordList {
        StopWordList::for_language(self.language, &self.extra_stop_words)
    }

    pub fn normalizer(&self) -> Result<Normalizer, AnalysisError> {
        Normalizer::new(
            &self.punctuation,
            Box::new(self.stop_words()),
            self.lemmatizer()?,
        )
    }

    /// Assemble the full document pipeline from this config.
    pub fn pipeline(&self) -> Result<Pipeline> {
        self.validate()?;
        let fingerprinter = if self.fingerprints {
            Some(ShingleFingerprinter::with_width(self.shingle_width)?)
        } else {
            None
        };
        let pipeline = Pipeline::new(
            self.normalizer().context("Failed to set up text normalization")?,
            self.top_k,
            fingerprinter,
        )?;
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from(&[]).unwrap();
        assert_eq!(config.language, Language::English);
        assert_eq!(config.top_k, 25);
        assert_eq!(config.shingle_width, 10);
        assert!(config.fingerprints);
        assert_eq!(config.lemmatizer, LemmatizerBackend::Snowball);
    }

    #[test]
    fn test_overrides() {
        let config = from(&[
            ("WORDPRINT_LANGUAGE", "russian"),
            ("WORDPRINT_TOP_K", "10"),
            ("WORDPRINT_SHINGLE_WIDTH", "4"),
            ("WORDPRINT_FINGERPRINTS", "off"),
            ("WORDPRINT_EXTRA_STOP_WORDS", "также, , однако"),
            ("WORDPRINT_LEMMA_DICT", "/tmp/lemmas.tsv"),
        ])
        .unwrap();
        assert_eq!(config.language, Language::Russian);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.shingle_width, 4);
        assert!(!config.fingerprints);
        assert_eq!(config.extra_stop_words, vec!["также", "однако"]);
        assert_eq!(
            config.lemmatizer,
            LemmatizerBackend::Dictionary(PathBuf::from("/tmp/lemmas.tsv"))
        );
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(from(&[("WORDPRINT_TOP_K", "0")]).is_err());
        assert!(from(&[("WORDPRINT_SHINGLE_WIDTH", "0")]).is_err());
        assert!(from(&[("WORDPRINT_FINGERPRINTS", "maybe")]).is_err());
    }

    #[test]
    fn test_unknown_language_rejected() {
        assert!(from(&[("WORDPRINT_LANGUAGE", "klingon")]).is_err());
    }

    #[test]
    fn test_missing_dictionary_fails_pipeline() {
        let config = Config {
            lemmatizer: LemmatizerBackend::Dictionary(PathBuf::from("/nonexistent/lemmas.tsv")),
            ..Config::default()
        };
        let err = config.pipeline().err().unwrap();
        assert!(matches!(
            err.root_cause().downcast_ref::<AnalysisError>(),
            Some(AnalysisError::LinguisticBackendUnavailable { .. })
        ));
    }

    #[test]
    fn test_default_pipeline_builds() {
        let pipeline = Config::default().pipeline().unwrap();
        let tokens = pipeline
            .normalizer()
            .normalize("The fingerprints were matching")
            .unwrap()
            .tokens;
        assert_eq!(tokens, vec!["fingerprint", "match"]);
    }
}
