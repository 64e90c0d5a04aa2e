// Text normalization: raw document text to a lemma token sequence.
//
// The steps run in a fixed order and the order is part of the contract:
// every downstream statistic (counts, vocabularies, shingle hashes) is keyed
// on the exact tokens produced here.
//
//   1. lowercase (Unicode case folding)
//   2. strip the punctuation set
//   3. strip standalone digit runs
//   4. collapse non-word runs to one space
//   5. split on Unicode word boundaries
//   6. drop stop words
//   7. lemmatize
//
// A Normalizer holds only immutable configuration and capability handles, so
// one instance can be shared by every worker in a batch.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::traits::{Lemmatizer, StopWordFilter};
use crate::error::{AnalysisError, Result};

/// Python-style ASCII punctuation, the default removal set.
pub const DEFAULT_PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Normalized form of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedText {
    /// Text after steps 1–4, before tokenization.
    pub clean_text: String,
    /// Lemma tokens in original order; duplicates kept.
    pub tokens: Vec<String>,
}

pub struct Normalizer {
    punctuation: Option<Regex>,
    stop_words: Box<dyn StopWordFilter>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Normalizer {
    /// Build a normalizer that strips `punctuation` (each character is removed
    /// wherever it appears).
    pub fn new(
        punctuation: &str,
        stop_words: Box<dyn StopWordFilter>,
        lemmatizer: Box<dyn Lemmatizer>,
    ) -> Result<Self> {
        let punctuation = if punctuation.is_empty() {
            None
        } else {
            let class = format!("[{}]", regex_lite::escape(punctuation));
            let re = Regex::new(&class).map_err(|e| {
                AnalysisError::InvalidConfig(format!("punctuation set {punctuation:?}: {e}"))
            })?;
            Some(re)
        };
        Ok(Self {
            punctuation,
            stop_words,
            lemmatizer,
        })
    }

    /// Normalizer with the default punctuation set.
    pub fn with_defaults(
        stop_words: Box<dyn StopWordFilter>,
        lemmatizer: Box<dyn Lemmatizer>,
    ) -> Result<Self> {
        Self::new(DEFAULT_PUNCTUATION, stop_words, lemmatizer)
    }

    /// Run the full pipeline over `raw_text`.
    ///
    /// Stop words are dropped both as surface forms and as lemmas, so a word
    /// that lemmatizes to a stop word ("generalization" -> "general") never
    /// reaches the token list.
    pub fn normalize(&self, raw_text: &str) -> Result<NormalizedText> {
        let clean_text = self.clean(raw_text);
        let mut tokens = clean_text
            .unicode_words()
            .filter(|word| !self.stop_words.is_stop_word(word))
            .map(|word| self.lemmatizer.lemmatize(word))
            .collect::<Result<Vec<_>>>()?;
        tokens.retain(|lemma| !self.stop_words.is_stop_word(lemma));

        Ok(NormalizedText { clean_text, tokens })
    }

    /// Steps 1–4 only: the clean text that gets tokenized.
    pub fn clean(&self, raw_text: &str) -> String {
        let lowered = raw_text.to_lowercase();
        let unpunctuated = match &self.punctuation {
            Some(re) => re.replace_all(&lowered, "").into_owned(),
            None => lowered,
        };
        let without_digits = strip_digit_runs(&unpunctuated);
        collapse_non_words(&without_digits)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Remove maximal ASCII digit runs that are not glued to a letter.
/// "2024 report" loses the year; "mp3" and "covid19" keep their digits.
/// Other numeric characters ("½", "²", "٣") are left alone.
fn strip_digit_runs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let before = start.checked_sub(1).map(|j| chars[j]);
        let after = chars.get(i).copied();
        let attached = before.is_some_and(char::is_alphabetic)
            || after.is_some_and(char::is_alphabetic);
        if attached {
            out.extend(&chars[start..i]);
        }
    }
    out
}

fn collapse_non_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if is_word_char(c) {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push(' ');
            in_gap = true;
        }
    }
    out.trim().to_string()
}
