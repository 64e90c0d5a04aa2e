// Linguistic capability traits: the swap-ready seam for language backends.
//
// The normalizer never knows which morphology engine sits behind these. The
// defaults are a Snowball stemmer and a stop-word list from the stop-words
// crate, but a dictionary file or a full morphological analyzer fits the same
// interface.

use crate::error::Result;

/// One candidate dictionary form for a surface word.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub lemma: String,
    /// Backend confidence; higher ranks first.
    pub score: f64,
}

impl Analysis {
    pub fn new(lemma: impl Into<String>, score: f64) -> Self {
        Self {
            lemma: lemma.into(),
            score,
        }
    }
}

/// Maps an inflected word to its dictionary form.
pub trait Lemmatizer: Send + Sync {
    /// All candidate analyses for `token`, in the backend's own order.
    ///
    /// An empty list means the backend knows nothing about the word; the
    /// word then stands as its own dictionary form.
    fn analyses(&self, token: &str) -> Result<Vec<Analysis>>;

    /// The top-ranked dictionary form for `token`.
    ///
    /// Highest score wins; on equal scores the earliest candidate wins, so
    /// the choice is deterministic for a given backend.
    fn lemmatize(&self, token: &str) -> Result<String> {
        let candidates = self.analyses(token)?;
        Ok(top_ranked(candidates).unwrap_or_else(|| token.to_string()))
    }
}

/// Decides whether a token carries no content and should be dropped.
pub trait StopWordFilter: Send + Sync {
    fn is_stop_word(&self, token: &str) -> bool;
}

fn top_ranked(candidates: Vec<Analysis>) -> Option<String> {
    let mut best: Option<Analysis> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|a| a.lemma)
}
