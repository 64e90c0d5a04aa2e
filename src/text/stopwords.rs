// Stop-word list seeded from the stop-words crate plus caller extras.

use std::collections::HashSet;

use super::language::Language;
use super::traits::StopWordFilter;

/// A fixed set of stop words, compared after lowercasing.
#[derive(Debug, Clone, Default)]
pub struct StopWordList {
    words: HashSet<String>,
}

impl StopWordList {
    /// The language's built-in list extended with `extra` words.
    pub fn for_language<I, S>(language: Language, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::from_words(language.stop_words());
        list.extend(extra);
        list
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        list.extend(words);
        list
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
    }
}

impl StopWordFilter for StopWordList {
    fn is_stop_word(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}
