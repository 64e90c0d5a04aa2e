// Token frequency statistics for a single document.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Default length of the most-frequent list.
pub const DEFAULT_TOP_K: usize = 25;

/// Frequency profile of one document's tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStats {
    pub total_tokens: usize,
    pub unique_tokens: BTreeSet<String>,
    pub unique_count: usize,
    /// Most frequent tokens, count descending, ties in first-seen order.
    pub top_k: Vec<(String, usize)>,
    /// `unique_count / total_tokens * 100`, always in (0, 100].
    pub percent_unique: f64,
}

/// Count `tokens` and keep the `top_k` most frequent.
///
/// Fails with `EmptyDocument` when there is nothing to count: a ratio over
/// zero tokens is undefined, and returning 0 would be indistinguishable from
/// a very repetitive document.
pub fn analyze<S: AsRef<str>>(tokens: &[S], top_k: usize) -> Result<FrequencyStats> {
    if tokens.is_empty() {
        return Err(AnalysisError::EmptyDocument);
    }

    // IndexMap keeps first-insertion order, which the stable sort below
    // turns into the first-seen tie-break.
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for token in tokens {
        *counts.entry(token.as_ref()).or_insert(0) += 1;
    }

    let total_tokens = tokens.len();
    let unique_count = counts.len();

    let mut ranked: Vec<(&str, usize)> = counts.iter().map(|(t, c)| (*t, *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top_k = ranked
        .into_iter()
        .take(top_k)
        .map(|(t, c)| (t.to_string(), c))
        .collect();

    Ok(FrequencyStats {
        total_tokens,
        unique_tokens: counts.keys().map(|t| t.to_string()).collect(),
        unique_count,
        top_k,
        percent_unique: unique_count as f64 / total_tokens as f64 * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_counts() {
        let stats = analyze(&["a", "b", "a", "c", "b", "a"], 2).unwrap();
        assert_eq!(stats.total_tokens, 6);
        assert_eq!(stats.unique_count, 3);
        assert_eq!(
            stats.top_k,
            vec![("a".to_string(), 3), ("b".to_string(), 2)]
        );
        assert!((stats.percent_unique - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_follow_first_appearance() {
        // z, y and x all appear twice; z was seen first.
        let stats = analyze(&["z", "y", "x", "x", "y", "z", "w"], 3).unwrap();
        let order: Vec<&str> = stats.top_k.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_empty_is_an_error() {
        let empty: [&str; 0] = [];
        assert_eq!(analyze(&empty, 5).unwrap_err(), AnalysisError::EmptyDocument);
    }

    #[test]
    fn test_single_repeated_word_is_small_not_zero() {
        let tokens = vec!["la"; 200];
        let stats = analyze(&tokens, 25).unwrap();
        assert_eq!(stats.unique_count, 1);
        assert!((stats.percent_unique - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_top_k_larger_than_vocabulary() {
        let stats = analyze(&["a", "b"], 25).unwrap();
        assert_eq!(stats.top_k.len(), 2);
    }
}
