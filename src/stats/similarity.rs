// Containment similarity between sets.
//
//   containment(A, B) = |A ∩ B| / min(|A|, |B|) * 100
//
// Dividing by the smaller set measures how much of the smaller vocabulary (or
// shingle set) is found inside the larger one. A short report copied wholesale
// into a longer one scores 100 even though their Jaccard overlap is small.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::error::{AnalysisError, Result};

/// Containment percentage of two non-empty sets, in [0, 100].
///
/// Symmetric in its arguments. `containment(a, a)` is 100 for any non-empty
/// `a`. Either set being empty is `DegenerateComparison`, never 0 or 100.
pub fn containment<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> Result<f64> {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return Err(AnalysisError::DegenerateComparison {
            left: a.len(),
            right: b.len(),
        });
    }
    let shared = a.intersection(b).count();
    Ok(shared as f64 / smaller as f64 * 100.0)
}

/// Symmetric subject × subject containment matrix.
///
/// The diagonal is NaN: comparing a subject with itself says nothing. A pair
/// that could not be compared holds its error; the rest of the matrix is
/// still filled.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    subjects: Vec<String>,
    cells: Vec<Result<f64>>,
}

impl SimilarityMatrix {
    /// Compare every pair of `subjects`. Each unordered pair is computed once,
    /// in parallel, and mirrored.
    pub fn compute<T>(subjects: Vec<(String, BTreeSet<T>)>) -> Self
    where
        T: Ord + Sync,
    {
        let n = subjects.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();

        let scored: Vec<((usize, usize), Result<f64>)> = pairs
            .par_iter()
            .map(|&(i, j)| ((i, j), containment(&subjects[i].1, &subjects[j].1)))
            .collect();

        let mut cells: Vec<Result<f64>> = vec![Ok(f64::NAN); n * n];
        for ((i, j), score) in scored {
            cells[j * n + i] = score.clone();
            cells[i * n + j] = score;
        }

        Self {
            subjects: subjects.into_iter().map(|(name, _)| name).collect(),
            cells,
        }
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Cell by position. Panics when out of range, like slice indexing.
    pub fn cell(&self, row: usize, col: usize) -> &Result<f64> {
        &self.cells[row * self.subjects.len() + col]
    }

    /// Cell by subject names, if both are present.
    pub fn get(&self, a: &str, b: &str) -> Option<&Result<f64>> {
        let row = self.subjects.iter().position(|s| s == a)?;
        let col = self.subjects.iter().position(|s| s == b)?;
        Some(self.cell(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[u32]) -> BTreeSet<u32> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_containment_uses_smaller_set() {
        let score = containment(&set(&[1, 2, 3, 4]), &set(&[2, 3, 4, 5, 6])).unwrap();
        assert!((score - 75.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_symmetric() {
        let a = set(&[1, 2, 3, 4, 9]);
        let b = set(&[2, 3, 7]);
        assert_eq!(containment(&a, &b).unwrap(), containment(&b, &a).unwrap());
    }

    #[test]
    fn test_self_containment_is_100() {
        let a = set(&[5, 6, 7]);
        assert_eq!(containment(&a, &a).unwrap(), 100.0);
    }

    #[test]
    fn test_disjoint_is_true_zero() {
        assert_eq!(containment(&set(&[1]), &set(&[2])).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_side_is_degenerate() {
        let err = containment(&set(&[]), &set(&[1, 2])).unwrap_err();
        assert_eq!(err, AnalysisError::DegenerateComparison { left: 0, right: 2 });
    }

    #[test]
    fn test_matrix_diagonal_nan_and_symmetric() {
        let m = SimilarityMatrix::compute(vec![
            ("a".to_string(), set(&[1, 2, 3, 4])),
            ("b".to_string(), set(&[2, 3, 4, 5, 6])),
            ("c".to_string(), set(&[9])),
        ]);
        assert_eq!(m.len(), 3);
        assert!(m.cell(0, 0).as_ref().unwrap().is_nan());
        assert!((m.get("a", "b").unwrap().as_ref().unwrap() - 75.0).abs() < 1e-9);
        assert_eq!(m.get("a", "b"), m.get("b", "a"));
        assert_eq!(m.get("c", "a").unwrap().as_ref().unwrap(), &0.0);
        assert!(m.get("a", "zzz").is_none());
    }

    #[test]
    fn test_degenerate_pair_does_not_poison_matrix() {
        let m = SimilarityMatrix::compute(vec![
            ("a".to_string(), set(&[1, 2])),
            ("b".to_string(), set(&[2])),
            ("empty".to_string(), set(&[])),
        ]);
        assert!(m.get("a", "empty").unwrap().is_err());
        assert!(m.get("empty", "b").unwrap().is_err());
        assert_eq!(m.get("a", "b").unwrap().as_ref().unwrap(), &100.0);
    }
}
