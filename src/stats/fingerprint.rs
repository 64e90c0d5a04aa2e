// Shingle fingerprints: near-duplicate detection over token windows.
//
// Every window of `width` consecutive tokens is joined with a single space
// and reduced to a CRC-32. Two documents that share long runs of identical
// (normalized) wording share hashes. The scheme is lossy both ways: CRC
// collisions can match different windows, and a one-token difference at a
// window boundary changes every window that covers it. Treat scores built on
// these hashes as estimates.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

pub const DEFAULT_SHINGLE_WIDTH: usize = 10;

const DEFAULT_WIDTH: NonZeroUsize = match NonZeroUsize::new(DEFAULT_SHINGLE_WIDTH) {
    Some(width) => width,
    None => panic!("default shingle width must be non-zero"),
};

/// One hash per token window, in window order.
///
/// Repeated windows keep repeated hashes so `len()` always equals the number
/// of windows; use `distinct()` for set comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintSet {
    pub width: usize,
    pub hashes: Vec<u32>,
}

impl FingerprintSet {
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn distinct(&self) -> BTreeSet<u32> {
        self.hashes.iter().copied().collect()
    }
}

/// Validated shingle width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShingleFingerprinter {
    width: NonZeroUsize,
}

impl Default for ShingleFingerprinter {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
        }
    }
}

impl ShingleFingerprinter {
    pub fn with_width(width: usize) -> Result<Self> {
        NonZeroUsize::new(width)
            .map(|width| Self { width })
            .ok_or_else(|| AnalysisError::InvalidConfig("shingle width must be at least 1".into()))
    }

    pub fn width(&self) -> usize {
        self.width.get()
    }

    pub fn fingerprint<S: AsRef<str>>(&self, tokens: &[S]) -> FingerprintSet {
        fingerprint(tokens, self.width)
    }
}

/// Hash every `width`-token window of `tokens`.
///
/// Fewer tokens than `width` is not an error; it just yields no shingles.
pub fn fingerprint<S: AsRef<str>>(tokens: &[S], width: NonZeroUsize) -> FingerprintSet {
    let width = width.get();
    let hashes = tokens
        .windows(width)
        .map(|window| {
            let joined = window
                .iter()
                .map(|t| t.as_ref())
                .collect::<Vec<_>>()
                .join(" ");
            crc32fast::hash(joined.as_bytes())
        })
        .collect();

    FingerprintSet { width, hashes }
}
