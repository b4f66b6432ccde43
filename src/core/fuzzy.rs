use strsim::normalized_levenshtein;

use crate::core::normalize::{normalize, tokenize};

/// Similarity ratio between two strings in [0, 1].
///
/// Both inputs are normalized first. The ratio is the best of the
/// whole-string normalized Levenshtein similarity and the per-token
/// similarities of either side, so a sub-area name scores high against a
/// hyphenated parent ("calavi" vs "abomey-calavi").
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_norm = normalize(a);
    let b_norm = normalize(b);
    if a_norm.is_empty() || b_norm.is_empty() {
        return 0.0;
    }

    let mut best = normalized_levenshtein(&a_norm, &b_norm);
    for token in tokenize(&b_norm) {
        best = best.max(normalized_levenshtein(&a_norm, &token));
    }
    for token in tokenize(&a_norm) {
        best = best.max(normalized_levenshtein(&token, &b_norm));
    }
    best
}

/// True when the similarity between `a` and `b` reaches `threshold`.
///
/// Empty or whitespace-only inputs never match, regardless of threshold.
pub fn fuzzy_match(a: &str, b: &str, threshold: f64) -> bool {
    let a_norm = normalize(a);
    let b_norm = normalize(b);
    if a_norm.is_empty() || b_norm.is_empty() {
        return false;
    }
    similarity(&a_norm, &b_norm) >= threshold
}
