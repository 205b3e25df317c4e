//! Indel distance: edits restricted to insertions and deletions.
//!
//! Shares the Wagner-Fischer kernel with the rest of the family; substitution
//! and transposition are disabled by pricing them out of the recurrence
//! rather than by a separate kernel. Normalization divides by the summed
//! lengths, the tightest bound when substitutions are unavailable.

use pyo3::prelude::*;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::cost::CostModel;
use crate::matrix;
use crate::normalize;
use crate::subst::Discrete;

type CharVec = SmallVec<[char; 64]>;

/// Number of insertions and deletions needed to turn `src` into `tar`.
pub fn distance(src: &str, tar: &str) -> f64 {
    let s: CharVec = src.chars().collect();
    let t: CharVec = tar.chars().collect();
    let model = CostModel::indel();
    let sub = Discrete::new(model.substitute());
    matrix::edit_distance(s.as_slice(), t.as_slice(), &model, &sub)
}

/// Distance rescaled by `len(src) + len(tar)`.
pub fn normalized_distance(src: &str, tar: &str) -> f64 {
    if src == tar {
        return 0.0;
    }
    let model = CostModel::indel();
    let src_len = src.chars().count() as f64;
    let tar_len = tar.chars().count() as f64;
    normalize::normalized(
        distance(src, tar),
        &[src_len * model.delete(), tar_len * model.insert()],
        normalize::sum_reduction,
    )
}

/// Complement of the normalized distance.
pub fn similarity(src: &str, tar: &str) -> f64 {
    1.0 - normalized_distance(src, tar)
}

/// Calculate the indel distance (insertions + deletions needed).
#[pyfunction]
#[pyo3(signature = (s1, s2, *, score_cutoff=None))]
pub fn indel_distance(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let dist = distance(s1, s2);
    match score_cutoff {
        Some(cutoff) if dist > cutoff => cutoff + 1.0,
        _ => dist,
    }
}

/// Calculate the normalized indel distance (0.0 to 1.0).
#[pyfunction]
#[pyo3(signature = (s1, s2, *, score_cutoff=None))]
pub fn indel_normalized_distance(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let norm_dist = normalized_distance(s1, s2);
    match score_cutoff {
        Some(cutoff) if norm_dist > cutoff => 1.0,
        _ => norm_dist,
    }
}

/// Calculate the normalized indel similarity (0.0 to 1.0).
#[pyfunction]
#[pyo3(signature = (s1, s2, *, score_cutoff=None))]
pub fn indel_normalized_similarity(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let norm_sim = similarity(s1, s2);
    match score_cutoff {
        Some(cutoff) if norm_sim < cutoff => 0.0,
        _ => norm_sim,
    }
}

// ============ Batch Operations ============

#[pyfunction]
#[pyo3(signature = (pairs, *, score_cutoff=None))]
pub fn indel_distance_batch(
    pairs: Vec<(String, String)>,
    score_cutoff: Option<f64>,
) -> Vec<f64> {
    pairs
        .par_iter()
        .map(|(s1, s2)| indel_distance(s1, s2, score_cutoff))
        .collect()
}

#[pyfunction]
#[pyo3(signature = (pairs, *, score_cutoff=None))]
pub fn indel_normalized_similarity_batch(
    pairs: Vec<(String, String)>,
    score_cutoff: Option<f64>,
) -> Vec<f64> {
    pairs
        .par_iter()
        .map(|(s1, s2)| indel_normalized_similarity(s1, s2, score_cutoff))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_indel_distance() {
        // No substitution available: cat -> hat is delete 'c', insert 'h'.
        approx_eq(distance("cat", "hat"), 2.0);
        approx_eq(distance("Niall", "Neil"), 3.0);
        approx_eq(distance("Colin", "Cuilen"), 5.0);
        approx_eq(distance("ATCG", "TAGC"), 4.0);
    }

    #[test]
    fn test_empty() {
        approx_eq(distance("", ""), 0.0);
        approx_eq(distance("", "abc"), 3.0);
        approx_eq(distance("abc", ""), 3.0);
    }

    #[test]
    fn test_normalized() {
        approx_eq(normalized_distance("cat", "hat"), 1.0 / 3.0);
        approx_eq(normalized_distance("Colin", "Cuilen"), 5.0 / 11.0);
        approx_eq(normalized_distance("ATCG", "TAGC"), 0.5);
        approx_eq(similarity("Colin", "Cuilen"), 6.0 / 11.0);
    }

    #[test]
    fn test_identity() {
        for s in ["", "a", "Niall"] {
            approx_eq(distance(s, s), 0.0);
            approx_eq(similarity(s, s), 1.0);
        }
    }
}
