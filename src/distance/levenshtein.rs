//! Levenshtein distance family.
//!
//! One surface for three modes sharing a four-cost model: `lev` (ordinary
//! Levenshtein), `osa` (Optimal String Alignment, at most one transposition
//! per substring), and `dam` (full Damerau-Levenshtein with unrestricted
//! transpositions). Distances are `f64` and stay integral whenever the
//! supplied costs are integral.

use pyo3::prelude::*;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::align;
use crate::cost::{CostModel, EditMode, ModelError};
use crate::matrix;
use crate::normalize;
use crate::subst::Discrete;

// Stack-allocate symbol buffers for short strings
type CharVec = SmallVec<[char; 64]>;

/// Raw edit distance between two strings under `model`.
pub fn distance(src: &str, tar: &str, model: &CostModel) -> f64 {
    let s: CharVec = src.chars().collect();
    let t: CharVec = tar.chars().collect();
    let sub = Discrete::new(model.substitute());
    match model.mode() {
        EditMode::UnrestrictedTransposition => {
            matrix::transposition_distance(s.as_slice(), t.as_slice(), model, &sub)
        }
        _ => matrix::edit_distance(s.as_slice(), t.as_slice(), model, &sub),
    }
}

/// Distance rescaled by the greater of `len(src) * delete` and
/// `len(tar) * insert`. In [0, 1] for unit costs.
pub fn normalized_distance(src: &str, tar: &str, model: &CostModel) -> f64 {
    if src == tar {
        return 0.0;
    }
    let src_len = src.chars().count() as f64;
    let tar_len = tar.chars().count() as f64;
    normalize::normalized(
        distance(src, tar, model),
        &[src_len * model.delete(), tar_len * model.insert()],
        normalize::max_reduction,
    )
}

/// Complement of the normalized distance.
pub fn similarity(src: &str, tar: &str, model: &CostModel) -> f64 {
    1.0 - normalized_distance(src, tar, model)
}

/// Raw distance plus one optimal alignment, gap marker `-`.
pub fn alignment(
    src: &str,
    tar: &str,
    model: &CostModel,
) -> Result<(f64, String, String), ModelError> {
    let s: CharVec = src.chars().collect();
    let t: CharVec = tar.chars().collect();
    let sub = Discrete::new(model.substitute());
    let (dist, src_aligned, tar_aligned) = align::align(s.as_slice(), t.as_slice(), model, &sub)?;
    Ok((dist, render(src_aligned), render(tar_aligned)))
}

fn render(symbols: Vec<Option<char>>) -> String {
    symbols.into_iter().map(|c| c.unwrap_or(align::GAP)).collect()
}

fn parse_model(mode: &str, cost: (f64, f64, f64, f64)) -> Result<CostModel, ModelError> {
    let mode = mode.parse::<EditMode>()?;
    CostModel::new(cost.0, cost.1, cost.2, cost.3, mode)
}

/// Calculate the Levenshtein distance between two strings.
#[pyfunction]
#[pyo3(signature = (s1, s2, *, mode="lev", cost=(1.0, 1.0, 1.0, 1.0), score_cutoff=None))]
pub fn levenshtein_distance(
    s1: &str,
    s2: &str,
    mode: &str,
    cost: (f64, f64, f64, f64),
    score_cutoff: Option<f64>,
) -> PyResult<f64> {
    let model = parse_model(mode, cost)?;
    let dist = distance(s1, s2, &model);
    Ok(match score_cutoff {
        Some(cutoff) if dist > cutoff => cutoff + 1.0,
        _ => dist,
    })
}

/// Calculate the normalized Levenshtein distance (0.0 to 1.0 for unit costs).
#[pyfunction]
#[pyo3(signature = (s1, s2, *, mode="lev", cost=(1.0, 1.0, 1.0, 1.0), score_cutoff=None))]
pub fn levenshtein_normalized_distance(
    s1: &str,
    s2: &str,
    mode: &str,
    cost: (f64, f64, f64, f64),
    score_cutoff: Option<f64>,
) -> PyResult<f64> {
    let model = parse_model(mode, cost)?;
    let norm_dist = normalized_distance(s1, s2, &model);
    Ok(match score_cutoff {
        Some(cutoff) if norm_dist > cutoff => 1.0,
        _ => norm_dist,
    })
}

/// Calculate the normalized Levenshtein similarity.
/// similarity = 1 - normalized_distance
#[pyfunction]
#[pyo3(signature = (s1, s2, *, mode="lev", cost=(1.0, 1.0, 1.0, 1.0), score_cutoff=None))]
pub fn levenshtein_normalized_similarity(
    s1: &str,
    s2: &str,
    mode: &str,
    cost: (f64, f64, f64, f64),
    score_cutoff: Option<f64>,
) -> PyResult<f64> {
    let model = parse_model(mode, cost)?;
    let norm_sim = similarity(s1, s2, &model);
    Ok(match score_cutoff {
        Some(cutoff) if norm_sim < cutoff => 0.0,
        _ => norm_sim,
    })
}

/// Calculate the Levenshtein distance and one optimal alignment.
/// Returns (distance, aligned_s1, aligned_s2) with `-` marking gaps.
#[pyfunction]
#[pyo3(signature = (s1, s2, *, mode="lev", cost=(1.0, 1.0, 1.0, 1.0)))]
pub fn levenshtein_alignment(
    s1: &str,
    s2: &str,
    mode: &str,
    cost: (f64, f64, f64, f64),
) -> PyResult<(f64, String, String)> {
    let model = parse_model(mode, cost)?;
    Ok(alignment(s1, s2, &model)?)
}

// ============ Batch Operations ============

/// Calculate Levenshtein distance for a batch of string pairs.
#[pyfunction]
#[pyo3(signature = (pairs, *, mode="lev", cost=(1.0, 1.0, 1.0, 1.0), score_cutoff=None))]
pub fn levenshtein_distance_batch(
    pairs: Vec<(String, String)>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    score_cutoff: Option<f64>,
) -> PyResult<Vec<f64>> {
    let model = parse_model(mode, cost)?;
    Ok(pairs
        .par_iter()
        .map(|(s1, s2)| {
            let dist = distance(s1, s2, &model);
            match score_cutoff {
                Some(cutoff) if dist > cutoff => cutoff + 1.0,
                _ => dist,
            }
        })
        .collect())
}

/// Calculate normalized Levenshtein distance for a batch of string pairs.
#[pyfunction]
#[pyo3(signature = (pairs, *, mode="lev", cost=(1.0, 1.0, 1.0, 1.0), score_cutoff=None))]
pub fn levenshtein_normalized_distance_batch(
    pairs: Vec<(String, String)>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    score_cutoff: Option<f64>,
) -> PyResult<Vec<f64>> {
    let model = parse_model(mode, cost)?;
    Ok(pairs
        .par_iter()
        .map(|(s1, s2)| {
            let norm_dist = normalized_distance(s1, s2, &model);
            match score_cutoff {
                Some(cutoff) if norm_dist > cutoff => 1.0,
                _ => norm_dist,
            }
        })
        .collect())
}

/// Calculate normalized Levenshtein similarity for a batch of string pairs.
#[pyfunction]
#[pyo3(signature = (pairs, *, mode="lev", cost=(1.0, 1.0, 1.0, 1.0), score_cutoff=None))]
pub fn levenshtein_normalized_similarity_batch(
    pairs: Vec<(String, String)>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    score_cutoff: Option<f64>,
) -> PyResult<Vec<f64>> {
    let model = parse_model(mode, cost)?;
    Ok(pairs
        .par_iter()
        .map(|(s1, s2)| {
            let norm_sim = similarity(s1, s2, &model);
            match score_cutoff {
                Some(cutoff) if norm_sim < cutoff => 0.0,
                _ => norm_sim,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_distance_by_mode() {
        approx_eq(distance("ATCG", "TAGC", &CostModel::unit(EditMode::Simple)), 3.0);
        approx_eq(
            distance("ATCG", "TAGC", &CostModel::unit(EditMode::RestrictedTransposition)),
            2.0,
        );
        approx_eq(
            distance("ATCG", "TAGC", &CostModel::unit(EditMode::UnrestrictedTransposition)),
            2.0,
        );
    }

    #[test]
    fn test_normalized_distance() {
        let model = CostModel::unit(EditMode::Simple);
        approx_eq(normalized_distance("cat", "hat", &model), 1.0 / 3.0);
        approx_eq(normalized_distance("Niall", "Neil", &model), 0.6);
        approx_eq(normalized_distance("ATCG", "TAGC", &model), 0.75);
        approx_eq(normalized_distance("", "", &model), 0.0);

        let dam = CostModel::unit(EditMode::UnrestrictedTransposition);
        approx_eq(normalized_distance("ATCG", "TAGC", &dam), 0.5);
    }

    #[test]
    fn test_normalized_bounds() {
        for mode in [
            EditMode::Simple,
            EditMode::RestrictedTransposition,
            EditMode::UnrestrictedTransposition,
        ] {
            let model = CostModel::unit(mode);
            for (s1, s2) in [
                ("", ""),
                ("", "abc"),
                ("cat", "hat"),
                ("Niall", "Neil"),
                ("aluminum", "Catalan"),
            ] {
                let nd = normalized_distance(s1, s2, &model);
                assert!((0.0..=1.0).contains(&nd), "{nd} out of range for {s1}/{s2}");
            }
        }
    }

    #[test]
    fn test_similarity() {
        let model = CostModel::unit(EditMode::Simple);
        approx_eq(similarity("cat", "hat", &model), 2.0 / 3.0);
        approx_eq(similarity("Niall", "Neil", &model), 0.4);
        approx_eq(similarity("abc", "abc", &model), 1.0);
    }

    #[test]
    fn test_alignment() {
        let model = CostModel::unit(EditMode::Simple);
        let (dist, sa, ta) = alignment("ATCG", "TAGC", &model).unwrap();
        assert_eq!(dist, 3.0);
        assert_eq!(sa, "ATCG-");
        assert_eq!(ta, "-TAGC");
    }

    #[test]
    fn test_weighted_distance() {
        // Half-cost substitutions.
        let model = CostModel::new(1.0, 1.0, 0.5, 1.0, EditMode::Simple).unwrap();
        approx_eq(distance("cat", "hat", &model), 0.5);
        // Transposition cheaper than the two substitutions it replaces.
        let model =
            CostModel::new(1.0, 1.0, 1.0, 1.5, EditMode::RestrictedTransposition).unwrap();
        approx_eq(distance("ab", "ba", &model), 1.5);
    }

    #[test]
    fn test_score_cutoff() {
        let dist =
            levenshtein_distance("Niall", "Neil", "lev", (1.0, 1.0, 1.0, 1.0), Some(1.0)).unwrap();
        approx_eq(dist, 2.0);
        let sim = levenshtein_normalized_similarity(
            "Niall",
            "Neil",
            "lev",
            (1.0, 1.0, 1.0, 1.0),
            Some(0.9),
        )
        .unwrap();
        approx_eq(sim, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(levenshtein_distance("a", "b", "damerau", (1.0, 1.0, 1.0, 1.0), None).is_err());
        assert!(levenshtein_distance("a", "b", "dam", (1.0, 1.0, 1.0, 0.1), None).is_err());
        assert!(levenshtein_alignment("ab", "ba", "dam", (1.0, 1.0, 1.0, 1.0)).is_err());
    }
}
