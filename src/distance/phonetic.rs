//! Phonetic edit distance.
//!
//! A variation on Levenshtein distance for phone sequences in which the
//! substitution cost is graded by featural similarity instead of binary
//! equality: substituting [p] for [b] costs a fraction of substituting [p]
//! for [a]. Phone sequences arrive pre-encoded; mapping orthography or IPA
//! to feature vectors is the job of an upstream encoder.

use std::collections::HashMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rayon::prelude::*;

use crate::align;
use crate::cost::{CostModel, EditMode, ModelError};
use crate::matrix;
use crate::normalize::{self, Reduction};
use crate::subst::SubstitutionCost;

/// Canonical feature order. Ordered weight lists index into this; named
/// weight mappings are resolved against it.
pub const FEATURE_NAMES: [&str; 20] = [
    "syllabic",
    "consonantal",
    "sonorant",
    "continuant",
    "delayed_release",
    "lateral",
    "nasal",
    "strident",
    "voice",
    "spread_glottis",
    "constricted_glottis",
    "labial",
    "round",
    "coronal",
    "anterior",
    "distributed",
    "dorsal",
    "high",
    "low",
    "back",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Feature values: +1 (plus), -1 (minus), 0 (unspecified).
pub type FeatureVector = [i8; FEATURE_COUNT];

/// One phone: a display symbol plus the feature vector the encoder assigned
/// it, or `None` when the encoder could not map the symbol.
#[derive(Debug, Clone, Copy)]
pub struct Phone {
    symbol: char,
    features: Option<FeatureVector>,
}

impl Phone {
    /// Shorter or longer feature slices are zero-padded or truncated to the
    /// canonical length.
    pub fn new(symbol: char, features: Option<&[i8]>) -> Self {
        let features = features.map(|given| {
            let mut padded = [0i8; FEATURE_COUNT];
            for (slot, &value) in padded.iter_mut().zip(given.iter()) {
                *slot = value;
            }
            padded
        });
        Phone { symbol, features }
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn features(&self) -> Option<&FeatureVector> {
        self.features.as_ref()
    }
}

/// Phones compare by feature vector when both are mapped; unmapped phones
/// fall back to their display symbol. A mapped phone never equals an
/// unmapped one.
impl PartialEq for Phone {
    fn eq(&self, other: &Self) -> bool {
        match (&self.features, &other.features) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.symbol == other.symbol,
            _ => false,
        }
    }
}

/// Per-feature weights for the agreement score.
#[derive(Debug, Clone)]
pub struct FeatureWeights {
    weights: [f64; FEATURE_COUNT],
}

impl FeatureWeights {
    /// All features equally significant.
    pub fn uniform() -> Self {
        FeatureWeights {
            weights: [1.0; FEATURE_COUNT],
        }
    }

    /// Weights in `FEATURE_NAMES` order; features past the end of the slice
    /// get weight 0 and are excluded from the comparison.
    pub fn from_ordered(given: &[f64]) -> Self {
        let mut weights = [0.0; FEATURE_COUNT];
        for (slot, &value) in weights.iter_mut().zip(given.iter()) {
            *slot = value;
        }
        FeatureWeights { weights }
    }

    /// Sparse name-to-weight mapping; unnamed features get weight 0. Names
    /// not in `FEATURE_NAMES` are ignored.
    pub fn from_named(given: &HashMap<String, f64>) -> Self {
        let mut weights = [0.0; FEATURE_COUNT];
        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            if let Some(&value) = given.get(*name) {
                weights[i] = value;
            }
        }
        FeatureWeights { weights }
    }

    /// Weighted fraction of features on which the two vectors agree.
    /// Symmetric; 1.0 for identical vectors, 0.0 when every weighted feature
    /// disagrees or no feature carries weight.
    pub fn agreement(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        let mut total = 0.0;
        let mut agreeing = 0.0;
        for i in 0..FEATURE_COUNT {
            let weight = self.weights[i];
            if weight == 0.0 {
                continue;
            }
            total += weight;
            if a[i] == b[i] {
                agreeing += weight;
            }
        }
        if total == 0.0 {
            0.0
        } else {
            agreeing / total
        }
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        FeatureWeights::uniform()
    }
}

/// Graded substitution: `substitute * (1 - agreement)`. A missing feature
/// vector on either side of a non-equal pair counts as complete
/// disagreement rather than an error.
pub struct FeatureSimilarity<'a> {
    substitute: f64,
    weights: &'a FeatureWeights,
}

impl<'a> FeatureSimilarity<'a> {
    pub fn new(substitute: f64, weights: &'a FeatureWeights) -> Self {
        FeatureSimilarity { substitute, weights }
    }
}

impl SubstitutionCost<Phone> for FeatureSimilarity<'_> {
    fn cost(&self, a: &Phone, b: &Phone) -> f64 {
        if a == b {
            return 0.0;
        }
        match (a.features(), b.features()) {
            (Some(fa), Some(fb)) => self.substitute * (1.0 - self.weights.agreement(fa, fb)),
            _ => self.substitute,
        }
    }
}

fn ensure_mode(model: &CostModel) -> Result<(), ModelError> {
    if model.mode() == EditMode::UnrestrictedTransposition {
        return Err(ModelError::InvalidMode(
            "phonetic edit distance supports \"lev\" and \"osa\" only".to_string(),
        ));
    }
    Ok(())
}

/// Raw phonetic edit distance between two phone sequences.
pub fn distance(
    src: &[Phone],
    tar: &[Phone],
    model: &CostModel,
    weights: &FeatureWeights,
) -> Result<f64, ModelError> {
    ensure_mode(model)?;
    let sub = FeatureSimilarity::new(model.substitute(), weights);
    Ok(matrix::edit_distance(src, tar, model, &sub))
}

/// Distance rescaled by a reduction over
/// `[len(src) * delete, len(tar) * insert]`.
pub fn normalized_distance(
    src: &[Phone],
    tar: &[Phone],
    model: &CostModel,
    weights: &FeatureWeights,
    reduce: Reduction,
) -> Result<f64, ModelError> {
    ensure_mode(model)?;
    if src == tar {
        return Ok(0.0);
    }
    let dist = distance(src, tar, model, weights)?;
    Ok(normalize::normalized(
        dist,
        &[
            src.len() as f64 * model.delete(),
            tar.len() as f64 * model.insert(),
        ],
        reduce,
    ))
}

/// Complement of the normalized distance.
pub fn similarity(
    src: &[Phone],
    tar: &[Phone],
    model: &CostModel,
    weights: &FeatureWeights,
    reduce: Reduction,
) -> Result<f64, ModelError> {
    Ok(1.0 - normalized_distance(src, tar, model, weights, reduce)?)
}

/// Raw distance plus one optimal alignment of the display symbols, gap
/// marker `-`.
pub fn alignment(
    src: &[Phone],
    tar: &[Phone],
    model: &CostModel,
    weights: &FeatureWeights,
) -> Result<(f64, String, String), ModelError> {
    ensure_mode(model)?;
    let sub = FeatureSimilarity::new(model.substitute(), weights);
    let (dist, src_aligned, tar_aligned) = align::align(src, tar, model, &sub)?;
    Ok((dist, render(src_aligned), render(tar_aligned)))
}

fn render(symbols: Vec<Option<Phone>>) -> String {
    symbols
        .into_iter()
        .map(|p| p.map(|p| p.symbol()).unwrap_or(align::GAP))
        .collect()
}

// ============ Python surface ============

/// Pre-encoded phone as it crosses the boundary: (symbol, feature values).
type PhoneArg = (char, Option<Vec<i8>>);

#[derive(FromPyObject)]
pub enum WeightsArg {
    /// Weights in `FEATURE_NAMES` order.
    Ordered(Vec<f64>),
    /// Sparse name-to-weight mapping.
    Named(HashMap<String, f64>),
}

fn to_phones(seq: &[PhoneArg]) -> Vec<Phone> {
    seq.iter()
        .map(|(symbol, features)| Phone::new(*symbol, features.as_deref()))
        .collect()
}

fn build_weights(weights: Option<&WeightsArg>) -> FeatureWeights {
    match weights {
        None => FeatureWeights::uniform(),
        Some(WeightsArg::Ordered(values)) => FeatureWeights::from_ordered(values),
        Some(WeightsArg::Named(map)) => FeatureWeights::from_named(map),
    }
}

fn parse_reduction(name: &str) -> PyResult<Reduction> {
    match name {
        "max" => Ok(normalize::max_reduction),
        "sum" => Ok(normalize::sum_reduction),
        other => Err(PyValueError::new_err(format!(
            "unknown normalizer: {other:?} (expected \"max\" or \"sum\")"
        ))),
    }
}

fn parse_model(mode: &str, cost: (f64, f64, f64, f64)) -> Result<CostModel, ModelError> {
    let mode = mode.parse::<EditMode>()?;
    CostModel::new(cost.0, cost.1, cost.2, cost.3, mode)
}

/// Calculate the phonetic edit distance between two phone sequences.
/// Each phone is a (symbol, features) pair; features may be None.
#[pyfunction]
#[pyo3(signature = (src, tar, *, mode="lev", cost=(0.3, 0.3, 1.0, 0.1), weights=None, score_cutoff=None))]
pub fn phonetic_edit_distance(
    src: Vec<PhoneArg>,
    tar: Vec<PhoneArg>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    weights: Option<WeightsArg>,
    score_cutoff: Option<f64>,
) -> PyResult<f64> {
    let model = parse_model(mode, cost)?;
    let fw = build_weights(weights.as_ref());
    let dist = distance(&to_phones(&src), &to_phones(&tar), &model, &fw)?;
    Ok(match score_cutoff {
        Some(cutoff) if dist > cutoff => cutoff + 1.0,
        _ => dist,
    })
}

/// Calculate the normalized phonetic edit distance.
#[pyfunction]
#[pyo3(signature = (src, tar, *, mode="lev", cost=(0.3, 0.3, 1.0, 0.1), weights=None, normalizer="max", score_cutoff=None))]
pub fn phonetic_normalized_distance(
    src: Vec<PhoneArg>,
    tar: Vec<PhoneArg>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    weights: Option<WeightsArg>,
    normalizer: &str,
    score_cutoff: Option<f64>,
) -> PyResult<f64> {
    let model = parse_model(mode, cost)?;
    let fw = build_weights(weights.as_ref());
    let reduce = parse_reduction(normalizer)?;
    let norm_dist = normalized_distance(&to_phones(&src), &to_phones(&tar), &model, &fw, reduce)?;
    Ok(match score_cutoff {
        Some(cutoff) if norm_dist > cutoff => 1.0,
        _ => norm_dist,
    })
}

/// Calculate the normalized phonetic similarity.
/// similarity = 1 - normalized_distance
#[pyfunction]
#[pyo3(signature = (src, tar, *, mode="lev", cost=(0.3, 0.3, 1.0, 0.1), weights=None, normalizer="max", score_cutoff=None))]
pub fn phonetic_normalized_similarity(
    src: Vec<PhoneArg>,
    tar: Vec<PhoneArg>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    weights: Option<WeightsArg>,
    normalizer: &str,
    score_cutoff: Option<f64>,
) -> PyResult<f64> {
    let model = parse_model(mode, cost)?;
    let fw = build_weights(weights.as_ref());
    let reduce = parse_reduction(normalizer)?;
    let norm_sim = similarity(&to_phones(&src), &to_phones(&tar), &model, &fw, reduce)?;
    Ok(match score_cutoff {
        Some(cutoff) if norm_sim < cutoff => 0.0,
        _ => norm_sim,
    })
}

/// Calculate the phonetic edit distance and one optimal alignment.
/// Returns (distance, aligned_src, aligned_tar) with `-` marking gaps.
#[pyfunction]
#[pyo3(signature = (src, tar, *, mode="lev", cost=(0.3, 0.3, 1.0, 0.1), weights=None))]
pub fn phonetic_alignment(
    src: Vec<PhoneArg>,
    tar: Vec<PhoneArg>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    weights: Option<WeightsArg>,
) -> PyResult<(f64, String, String)> {
    let model = parse_model(mode, cost)?;
    let fw = build_weights(weights.as_ref());
    Ok(alignment(&to_phones(&src), &to_phones(&tar), &model, &fw)?)
}

// ============ Batch Operations ============

/// Calculate phonetic edit distance for a batch of phone-sequence pairs.
#[pyfunction]
#[pyo3(signature = (pairs, *, mode="lev", cost=(0.3, 0.3, 1.0, 0.1), weights=None, score_cutoff=None))]
pub fn phonetic_edit_distance_batch(
    pairs: Vec<(Vec<PhoneArg>, Vec<PhoneArg>)>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    weights: Option<WeightsArg>,
    score_cutoff: Option<f64>,
) -> PyResult<Vec<f64>> {
    let model = parse_model(mode, cost)?;
    ensure_mode(&model)?;
    let fw = build_weights(weights.as_ref());
    Ok(pairs
        .par_iter()
        .map(|(src, tar)| {
            let sub = FeatureSimilarity::new(model.substitute(), &fw);
            let src_phones = to_phones(src);
            let tar_phones = to_phones(tar);
            let dist = matrix::edit_distance(src_phones.as_slice(), tar_phones.as_slice(), &model, &sub);
            match score_cutoff {
                Some(cutoff) if dist > cutoff => cutoff + 1.0,
                _ => dist,
            }
        })
        .collect())
}

/// Calculate normalized phonetic similarity for a batch of phone-sequence
/// pairs.
#[pyfunction]
#[pyo3(signature = (pairs, *, mode="lev", cost=(0.3, 0.3, 1.0, 0.1), weights=None, normalizer="max", score_cutoff=None))]
pub fn phonetic_normalized_similarity_batch(
    pairs: Vec<(Vec<PhoneArg>, Vec<PhoneArg>)>,
    mode: &str,
    cost: (f64, f64, f64, f64),
    weights: Option<WeightsArg>,
    normalizer: &str,
    score_cutoff: Option<f64>,
) -> PyResult<Vec<f64>> {
    let model = parse_model(mode, cost)?;
    ensure_mode(&model)?;
    let fw = build_weights(weights.as_ref());
    let reduce = parse_reduction(normalizer)?;
    Ok(pairs
        .par_iter()
        .map(|(src, tar)| {
            let src_phones = to_phones(src);
            let tar_phones = to_phones(tar);
            let sub = FeatureSimilarity::new(model.substitute(), &fw);
            let dist =
                matrix::edit_distance(src_phones.as_slice(), tar_phones.as_slice(), &model, &sub);
            let norm_dist = normalize::normalized(
                dist,
                &[
                    src_phones.len() as f64 * model.delete(),
                    tar_phones.len() as f64 * model.insert(),
                ],
                reduce,
            );
            let norm_sim = 1.0 - norm_dist;
            match score_cutoff {
                Some(cutoff) if norm_sim < cutoff => 0.0,
                _ => norm_sim,
            }
        })
        .collect())
}
