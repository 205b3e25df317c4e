//! Alignment reconstruction by backtrace over a completed distance matrix.
//!
//! The walk starts at the terminal cell and prefers, in order: the diagonal
//! (match or substitution), the insertion predecessor (gap on the source
//! side), then the deletion predecessor (gap on the target side). The order
//! is a fixed policy so ties break identically across calls; the result is
//! deterministic but not the unique optimal alignment.

use crate::cost::{CostModel, EditMode, ModelError};
use crate::matrix::{edit_matrix, DistanceMatrix};
use crate::subst::SubstitutionCost;

/// Marker emitted on the gapped side of an indel.
pub const GAP: char = '-';

/// Walk one optimal path through `mat`, emitting `None` for gaps.
///
/// Both returned sequences have the same length: max alignment length is
/// `|src| + |tar|`, reached when the path takes no diagonal at all.
pub fn backtrace<T: Copy>(
    mat: &DistanceMatrix,
    src: &[T],
    tar: &[T],
) -> (Vec<Option<T>>, Vec<Option<T>>) {
    let mut i = src.len();
    let mut j = tar.len();
    let mut src_aligned: Vec<Option<T>> = Vec::with_capacity(i.max(j));
    let mut tar_aligned: Vec<Option<T>> = Vec::with_capacity(i.max(j));

    while i > 0 && j > 0 {
        let diag = mat.get(i - 1, j - 1);
        let ins = mat.get(i, j - 1);
        let del = mat.get(i - 1, j);
        if diag <= ins.min(del) {
            i -= 1;
            j -= 1;
            src_aligned.push(Some(src[i]));
            tar_aligned.push(Some(tar[j]));
        } else if ins <= del {
            j -= 1;
            src_aligned.push(None);
            tar_aligned.push(Some(tar[j]));
        } else {
            i -= 1;
            src_aligned.push(Some(src[i]));
            tar_aligned.push(None);
        }
    }
    while j > 0 {
        j -= 1;
        src_aligned.push(None);
        tar_aligned.push(Some(tar[j]));
    }
    while i > 0 {
        i -= 1;
        src_aligned.push(Some(src[i]));
        tar_aligned.push(None);
    }

    src_aligned.reverse();
    tar_aligned.reverse();
    (src_aligned, tar_aligned)
}

/// Distance plus one optimal alignment of the two sequences.
///
/// Only defined for `Simple` and `RestrictedTransposition` matrices; the
/// unrestricted-transposition kernel folds its borders into the seeding and
/// the three-neighbor walk does not traverse that layout.
pub fn align<T, S>(
    src: &[T],
    tar: &[T],
    model: &CostModel,
    sub: &S,
) -> Result<(f64, Vec<Option<T>>, Vec<Option<T>>), ModelError>
where
    T: Copy + PartialEq,
    S: SubstitutionCost<T>,
{
    if model.mode() == EditMode::UnrestrictedTransposition {
        return Err(ModelError::InvalidMode(
            "alignment supports \"lev\" and \"osa\" only".to_string(),
        ));
    }
    let mat = edit_matrix(src, tar, model, sub);
    let distance = mat.terminal();
    let (src_aligned, tar_aligned) = backtrace(&mat, src, tar);
    Ok((distance, src_aligned, tar_aligned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subst::Discrete;

    fn align_str(s1: &str, s2: &str, model: &CostModel) -> (f64, String, String) {
        let a: Vec<char> = s1.chars().collect();
        let b: Vec<char> = s2.chars().collect();
        let sub = Discrete::new(model.substitute());
        let (dist, sa, ta) = align(&a, &b, model, &sub).unwrap();
        (
            dist,
            sa.into_iter().map(|c| c.unwrap_or(GAP)).collect(),
            ta.into_iter().map(|c| c.unwrap_or(GAP)).collect(),
        )
    }

    #[test]
    fn test_alignment_with_indels() {
        let model = CostModel::unit(EditMode::Simple);
        assert_eq!(
            align_str("ATCG", "TAGC", &model),
            (3.0, "ATCG-".to_string(), "-TAGC".to_string())
        );
        assert_eq!(
            align_str("Niall", "Neil", &model),
            (3.0, "Niall".to_string(), "Neil-".to_string())
        );
    }

    #[test]
    fn test_alignment_substitution_only() {
        let model = CostModel::unit(EditMode::Simple);
        assert_eq!(
            align_str("cat", "hat", &model),
            (1.0, "cat".to_string(), "hat".to_string())
        );
    }

    #[test]
    fn test_alignment_identical() {
        let model = CostModel::unit(EditMode::Simple);
        assert_eq!(
            align_str("abc", "abc", &model),
            (0.0, "abc".to_string(), "abc".to_string())
        );
    }

    #[test]
    fn test_alignment_one_empty() {
        let model = CostModel::unit(EditMode::Simple);
        assert_eq!(
            align_str("", "abc", &model),
            (3.0, "---".to_string(), "abc".to_string())
        );
        assert_eq!(
            align_str("ab", "", &model),
            (2.0, "ab".to_string(), "--".to_string())
        );
    }

    #[test]
    fn test_alignment_osa() {
        let model = CostModel::unit(EditMode::RestrictedTransposition);
        let (dist, sa, ta) = align_str("ATCG", "TAGC", &model);
        assert_eq!(dist, 2.0);
        assert_eq!(sa.len(), ta.len());
    }

    #[test]
    fn test_alignment_rejects_unrestricted() {
        let model = CostModel::unit(EditMode::UnrestrictedTransposition);
        let a: Vec<char> = "ab".chars().collect();
        let b: Vec<char> = "ba".chars().collect();
        let sub = Discrete::new(1.0);
        assert!(matches!(
            align(&a, &b, &model, &sub),
            Err(ModelError::InvalidMode(_))
        ));
    }

    #[test]
    fn test_alignment_gap_count_matches_length_difference() {
        let model = CostModel::unit(EditMode::Simple);
        let (_, sa, ta) = align_str("Colin", "Cuilen", &model);
        assert_eq!(sa.len(), ta.len());
        let src_gaps = sa.chars().filter(|&c| c == GAP).count();
        let tar_gaps = ta.chars().filter(|&c| c == GAP).count();
        // Aligned length = |src| + gaps in src = |tar| + gaps in tar.
        assert_eq!(5 + src_gaps, 6 + tar_gaps);
    }
}
