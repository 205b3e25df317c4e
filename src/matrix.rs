//! Dynamic-programming kernels for the edit-distance family.
//!
//! Two kernels share the cost model: the Wagner-Fischer matrix (simple
//! Levenshtein, optionally extended with the Optimal String Alignment
//! transposition candidate) and the Lowrance-Wagner recurrence for
//! unrestricted adjacent transpositions. The Wagner-Fischer kernel keeps the
//! whole matrix so the backtrace can replay it; the transposition kernel only
//! ever yields the terminal value.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::cost::{CostModel, EditMode};
use crate::subst::SubstitutionCost;

/// Dense `(|src|+1) x (|tar|+1)` grid of accumulated costs, stored as one
/// flat buffer with computed indices. Cell `(i, j)` is the minimal cost of
/// transforming the first `i` symbols of src into the first `j` of tar.
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    fn new(rows: usize, cols: usize) -> Self {
        DistanceMatrix {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i * self.cols + j] = value;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Bottom-right cell: the raw distance.
    pub fn terminal(&self) -> f64 {
        self.get(self.rows - 1, self.cols - 1)
    }
}

/// Build the full Wagner-Fischer matrix for `Simple` or
/// `RestrictedTransposition` mode.
///
/// Row 0 and column 0 are seeded with cumulative insert/delete cost. In
/// `RestrictedTransposition` mode each cell additionally considers the
/// transposition candidate `cell(i-2, j-2) + transpose` when the two symbol
/// pairs cross-match; each substring is transposed at most once, which is
/// exactly what makes the variant cheaper but non-metric. The recurrence is
/// kept as-is, overlapping-edit configurations included.
pub fn edit_matrix<T, S>(src: &[T], tar: &[T], model: &CostModel, sub: &S) -> DistanceMatrix
where
    T: PartialEq,
    S: SubstitutionCost<T>,
{
    let rows = src.len() + 1;
    let cols = tar.len() + 1;
    let osa = model.mode() == EditMode::RestrictedTransposition;

    let mut mat = DistanceMatrix::new(rows, cols);
    for i in 1..rows {
        mat.set(i, 0, i as f64 * model.delete());
    }
    for j in 1..cols {
        mat.set(0, j, j as f64 * model.insert());
    }

    for i in 1..rows {
        for j in 1..cols {
            let mut best = (mat.get(i, j - 1) + model.insert())
                .min(mat.get(i - 1, j) + model.delete())
                .min(mat.get(i - 1, j - 1) + sub.cost(&src[i - 1], &tar[j - 1]));

            if osa
                && i > 1
                && j > 1
                && src[i - 1] == tar[j - 2]
                && src[i - 2] == tar[j - 1]
            {
                best = best.min(mat.get(i - 2, j - 2) + model.transpose());
            }

            mat.set(i, j, best);
        }
    }

    mat
}

/// Scalar distance for `Simple` / `RestrictedTransposition` mode.
///
/// Identical and empty inputs are answered without allocating a degenerate
/// matrix; everything else reads the terminal cell of [`edit_matrix`].
pub fn edit_distance<T, S>(src: &[T], tar: &[T], model: &CostModel, sub: &S) -> f64
where
    T: PartialEq,
    S: SubstitutionCost<T>,
{
    debug_assert!(model.mode() != EditMode::UnrestrictedTransposition);

    if src == tar {
        return 0.0;
    }
    if src.is_empty() {
        return tar.len() as f64 * model.insert();
    }
    if tar.is_empty() {
        return src.len() as f64 * model.delete();
    }

    edit_matrix(src, tar, model, sub).terminal()
}

/// Unrestricted-transposition (Damerau-Levenshtein) distance.
///
/// Lowrance-Wagner style: while scanning src left to right, `last_src` maps
/// each symbol to the last src index where it occurred, and `match_j` tracks
/// the last tar index matched against the current src symbol. When both
/// prior matches exist the swap candidate pays for deleting the symbols
/// between the transposed pair, the transposition itself, and the inserts on
/// the other side; otherwise it is treated as infinite. The matrix is
/// `|src| x |tar|` with the first row/column folded into the seeding, so
/// only the terminal value is meaningful to callers.
pub fn transposition_distance<T, S>(src: &[T], tar: &[T], model: &CostModel, sub: &S) -> f64
where
    T: Copy + Eq + Hash,
    S: SubstitutionCost<T>,
{
    if src == tar {
        return 0.0;
    }
    if src.is_empty() {
        return tar.len() as f64 * model.insert();
    }
    if tar.is_empty() {
        return src.len() as f64 * model.delete();
    }

    let m = src.len();
    let n = tar.len();
    let stride = n;
    let mut mat = vec![0.0f64; m * n];

    if src[0] != tar[0] {
        mat[0] = sub
            .cost(&src[0], &tar[0])
            .min(model.insert() + model.delete());
    }

    // First column: transform src[..=i] into tar[..1].
    for i in 1..m {
        let del_dist = mat[(i - 1) * stride] + model.delete();
        let ins_dist = (i + 1) as f64 * model.delete() + model.insert();
        let match_dist = i as f64 * model.delete() + sub.cost(&src[i], &tar[0]);
        mat[i * stride] = del_dist.min(ins_dist).min(match_dist);
    }

    // First row: transform src[..1] into tar[..=j].
    for j in 1..n {
        let del_dist = (j + 1) as f64 * model.insert() + model.delete();
        let ins_dist = mat[j - 1] + model.insert();
        let match_dist = j as f64 * model.insert() + sub.cost(&src[0], &tar[j]);
        mat[j] = del_dist.min(ins_dist).min(match_dist);
    }

    let mut last_src: FxHashMap<T, usize> = FxHashMap::default();
    last_src.insert(src[0], 0);

    for i in 1..m {
        // Last tar index matched against src[i] within this row.
        let mut match_j = if src[i] == tar[0] { Some(0) } else { None };

        for j in 1..n {
            let swap_i = last_src.get(&tar[j]).copied();
            let swap_j = match_j;

            let del_dist = mat[(i - 1) * stride + j] + model.delete();
            let ins_dist = mat[i * stride + (j - 1)] + model.insert();
            let mut match_dist = mat[(i - 1) * stride + (j - 1)];
            if src[i] != tar[j] {
                match_dist += sub.cost(&src[i], &tar[j]);
            } else {
                match_j = Some(j);
            }

            let swap_dist = match (swap_i, swap_j) {
                (Some(i_swap), Some(j_swap)) => {
                    let pre_swap = if i_swap == 0 && j_swap == 0 {
                        0.0
                    } else {
                        mat[i_swap.saturating_sub(1) * stride + j_swap.saturating_sub(1)]
                    };
                    pre_swap
                        + (i - i_swap - 1) as f64 * model.delete()
                        + (j - j_swap - 1) as f64 * model.insert()
                        + model.transpose()
                }
                _ => f64::INFINITY,
            };

            mat[i * stride + j] = del_dist.min(ins_dist).min(match_dist).min(swap_dist);
        }

        last_src.insert(src[i], i);
    }

    mat[(m - 1) * stride + (n - 1)]
}
