//! Edit cost model shared by every distance variant.
//!
//! The four edit costs (insert, delete, substitute, transpose) and the mode
//! selector are validated once at construction; the DP kernels never re-check
//! mid-computation.

use std::str::FromStr;

use pyo3::exceptions::PyValueError;
use pyo3::PyErr;
use thiserror::Error;

/// Substitution/transposition cost high enough that the recurrence never
/// picks the edit over an insert plus a delete at unit cost.
pub const PROHIBITIVE_COST: f64 = 9999.0;

/// Which recurrence the DP kernels run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Ordinary Levenshtein: inserts, deletes, and substitutions.
    Simple,
    /// Optimal String Alignment: adds adjacent transpositions, but each
    /// substring may be edited at most once. Not a metric.
    RestrictedTransposition,
    /// Full Damerau-Levenshtein with unrestricted adjacent transpositions.
    UnrestrictedTransposition,
}

impl FromStr for EditMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, ModelError> {
        match s {
            "lev" => Ok(EditMode::Simple),
            "osa" => Ok(EditMode::RestrictedTransposition),
            "dam" => Ok(EditMode::UnrestrictedTransposition),
            other => Err(ModelError::InvalidMode(other.to_string())),
        }
    }
}

/// Input-validation failures. Raised before any matrix work begins; the
/// kernels themselves are total over all finite sequence pairs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unsupported cost assignment: {0}")]
    InvalidCostModel(String),
    #[error("invalid mode: {0:?}")]
    InvalidMode(String),
}

impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Validated edit costs plus the mode they apply to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    insert: f64,
    delete: f64,
    substitute: f64,
    transpose: f64,
    mode: EditMode,
}

impl CostModel {
    /// Build a cost model, rejecting assignments the kernels cannot handle.
    ///
    /// Under `UnrestrictedTransposition` the transposition shortcut is only
    /// optimal when `2 * transpose >= insert + delete`; otherwise two
    /// transpositions always beat an insert/delete pair and the recurrence
    /// returns wrong distances, so such models are refused outright.
    pub fn new(
        insert: f64,
        delete: f64,
        substitute: f64,
        transpose: f64,
        mode: EditMode,
    ) -> Result<Self, ModelError> {
        if insert < 0.0 || delete < 0.0 || substitute < 0.0 || transpose < 0.0 {
            return Err(ModelError::InvalidCostModel(
                "edit costs must be non-negative".to_string(),
            ));
        }
        if mode == EditMode::UnrestrictedTransposition && 2.0 * transpose < insert + delete {
            return Err(ModelError::InvalidCostModel(
                "the cost of two transpositions must not be less than the cost \
                 of an insert plus a delete"
                    .to_string(),
            ));
        }
        Ok(CostModel {
            insert,
            delete,
            substitute,
            transpose,
            mode,
        })
    }

    /// Unit costs for all four edits. Valid under every mode.
    pub fn unit(mode: EditMode) -> Self {
        CostModel {
            insert: 1.0,
            delete: 1.0,
            substitute: 1.0,
            transpose: 1.0,
            mode,
        }
    }

    /// Insert/delete-only model: substitution and transposition priced out
    /// of the recurrence entirely.
    pub fn indel() -> Self {
        CostModel {
            insert: 1.0,
            delete: 1.0,
            substitute: PROHIBITIVE_COST,
            transpose: PROHIBITIVE_COST,
            mode: EditMode::Simple,
        }
    }

    /// Default phonetic costs: cheap indels and a very cheap transposition.
    ///
    /// With a unit transposition cost no phones would ever be transposed,
    /// since even quite dissimilar phones agree on most features and graded
    /// substitution stays cheap.
    pub fn phonetic(mode: EditMode) -> Self {
        CostModel {
            insert: 0.3,
            delete: 0.3,
            substitute: 1.0,
            transpose: 0.1,
            mode,
        }
    }

    #[inline]
    pub fn insert(&self) -> f64 {
        self.insert
    }

    #[inline]
    pub fn delete(&self) -> f64 {
        self.delete
    }

    #[inline]
    pub fn substitute(&self) -> f64 {
        self.substitute
    }

    #[inline]
    pub fn transpose(&self) -> f64 {
        self.transpose
    }

    #[inline]
    pub fn mode(&self) -> EditMode {
        self.mode
    }
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::unit(EditMode::Simple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_model() {
        let model = CostModel::unit(EditMode::Simple);
        assert_eq!(model.insert(), 1.0);
        assert_eq!(model.delete(), 1.0);
        assert_eq!(model.substitute(), 1.0);
        assert_eq!(model.transpose(), 1.0);
    }

    #[test]
    fn test_cheap_transposition_rejected() {
        // 2 * 0.1 < 1 + 1
        let err = CostModel::new(1.0, 1.0, 1.0, 0.1, EditMode::UnrestrictedTransposition);
        assert!(matches!(err, Err(ModelError::InvalidCostModel(_))));
    }

    #[test]
    fn test_cheap_transposition_allowed_elsewhere() {
        // The constraint only guards the unrestricted-transposition kernel.
        assert!(CostModel::new(1.0, 1.0, 1.0, 0.1, EditMode::Simple).is_ok());
        assert!(CostModel::new(1.0, 1.0, 1.0, 0.1, EditMode::RestrictedTransposition).is_ok());
        assert!(CostModel::new(1.0, 1.0, 1.0, 1.0, EditMode::UnrestrictedTransposition).is_ok());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let err = CostModel::new(-1.0, 1.0, 1.0, 1.0, EditMode::Simple);
        assert!(matches!(err, Err(ModelError::InvalidCostModel(_))));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("lev".parse::<EditMode>(), Ok(EditMode::Simple));
        assert_eq!("osa".parse::<EditMode>(), Ok(EditMode::RestrictedTransposition));
        assert_eq!("dam".parse::<EditMode>(), Ok(EditMode::UnrestrictedTransposition));
        assert!(matches!(
            "damerau".parse::<EditMode>(),
            Err(ModelError::InvalidMode(_))
        ));
    }
}
