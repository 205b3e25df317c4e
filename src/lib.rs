//! phonedit - Phonetic-aware edit distances
//!
//! This crate provides the Levenshtein edit-distance family (simple, Optimal
//! String Alignment, and unrestricted-transposition modes) over a shared
//! four-cost model, the insert/delete-only indel distance, and a
//! feature-weighted phonetic edit distance, implemented in Rust with Python
//! bindings via PyO3.

use pyo3::prelude::*;

pub mod align;
pub mod cost;
pub mod distance;
pub mod matrix;
pub mod normalize;
pub mod subst;

/// phonedit Python module
#[pymodule]
fn _phonedit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Distance submodule
    let distance_module = PyModule::new(m.py(), "distance")?;
    distance::register_module(&distance_module)?;
    m.add_submodule(&distance_module)?;

    Ok(())
}
