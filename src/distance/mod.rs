//! Distance algorithms module.
//!
//! The edit-distance family: Levenshtein (simple, OSA, and unrestricted
//! transposition modes), indel, and phonetic edit distance.

use pyo3::prelude::*;

pub mod indel;
pub mod levenshtein;
pub mod phonetic;

pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Levenshtein family (lev / osa / dam modes)
    m.add_function(wrap_pyfunction!(levenshtein::levenshtein_distance, m)?)?;
    m.add_function(wrap_pyfunction!(levenshtein::levenshtein_normalized_distance, m)?)?;
    m.add_function(wrap_pyfunction!(levenshtein::levenshtein_normalized_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(levenshtein::levenshtein_alignment, m)?)?;
    m.add_function(wrap_pyfunction!(levenshtein::levenshtein_distance_batch, m)?)?;
    m.add_function(wrap_pyfunction!(levenshtein::levenshtein_normalized_distance_batch, m)?)?;
    m.add_function(wrap_pyfunction!(levenshtein::levenshtein_normalized_similarity_batch, m)?)?;

    // Indel
    m.add_function(wrap_pyfunction!(indel::indel_distance, m)?)?;
    m.add_function(wrap_pyfunction!(indel::indel_normalized_distance, m)?)?;
    m.add_function(wrap_pyfunction!(indel::indel_normalized_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(indel::indel_distance_batch, m)?)?;
    m.add_function(wrap_pyfunction!(indel::indel_normalized_similarity_batch, m)?)?;

    // Phonetic edit distance
    m.add_function(wrap_pyfunction!(phonetic::phonetic_edit_distance, m)?)?;
    m.add_function(wrap_pyfunction!(phonetic::phonetic_normalized_distance, m)?)?;
    m.add_function(wrap_pyfunction!(phonetic::phonetic_normalized_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(phonetic::phonetic_alignment, m)?)?;
    m.add_function(wrap_pyfunction!(phonetic::phonetic_edit_distance_batch, m)?)?;
    m.add_function(wrap_pyfunction!(phonetic::phonetic_normalized_similarity_batch, m)?)?;

    Ok(())
}
