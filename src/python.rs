//! Python bindings, built with the `python` feature.

use std::collections::{HashMap, HashSet};

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::wordcount::FrequencyTable;

fn into_dict(table: FrequencyTable) -> HashMap<String, u64> {
    table
        .iter()
        .map(|(token, count)| (token.to_string(), count))
        .collect()
}

fn to_py_err(err: crate::Error) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

/// Parallel word count: token -> occurrences
#[pyfunction]
#[pyo3(signature = (text, processes=None))]
fn count_words(text: String, processes: Option<usize>) -> PyResult<HashMap<String, u64>> {
    crate::wordcount::count_words(&text, processes)
        .map(into_dict)
        .map_err(to_py_err)
}

/// Frequent tokens of `text` that are not in `known_words`
#[pyfunction]
#[pyo3(signature = (text, known_words, min_count=2, processes=None))]
fn detect_non_english(
    text: String,
    known_words: HashSet<String>,
    min_count: u64,
    processes: Option<usize>,
) -> PyResult<HashMap<String, u64>> {
    crate::dictionary::detect_non_english(&text, min_count, &known_words, processes)
        .map(into_dict)
        .map_err(to_py_err)
}

#[pyfunction]
fn prepare_for_spellcheck(text: String) -> String {
    crate::preprocess::prepare_for_spellcheck(&text)
}

#[pymodule]
fn hp_wordcount(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(count_words, m)?)?;
    m.add_function(wrap_pyfunction!(detect_non_english, m)?)?;
    m.add_function(wrap_pyfunction!(prepare_for_spellcheck, m)?)?;
    Ok(())
}
