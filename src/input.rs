//! Common routines for handling input data.
use crate::error::ModelError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub mod country;
pub use country::read_countries;

/// Read a series of type `T`s from a CSV file.
///
/// Rows are yielded one at a time so that the caller can decide whether a malformed row is fatal.
/// Columns not named by `T` are ignored.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = Result<T, ModelError>> + 'a> {
    let reader = csv::Reader::from_path(file_path).with_context(|| input_err_msg(file_path))?;
    Ok(reader
        .into_deserialize()
        .map(move |record| record.map_err(|err| malformed_row(file_path, &err))))
}

/// Convert a CSV error into a [`ModelError::MalformedInput`] pointing at the offending line
fn malformed_row(file_path: &Path, err: &csv::Error) -> ModelError {
    let location = match err.position() {
        Some(position) => format!("{}, line {}", file_path.display(), position.line()),
        None => file_path.display().to_string(),
    };
    ModelError::MalformedInput {
        location,
        message: err.to_string(),
    }
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}
