//! Code for reading the country specifications CSV file.
use super::{input_err_msg, read_csv};
use crate::country::{Country, CountryMap};
use crate::error::ModelError;
use crate::units::{Dimensionless, MoneyPerEnergy, MoneyPerVolume};
use ::log::warn;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use unicase::UniCase;

#[derive(PartialEq, Debug, Deserialize)]
struct CountryRaw {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "GridPrice")]
    grid_price: f64,
    #[serde(rename = "GridLosses")]
    grid_losses: f64,
    #[serde(rename = "BaseToPeak")]
    base_to_peak: f64,
    #[serde(rename = "DieselPriceLow")]
    diesel_price_low: f64,
}

impl CountryRaw {
    fn into_country(self) -> Result<Country, ModelError> {
        let name = self.country.trim();
        if name.is_empty() {
            return Err(ModelError::MalformedInput {
                location: "Country column".to_string(),
                message: "Country name cannot be empty".to_string(),
            });
        }

        let country = Country {
            id: name.into(),
            grid_price: MoneyPerEnergy(self.grid_price),
            grid_losses: Dimensionless(self.grid_losses),
            base_to_peak_load_ratio: Dimensionless(self.base_to_peak),
            diesel_price_low: MoneyPerVolume(self.diesel_price_low),
        };
        country.validate()?;

        Ok(country)
    }
}

/// Read the country specifications from the specified file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
/// * `lenient` - Whether to skip invalid rows (with a warning) rather than failing
///
/// # Returns
///
/// The valid countries, in file order, or an error
pub fn read_countries(file_path: &Path, lenient: bool) -> Result<CountryMap> {
    let iter = read_csv::<CountryRaw>(file_path)?;
    read_countries_from_iter(iter, lenient).with_context(|| input_err_msg(file_path))
}

fn read_countries_from_iter<I>(iter: I, lenient: bool) -> Result<CountryMap>
where
    I: Iterator<Item = Result<CountryRaw, ModelError>>,
{
    let mut countries = CountryMap::new();
    let mut names = HashSet::new();
    for (row, raw) in iter.enumerate() {
        let country = match raw.and_then(CountryRaw::into_country) {
            Ok(country) => country,
            Err(err) if lenient => {
                warn!("Skipping country on row {}: {err}", row + 1);
                continue;
            }
            Err(err) => Err(err).with_context(|| format!("Invalid country on row {}", row + 1))?,
        };

        // Names must be unique ignoring case, as they become column headers in the outputs
        if !names.insert(UniCase::new(country.id.to_string())) {
            let msg = format!("Duplicate country name: {}", country.id);
            ensure!(lenient, msg);
            warn!("Skipping country on row {}: {msg}", row + 1);
            continue;
        }

        countries.insert(country.id.clone(), country);
    }

    ensure!(!countries.is_empty(), "No valid countries found");

    Ok(countries)
}
