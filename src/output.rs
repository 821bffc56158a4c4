//! The module responsible for writing output data to disk.
use crate::cheapest::{CheapestEntry, Supply};
use crate::country::CountryID;
use crate::evaluator::CostMode;
use crate::sampling::{DENSITY_SAMPLE_COUNT, GRID_DISTANCES, density_at};
use crate::scenario::DemandScenario;
use crate::tables::LcoeTables;
use crate::technology::OffGridTechnology;
use crate::units::MoneyPerEnergy;
use crate::viability::GridViabilityTable;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

pub mod metadata;

/// The default root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "lcoes";

/// Name of an output file for the given scenario
fn file_name(stem: &str, scenario: DemandScenario) -> String {
    format!("{stem}_{}.csv", scenario.label())
}

/// Get the output folder for the given scenario.
///
/// Every scenario has its own subfolder of `root` (by default `lcoes`), so runs for different
/// scenarios never touch each other's files, log files and metadata included.
pub fn get_output_dir(root: Option<&Path>, scenario: DemandScenario) -> PathBuf {
    root.unwrap_or(Path::new(OUTPUT_DIRECTORY_ROOT))
        .join(scenario.label())
}

/// Create a new output directory, removing the contents of an existing one if allowed.
///
/// # Arguments
///
/// * `output_dir` - The folder to create
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// `true` if an existing non-empty folder was overwritten, `false` otherwise
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the grid LCOE output files
#[derive(Serialize, Debug, PartialEq)]
struct GridLcoeRow<'a> {
    density: f64,
    country: &'a CountryID,
    distance: f64,
    lcoe: Option<MoneyPerEnergy>,
}

/// Represents a row in the technology LCOE output files
#[derive(Serialize, Debug, PartialEq)]
struct TechLcoeRow<'a> {
    density: f64,
    country: &'a CountryID,
    technology: OffGridTechnology,
    lcoe: Option<MoneyPerEnergy>,
}

/// Represents a row in the cheapest technology output file
#[derive(Serialize, Debug, PartialEq)]
struct CheapestRow<'a> {
    density: f64,
    country: &'a CountryID,
    distance: f64,
    technology: Option<Supply>,
    lcoe: Option<MoneyPerEnergy>,
}

/// An object for writing the results of a run to file
pub struct DataWriter {
    output_path: PathBuf,
    scenario: DemandScenario,
}

impl DataWriter {
    /// Prepare to write output files for the given scenario
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `scenario` - The demand scenario, used to name the files
    pub fn new(output_path: &Path, scenario: DemandScenario) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            scenario,
        }
    }

    fn new_writer(&self, stem: &str) -> Result<csv::Writer<File>> {
        let file_path = self.output_path.join(file_name(stem, self.scenario));
        csv::Writer::from_path(&file_path)
            .with_context(|| format!("Failed to create {}", file_path.display()))
    }

    /// Write the grid LCOE tables (full and capital-only)
    pub fn write_grid_tables(&self, tables: &LcoeTables) -> Result<()> {
        for (mode, stem) in [(CostMode::Full, "grid_lcoes"), (CostMode::CapitalOnly, "grid_cap")] {
            let mut writer = self.new_writer(stem)?;
            for density in 0..DENSITY_SAMPLE_COUNT {
                for (country_idx, country) in tables.countries.iter().enumerate() {
                    for (distance, length) in GRID_DISTANCES.iter().enumerate() {
                        writer.serialize(GridLcoeRow {
                            density: density_at(density),
                            country,
                            distance: length.value(),
                            lcoe: tables.grid_lcoe(mode, country_idx, distance, density),
                        })?;
                    }
                }
            }
            writer.flush()?;
        }

        Ok(())
    }

    /// Write the technology LCOE tables (full and capital-only)
    pub fn write_technology_tables(&self, tables: &LcoeTables) -> Result<()> {
        for (mode, stem) in [(CostMode::Full, "tech_lcoes"), (CostMode::CapitalOnly, "tech_cap")] {
            let mut writer = self.new_writer(stem)?;
            for density in 0..DENSITY_SAMPLE_COUNT {
                for (country_idx, country) in tables.countries.iter().enumerate() {
                    for technology in OffGridTechnology::iter() {
                        writer.serialize(TechLcoeRow {
                            density: density_at(density),
                            country,
                            technology,
                            lcoe: tables.technology_lcoe(mode, country_idx, technology, density),
                        })?;
                    }
                }
            }
            writer.flush()?;
        }

        Ok(())
    }

    /// Write the viability table: one row per distance, one column per country
    pub fn write_viability(&self, viability: &GridViabilityTable) -> Result<()> {
        let mut writer = self.new_writer("num_people")?;
        writer.write_record(
            std::iter::once("distance").chain(viability.countries.iter().map(|id| &*id.0)),
        )?;
        for (distance, length) in GRID_DISTANCES.iter().enumerate() {
            let mut record = vec![length.value().to_string()];
            record.extend(
                (0..viability.countries.len())
                    .map(|country| viability.threshold_or_sentinel(distance, country).to_string()),
            );
            writer.write_record(&record)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write the cheapest technology summary
    pub fn write_cheapest(&self, countries: &[CountryID], entries: &[CheapestEntry]) -> Result<()> {
        let mut writer = self.new_writer("cheapest")?;
        for entry in entries {
            writer.serialize(CheapestRow {
                density: density_at(entry.density),
                country: &countries[entry.country],
                distance: GRID_DISTANCES[entry.distance].value(),
                technology: entry.cheapest.map(|cheapest| cheapest.supply),
                lcoe: entry.cheapest.map(|cheapest| cheapest.lcoe),
            })?;
        }
        writer.flush()?;

        Ok(())
    }
}
