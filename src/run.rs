//! Drives a complete run: load countries, generate tables, resolve viability and write outputs.
use crate::cheapest::summarise_cheapest;
use crate::country::CountryMap;
use crate::input::read_countries;
use crate::observer::{Phase, RunObserver};
use crate::output::DataWriter;
use crate::output::metadata::write_metadata;
use crate::scenario::DemandScenario;
use crate::tables::{GenerationOptions, LcoeTables, generate_tables};
use crate::viability::{GridViabilityTable, resolve_viability};
use anyhow::Result;
use std::path::Path;
use std::time::Instant;

/// Run `f` as the given phase, reporting its start and finish to the observer
fn in_phase<T>(
    observer: &dyn RunObserver,
    phase: Phase,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    observer.phase_started(phase);
    let start = Instant::now();
    let result = f()?;
    observer.phase_finished(phase, start.elapsed());
    Ok(result)
}

/// Load and validate the country specifications
pub fn load_countries(
    specs_path: &Path,
    lenient: bool,
    observer: &dyn RunObserver,
) -> Result<CountryMap> {
    in_phase(observer, Phase::LoadCountries, || read_countries(specs_path, lenient))
}

/// The results of a run
pub struct RunResults {
    /// The four LCOE tables
    pub tables: LcoeTables,
    /// The grid viability thresholds
    pub viability: GridViabilityTable,
}

/// Generate every output for one demand scenario.
///
/// # Arguments
///
/// * `specs_path` - Path to the country specifications CSV file
/// * `scenario` - Annual consumption per household
/// * `output_path` - Folder where output files are written (must already exist)
/// * `options` - Leniency and thread count
/// * `observer` - Receives progress events
pub fn run(
    specs_path: &Path,
    scenario: DemandScenario,
    output_path: &Path,
    options: &GenerationOptions,
    observer: &dyn RunObserver,
) -> Result<RunResults> {
    let countries = load_countries(specs_path, options.lenient, observer)?;
    let tables = generate_tables(&countries, scenario, options, observer)?;
    let viability = in_phase(observer, Phase::ResolveViability, || {
        Ok(resolve_viability(&tables))
    })?;

    in_phase(observer, Phase::WriteOutputs, || {
        let writer = DataWriter::new(output_path, scenario);
        writer.write_grid_tables(&tables)?;
        writer.write_technology_tables(&tables)?;
        writer.write_viability(&viability)?;
        writer.write_cheapest(&tables.countries, &summarise_cheapest(&tables))?;
        write_metadata(output_path, specs_path, scenario, options.lenient)
    })?;

    Ok(RunResults { tables, viability })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{RecordingObserver, scenario};
    use crate::observer::NullObserver;
    use rstest::rstest;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_specs(dir: &Path) -> PathBuf {
        let specs_path = dir.join("specs.csv");
        fs::write(
            &specs_path,
            "Country,GridPrice,GridLosses,BaseToPeak,DieselPriceLow\n\
            Kenya,0.15,0.08,0.8,1.0\n\
            Ghana,0.05,0.08,0.8,1.0\n",
        )
        .unwrap();
        specs_path
    }

    #[rstest]
    fn test_run_writes_outputs(scenario: DemandScenario) {
        let dir = tempdir().unwrap();
        let specs_path = write_specs(dir.path());
        let output_path = dir.path().join("out");
        fs::create_dir(&output_path).unwrap();

        let observer = RecordingObserver::default();
        let results = run(
            &specs_path,
            scenario,
            &output_path,
            &GenerationOptions::default(),
            &observer,
        )
        .unwrap();

        assert_eq!(results.viability.threshold(0, 1), Some(50.0));
        for stem in [
            "grid_lcoes",
            "grid_cap",
            "tech_lcoes",
            "tech_cap",
            "num_people",
            "cheapest",
        ] {
            assert!(output_path.join(format!("{stem}_1000.csv")).is_file());
        }
        assert!(output_path.join("metadata.toml").is_file());

        let events = observer.into_events();
        assert_eq!(
            events,
            [
                "start load countries",
                "finish load countries",
                "start generate tables",
                "finish generate tables",
                "start resolve viability",
                "finish resolve viability",
                "start write outputs",
                "finish write outputs",
            ]
        );
    }

    #[rstest]
    fn test_run_is_repeatable(scenario: DemandScenario) {
        let dir = tempdir().unwrap();
        let specs_path = write_specs(dir.path());
        let output_path = dir.path().join("out");
        fs::create_dir(&output_path).unwrap();

        let options = GenerationOptions::default();
        let first = run(&specs_path, scenario, &output_path, &options, &NullObserver).unwrap();
        let second = run(&specs_path, scenario, &output_path, &options, &NullObserver).unwrap();
        assert_eq!(first.tables, second.tables);
        assert_eq!(first.viability, second.viability);
    }

    #[test]
    fn test_load_countries_missing_file() {
        let dir = tempdir().unwrap();
        assert!(load_countries(&dir.path().join("missing.csv"), false, &NullObserver).is_err());
    }
}
