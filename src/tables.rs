//! The result tables and the sweep which fills them.
//!
//! Each table is a dense three-dimensional array addressed by (country, secondary axis, density)
//! indices. For the grid tables the secondary axis is the grid extension distance; for the
//! technology tables it is the off-grid technology.
use crate::country::{Country, CountryID, CountryMap};
use crate::evaluator::{CostMode, PortfolioLcoes, evaluate_portfolio};
use crate::observer::{Phase, RunObserver};
use crate::sampling::{DENSITY_SAMPLE_COUNT, GRID_DISTANCE_COUNT, density_samples};
use crate::scenario::DemandScenario;
use crate::technology::OffGridTechnology;
use crate::units::MoneyPerEnergy;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::time::Instant;
use strum::{EnumCount, IntoEnumIterator};

/// A three-dimensional table of LCOE values, each cell written at most once
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    country_count: usize,
    secondary_count: usize,
    cells: Vec<Option<MoneyPerEnergy>>,
}

impl ResultTable {
    /// Create a table with every cell empty
    fn new(country_count: usize, secondary_count: usize) -> Self {
        Self {
            country_count,
            secondary_count,
            cells: vec![None; country_count * secondary_count * DENSITY_SAMPLE_COUNT],
        }
    }

    fn index(&self, country: usize, secondary: usize, density: usize) -> usize {
        assert!(
            country < self.country_count
                && secondary < self.secondary_count
                && density < DENSITY_SAMPLE_COUNT,
            "Table index out of range"
        );
        (country * self.secondary_count + secondary) * DENSITY_SAMPLE_COUNT + density
    }

    /// The value of a cell, or `None` if the cell was never written
    pub fn get(&self, country: usize, secondary: usize, density: usize) -> Option<MoneyPerEnergy> {
        self.cells[self.index(country, secondary, density)]
    }

    /// Write a cell, which must not have been written before
    fn set(
        &mut self,
        country: usize,
        secondary: usize,
        density: usize,
        value: MoneyPerEnergy,
    ) -> Result<()> {
        let index = self.index(country, secondary, density);
        let cell = &mut self.cells[index];
        ensure!(
            cell.is_none(),
            "Cell ({country}, {secondary}, {density}) written more than once"
        );
        *cell = Some(value);

        Ok(())
    }
}

/// The four result tables for one run
#[derive(Debug, Clone, PartialEq)]
pub struct LcoeTables {
    /// The countries, in the order of the country axis
    pub countries: Vec<CountryID>,
    /// The demand scenario the tables were generated for
    pub scenario: DemandScenario,
    grid_lcoes: ResultTable,
    grid_cap: ResultTable,
    tech_lcoes: ResultTable,
    tech_cap: ResultTable,
}

impl LcoeTables {
    fn new(countries: Vec<CountryID>, scenario: DemandScenario) -> Self {
        let count = countries.len();
        Self {
            countries,
            scenario,
            grid_lcoes: ResultTable::new(count, GRID_DISTANCE_COUNT),
            grid_cap: ResultTable::new(count, GRID_DISTANCE_COUNT),
            tech_lcoes: ResultTable::new(count, OffGridTechnology::COUNT),
            tech_cap: ResultTable::new(count, OffGridTechnology::COUNT),
        }
    }

    /// The grid table for the given mode, indexed by (country, distance, density)
    pub fn grid(&self, mode: CostMode) -> &ResultTable {
        match mode {
            CostMode::Full => &self.grid_lcoes,
            CostMode::CapitalOnly => &self.grid_cap,
        }
    }

    /// The technology table for the given mode, indexed by (country, technology, density)
    pub fn technology(&self, mode: CostMode) -> &ResultTable {
        match mode {
            CostMode::Full => &self.tech_lcoes,
            CostMode::CapitalOnly => &self.tech_cap,
        }
    }

    /// The grid LCOE for one cell
    pub fn grid_lcoe(
        &self,
        mode: CostMode,
        country: usize,
        distance: usize,
        density: usize,
    ) -> Option<MoneyPerEnergy> {
        self.grid(mode).get(country, distance, density)
    }

    /// The LCOE of an off-grid technology for one cell
    pub fn technology_lcoe(
        &self,
        mode: CostMode,
        country: usize,
        technology: OffGridTechnology,
        density: usize,
    ) -> Option<MoneyPerEnergy> {
        self.technology(mode).get(country, technology.index(), density)
    }

    /// Copy one evaluated (country, density) cell into the tables for the given mode
    fn scatter(
        &mut self,
        mode: CostMode,
        country: usize,
        density: usize,
        lcoes: &PortfolioLcoes,
    ) -> Result<()> {
        let (grid, tech) = match mode {
            CostMode::Full => (&mut self.grid_lcoes, &mut self.tech_lcoes),
            CostMode::CapitalOnly => (&mut self.grid_cap, &mut self.tech_cap),
        };
        for (distance, lcoe) in lcoes.grid.iter().enumerate() {
            grid.set(country, distance, density, *lcoe)?;
        }
        for technology in OffGridTechnology::iter() {
            tech.set(
                country,
                technology.index(),
                density,
                lcoes.off_grid(technology),
            )?;
        }

        Ok(())
    }
}

/// Options controlling table generation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    /// Leave failing cells empty instead of aborting
    pub lenient: bool,
    /// Number of worker threads (0 means one per core)
    pub threads: usize,
}

/// The results for every density and mode of one country
struct CountrySlab {
    full: Vec<Option<PortfolioLcoes>>,
    capital_only: Vec<Option<PortfolioLcoes>>,
}

impl CountrySlab {
    fn for_mode(&self, mode: CostMode) -> &[Option<PortfolioLcoes>] {
        match mode {
            CostMode::Full => &self.full,
            CostMode::CapitalOnly => &self.capital_only,
        }
    }
}

/// Evaluate every density of one country in one mode
fn evaluate_country_mode(
    country: &Country,
    scenario: DemandScenario,
    mode: CostMode,
    lenient: bool,
    observer: &dyn RunObserver,
) -> Result<Vec<Option<PortfolioLcoes>>> {
    density_samples()
        .map(
            |density| match evaluate_portfolio(country, density, scenario, mode) {
                Ok(lcoes) => Ok(Some(lcoes)),
                Err(err) if lenient => {
                    observer.cell_skipped(&country.id, density, &err);
                    Ok(None)
                }
                Err(err) => Err(err).with_context(|| {
                    format!(
                        "Failed to evaluate {} at density {density} ({mode} costs)",
                        country.id
                    )
                }),
            },
        )
        .collect()
}

/// Sweep every country and density through the cost model in both modes.
///
/// Countries are processed in parallel. Each worker builds the whole slab for one country and the
/// calling thread then copies the slabs into the tables.
///
/// # Arguments
///
/// * `countries` - The countries to evaluate, in output order
/// * `scenario` - Annual consumption per household
/// * `options` - Leniency and thread count
/// * `observer` - Receives progress events
pub fn generate_tables(
    countries: &CountryMap,
    scenario: DemandScenario,
    options: &GenerationOptions,
    observer: &dyn RunObserver,
) -> Result<LcoeTables> {
    observer.phase_started(Phase::GenerateTables);
    let start = Instant::now();

    let pool = ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .context("Failed to build thread pool")?;

    let country_list = countries.values().collect_vec();
    let slabs: Vec<CountrySlab> = pool.install(|| {
        country_list
            .par_iter()
            .map(|country| -> Result<CountrySlab> {
                Ok(CountrySlab {
                    full: evaluate_country_mode(
                        country,
                        scenario,
                        CostMode::Full,
                        options.lenient,
                        observer,
                    )?,
                    capital_only: evaluate_country_mode(
                        country,
                        scenario,
                        CostMode::CapitalOnly,
                        options.lenient,
                        observer,
                    )?,
                })
            })
            .collect::<Result<_>>()
    })?;

    let mut tables = LcoeTables::new(countries.keys().cloned().collect(), scenario);
    for (country, slab) in slabs.iter().enumerate() {
        for mode in CostMode::iter() {
            for (density, lcoes) in slab.for_mode(mode).iter().enumerate() {
                if let Some(lcoes) = lcoes {
                    tables.scatter(mode, country, density, lcoes)?;
                }
            }
        }
    }

    observer.phase_finished(Phase::GenerateTables, start.elapsed());
    Ok(tables)
}
