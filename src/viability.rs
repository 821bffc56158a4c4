//! Finding the population density at which extending the grid becomes competitive.
use crate::country::CountryID;
use crate::evaluator::CostMode;
use crate::sampling::{DENSITY_SAMPLE_COUNT, GRID_DISTANCE_COUNT, density_at};
use crate::tables::LcoeTables;
use crate::technology::OffGridTechnology;
use crate::units::MoneyPerEnergy;

/// The value written for a distance at which the grid never becomes viable
pub const NOT_VIABLE_SENTINEL: f64 = 1e9;

/// The cheapest of the off-grid options the grid is compared against.
///
/// Only mini-grid diesel, mid-capacity mini-grid wind, the average of the two stand-alone PV
/// options and mini-grid hydro are considered. The other off-grid technologies are deliberately
/// left out and changing this set changes published thresholds.
///
/// Returns `None` if any of the required cells is empty.
pub fn off_grid_benchmark(
    tables: &LcoeTables,
    country: usize,
    density: usize,
) -> Option<MoneyPerEnergy> {
    let lcoe = |technology| tables.technology_lcoe(CostMode::Full, country, technology, density);

    let diesel = lcoe(OffGridTechnology::MiniGridDiesel)?;
    let wind = lcoe(OffGridTechnology::MiniGridWindMid)?;
    let pv_low = lcoe(OffGridTechnology::StandAlonePvLow)?;
    let pv_high = lcoe(OffGridTechnology::StandAlonePvHigh)?;
    let hydro = lcoe(OffGridTechnology::MiniGridHydro)?;
    let solar = MoneyPerEnergy(pv_low.value().midpoint(pv_high.value()));

    Some(diesel.min(wind).min(solar).min(hydro))
}

/// The minimum viable density for each (distance, country), or `None` if not viable
#[derive(Debug, Clone, PartialEq)]
pub struct GridViabilityTable {
    /// The countries, in the order of the country axis
    pub countries: Vec<CountryID>,
    thresholds: Vec<[Option<f64>; GRID_DISTANCE_COUNT]>,
}

impl GridViabilityTable {
    /// The threshold density for a distance and country
    pub fn threshold(&self, distance: usize, country: usize) -> Option<f64> {
        self.thresholds[country][distance]
    }

    /// The threshold, with [`NOT_VIABLE_SENTINEL`] standing in for "not viable"
    pub fn threshold_or_sentinel(&self, distance: usize, country: usize) -> f64 {
        self.threshold(distance, country).unwrap_or(NOT_VIABLE_SENTINEL)
    }
}

/// Find the first density index at which the grid is strictly cheaper than the benchmark
fn first_viable_density(tables: &LcoeTables, country: usize, distance: usize) -> Option<usize> {
    (0..DENSITY_SAMPLE_COUNT).find(|&density| {
        let Some(grid) = tables.grid_lcoe(CostMode::Full, country, distance, density) else {
            return false;
        };
        off_grid_benchmark(tables, country, density).is_some_and(|benchmark| grid < benchmark)
    })
}

/// Find, for every country and distance, the lowest sampled density at which the grid is cheaper
/// than the off-grid benchmark. Empty cells never count as viable.
pub fn resolve_viability(tables: &LcoeTables) -> GridViabilityTable {
    let thresholds = (0..tables.countries.len())
        .map(|country| {
            let mut row = [None; GRID_DISTANCE_COUNT];
            for (distance, threshold) in row.iter_mut().enumerate() {
                *threshold = first_viable_density(tables, country, distance).map(density_at);
            }
            row
        })
        .collect();

    GridViabilityTable {
        countries: tables.countries.clone(),
        thresholds,
    }
}
