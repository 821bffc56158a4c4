//! Which technology gives the cheapest electricity for each country, distance and density.
use crate::evaluator::CostMode;
use crate::sampling::{DENSITY_SAMPLE_COUNT, GRID_DISTANCE_COUNT};
use crate::tables::LcoeTables;
use crate::technology::{GRID_LABEL, OffGridTechnology};
use crate::units::MoneyPerEnergy;
use serde::{Serialize, Serializer};
use std::fmt;
use strum::IntoEnumIterator;

/// A way of electrifying a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Supply {
    /// Extend the national grid
    Grid,
    /// Use an off-grid technology
    OffGrid(OffGridTechnology),
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => write!(f, "{GRID_LABEL}"),
            Self::OffGrid(technology) => write!(f, "{technology}"),
        }
    }
}

impl Serialize for Supply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The cheapest supply option and its LCOE
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheapestSupply {
    /// The winning option
    pub supply: Supply,
    /// Its full LCOE
    pub lcoe: MoneyPerEnergy,
}

/// The cheapest option at one cell, comparing full LCOEs.
///
/// Empty cells are ignored. Ties go to the grid, then to technologies in declaration order.
/// Returns `None` if every option is empty.
pub fn cheapest_supply(
    tables: &LcoeTables,
    country: usize,
    distance: usize,
    density: usize,
) -> Option<CheapestSupply> {
    let grid = tables
        .grid_lcoe(CostMode::Full, country, distance, density)
        .map(|lcoe| (Supply::Grid, lcoe));
    let off_grid = OffGridTechnology::iter().filter_map(|technology| {
        tables
            .technology_lcoe(CostMode::Full, country, technology, density)
            .map(|lcoe| (Supply::OffGrid(technology), lcoe))
    });

    grid.into_iter()
        .chain(off_grid)
        .fold(None, |best: Option<CheapestSupply>, (supply, lcoe)| {
            match best {
                Some(best) if best.lcoe <= lcoe => Some(best),
                _ => Some(CheapestSupply { supply, lcoe }),
            }
        })
}

/// One entry of the cheapest-technology summary
#[derive(Debug, Clone, PartialEq)]
pub struct CheapestEntry {
    /// Index into the country axis
    pub country: usize,
    /// Index into the grid distance axis
    pub distance: usize,
    /// Index into the density axis
    pub density: usize,
    /// The winning option, if any option could be evaluated
    pub cheapest: Option<CheapestSupply>,
}

/// The cheapest option for every country, distance and density, in that nesting order
pub fn summarise_cheapest(tables: &LcoeTables) -> Vec<CheapestEntry> {
    let mut entries =
        Vec::with_capacity(tables.countries.len() * GRID_DISTANCE_COUNT * DENSITY_SAMPLE_COUNT);
    for country in 0..tables.countries.len() {
        for distance in 0..GRID_DISTANCE_COUNT {
            for density in 0..DENSITY_SAMPLE_COUNT {
                entries.push(CheapestEntry {
                    country,
                    distance,
                    density,
                    cheapest: cheapest_supply(tables, country, distance, density),
                });
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::CountryMap;
    use crate::fixture::{countries, scenario};
    use crate::observer::NullObserver;
    use crate::scenario::DemandScenario;
    use crate::tables::{GenerationOptions, generate_tables};
    use rstest::rstest;

    #[test]
    fn test_supply_display() {
        assert_eq!(Supply::Grid.to_string(), "grid");
        assert_eq!(
            Supply::OffGrid(OffGridTechnology::MiniGridWindMid).to_string(),
            "mg_wind0.3"
        );
    }

    #[rstest]
    fn test_cheapest_is_minimum(countries: CountryMap, scenario: DemandScenario) {
        let tables = generate_tables(
            &countries,
            scenario,
            &GenerationOptions::default(),
            &NullObserver,
        )
        .unwrap();

        // Kenya at density 1000: mini-grid hydro beats the grid at every distance
        let cheapest = cheapest_supply(&tables, 0, 0, 99).unwrap();
        assert_eq!(
            cheapest.supply,
            Supply::OffGrid(OffGridTechnology::MiniGridHydro)
        );

        for entry in summarise_cheapest(&tables).iter().step_by(53) {
            let cheapest = entry.cheapest.unwrap();
            let grid = tables
                .grid_lcoe(CostMode::Full, entry.country, entry.distance, entry.density)
                .unwrap();
            assert!(cheapest.lcoe <= grid);
            for technology in OffGridTechnology::iter() {
                let lcoe = tables
                    .technology_lcoe(CostMode::Full, entry.country, technology, entry.density)
                    .unwrap();
                assert!(cheapest.lcoe <= lcoe);
            }
        }
    }

    #[rstest]
    fn test_summary_shape(countries: CountryMap, scenario: DemandScenario) {
        let tables = generate_tables(
            &countries,
            scenario,
            &GenerationOptions::default(),
            &NullObserver,
        )
        .unwrap();
        let summary = summarise_cheapest(&tables);
        assert_eq!(summary.len(), 2 * GRID_DISTANCE_COUNT * DENSITY_SAMPLE_COUNT);
        assert_eq!(
            (summary[401].country, summary[401].distance, summary[401].density),
            (0, 1, 1)
        );
    }
}
