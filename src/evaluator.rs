//! Evaluates every technology for one country at one population density.
use crate::cost::{CostInputs, EnergySource, calculate_lcoe};
use crate::country::Country;
use crate::error::ModelError;
use crate::sampling::{GRID_DISTANCE_COUNT, GRID_DISTANCES};
use crate::scenario::DemandScenario;
use crate::technology::{
    Fuel, GRID_CONNECTION_COST_PER_HOUSEHOLD, GRID_SYSTEM_LIFE, OffGridTechnology, Topology,
};
use crate::units::{Dimensionless, Length, MoneyPerEnergy, MoneyPerPower};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Annual O&M cost of T&D lines as a proportion of their investment cost
const TD_OM_RATIO: Dimensionless = Dimensionless::new(0.03);

/// Which costs are included in the LCOE
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount, Display)]
pub enum CostMode {
    /// Investment, O&M and fuel costs
    #[strum(serialize = "full")]
    Full,
    /// Investment costs only
    #[strum(serialize = "capital_only")]
    CapitalOnly,
}

impl CostMode {
    /// Zero a cost-related value in capital-only mode
    fn apply<T: Default>(self, value: T) -> T {
        match self {
            Self::Full => value,
            Self::CapitalOnly => T::default(),
        }
    }
}

/// The LCOE of every technology for one country, population density and cost mode
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLcoes {
    /// Grid LCOE at each of [`GRID_DISTANCES`]
    pub grid: [MoneyPerEnergy; GRID_DISTANCE_COUNT],
    /// Off-grid LCOE, indexed by [`OffGridTechnology::index`]
    pub off_grid: [MoneyPerEnergy; OffGridTechnology::COUNT],
}

impl PortfolioLcoes {
    /// The LCOE of the given off-grid technology
    pub fn off_grid(&self, technology: OffGridTechnology) -> MoneyPerEnergy {
        self.off_grid[technology.index()]
    }
}

/// Cost inputs for grid extension over the given distance
fn grid_inputs(country: &Country, distance: Length, mode: CostMode) -> CostInputs {
    CostInputs {
        topology: Topology::Grid,
        distribution_losses: country.grid_losses,
        base_to_peak_load_ratio: country.base_to_peak_load_ratio,
        connection_cost_per_household: GRID_CONNECTION_COST_PER_HOUSEHOLD,
        system_life: GRID_SYSTEM_LIFE,
        td_om_ratio: mode.apply(TD_OM_RATIO),
        om_cost_ratio: Dimensionless(0.0),
        capital_cost: MoneyPerPower(0.0),
        capacity_factor: Dimensionless(1.0),
        mv_line_length: Length(0.0),
        additional_mv_line_length: distance,
        energy_source: EnergySource::GridPurchase {
            price: mode.apply(country.grid_price),
        },
    }
}

/// Cost inputs for an off-grid technology
fn off_grid_inputs(country: &Country, technology: OffGridTechnology, mode: CostMode) -> CostInputs {
    let params = technology.parameters();

    // Stand-alone systems have no lines to maintain
    let td_om_ratio = if params.topology == Topology::StandAlone {
        Dimensionless(0.0)
    } else {
        mode.apply(TD_OM_RATIO)
    };

    let energy_source = match params.fuel {
        Fuel::None => EnergySource::Free,
        Fuel::Diesel { efficiency } => EnergySource::Diesel {
            price: mode.apply(country.diesel_price_per_energy()),
            efficiency,
        },
    };

    CostInputs {
        topology: params.topology,
        distribution_losses: params.distribution_losses,
        base_to_peak_load_ratio: params.base_to_peak_load_ratio,
        connection_cost_per_household: params.connection_cost_per_household,
        system_life: params.system_life,
        td_om_ratio,
        om_cost_ratio: mode.apply(params.om_cost_ratio),
        capital_cost: params.capital_cost,
        capacity_factor: params.capacity_factor,
        mv_line_length: params.mv_line_length,
        additional_mv_line_length: Length(0.0),
        energy_source,
    }
}

/// Calculate the LCOE of grid extension at every distance and of every off-grid technology.
///
/// # Arguments
///
/// * `country` - The country-specific parameters
/// * `population_density` - People per km²
/// * `scenario` - Annual consumption per household
/// * `mode` - Whether to include O&M and fuel costs
pub fn evaluate_portfolio(
    country: &Country,
    population_density: f64,
    scenario: DemandScenario,
    mode: CostMode,
) -> Result<PortfolioLcoes, ModelError> {
    let consumption = scenario.consumption_per_household();

    let mut grid = [MoneyPerEnergy(0.0); GRID_DISTANCE_COUNT];
    for (lcoe, distance) in grid.iter_mut().zip(GRID_DISTANCES) {
        *lcoe = calculate_lcoe(
            &grid_inputs(country, distance, mode),
            population_density,
            consumption,
        )?;
    }

    let mut off_grid = [MoneyPerEnergy(0.0); OffGridTechnology::COUNT];
    for technology in OffGridTechnology::iter() {
        off_grid[technology.index()] = calculate_lcoe(
            &off_grid_inputs(country, technology, mode),
            population_density,
            consumption,
        )?;
    }

    Ok(PortfolioLcoes { grid, off_grid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{country, scenario};
    use crate::sampling::density_samples;
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::rstest;

    #[rstest]
    fn test_full_lcoes_regression(country: Country, scenario: DemandScenario) {
        let lcoes = evaluate_portfolio(&country, 1000.0, scenario, CostMode::Full).unwrap();

        let expected_grid = [
            0.215_250_717_235_336_67,
            0.215_547_785_818_804_85,
            0.215_901_792_547_437_72,
            0.216_321_154_364_433_67,
            0.216_815_402_220_178_84,
            0.217_395_319_704_253_2,
            0.218_073_098_263_765_1,
            0.218_862_510_938_961_22,
            0.219_779_106_767_383_66,
            0.220_840_428_252_925_19,
        ];
        for (actual, expected) in lcoes.grid.iter().zip(expected_grid) {
            assert_approx_eq!(f64, actual.value(), expected, epsilon = 1e-12);
        }

        let expected_off_grid = [
            (OffGridTechnology::MiniGridHydro, 0.164_088_931_509_460_77),
            (OffGridTechnology::MiniGridPvLow, 0.376_618_759_636_269_7),
            (OffGridTechnology::MiniGridPvHigh, 0.302_690_788_145_680_9),
            (OffGridTechnology::MiniGridWindLow, 0.322_144_277_935_813_6),
            (OffGridTechnology::MiniGridWindMid, 0.229_410_481_266_749_23),
            (OffGridTechnology::MiniGridWindHigh, 0.183_043_582_932_216_92),
            (OffGridTechnology::MiniGridDiesel, 0.404_644_059_231_231_1),
            (OffGridTechnology::StandAloneDiesel, 0.367_392_571_933_358_34),
            (OffGridTechnology::StandAlonePvLow, 0.342_861_092_589_964_6),
            (OffGridTechnology::StandAlonePvHigh, 0.268_933_121_099_375_7),
        ];
        for (technology, expected) in expected_off_grid {
            assert_approx_eq!(
                f64,
                lcoes.off_grid(technology).value(),
                expected,
                epsilon = 1e-12
            );
        }
    }

    #[rstest]
    fn test_capital_only_lcoes_regression(country: Country, scenario: DemandScenario) {
        let lcoes = evaluate_portfolio(&country, 1000.0, scenario, CostMode::CapitalOnly).unwrap();
        assert_approx_eq!(
            f64,
            lcoes.grid[0].value(),
            0.048_777_067_495_883_72,
            epsilon = 1e-12
        );
        assert_approx_eq!(
            f64,
            lcoes.off_grid(OffGridTechnology::MiniGridDiesel).value(),
            0.066_409_841_954_185_33,
            epsilon = 1e-12
        );
        assert_approx_eq!(
            f64,
            lcoes.off_grid(OffGridTechnology::StandAloneDiesel).value(),
            0.039_156_568_942_026_82,
            epsilon = 1e-12
        );
    }

    #[rstest]
    fn test_capital_only_not_above_full(country: Country, scenario: DemandScenario) {
        for density in density_samples().step_by(37) {
            let full = evaluate_portfolio(&country, density, scenario, CostMode::Full).unwrap();
            let capital =
                evaluate_portfolio(&country, density, scenario, CostMode::CapitalOnly).unwrap();
            for (c, f) in capital.grid.iter().zip(&full.grid) {
                assert!(c <= f);
            }
            for (c, f) in capital.off_grid.iter().zip(&full.off_grid) {
                assert!(c <= f);
            }
        }
    }

    #[rstest]
    fn test_grid_lcoe_non_decreasing_with_distance(country: Country, scenario: DemandScenario) {
        for density in density_samples() {
            for mode in CostMode::iter() {
                let lcoes = evaluate_portfolio(&country, density, scenario, mode).unwrap();
                assert!(
                    lcoes.grid.iter().tuple_windows().all(|(a, b)| a <= b),
                    "Grid LCOE decreases with distance at density {density}"
                );
            }
        }
    }

    #[rstest]
    fn test_all_lcoes_finite_and_non_negative(country: Country, scenario: DemandScenario) {
        for density in density_samples() {
            for mode in CostMode::iter() {
                let lcoes = evaluate_portfolio(&country, density, scenario, mode).unwrap();
                for lcoe in lcoes.grid.iter().chain(&lcoes.off_grid) {
                    assert!(lcoe.is_finite() && lcoe.value() >= 0.0);
                }
            }
        }
    }

    #[rstest]
    fn test_invalid_country_is_domain_violation(country: Country, scenario: DemandScenario) {
        let country = Country {
            base_to_peak_load_ratio: Dimensionless(0.0),
            ..country
        };
        assert!(matches!(
            evaluate_portfolio(&country, 100.0, scenario, CostMode::Full),
            Err(ModelError::DomainViolation { .. })
        ));
    }
}
