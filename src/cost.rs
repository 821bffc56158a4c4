//! The technology cost model: the levelised cost of electricity for one technology serving a
//! settlement of a given population density.
//!
//! This is a pure function of its inputs. Capital-only costs are obtained by passing zero O&M
//! ratios and fuel prices; the formula itself doesn't distinguish the two modes.
use crate::error::{ModelError, ensure_domain};
use crate::finance::{CashFlows, DISCOUNT_RATE, levelised_cost};
use crate::network::{Demand, NetworkSizing};
use crate::technology::Topology;
use crate::units::{
    Dimensionless, Energy, Length, Money, MoneyPerEnergy, MoneyPerLength, MoneyPerPower,
};

/// Construction cost of MV lines
const MV_LINE_COST: MoneyPerLength = MoneyPerLength::new(9000.0);

/// Construction cost of LV lines
const LV_LINE_COST: MoneyPerLength = MoneyPerLength::new(5000.0);

/// Construction cost of HV lines
const HV_LINE_COST: MoneyPerLength = MoneyPerLength::new(53000.0);

/// Cost of one HV/LV transformer
const TRANSFORMER_COST: Money = Money::new(5000.0);

/// Rate at which the cost per km of extending the grid grows with each step of distance
const MV_INCREASE_RATE: Dimensionless = Dimensionless::new(0.1);

/// The distance covered by one step of [`MV_INCREASE_RATE`]
const MV_INCREASE_STEP: Length = Length::new(5.0);

/// Proportion of the LV network length which a mini-grid needs compared with the grid
const MINI_GRID_LV_LENGTH_FACTOR: Dimensionless = Dimensionless::new(0.75);

/// Where the energy consumed by the technology comes from and what it costs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergySource {
    /// Renewable or otherwise free at the margin
    Free,
    /// Diesel burnt at the given efficiency
    Diesel {
        /// Fuel price per unit of fuel energy
        price: MoneyPerEnergy,
        /// Fuel-to-electricity efficiency
        efficiency: Dimensionless,
    },
    /// Electricity bought from the national grid
    GridPurchase {
        /// Purchase price per unit of electricity
        price: MoneyPerEnergy,
    },
}

impl EnergySource {
    /// Fuel cost per unit of electricity generated
    pub fn cost_per_unit_energy(self) -> MoneyPerEnergy {
        match self {
            Self::Free => MoneyPerEnergy(0.0),
            Self::Diesel { price, efficiency } => price / efficiency,
            Self::GridPurchase { price } => price,
        }
    }
}

/// Everything the cost model needs to know about one technology in one setting
#[derive(Debug, Clone, PartialEq)]
pub struct CostInputs {
    /// Deployment pattern
    pub topology: Topology,
    /// Losses in the distribution network
    pub distribution_losses: Dimensionless,
    /// Ratio of average to peak load
    pub base_to_peak_load_ratio: Dimensionless,
    /// Cost of connecting one household
    pub connection_cost_per_household: Money,
    /// System life in years
    pub system_life: u32,
    /// Annual O&M cost of T&D lines as a proportion of their investment cost
    pub td_om_ratio: Dimensionless,
    /// Annual O&M cost of generation as a proportion of its capital cost (non-grid only)
    pub om_cost_ratio: Dimensionless,
    /// Capital cost per kW installed (non-grid only)
    pub capital_cost: MoneyPerPower,
    /// Capacity factor (non-grid only)
    pub capacity_factor: Dimensionless,
    /// MV line needed to connect the generation site (non-grid only)
    pub mv_line_length: Length,
    /// Distance from the existing grid (grid only)
    pub additional_mv_line_length: Length,
    /// The source of the energy supplied
    pub energy_source: EnergySource,
}

impl CostInputs {
    /// Check that the inputs describe a physically meaningful system
    fn validate(&self) -> Result<(), ModelError> {
        let losses = self.distribution_losses.value();
        ensure_domain!(
            (0.0..1.0).contains(&losses),
            "distribution_losses",
            losses,
            "must be in [0, 1)"
        );

        let base_to_peak = self.base_to_peak_load_ratio.value();
        ensure_domain!(
            base_to_peak > 0.0 && base_to_peak <= 1.0,
            "base_to_peak_load_ratio",
            base_to_peak,
            "must be in (0, 1]"
        );

        ensure_domain!(
            self.system_life >= 1,
            "system_life",
            self.system_life as f64,
            "must be at least one year"
        );

        if self.topology != Topology::Grid {
            let capacity_factor = self.capacity_factor.value();
            ensure_domain!(
                capacity_factor > 0.0 && capacity_factor <= 1.0,
                "capacity_factor",
                capacity_factor,
                "must be in (0, 1]"
            );
        }

        if let EnergySource::Diesel { efficiency, .. } = self.energy_source {
            ensure_domain!(
                efficiency.value() > 0.0 && efficiency.value() <= 1.0,
                "efficiency",
                efficiency.value(),
                "must be in (0, 1]"
            );
        }

        for (parameter, value) in [
            (
                "connection_cost_per_household",
                self.connection_cost_per_household.value(),
            ),
            ("td_om_ratio", self.td_om_ratio.value()),
            ("om_cost_ratio", self.om_cost_ratio.value()),
            ("capital_cost", self.capital_cost.value()),
            ("mv_line_length", self.mv_line_length.value()),
            ("additional_mv_line_length", self.additional_mv_line_length.value()),
            ("fuel_cost", self.energy_source.cost_per_unit_energy().value()),
        ] {
            ensure_domain!(
                value.is_finite() && value >= 0.0,
                parameter,
                value,
                "must be a finite, non-negative number"
            );
        }

        Ok(())
    }
}

/// The cost of extending an MV line from the existing grid over the given distance.
///
/// The cost per km grows geometrically with each [`MV_INCREASE_STEP`] of distance.
fn grid_extension_cost(distance: Length) -> Money {
    let steps = (distance / MV_INCREASE_STEP).value() - 1.0;
    let growth = (Dimensionless(1.0) + MV_INCREASE_RATE).powf(steps);
    distance * (MV_LINE_COST * growth)
}

/// Investment and annual O&M costs
struct Costs {
    investment: Money,
    annual_om: Money,
}

/// Costs for extending the grid to the settlement
fn grid_costs(inputs: &CostInputs, network: &NetworkSizing) -> Costs {
    let investment = network.hv_lines_length * HV_LINE_COST
        + network.mv_lines_length * MV_LINE_COST
        + network.lv_lines_length * LV_LINE_COST
        + TRANSFORMER_COST * Dimensionless(network.transformers)
        + inputs.connection_cost_per_household * Dimensionless(network.households)
        + grid_extension_cost(inputs.additional_mv_line_length);

    Costs {
        investment,
        annual_om: investment * inputs.td_om_ratio,
    }
}

/// Costs for a mini-grid or stand-alone system
fn off_grid_costs(inputs: &CostInputs, network: &NetworkSizing) -> Costs {
    let lv_lines_length = if inputs.topology == Topology::StandAlone {
        Length(0.0)
    } else {
        network.lv_lines_length * MINI_GRID_LV_LENGTH_FACTOR
    };

    let installed_capacity = network.peak_load / inputs.capacity_factor;
    let capital_investment = inputs.capital_cost * installed_capacity;
    let td_investment = MV_LINE_COST * inputs.mv_line_length
        + LV_LINE_COST * lv_lines_length
        + inputs.connection_cost_per_household * Dimensionless(network.households);

    Costs {
        investment: td_investment + capital_investment,
        annual_om: td_investment * inputs.td_om_ratio
            + inputs.capital_cost * inputs.om_cost_ratio * installed_capacity,
    }
}

/// Calculate the levelised cost of electricity for a technology.
///
/// # Arguments
///
/// * `inputs` - Parameters of the technology in its setting
/// * `population_density` - People per km², scaled internally by the notional cell area
/// * `consumption_per_household` - Annual consumption of each household
///
/// # Returns
///
/// The discounted LCOE, or a [`ModelError::DomainViolation`] if any input is outside its valid
/// range.
pub fn calculate_lcoe(
    inputs: &CostInputs,
    population_density: f64,
    consumption_per_household: Energy,
) -> Result<MoneyPerEnergy, ModelError> {
    inputs.validate()?;
    ensure_domain!(
        population_density.is_finite() && population_density > 0.0,
        "population_density",
        population_density,
        "must be a finite number greater than zero"
    );
    ensure_domain!(
        consumption_per_household.is_finite() && consumption_per_household.value() > 0.0,
        "consumption_per_household",
        consumption_per_household.value(),
        "must be a finite number greater than zero"
    );

    let demand = Demand {
        consumption_per_household,
        distribution_losses: inputs.distribution_losses.value(),
        base_to_peak_load_ratio: inputs.base_to_peak_load_ratio.value(),
    };
    let network = NetworkSizing::new(population_density, &demand);

    let costs = match inputs.topology {
        Topology::Grid => grid_costs(inputs, &network),
        Topology::MiniGrid | Topology::StandAlone => off_grid_costs(inputs, &network),
    };

    let flows = CashFlows {
        investment: costs.investment,
        annual_om: costs.annual_om,
        fuel_cost: inputs.energy_source.cost_per_unit_energy(),
        annual_generation: network.generation_per_year,
        lifetime: inputs.system_life,
    };
    let lcoe = levelised_cost(&flows, DISCOUNT_RATE);
    ensure_domain!(
        lcoe.is_finite() && lcoe.value() >= 0.0,
        "lcoe",
        lcoe.value(),
        "must be a finite, non-negative number"
    );

    Ok(lcoe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{grid_inputs, hydro_inputs};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(5.0, 9000.0 * 5.0)]
    #[case(10.0, 9000.0 * 1.1 * 10.0)]
    #[case(50.0, 9000.0 * 1.1_f64.powi(9) * 50.0)]
    #[case(0.0, 0.0)]
    fn test_grid_extension_cost(#[case] distance: f64, #[case] expected: f64) {
        assert_approx_eq!(
            f64,
            grid_extension_cost(Length(distance)).value(),
            expected,
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn test_grid_lcoe_regression(grid_inputs: CostInputs) {
        let lcoe = calculate_lcoe(&grid_inputs, 1000.0, Energy(1000.0)).unwrap();
        assert_approx_eq!(
            MoneyPerEnergy,
            lcoe,
            MoneyPerEnergy(0.215_250_717_235_336_67),
            epsilon = 1e-12
        );
    }

    #[rstest]
    fn test_hydro_lcoe_regression(hydro_inputs: CostInputs) {
        let lcoe = calculate_lcoe(&hydro_inputs, 1000.0, Energy(1000.0)).unwrap();
        assert_approx_eq!(
            MoneyPerEnergy,
            lcoe,
            MoneyPerEnergy(0.164_088_931_509_460_77),
            epsilon = 1e-12
        );
    }

    #[rstest]
    fn test_capital_only_not_above_full(grid_inputs: CostInputs) {
        let capital_only = CostInputs {
            td_om_ratio: Dimensionless(0.0),
            energy_source: EnergySource::GridPurchase {
                price: MoneyPerEnergy(0.0),
            },
            ..grid_inputs.clone()
        };
        for density in [10.0, 500.0, 4000.0] {
            let full = calculate_lcoe(&grid_inputs, density, Energy(1000.0)).unwrap();
            let capital = calculate_lcoe(&capital_only, density, Energy(1000.0)).unwrap();
            assert!(capital <= full);
        }
    }

    #[rstest]
    fn test_stand_alone_ignores_lv_network(hydro_inputs: CostInputs) {
        // With no line, connection or O&M costs a stand-alone system's LCOE is independent of
        // population density
        let inputs = CostInputs {
            topology: Topology::StandAlone,
            distribution_losses: Dimensionless(0.0),
            connection_cost_per_household: Money(0.0),
            mv_line_length: Length(0.0),
            ..hydro_inputs
        };
        let sparse = calculate_lcoe(&inputs, 10.0, Energy(1000.0)).unwrap();
        let dense = calculate_lcoe(&inputs, 4000.0, Energy(1000.0)).unwrap();
        assert_approx_eq!(MoneyPerEnergy, sparse, dense, epsilon = 1e-12);
    }

    #[test]
    fn test_diesel_fuel_cost() {
        let source = EnergySource::Diesel {
            price: MoneyPerEnergy(0.1),
            efficiency: Dimensionless(0.25),
        };
        assert_approx_eq!(
            MoneyPerEnergy,
            source.cost_per_unit_energy(),
            MoneyPerEnergy(0.4)
        );
    }

    #[rstest]
    #[case(|i: &mut CostInputs| i.capacity_factor = Dimensionless(0.0), "capacity_factor")]
    #[case(|i: &mut CostInputs| i.distribution_losses = Dimensionless(1.0), "distribution_losses")]
    #[case(
        |i: &mut CostInputs| i.base_to_peak_load_ratio = Dimensionless(0.0),
        "base_to_peak_load_ratio"
    )]
    #[case(|i: &mut CostInputs| i.system_life = 0, "system_life")]
    #[case(|i: &mut CostInputs| i.om_cost_ratio = Dimensionless(-0.1), "om_cost_ratio")]
    fn test_calculate_lcoe_domain_violation(
        mut hydro_inputs: CostInputs,
        #[case] modify: fn(&mut CostInputs),
        #[case] bad_parameter: &str,
    ) {
        modify(&mut hydro_inputs);
        match calculate_lcoe(&hydro_inputs, 100.0, Energy(1000.0)).unwrap_err() {
            ModelError::DomainViolation { parameter, .. } => assert_eq!(parameter, bad_parameter),
            ModelError::MalformedInput { .. } => panic!("Wrong kind of error"),
        }
    }

    #[rstest]
    #[case(0.0, 1000.0)]
    #[case(100.0, 0.0)]
    #[case(f64::NAN, 1000.0)]
    fn test_calculate_lcoe_invalid_demand(
        hydro_inputs: CostInputs,
        #[case] density: f64,
        #[case] consumption: f64,
    ) {
        assert!(calculate_lcoe(&hydro_inputs, density, Energy(consumption)).is_err());
    }
}
