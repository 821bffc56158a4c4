//! The electrification technologies and their fixed techno-economic parameters.
//!
//! Off-grid technologies are described by a declarative table of records, indexed by
//! [`OffGridTechnology`]. Adding a technology means adding a variant and a record; the cost formula
//! is not touched.
use crate::units::{Dimensionless, Length, Money, MoneyPerPower};
use serde::{Serialize, Serializer};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Hours in a (non-leap) year
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Connection cost for a household joining the grid
pub const GRID_CONNECTION_COST_PER_HOUSEHOLD: Money = Money::new(125.0);

/// Economic life of grid extension infrastructure, in years
pub const GRID_SYSTEM_LIFE: u32 = 30;

/// The label used for grid extension in output files
pub const GRID_LABEL: &str = "grid";

/// How a technology delivers electricity to households
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Extension of the national grid
    Grid,
    /// Local generation shared by a cluster of households over a local network
    MiniGrid,
    /// Generation at each household with no shared lines
    StandAlone,
}

/// The fuel burnt by a technology
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fuel {
    /// No fuel (renewables)
    None,
    /// Diesel burnt in an engine with the given efficiency
    Diesel {
        /// Fuel-to-electricity conversion efficiency
        efficiency: Dimensionless,
    },
}

/// An off-grid electrification technology
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCount,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum OffGridTechnology {
    /// Mini-grid hydropower
    #[strum(serialize = "mg_hydro")]
    MiniGridHydro,
    /// Mini-grid solar PV at 1750 kWh/kW/year irradiation
    #[strum(serialize = "mg_pv1750")]
    MiniGridPvLow,
    /// Mini-grid solar PV at 2250 kWh/kW/year irradiation
    #[strum(serialize = "mg_pv2250")]
    MiniGridPvHigh,
    /// Mini-grid wind at a 0.2 capacity factor
    #[strum(serialize = "mg_wind0.2")]
    MiniGridWindLow,
    /// Mini-grid wind at a 0.3 capacity factor
    #[strum(serialize = "mg_wind0.3")]
    MiniGridWindMid,
    /// Mini-grid wind at a 0.4 capacity factor
    #[strum(serialize = "mg_wind0.4")]
    MiniGridWindHigh,
    /// Mini-grid diesel generator
    #[strum(serialize = "mg_diesel")]
    MiniGridDiesel,
    /// Stand-alone diesel generator
    #[strum(serialize = "sa_diesel")]
    StandAloneDiesel,
    /// Stand-alone solar PV at 1750 kWh/kW/year irradiation
    #[strum(serialize = "sa_pv1750")]
    StandAlonePvLow,
    /// Stand-alone solar PV at 2250 kWh/kW/year irradiation
    #[strum(serialize = "sa_pv2250")]
    StandAlonePvHigh,
}

impl Serialize for OffGridTechnology {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let label: &'static str = self.into();
        serializer.serialize_str(label)
    }
}

impl OffGridTechnology {
    /// The position of this technology on the technology axis of the result tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// The fixed parameters for this technology
    pub fn parameters(self) -> &'static TechnologyParameters {
        &OFF_GRID_TECHNOLOGIES[self.index()]
    }
}

/// Fixed techno-economic parameters of an off-grid technology
#[derive(Debug, Clone, PartialEq)]
pub struct TechnologyParameters {
    /// Deployment pattern
    pub topology: Topology,
    /// Average output as a proportion of rated output
    pub capacity_factor: Dimensionless,
    /// Losses in the local distribution network
    pub distribution_losses: Dimensionless,
    /// Cost of connecting one household
    pub connection_cost_per_household: Money,
    /// Capital cost per kW installed
    pub capital_cost: MoneyPerPower,
    /// Annual O&M cost as a proportion of capital cost
    pub om_cost_ratio: Dimensionless,
    /// Ratio of average to peak load
    pub base_to_peak_load_ratio: Dimensionless,
    /// Economic life in years
    pub system_life: u32,
    /// Length of MV line needed to connect the generation site
    pub mv_line_length: Length,
    /// The fuel consumed
    pub fuel: Fuel,
}

const fn irradiation_capacity_factor(irradiation: f64) -> Dimensionless {
    Dimensionless::new(irradiation / HOURS_PER_YEAR)
}

const MINI_GRID_PV: TechnologyParameters = TechnologyParameters {
    topology: Topology::MiniGrid,
    capacity_factor: irradiation_capacity_factor(1750.0),
    distribution_losses: Dimensionless::new(0.05),
    connection_cost_per_household: Money::new(100.0),
    capital_cost: MoneyPerPower::new(4300.0),
    om_cost_ratio: Dimensionless::new(0.02),
    base_to_peak_load_ratio: Dimensionless::new(0.9),
    system_life: 20,
    mv_line_length: Length::new(0.0),
    fuel: Fuel::None,
};

const MINI_GRID_WIND: TechnologyParameters = TechnologyParameters {
    topology: Topology::MiniGrid,
    capacity_factor: Dimensionless::new(0.2),
    distribution_losses: Dimensionless::new(0.05),
    connection_cost_per_household: Money::new(100.0),
    capital_cost: MoneyPerPower::new(3000.0),
    om_cost_ratio: Dimensionless::new(0.02),
    base_to_peak_load_ratio: Dimensionless::new(0.75),
    system_life: 20,
    mv_line_length: Length::new(0.0),
    fuel: Fuel::None,
};

const DIESEL_GENERATOR: TechnologyParameters = TechnologyParameters {
    topology: Topology::MiniGrid,
    capacity_factor: Dimensionless::new(0.7),
    distribution_losses: Dimensionless::new(0.05),
    connection_cost_per_household: Money::new(100.0),
    capital_cost: MoneyPerPower::new(721.0),
    om_cost_ratio: Dimensionless::new(0.1),
    base_to_peak_load_ratio: Dimensionless::new(0.5),
    system_life: 15,
    mv_line_length: Length::new(0.0),
    fuel: Fuel::Diesel {
        efficiency: Dimensionless::new(0.33),
    },
};

/// Parameters for every off-grid technology, in [`OffGridTechnology`] order
static OFF_GRID_TECHNOLOGIES: [TechnologyParameters; OffGridTechnology::COUNT] = [
    // mg_hydro
    TechnologyParameters {
        topology: Topology::MiniGrid,
        capacity_factor: Dimensionless::new(0.5),
        distribution_losses: Dimensionless::new(0.05),
        connection_cost_per_household: Money::new(100.0),
        capital_cost: MoneyPerPower::new(5000.0),
        om_cost_ratio: Dimensionless::new(0.02),
        base_to_peak_load_ratio: Dimensionless::new(1.0),
        system_life: 30,
        mv_line_length: Length::new(5.0),
        fuel: Fuel::None,
    },
    // mg_pv1750
    MINI_GRID_PV,
    // mg_pv2250
    TechnologyParameters {
        capacity_factor: irradiation_capacity_factor(2250.0),
        ..MINI_GRID_PV
    },
    // mg_wind0.2
    MINI_GRID_WIND,
    // mg_wind0.3
    TechnologyParameters {
        capacity_factor: Dimensionless::new(0.3),
        ..MINI_GRID_WIND
    },
    // mg_wind0.4
    TechnologyParameters {
        capacity_factor: Dimensionless::new(0.4),
        ..MINI_GRID_WIND
    },
    // mg_diesel
    DIESEL_GENERATOR,
    // sa_diesel
    TechnologyParameters {
        topology: Topology::StandAlone,
        distribution_losses: Dimensionless::new(0.0),
        ..DIESEL_GENERATOR
    },
    // sa_pv1750
    TechnologyParameters {
        topology: Topology::StandAlone,
        distribution_losses: Dimensionless::new(0.0),
        ..MINI_GRID_PV
    },
    // sa_pv2250
    TechnologyParameters {
        topology: Topology::StandAlone,
        capacity_factor: irradiation_capacity_factor(2250.0),
        distribution_losses: Dimensionless::new(0.0),
        ..MINI_GRID_PV
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(OffGridTechnology::MiniGridHydro, "mg_hydro")]
    #[case(OffGridTechnology::MiniGridPvLow, "mg_pv1750")]
    #[case(OffGridTechnology::MiniGridWindMid, "mg_wind0.3")]
    #[case(OffGridTechnology::StandAlonePvHigh, "sa_pv2250")]
    fn test_labels(#[case] technology: OffGridTechnology, #[case] label: &str) {
        assert_eq!(technology.to_string(), label);
        assert_eq!(OffGridTechnology::from_str(label).unwrap(), technology);
    }

    #[test]
    fn test_index_matches_iteration_order() {
        for (i, technology) in OffGridTechnology::iter().enumerate() {
            assert_eq!(technology.index(), i);
        }
    }

    #[test]
    fn test_parameters_in_valid_ranges() {
        for technology in OffGridTechnology::iter() {
            let params = technology.parameters();
            assert_ne!(params.topology, Topology::Grid);
            assert!(params.capacity_factor.value() > 0.0 && params.capacity_factor.value() <= 1.0);
            assert!((0.0..1.0).contains(&params.distribution_losses.value()));
            assert!(params.base_to_peak_load_ratio.value() > 0.0);
            assert!(params.base_to_peak_load_ratio.value() <= 1.0);
            assert!(params.system_life >= 1);
        }
    }

    #[test]
    fn test_stand_alone_has_no_distribution_losses() {
        for technology in OffGridTechnology::iter() {
            let params = technology.parameters();
            if params.topology == Topology::StandAlone {
                assert_eq!(params.distribution_losses, Dimensionless(0.0));
            }
        }
    }

    #[test]
    fn test_only_hydro_needs_mv_line() {
        for technology in OffGridTechnology::iter() {
            let expected = if technology == OffGridTechnology::MiniGridHydro {
                5.0
            } else {
                0.0
            };
            assert_eq!(technology.parameters().mv_line_length, Length(expected));
        }
    }
}
