//! Fixtures for tests

use crate::cost::{CostInputs, EnergySource};
use crate::country::{Country, CountryID, CountryMap};
use crate::error::ModelError;
use crate::observer::{Phase, RunObserver};
use crate::scenario::DemandScenario;
use crate::technology::Topology;
use crate::units::{
    Dimensionless, Length, Money, MoneyPerEnergy, MoneyPerPower, MoneyPerVolume,
};
use indexmap::indexmap;
use rstest::fixture;
use std::sync::Mutex;
use std::time::Duration;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn country() -> Country {
    Country {
        id: "Kenya".into(),
        grid_price: MoneyPerEnergy(0.15),
        grid_losses: Dimensionless(0.08),
        base_to_peak_load_ratio: Dimensionless(0.8),
        diesel_price_low: MoneyPerVolume(1.0),
    }
}

/// A country where the grid is cheap enough to be viable at some densities
#[fixture]
pub fn cheap_grid_country() -> Country {
    Country {
        id: "Ghana".into(),
        grid_price: MoneyPerEnergy(0.05),
        ..country()
    }
}

#[fixture]
pub fn countries(country: Country, cheap_grid_country: Country) -> CountryMap {
    indexmap! {
        country.id.clone() => country,
        cheap_grid_country.id.clone() => cheap_grid_country,
    }
}

#[fixture]
pub fn scenario() -> DemandScenario {
    DemandScenario::new(1000.0).unwrap()
}

#[fixture]
pub fn grid_inputs() -> CostInputs {
    CostInputs {
        topology: Topology::Grid,
        distribution_losses: Dimensionless(0.08),
        base_to_peak_load_ratio: Dimensionless(0.8),
        connection_cost_per_household: Money(125.0),
        system_life: 30,
        td_om_ratio: Dimensionless(0.03),
        om_cost_ratio: Dimensionless(0.0),
        capital_cost: MoneyPerPower(0.0),
        capacity_factor: Dimensionless(1.0),
        mv_line_length: Length(0.0),
        additional_mv_line_length: Length(5.0),
        energy_source: EnergySource::GridPurchase {
            price: MoneyPerEnergy(0.15),
        },
    }
}

#[fixture]
pub fn hydro_inputs() -> CostInputs {
    CostInputs {
        topology: Topology::MiniGrid,
        distribution_losses: Dimensionless(0.05),
        base_to_peak_load_ratio: Dimensionless(1.0),
        connection_cost_per_household: Money(100.0),
        system_life: 30,
        td_om_ratio: Dimensionless(0.03),
        om_cost_ratio: Dimensionless(0.02),
        capital_cost: MoneyPerPower(5000.0),
        capacity_factor: Dimensionless(0.5),
        mv_line_length: Length(5.0),
        additional_mv_line_length: Length(0.0),
        energy_source: EnergySource::Free,
    }
}

/// An observer which records every event it receives as a line of text
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    /// The recorded events, in the order they arrived
    pub fn into_events(self) -> Vec<String> {
        self.events.into_inner().unwrap()
    }
}

impl RunObserver for RecordingObserver {
    fn phase_started(&self, phase: Phase) {
        self.events.lock().unwrap().push(format!("start {phase}"));
    }

    fn phase_finished(&self, phase: Phase, _elapsed: Duration) {
        self.events.lock().unwrap().push(format!("finish {phase}"));
    }

    fn cell_skipped(&self, country: &CountryID, density: f64, _error: &ModelError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("skip {country} {density}"));
    }
}
