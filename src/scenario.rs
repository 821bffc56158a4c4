//! The demand scenario: a single annual consumption figure applied to every household in a run.
use crate::error::{ModelError, ensure_domain};
use crate::units::Energy;
use std::fmt;
use std::str::FromStr;

/// Annual electricity consumption per household, in kWh/household/year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandScenario(f64);

impl DemandScenario {
    /// Create a new demand scenario, checking that the value is usable
    pub fn new(consumption_per_household: f64) -> Result<Self, ModelError> {
        ensure_domain!(
            consumption_per_household.is_finite() && consumption_per_household > 0.0,
            "scenario",
            consumption_per_household,
            "must be a finite number greater than zero"
        );

        Ok(Self(consumption_per_household))
    }

    /// Annual consumption for one household
    pub fn consumption_per_household(self) -> Energy {
        Energy(self.0)
    }

    /// A label for use in file and directory names.
    ///
    /// Whole numbers are written without a decimal point, so the scenario `1000.0` becomes `1000`.
    /// Distinct scenarios always give distinct labels.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DemandScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64's Display gives the shortest representation which round-trips, and omits the
        // fractional part for integral values
        write!(f, "{}", self.0)
    }
}

impl FromStr for DemandScenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid scenario value: {s}"))?;
        Ok(Self::new(value)?)
    }
}
