//! Countries carry the economic parameters which differ between places being electrified.
use crate::error::{ModelError, ensure_domain};
use crate::id::define_id_type;
use crate::units::{Dimensionless, EnergyPerVolume, MoneyPerEnergy, MoneyPerVolume};
use indexmap::IndexMap;

define_id_type! {CountryID}

/// Lower heating value of diesel, used to convert a pump price into a price per unit energy
pub const DIESEL_LOWER_HEATING_VALUE: EnergyPerVolume = EnergyPerVolume::new(9.944_548_5);

/// A map of [`Country`]s, keyed by country ID, in input order
pub type CountryMap = IndexMap<CountryID, Country>;

/// The country-specific parameters of the cost model
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    /// The country name (e.g. "Kenya")
    pub id: CountryID,
    /// Price at which electricity is bought from the grid
    pub grid_price: MoneyPerEnergy,
    /// Technical losses of the transmission and distribution network
    pub grid_losses: Dimensionless,
    /// Ratio of average to peak load
    pub base_to_peak_load_ratio: Dimensionless,
    /// Diesel pump price under the low price forecast
    pub diesel_price_low: MoneyPerVolume,
}

impl Country {
    /// Check that every parameter lies in its physically valid range
    pub fn validate(&self) -> Result<(), ModelError> {
        let grid_price = self.grid_price.value();
        ensure_domain!(
            grid_price.is_finite() && grid_price >= 0.0,
            "GridPrice",
            grid_price,
            "must be a finite, non-negative number"
        );

        let losses = self.grid_losses.value();
        ensure_domain!(
            (0.0..1.0).contains(&losses),
            "GridLosses",
            losses,
            "must be in [0, 1)"
        );

        let base_to_peak = self.base_to_peak_load_ratio.value();
        ensure_domain!(
            base_to_peak > 0.0 && base_to_peak <= 1.0,
            "BaseToPeak",
            base_to_peak,
            "must be in (0, 1]"
        );

        let diesel_price = self.diesel_price_low.value();
        ensure_domain!(
            diesel_price.is_finite() && diesel_price >= 0.0,
            "DieselPriceLow",
            diesel_price,
            "must be a finite, non-negative number"
        );

        Ok(())
    }

    /// The diesel price per unit of fuel energy
    pub fn diesel_price_per_energy(&self) -> MoneyPerEnergy {
        self.diesel_price_low / DIESEL_LOWER_HEATING_VALUE
    }
}
