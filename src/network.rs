//! Sizing of the local distribution network for a settlement.
//!
//! The settlement is modelled as a notional cell of [`CELL_AREA`] km². Lines are counted from the
//! peak load and their lengths derived from a square packing of households over the cell.
//!
//! NB: population densities are multiplied by the cell area before sizing, but several terms below
//! still assume a unit area. The resulting numbers are relied upon by existing results, so the
//! scaling must be kept exactly as it is.
use crate::technology::HOURS_PER_YEAR;
use crate::units::{Energy, Length, Power};

/// Area of the notional settlement cell, in km²
pub const CELL_AREA: f64 = 100.0;

/// Number of people living in one household
pub const PEOPLE_PER_HOUSEHOLD: f64 = 5.0;

/// Power which a single MV feeder can carry, in kW
const MV_LINE_CAPACITY: f64 = 50.0;

/// Power which a single LV line can carry, in kW
const LV_LINE_CAPACITY: f64 = 10.0;

/// Maximum reach of an LV line, in km
const LV_LINE_MAX_LENGTH: f64 = 30.0;

/// Maximum reach of an MV line, in km
const MV_LINE_MAX_LENGTH: f64 = 50.0;

/// Factor converting the spacing between households into LV line length per household
const LV_LENGTH_PER_HOUSEHOLD_FACTOR: f64 = 1.333;

/// The demand placed on the network by a settlement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Demand {
    /// Annual consumption per household
    pub consumption_per_household: Energy,
    /// Distribution losses as a proportion of consumption
    pub distribution_losses: f64,
    /// Ratio of average to peak load
    pub base_to_peak_load_ratio: f64,
}

/// The sized local network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkSizing {
    /// Number of households served
    pub households: f64,
    /// Average load including distribution losses
    pub average_load: Power,
    /// Peak load
    pub peak_load: Power,
    /// Number of MV feeders
    pub mv_lines: f64,
    /// Number of LV networks hanging off each MV feeder
    pub lv_networks_per_mv_line: f64,
    /// Total length of LV lines
    pub lv_lines_length: Length,
    /// Total length of MV lines
    pub mv_lines_length: Length,
    /// Total length of additional HV lines
    pub hv_lines_length: Length,
    /// Number of HV/LV transformers
    pub transformers: f64,
    /// Electricity generated per year
    pub generation_per_year: Energy,
}

/// Round to three decimal places.
///
/// Exact halves round away from zero, unlike the ties-to-even rounding of Python's `round`.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl NetworkSizing {
    /// Size the network for the given demand.
    ///
    /// The population density is scaled up by [`CELL_AREA`] here.
    pub fn new(people_per_km2: f64, demand: &Demand) -> Self {
        Self::for_people(people_per_km2 * CELL_AREA, demand)
    }

    /// Size the network for an absolute number of people in the cell
    fn for_people(people: f64, demand: &Demand) -> Self {
        let households = people / PEOPLE_PER_HOUSEHOLD;
        let consumption = households * demand.consumption_per_household.value();
        let average_load = consumption * (1.0 + demand.distribution_losses) / HOURS_PER_YEAR;
        let peak_load = average_load / demand.base_to_peak_load_ratio;

        let mv_lines = (peak_load / MV_LINE_CAPACITY).ceil();
        let lv_lines = (peak_load / LV_LINE_CAPACITY).ceil();

        // The number of LV networks is bounded by line capacity or by line reach, whichever needs
        // more networks, but there can't be more networks than households
        let lv_networks_lim_capacity = lv_lines / mv_lines;
        let lv_networks_lim_length =
            ((CELL_AREA / mv_lines) / (LV_LINE_MAX_LENGTH / 2f64.sqrt())).powi(2);
        let lv_networks_per_mv_line = households
            .min(lv_networks_lim_capacity.max(lv_networks_lim_length))
            .ceil();

        let households_per_lv_network = households / (lv_networks_per_mv_line * mv_lines);
        let lv_unit_length = (CELL_AREA / households).sqrt() * 2f64.sqrt() / 2.0;
        let lv_lines_length_per_lv_network =
            LV_LENGTH_PER_HOUSEHOLD_FACTOR * households_per_lv_network * lv_unit_length;
        let lv_lines_length = mv_lines * lv_networks_per_mv_line * lv_lines_length_per_lv_network;

        let line_reach = (CELL_AREA / mv_lines) / (2.0 * (CELL_AREA / lv_lines).sqrt());
        let mv_reach = line_reach.min(MV_LINE_MAX_LENGTH);
        let mv_lines_length = mv_reach * mv_lines;

        let additional_hv_lines =
            (round3(CELL_AREA.sqrt() / (2.0 * mv_reach) / 10.0) - 1.0).max(0.0);
        let hv_lines_length = (CELL_AREA.sqrt() / 2.0) * additional_hv_lines * CELL_AREA.sqrt();
        let transformers =
            (additional_hv_lines + mv_lines + (mv_lines * lv_networks_per_mv_line)).ceil();

        Self {
            households,
            average_load: Power(average_load),
            peak_load: Power(peak_load),
            mv_lines,
            lv_networks_per_mv_line,
            lv_lines_length: Length(lv_lines_length),
            mv_lines_length: Length(mv_lines_length),
            hv_lines_length: Length(hv_lines_length),
            transformers,
            generation_per_year: Energy(average_load * HOURS_PER_YEAR),
        }
    }
}
