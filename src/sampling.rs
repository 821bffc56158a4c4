//! The fixed sample axes shared by every run: population densities and grid extension distances.
use crate::units::Length;

/// Number of population density samples
pub const DENSITY_SAMPLE_COUNT: usize = 400;

/// Spacing between population density samples, in people per km²
const DENSITY_STEP: f64 = 10.0;

/// The additional distances from the existing grid at which grid extension is costed, in km
pub const GRID_DISTANCES: [Length; 10] = [
    Length::new(5.0),
    Length::new(10.0),
    Length::new(15.0),
    Length::new(20.0),
    Length::new(25.0),
    Length::new(30.0),
    Length::new(35.0),
    Length::new(40.0),
    Length::new(45.0),
    Length::new(50.0),
];

/// Number of grid extension distances
pub const GRID_DISTANCE_COUNT: usize = GRID_DISTANCES.len();

/// The population density for the given sample index (10, 20, ..., 4000)
pub fn density_at(index: usize) -> f64 {
    (index + 1) as f64 * DENSITY_STEP
}

/// Iterate over all population density samples in ascending order
pub fn density_samples() -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator {
    (0..DENSITY_SAMPLE_COUNT).map(density_at)
}
