//! Progress reporting for a run, injected into the table generator and the run driver.
use crate::country::CountryID;
use crate::error::ModelError;
use ::log::{info, warn};
use std::time::Duration;
use strum::Display;

/// A phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// Reading and validating the country specifications
    #[strum(serialize = "load countries")]
    LoadCountries,
    /// Sweeping every country and density through the cost model
    #[strum(serialize = "generate tables")]
    GenerateTables,
    /// Finding the grid viability thresholds
    #[strum(serialize = "resolve viability")]
    ResolveViability,
    /// Writing the output files
    #[strum(serialize = "write outputs")]
    WriteOutputs,
}

/// Receives events as a run progresses.
///
/// Implementations must be shareable between the worker threads of the table sweep.
pub trait RunObserver: Sync {
    /// Called when a phase starts
    fn phase_started(&self, phase: Phase);

    /// Called when a phase finishes, with the time it took
    fn phase_finished(&self, phase: Phase, elapsed: Duration);

    /// Called when a cell can't be evaluated and is left empty (lenient mode only)
    fn cell_skipped(&self, country: &CountryID, density: f64, error: &ModelError);
}

/// Forwards events to the program log
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn phase_started(&self, phase: Phase) {
        info!("Starting: {phase}");
    }

    fn phase_finished(&self, phase: Phase, elapsed: Duration) {
        info!("Finished: {phase} ({:.3}s)", elapsed.as_secs_f64());
    }

    fn cell_skipped(&self, country: &CountryID, density: f64, error: &ModelError) {
        warn!("Skipping {country} at density {density}: {error}");
    }
}

/// Ignores all events
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn phase_started(&self, _phase: Phase) {}

    fn phase_finished(&self, _phase: Phase, _elapsed: Duration) {}

    fn cell_skipped(&self, _country: &CountryID, _density: f64, _error: &ModelError) {}
}
