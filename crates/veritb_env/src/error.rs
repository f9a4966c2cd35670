//! Error types for building and running a verification environment.
//!
//! Check mismatches are not errors: the scoreboard records them and the run
//! continues. Everything here either stops the run or prevents it starting.

use std::io;

/// Errors that can occur during environment construction or execution.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A component was built without a hardware binding to drive or sample.
    #[error("configuration error: no hardware binding available for {component}")]
    MissingBinding {
        /// Hierarchical path of the component that needed the binding.
        component: String,
    },

    /// A stimulus value does not fit its declared field width.
    #[error("{field}={value} does not fit in {width} bits")]
    ValueOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The value that was supplied.
        value: u64,
        /// Declared width of the field in bits.
        width: u32,
    },

    /// The sequencer went away while a sequence still had items in flight.
    #[error("sequencer closed while a sequence was running")]
    SequencerClosed,

    /// The clock event source went away.
    #[error("clock stopped")]
    ClockStopped,

    /// An objection was dropped with none outstanding.
    #[error("objection dropped more times than it was raised")]
    ObjectionUnderflow,

    /// The completion gate did not close within the watchdog limit.
    #[error("watchdog expired after {cycles} cycles with {outstanding} objection(s) outstanding")]
    Watchdog {
        /// The watchdog limit in clock cycles.
        cycles: u64,
        /// Objections still raised when the watchdog fired.
        outstanding: usize,
    },

    /// A long-running component task exited or panicked.
    #[error("component task failed: {0}")]
    TaskFailed(String),

    /// The runtime that hosts the run could not be created.
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] io::Error),
}
