//! Periodic clock-edge generator.

use std::time::Duration;

use crate::binding::BindingHandle;
use crate::error::HarnessError;

/// Virtual runtime time between two clock edges.
///
/// Runs use a paused tokio clock, so this only orders events. Report time
/// stamps are derived from the configured clock period instead.
pub const CLOCK_TICK: Duration = Duration::from_millis(1);

/// Drives the binding's clock event forever.
#[derive(Debug)]
pub struct ClockGenerator {
    binding: BindingHandle,
}

impl ClockGenerator {
    /// Creates a generator for the given binding.
    pub fn new(binding: BindingHandle) -> Self {
        Self { binding }
    }

    /// Emits one edge per [`CLOCK_TICK`] until the task is aborted.
    pub async fn run(self) -> Result<(), HarnessError> {
        let mut interval = tokio::time::interval(CLOCK_TICK);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick of an interval completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            self.binding.tick();
        }
    }
}
