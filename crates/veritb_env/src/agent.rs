//! An agent bundles a sequencer, a driver, and a monitor on one binding.

use std::sync::Arc;
use tokio::task::JoinSet;
use veritb_config::CaptureMode;

use crate::analysis::{AnalysisPort, Subscriber};
use crate::binding::BindingHandle;
use crate::driver::Driver;
use crate::error::HarnessError;
use crate::monitor::Monitor;
use crate::objection::Objection;
use crate::sequencer::{Sequencer, SequencerHandle};
use crate::transaction::Transaction;

/// A reusable active agent.
#[derive(Debug)]
pub struct Agent {
    name: String,
    driver: Driver,
    monitor: Monitor,
    sequencer: SequencerHandle,
}

impl Agent {
    /// Builds the agent's components and wires the driver to the sequencer.
    ///
    /// Fails with [`HarnessError::MissingBinding`] if no binding is given.
    pub fn new(
        name: impl Into<String>,
        binding: Option<BindingHandle>,
        capture: CaptureMode,
        objection: &Arc<Objection>,
    ) -> Result<Self, HarnessError> {
        let name = name.into();
        let binding = binding.ok_or_else(|| HarnessError::MissingBinding {
            component: name.clone(),
        })?;
        let (sequencer, handle) = Sequencer::new();
        let driver = Driver::new(
            format!("{name}.driver"),
            sequencer,
            binding.clone(),
            Arc::clone(objection),
            capture,
        );
        let monitor = Monitor::new(
            format!("{name}.monitor"),
            binding,
            capture,
            AnalysisPort::new(format!("{name}.monitor.ap")),
            Arc::clone(objection),
        );
        Ok(Self {
            name,
            driver,
            monitor,
            sequencer: handle,
        })
    }

    /// Hierarchical name of the agent.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connects a subscriber to the monitor's analysis port.
    pub fn connect(&mut self, subscriber: Arc<dyn Subscriber<Transaction>>) {
        self.monitor.analysis_port_mut().connect(subscriber);
    }

    /// The monitor's analysis port.
    pub fn analysis_port(&self) -> &AnalysisPort<Transaction> {
        self.monitor.analysis_port()
    }

    /// Starts the driver and monitor on `tasks` and returns the handle
    /// sources use to reach the driver.
    pub fn spawn(self, tasks: &mut JoinSet<Result<(), HarnessError>>) -> SequencerHandle {
        tracing::debug!(agent = %self.name, "starting agent");
        tasks.spawn(self.driver.run());
        tasks.spawn(self.monitor.run());
        self.sequencer
    }
}
