//! The monitor: reconstructs transactions from the DUT pins.
//!
//! The monitor is passive. It samples on every edge but only opens a capture
//! window on an edge where the binding's valid strobe is high, which is
//! exactly once per driven item.
//!
//! Capture windows:
//!
//! | Mode          | Inputs sampled     | Outputs sampled      |
//! |---------------|--------------------|----------------------|
//! | `two-edge`    | commit edge `n`    | edge `n + 1`         |
//! | `single-edge` | commit edge `n`    | edge `n`             |

use std::sync::Arc;
use veritb_config::CaptureMode;

use crate::analysis::AnalysisPort;
use crate::binding::{BindingHandle, PinSnapshot};
use crate::error::HarnessError;
use crate::objection::Objection;
use crate::transaction::{CaptureTiming, Transaction};

/// Samples the pins and publishes completed transactions.
#[derive(Debug)]
pub struct Monitor {
    name: String,
    binding: BindingHandle,
    capture: CaptureMode,
    port: AnalysisPort<Transaction>,
    objection: Arc<Objection>,
}

impl Monitor {
    /// Creates a monitor publishing on `port`.
    pub fn new(
        name: impl Into<String>,
        binding: BindingHandle,
        capture: CaptureMode,
        port: AnalysisPort<Transaction>,
        objection: Arc<Objection>,
    ) -> Self {
        Self {
            name: name.into(),
            binding,
            capture,
            port,
            objection,
        }
    }

    /// The port completed transactions are published on.
    pub fn analysis_port(&self) -> &AnalysisPort<Transaction> {
        &self.port
    }

    pub(crate) fn analysis_port_mut(&mut self) -> &mut AnalysisPort<Transaction> {
        &mut self.port
    }

    /// Samples forever, until the task is aborted or the clock stops.
    pub async fn run(self) -> Result<(), HarnessError> {
        let mut window: Option<(Transaction, PinSnapshot)> = None;
        loop {
            self.binding.next_edge().await?;
            let snap = self.binding.sample();

            if let Some((txn, opened)) = window.take() {
                if snap.valid || snap.inputs != opened.inputs {
                    tracing::warn!(
                        monitor = %self.name,
                        cycle = snap.edge.cycle,
                        "inputs changed inside the capture window"
                    );
                }
                self.publish(txn, &opened, &snap)?;
            }

            if snap.valid {
                let txn = Transaction::new(snap.inputs);
                match self.capture {
                    CaptureMode::TwoEdge => window = Some((txn, snap)),
                    CaptureMode::SingleEdge => self.publish(txn, &snap, &snap)?,
                }
            }
        }
    }

    fn publish(
        &self,
        mut txn: Transaction,
        inputs_at: &PinSnapshot,
        outputs_at: &PinSnapshot,
    ) -> Result<(), HarnessError> {
        txn.complete(
            outputs_at.outputs,
            CaptureTiming {
                driven_cycle: inputs_at.driven_cycle,
                inputs_cycle: inputs_at.edge.cycle,
                outputs_cycle: outputs_at.edge.cycle,
                captured_at: outputs_at.edge.time,
            },
        );
        tracing::debug!(monitor = %self.name, cycle = outputs_at.edge.cycle, %txn, "publish");
        self.port.write(&txn);
        self.objection.drop_objection(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TransactionLog;
    use crate::binding::Binding;
    use crate::dut::RippleCarryAdder;
    use crate::transaction::{AdderInputs, AdderOutputs};
    use veritb_common::BitWidth;

    fn setup(capture: CaptureMode) -> (BindingHandle, Arc<TransactionLog>, Arc<Objection>, Monitor) {
        let binding = Binding::new(Box::new(RippleCarryAdder), BitWidth::new(4).unwrap(), 1_000);
        let log = Arc::new(TransactionLog::new());
        let objection = Arc::new(Objection::new());
        let mut port: AnalysisPort<Transaction> = AnalysisPort::new("env.agent.monitor.ap");
        port.connect(log.clone());
        let monitor = Monitor::new("env.agent.monitor", binding.clone(), capture, port, objection.clone());
        (binding, log, objection, monitor)
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn two_edge_window_publishes_on_following_edge() {
        let (binding, log, objection, monitor) = setup(CaptureMode::TwoEdge);
        assert_eq!(monitor.analysis_port().subscriber_count(), 1);
        let task = tokio::spawn(monitor.run());
        settle().await;

        objection.raise("driver");
        binding.drive(AdderInputs { a: 8, b: 8, cin: false }).unwrap();
        binding.tick();
        settle().await;
        assert!(log.is_empty(), "outputs not sampled yet");

        binding.tick();
        settle().await;
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outputs(), Some(&AdderOutputs { sum: 0, cout: true }));
        let timing = entries[0].timing().unwrap();
        assert_eq!((timing.driven_cycle, timing.inputs_cycle, timing.outputs_cycle), (0, 1, 2));
        assert_eq!(objection.outstanding(), 0);

        binding.tick();
        settle().await;
        assert_eq!(log.len(), 1, "idle edges are not published");
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn single_edge_window_publishes_on_commit_edge() {
        let (binding, log, objection, monitor) = setup(CaptureMode::SingleEdge);
        let task = tokio::spawn(monitor.run());
        settle().await;

        objection.raise("driver");
        binding.drive(AdderInputs { a: 15, b: 15, cin: true }).unwrap();
        binding.tick();
        settle().await;
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        let timing = entries[0].timing().unwrap();
        assert_eq!(timing.inputs_cycle, timing.outputs_cycle);
        assert_eq!(entries[0].outputs(), Some(&AdderOutputs { sum: 15, cout: true }));
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn publish_without_objection_fails_the_task() {
        let (binding, _log, _objection, monitor) = setup(CaptureMode::SingleEdge);
        let task = tokio::spawn(monitor.run());
        settle().await;

        binding.drive(AdderInputs { a: 1, b: 2, cin: false }).unwrap();
        binding.tick();
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, HarnessError::ObjectionUnderflow));
    }
}
