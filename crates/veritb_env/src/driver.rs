//! The driver: applies sequencer items to the DUT input pins.

use std::sync::Arc;
use veritb_config::CaptureMode;

use crate::binding::BindingHandle;
use crate::error::HarnessError;
use crate::objection::Objection;
use crate::sequencer::Sequencer;

/// Edges the driver keeps an item's inputs stable after they take effect,
/// so the monitor's capture window sees one transaction only.
pub(crate) fn hold_edges(capture: CaptureMode) -> u32 {
    match capture {
        CaptureMode::TwoEdge => 1,
        CaptureMode::SingleEdge => 0,
    }
}

/// Pulls transactions from the sequencer and drives them, one per clock edge.
///
/// For every item the driver raises one objection on the completion gate.
/// The monitor drops it once the resulting transaction has been published.
#[derive(Debug)]
pub struct Driver {
    name: String,
    sequencer: Sequencer,
    binding: BindingHandle,
    objection: Arc<Objection>,
    hold: u32,
}

impl Driver {
    /// Creates a driver bound to the given pins.
    pub fn new(
        name: impl Into<String>,
        sequencer: Sequencer,
        binding: BindingHandle,
        objection: Arc<Objection>,
        capture: CaptureMode,
    ) -> Self {
        Self {
            name: name.into(),
            sequencer,
            binding,
            objection,
            hold: hold_edges(capture),
        }
    }

    /// Runs until every sequencer handle is dropped.
    ///
    /// Per item: wait for a clock edge, schedule the inputs, wait for the edge
    /// that commits them, hold for the capture window, then report the item
    /// done so its source can continue.
    pub async fn run(mut self) -> Result<(), HarnessError> {
        while let Some(item) = self.sequencer.next().await {
            self.objection.raise(&self.name);
            let inputs = *item.transaction().inputs();

            let edge = self.binding.next_edge().await?;
            self.binding.drive(inputs)?;
            tracing::debug!(driver = %self.name, cycle = edge.cycle, %inputs, "drive scheduled");

            self.binding.next_edge().await?;
            for _ in 0..self.hold {
                self.binding.next_edge().await?;
            }
            item.item_done();
        }
        tracing::debug!(driver = %self.name, "sequencer closed");
        Ok(())
    }
}
