//! The hardware binding handle: DUT pins plus the recurring clock event.
//!
//! Writes are non-blocking assignments. [`Binding::drive`] only schedules the
//! new input values, and the next clock edge commits them. Reads through
//! [`Binding::sample`] always see the values committed at the most recent
//! edge, so a drive is never visible on the edge it was issued in.
//!
//! The pin state sits behind a short-lived mutex that is never held across
//! an await point. Ordering between the driver and the monitor comes from
//! the edge discipline, not from the lock.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use veritb_common::{BitWidth, SimTime};

use crate::dut::Dut;
use crate::error::HarnessError;
use crate::transaction::{AdderInputs, AdderOutputs};

/// Shared handle passed to every component that touches the DUT.
pub type BindingHandle = Arc<Binding>;

/// One rising edge of the clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClockEdge {
    /// Edge number. Edge 0 is the reset state before the clock starts.
    pub cycle: u64,
    /// Virtual time of the edge.
    pub time: SimTime,
}

/// The pin values visible after one edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinSnapshot {
    /// Input pins (`a`, `b`, `cin`).
    pub inputs: AdderInputs,
    /// Output pins (`sum`, `cout`), settled for the current inputs.
    pub outputs: AdderOutputs,
    /// High only on the edge at which a scheduled drive was committed.
    pub valid: bool,
    /// Edge at which the currently committed inputs were scheduled.
    pub driven_cycle: u64,
    /// The edge this snapshot belongs to.
    pub edge: ClockEdge,
}

#[derive(Debug, Default)]
struct PinState {
    inputs: AdderInputs,
    outputs: AdderOutputs,
    pending: Option<(AdderInputs, u64)>,
    valid: bool,
    driven_cycle: u64,
}

/// The wire-level boundary to a combinational DUT.
pub struct Binding {
    width: BitWidth,
    period_fs: u64,
    dut: Box<dyn Dut>,
    pins: Mutex<PinState>,
    edge_tx: watch::Sender<ClockEdge>,
}

impl Binding {
    /// Binds a DUT with `width`-bit operands to a clock with the given period.
    ///
    /// Outputs are evaluated once for the all-zero reset inputs.
    pub fn new(dut: Box<dyn Dut>, width: BitWidth, period_fs: u64) -> BindingHandle {
        let (edge_tx, _) = watch::channel(ClockEdge::default());
        let binding = Binding {
            width,
            period_fs,
            dut,
            pins: Mutex::new(PinState::default()),
            edge_tx,
        };
        {
            let mut pins = binding.pins.lock().unwrap();
            pins.outputs = binding.settle(&pins.inputs);
        }
        Arc::new(binding)
    }

    /// Operand width of the bound DUT.
    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Clock period in femtoseconds.
    pub fn period_fs(&self) -> u64 {
        self.period_fs
    }

    /// Name of the bound DUT.
    pub fn dut_name(&self) -> &str {
        self.dut.name()
    }

    /// The most recent clock edge.
    pub fn current_edge(&self) -> ClockEdge {
        *self.edge_tx.borrow()
    }

    /// Waits for the next clock edge after the current one.
    pub async fn next_edge(&self) -> Result<ClockEdge, HarnessError> {
        let mut rx = self.edge_tx.subscribe();
        rx.changed().await.map_err(|_| HarnessError::ClockStopped)?;
        let edge = *rx.borrow_and_update();
        Ok(edge)
    }

    /// Schedules new input values, committed at the next edge.
    ///
    /// A second drive before that edge replaces the first.
    pub fn drive(&self, inputs: AdderInputs) -> Result<(), HarnessError> {
        let checked = AdderInputs::new(self.width, inputs.a, inputs.b, inputs.cin)?;
        let cycle = self.current_edge().cycle;
        let mut pins = self.pins.lock().unwrap();
        pins.pending = Some((checked, cycle));
        Ok(())
    }

    /// Reads every pin as of the most recent edge.
    pub fn sample(&self) -> PinSnapshot {
        let edge = self.current_edge();
        let pins = self.pins.lock().unwrap();
        PinSnapshot {
            inputs: pins.inputs,
            outputs: pins.outputs,
            valid: pins.valid,
            driven_cycle: pins.driven_cycle,
            edge,
        }
    }

    /// Advances the clock by one edge: commits any scheduled drive, settles
    /// the DUT outputs, then wakes every waiter.
    pub(crate) fn tick(&self) -> ClockEdge {
        let cycle = self.current_edge().cycle + 1;
        let edge = ClockEdge {
            cycle,
            time: SimTime::at_cycle(cycle, self.period_fs),
        };
        {
            let mut pins = self.pins.lock().unwrap();
            match pins.pending.take() {
                Some((inputs, driven_cycle)) => {
                    pins.inputs = inputs;
                    pins.driven_cycle = driven_cycle;
                    pins.valid = true;
                    pins.outputs = self.settle(&inputs);
                }
                None => pins.valid = false,
            }
        }
        self.edge_tx.send_replace(edge);
        tracing::trace!(cycle, "clock edge");
        edge
    }

    fn settle(&self, inputs: &AdderInputs) -> AdderOutputs {
        let raw = self.dut.evaluate(self.width, inputs);
        AdderOutputs {
            sum: self.width.mask(raw.sum),
            cout: raw.cout,
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("dut", &self.dut.name())
            .field("width", &self.width)
            .field("period_fs", &self.period_fs)
            .field("edge", &self.current_edge())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dut::{FnDut, RippleCarryAdder};

    fn binding() -> BindingHandle {
        Binding::new(Box::new(RippleCarryAdder), BitWidth::new(4).unwrap(), 10_000_000)
    }

    fn inputs(a: u64, b: u64, cin: bool) -> AdderInputs {
        AdderInputs { a, b, cin }
    }

    #[test]
    fn reset_state() {
        let b = binding();
        let snap = b.sample();
        assert_eq!(snap.edge.cycle, 0);
        assert_eq!(snap.inputs, AdderInputs::default());
        assert_eq!(snap.outputs, AdderOutputs::default());
        assert!(!snap.valid);
        assert_eq!(b.dut_name(), "ripple");
    }

    #[test]
    fn drive_is_not_visible_until_next_edge() {
        let b = binding();
        b.drive(inputs(5, 3, false)).unwrap();
        assert_eq!(b.sample().inputs, AdderInputs::default());

        let edge = b.tick();
        assert_eq!(edge.cycle, 1);
        assert_eq!(edge.time, SimTime::from_ns(10));
        let snap = b.sample();
        assert_eq!(snap.inputs, inputs(5, 3, false));
        assert_eq!(snap.outputs, AdderOutputs { sum: 8, cout: false });
        assert!(snap.valid);
        assert_eq!(snap.driven_cycle, 0);
    }

    #[test]
    fn valid_is_high_for_one_edge_only() {
        let b = binding();
        b.drive(inputs(1, 1, false)).unwrap();
        b.tick();
        assert!(b.sample().valid);
        b.tick();
        let snap = b.sample();
        assert!(!snap.valid);
        assert_eq!(snap.inputs, inputs(1, 1, false), "inputs hold without a drive");
    }

    #[test]
    fn last_drive_before_edge_wins() {
        let b = binding();
        b.drive(inputs(1, 1, false)).unwrap();
        b.drive(inputs(2, 2, false)).unwrap();
        b.tick();
        assert_eq!(b.sample().inputs, inputs(2, 2, false));
    }

    #[test]
    fn drive_rejects_out_of_range() {
        let b = binding();
        let err = b.drive(inputs(16, 0, false)).unwrap_err();
        assert!(matches!(err, HarnessError::ValueOutOfRange { field: "a", .. }));
    }

    #[test]
    fn outputs_are_masked_to_width() {
        let dut = FnDut::new("wide", |_, i: &AdderInputs| AdderOutputs {
            sum: i.a + 0x100,
            cout: false,
        });
        let b = Binding::new(Box::new(dut), BitWidth::new(4).unwrap(), 1);
        b.drive(inputs(3, 0, false)).unwrap();
        b.tick();
        assert_eq!(b.sample().outputs.sum, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn next_edge_waits_for_tick() {
        let b = binding();
        let waiter = {
            let b = Arc::clone(&b);
            tokio::spawn(async move { b.next_edge().await })
        };
        tokio::task::yield_now().await;
        b.tick();
        let edge = waiter.await.unwrap().unwrap();
        assert_eq!(edge.cycle, 1);
    }
}
