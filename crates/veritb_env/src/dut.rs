//! The device-under-test contract and the adder models that honor it.
//!
//! A DUT is a pure combinational function from the input pins to the output
//! pins. The binding evaluates it after every edge that commits new inputs,
//! so any implementation must be free of hidden state.

use veritb_common::BitWidth;
use veritb_config::DutModel;

use crate::transaction::{AdderInputs, AdderOutputs};

/// A combinational N-bit adder with carry-in and carry-out.
pub trait Dut: Send + Sync {
    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Computes the outputs for the given inputs.
    ///
    /// Bits of `sum` above `width` are discarded by the binding.
    fn evaluate(&self, width: BitWidth, inputs: &AdderInputs) -> AdderOutputs;
}

/// A correct adder built as a chain of full adders.
#[derive(Debug, Default, Clone, Copy)]
pub struct RippleCarryAdder;

impl Dut for RippleCarryAdder {
    fn name(&self) -> &str {
        "ripple"
    }

    fn evaluate(&self, width: BitWidth, inputs: &AdderInputs) -> AdderOutputs {
        let mut carry = inputs.cin;
        let mut sum = 0u64;
        for bit in 0..width.bits() {
            let a = (inputs.a >> bit) & 1 == 1;
            let b = (inputs.b >> bit) & 1 == 1;
            if a ^ b ^ carry {
                sum |= 1 << bit;
            }
            carry = (a && b) || (carry && (a ^ b));
        }
        AdderOutputs { sum, cout: carry }
    }
}

/// A broken adder whose carry chain is cut: every bit is a half-sum and
/// `cout` is never set. Carry-in still reaches bit 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCarryAdder;

impl Dut for NoCarryAdder {
    fn name(&self) -> &str {
        "no-carry"
    }

    fn evaluate(&self, width: BitWidth, inputs: &AdderInputs) -> AdderOutputs {
        let sum = (inputs.a ^ inputs.b ^ u64::from(inputs.cin)) & width.max_value();
        AdderOutputs { sum, cout: false }
    }
}

/// A broken adder whose `sum[0]` is stuck at zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct StuckSumAdder;

impl Dut for StuckSumAdder {
    fn name(&self) -> &str {
        "stuck-sum"
    }

    fn evaluate(&self, width: BitWidth, inputs: &AdderInputs) -> AdderOutputs {
        let good = RippleCarryAdder.evaluate(width, inputs);
        AdderOutputs {
            sum: good.sum & !1,
            cout: good.cout,
        }
    }
}

/// Wraps a closure as a DUT.
///
/// The closure must be a pure function of its arguments.
pub struct FnDut<F> {
    name: String,
    func: F,
}

impl<F> FnDut<F>
where
    F: Fn(BitWidth, &AdderInputs) -> AdderOutputs + Send + Sync,
{
    /// Creates a named closure-backed DUT.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Dut for FnDut<F>
where
    F: Fn(BitWidth, &AdderInputs) -> AdderOutputs + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, width: BitWidth, inputs: &AdderInputs) -> AdderOutputs {
        (self.func)(width, inputs)
    }
}

/// Instantiates the DUT model selected in the configuration.
pub fn dut_for_model(model: DutModel) -> Box<dyn Dut> {
    match model {
        DutModel::Ripple => Box::new(RippleCarryAdder),
        DutModel::NoCarry => Box::new(NoCarryAdder),
        DutModel::StuckSum => Box::new(StuckSumAdder),
    }
}
