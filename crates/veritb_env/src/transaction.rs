//! The transaction descriptor exchanged between testbench components.
//!
//! A [`Transaction`] starts life holding only stimulus. Outputs and capture
//! timing are filled in exactly once, by the monitor, before the transaction
//! is published. Published transactions are only ever handed out by shared
//! reference, so subscribers cannot change what other subscribers see.

use serde::Serialize;
use std::fmt;
use veritb_common::{BitWidth, SimTime};

use crate::error::HarnessError;

/// Stimulus fields driven onto the DUT inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AdderInputs {
    /// First N-bit operand.
    pub a: u64,
    /// Second N-bit operand.
    pub b: u64,
    /// 1-bit carry-in.
    pub cin: bool,
}

impl AdderInputs {
    /// Creates stimulus, rejecting operands that do not fit in `width`.
    pub fn new(width: BitWidth, a: u64, b: u64, cin: bool) -> Result<Self, HarnessError> {
        for (field, value) in [("a", a), ("b", b)] {
            if !width.contains(value) {
                return Err(HarnessError::ValueOutOfRange {
                    field,
                    value,
                    width: width.bits(),
                });
            }
        }
        Ok(Self { a, b, cin })
    }
}

impl fmt::Display for AdderInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a={} b={} cin={}", self.a, self.b, u8::from(self.cin))
    }
}

/// Response fields captured from the DUT outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AdderOutputs {
    /// N-bit sum.
    pub sum: u64,
    /// 1-bit carry-out.
    pub cout: bool,
}

impl fmt::Display for AdderOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sum={} cout={}", self.sum, u8::from(self.cout))
    }
}

/// When a transaction was driven and captured, in clock cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CaptureTiming {
    /// Edge at which the driver scheduled the inputs.
    pub driven_cycle: u64,
    /// Edge at which the inputs took effect and were sampled.
    pub inputs_cycle: u64,
    /// Edge at which the outputs were sampled.
    pub outputs_cycle: u64,
    /// Virtual time of the output sample.
    pub captured_at: SimTime,
}

/// One stimulus/response pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    inputs: AdderInputs,
    outputs: Option<AdderOutputs>,
    timing: Option<CaptureTiming>,
}

impl Transaction {
    /// Creates a stimulus-only transaction with outputs unset.
    pub fn new(inputs: AdderInputs) -> Self {
        Self {
            inputs,
            outputs: None,
            timing: None,
        }
    }

    /// Returns the stimulus fields.
    pub fn inputs(&self) -> &AdderInputs {
        &self.inputs
    }

    /// Returns the captured outputs, or `None` before capture.
    pub fn outputs(&self) -> Option<&AdderOutputs> {
        self.outputs.as_ref()
    }

    /// Returns the capture timing, or `None` before capture.
    pub fn timing(&self) -> Option<&CaptureTiming> {
        self.timing.as_ref()
    }

    /// Returns `true` once outputs have been captured.
    pub fn is_complete(&self) -> bool {
        self.outputs.is_some()
    }

    /// Records the captured response. Only the monitor completes transactions.
    pub(crate) fn complete(&mut self, outputs: AdderOutputs, timing: CaptureTiming) {
        debug_assert!(self.outputs.is_none(), "transaction captured twice");
        self.outputs = Some(outputs);
        self.timing = Some(timing);
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outputs {
            Some(outputs) => write!(f, "{} -> {}", self.inputs, outputs),
            None => write!(f, "{} -> <pending>", self.inputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nibble() -> BitWidth {
        BitWidth::new(4).unwrap()
    }

    #[test]
    fn inputs_reject_out_of_range() {
        let err = AdderInputs::new(nibble(), 16, 0, false).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::ValueOutOfRange {
                field: "a",
                value: 16,
                width: 4
            }
        ));
        let err = AdderInputs::new(nibble(), 0, 99, true).unwrap_err();
        assert!(matches!(err, HarnessError::ValueOutOfRange { field: "b", .. }));
        assert!(AdderInputs::new(nibble(), 15, 15, true).is_ok());
    }

    #[test]
    fn new_transaction_has_no_outputs() {
        let inputs = AdderInputs::new(nibble(), 5, 3, false).unwrap();
        let txn = Transaction::new(inputs);
        assert!(!txn.is_complete());
        assert!(txn.outputs().is_none());
        assert!(txn.timing().is_none());
        assert_eq!(txn.to_string(), "a=5 b=3 cin=0 -> <pending>");
    }

    #[test]
    fn complete_fills_outputs_and_timing() {
        let inputs = AdderInputs::new(nibble(), 8, 8, false).unwrap();
        let mut txn = Transaction::new(inputs);
        let timing = CaptureTiming {
            driven_cycle: 1,
            inputs_cycle: 2,
            outputs_cycle: 3,
            captured_at: SimTime::from_ns(30),
        };
        txn.complete(AdderOutputs { sum: 0, cout: true }, timing);
        assert!(txn.is_complete());
        assert_eq!(txn.timing(), Some(&timing));
        assert_eq!(txn.to_string(), "a=8 b=8 cin=0 -> sum=0 cout=1");
    }

    #[test]
    fn clone_is_equal_and_independent() {
        let inputs = AdderInputs::new(nibble(), 1, 2, true).unwrap();
        let original = Transaction::new(inputs);
        let mut copy = original.clone();
        assert_eq!(copy, original);
        copy.complete(
            AdderOutputs { sum: 4, cout: false },
            CaptureTiming {
                driven_cycle: 0,
                inputs_cycle: 1,
                outputs_cycle: 1,
                captured_at: SimTime::zero(),
            },
        );
        assert_ne!(copy, original);
        assert!(!original.is_complete());
    }
}
