//! Reference model and self-checking scoreboard.
//!
//! The scoreboard is an analysis subscriber. Every transaction it receives
//! is checked against [`reference_model`] by bit-exact comparison; matches
//! and mismatches are counted and recorded in the run's [`DiagnosticSink`].
//! A mismatch never stops the run.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use veritb_common::BitWidth;
use veritb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::analysis::Subscriber;
use crate::transaction::{AdderInputs, AdderOutputs, Transaction};

/// Computes the expected adder outputs.
///
/// Operands are truncated to `width` bits, as the input wires would. The
/// addition is then carried out in a `u64`, which holds `N + 1` bits for
/// every supported width. The sum is the low `N` bits and the carry-out is
/// bit `N`.
pub fn reference_model(width: BitWidth, inputs: &AdderInputs) -> AdderOutputs {
    let wide = width.mask(inputs.a) + width.mask(inputs.b) + u64::from(inputs.cin);
    AdderOutputs {
        sum: width.mask(wide),
        cout: (wide >> width.bits()) & 1 == 1,
    }
}

/// Result of checking one transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Observed outputs equal the reference model.
    Pass,
    /// Observed outputs differ from the reference model.
    Mismatch {
        /// What the reference model computed.
        expected: AdderOutputs,
        /// What the DUT produced, if anything was captured.
        actual: Option<AdderOutputs>,
    },
}

/// Pass/fail counts at report time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreboardSummary {
    /// Transactions checked.
    pub total: u64,
    /// Transactions that matched.
    pub passed: u64,
    /// Transactions that did not match.
    pub failed: u64,
}

impl ScoreboardSummary {
    /// A run passes iff nothing failed.
    pub fn is_pass(&self) -> bool {
        self.failed == 0
    }
}

/// Checks observed transactions against the reference model.
#[derive(Debug)]
pub struct Scoreboard {
    name: String,
    width: BitWidth,
    sink: Arc<DiagnosticSink>,
    passed: AtomicU64,
    failed: AtomicU64,
}

impl Scoreboard {
    /// Creates a scoreboard that records into `sink`.
    pub fn new(name: impl Into<String>, width: BitWidth, sink: Arc<DiagnosticSink>) -> Self {
        Self {
            name: name.into(),
            width,
            sink,
            passed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Hierarchical name, used as the origin of every record.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks one transaction, updating the counters and the record sink.
    pub fn check(&self, txn: &Transaction) -> CheckOutcome {
        let inputs = txn.inputs();
        let expected = reference_model(self.width, inputs);
        let actual = txn.outputs().copied();

        let outcome = if actual == Some(expected) {
            CheckOutcome::Pass
        } else {
            CheckOutcome::Mismatch { expected, actual }
        };

        let record = match outcome {
            CheckOutcome::Pass => {
                self.passed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%txn, "check passed");
                Diagnostic::info(
                    DiagnosticCode::CHECK_PASSED,
                    &self.name,
                    format!("{inputs} -> {expected}"),
                )
            }
            CheckOutcome::Mismatch { expected, actual } => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                let actual_text = actual.map_or_else(|| "<not captured>".to_string(), |o| o.to_string());
                tracing::warn!(%inputs, %expected, actual = %actual_text, "check mismatch");
                Diagnostic::error(
                    DiagnosticCode::CHECK_MISMATCH,
                    &self.name,
                    format!("mismatch for {inputs}: expected {expected}, got {actual_text}"),
                )
            }
        };
        let record = match txn.timing() {
            Some(timing) => record.at(timing.outputs_cycle, timing.captured_at),
            None => record,
        };
        self.sink.emit(record);
        outcome
    }

    /// Current pass/fail counts.
    pub fn summary(&self) -> ScoreboardSummary {
        let passed = self.passed.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        ScoreboardSummary {
            total: passed + failed,
            passed,
            failed,
        }
    }
}

impl Subscriber<Transaction> for Scoreboard {
    fn write(&self, item: &Transaction) {
        self.check(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::CaptureTiming;
    use veritb_common::SimTime;
    use veritb_diagnostics::Severity;

    fn nibble() -> BitWidth {
        BitWidth::new(4).unwrap()
    }

    fn observed(a: u64, b: u64, cin: bool, sum: u64, cout: bool) -> Transaction {
        let mut txn = Transaction::new(AdderInputs { a, b, cin });
        txn.complete(
            AdderOutputs { sum, cout },
            CaptureTiming {
                driven_cycle: 1,
                inputs_cycle: 2,
                outputs_cycle: 3,
                captured_at: SimTime::from_ns(30),
            },
        );
        txn
    }

    #[test]
    fn reference_model_boundary_cases() {
        let w = nibble();
        let cases = [
            ((0, 0, false), (0, false)),
            ((15, 15, true), (15, true)),
            ((15, 15, false), (14, true)),
            ((5, 3, false), (8, false)),
            ((8, 8, false), (0, true)),
        ];
        for ((a, b, cin), (sum, cout)) in cases {
            let inputs = AdderInputs { a, b, cin };
            assert_eq!(reference_model(w, &inputs), AdderOutputs { sum, cout });
        }
    }

    #[test]
    fn reference_model_is_pure() {
        let w = BitWidth::new(63).unwrap();
        let inputs = AdderInputs {
            a: w.max_value(),
            b: w.max_value(),
            cin: true,
        };
        let first = reference_model(w, &inputs);
        assert_eq!(first, reference_model(w, &inputs));
        assert_eq!(first.sum, w.max_value());
        assert!(first.cout);
    }

    #[test]
    fn pass_is_counted_and_recorded() {
        let sink = Arc::new(DiagnosticSink::new());
        let sb = Scoreboard::new("env.scoreboard", nibble(), sink.clone());
        assert_eq!(sb.check(&observed(5, 3, false, 8, false)), CheckOutcome::Pass);

        assert_eq!(
            sb.summary(),
            ScoreboardSummary {
                total: 1,
                passed: 1,
                failed: 0
            }
        );
        let records = sink.diagnostics();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Info);
        assert_eq!(records[0].code, DiagnosticCode::CHECK_PASSED);
        assert_eq!(records[0].cycle, Some(3));
    }

    #[test]
    fn mismatch_names_operands_expected_and_actual() {
        let sink = Arc::new(DiagnosticSink::new());
        let sb = Scoreboard::new("env.scoreboard", nibble(), sink.clone());
        let outcome = sb.check(&observed(8, 8, false, 0, false));
        assert_eq!(
            outcome,
            CheckOutcome::Mismatch {
                expected: AdderOutputs { sum: 0, cout: true },
                actual: Some(AdderOutputs { sum: 0, cout: false }),
            }
        );
        assert!(!sb.summary().is_pass());
        assert_eq!(sink.error_count(), 1);
        let record = &sink.diagnostics()[0];
        assert_eq!(record.code, DiagnosticCode::CHECK_MISMATCH);
        assert_eq!(record.origin, "env.scoreboard");
        assert_eq!(
            record.message,
            "mismatch for a=8 b=8 cin=0: expected sum=0 cout=1, got sum=0 cout=0"
        );
    }

    #[test]
    fn operands_are_truncated_to_the_field_width() {
        let wide = BitWidth::new(63).unwrap();
        let top = wide.max_value();
        assert_eq!(
            reference_model(wide, &AdderInputs { a: u64::MAX, b: 1, cin: false }),
            AdderOutputs { sum: 0, cout: true }
        );
        assert_eq!(
            reference_model(wide, &AdderInputs { a: u64::MAX, b: u64::MAX, cin: true }),
            AdderOutputs { sum: top, cout: true }
        );
        assert_eq!(
            reference_model(nibble(), &AdderInputs { a: 0x1F, b: 0x10, cin: false }),
            AdderOutputs { sum: 15, cout: false }
        );
    }

    #[test]
    fn unchecked_operands_are_compared_not_rejected() {
        let wide = BitWidth::new(63).unwrap();
        let sink = Arc::new(DiagnosticSink::new());
        let sb = Scoreboard::new("env.scoreboard", wide, sink.clone());
        let txn = observed(u64::MAX, u64::MAX, false, wide.max_value() - 1, true);
        assert_eq!(sb.check(&txn), CheckOutcome::Pass);
        assert_eq!(sb.summary().passed, 1);
    }

    #[test]
    fn uncaptured_transaction_fails() {
        let sink = Arc::new(DiagnosticSink::new());
        let sb = Scoreboard::new("env.scoreboard", nibble(), sink.clone());
        let txn = Transaction::new(AdderInputs { a: 1, b: 1, cin: false });
        assert!(matches!(sb.check(&txn), CheckOutcome::Mismatch { actual: None, .. }));
        assert!(sink.diagnostics()[0].message.ends_with("got <not captured>"));
        assert_eq!(sb.summary().failed, 1);
    }

    #[test]
    fn counters_only_increase() {
        let sink = Arc::new(DiagnosticSink::new());
        let sb = Scoreboard::new("env.scoreboard", nibble(), sink);
        sb.write(&observed(0, 0, false, 0, false));
        sb.write(&observed(15, 15, true, 14, true));
        sb.write(&observed(15, 15, true, 15, true));
        let summary = sb.summary();
        assert_eq!((summary.total, summary.passed, summary.failed), (3, 2, 1));
    }
}
