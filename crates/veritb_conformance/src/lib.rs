//! Conformance test helpers for the veritb verification harness.
//!
//! Provides shared run functions that build a test around a given DUT and
//! stimulus, execute it on a paused-clock runtime, and return the report
//! together with every transaction the monitor published.

#![warn(missing_docs)]

use std::sync::Arc;

use veritb_common::BitWidth;
use veritb_config::{resolve_run, CaptureMode, HarnessConfig, ResolvedRun, RunOverrides};
use veritb_diagnostics::{Diagnostic, Severity};
use veritb_env::{
    execute, Binding, DirectedSequence, Dut, EnvBuilder, HarnessError, HarnessTest, RunReport,
    Sequence, Transaction, TransactionLog,
};

/// Clock period used by the helpers: 100 MHz.
pub const PERIOD_FS: u64 = 10_000_000;

/// Result of running one test end to end.
pub struct RunResult {
    /// The end-of-run report.
    pub report: RunReport,
    /// Every published transaction, in publication order.
    pub published: Vec<Transaction>,
}

impl RunResult {
    /// Error-severity records emitted during the run.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.report
            .records
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }
}

/// The 4-bit width used by the literal boundary scenarios.
pub fn nibble() -> BitWidth {
    BitWidth::new(4).unwrap()
}

/// Runs `sequence` against `dut` and collects the published transactions.
pub fn run_sequence(
    name: &str,
    sequence: Box<dyn Sequence>,
    dut: Box<dyn Dut>,
    width: BitWidth,
    capture: CaptureMode,
) -> Result<RunResult, HarnessError> {
    let log = Arc::new(TransactionLog::new());
    let env = EnvBuilder::new()
        .binding(Binding::new(dut, width, PERIOD_FS))
        .capture(capture);
    let test = HarnessTest::new(name, sequence, env).subscribe(log.clone());
    let report = execute(test)?;
    Ok(RunResult {
        report,
        published: log.entries(),
    })
}

/// Runs the directed corner cases at 4 bits against `dut`.
pub fn run_directed(dut: Box<dyn Dut>, capture: CaptureMode) -> RunResult {
    run_sequence(
        "adder_directed_test",
        Box::new(DirectedSequence::corner_cases(nibble())),
        dut,
        nibble(),
        capture,
    )
    .unwrap()
}

/// Resolves a run from `veritb.toml` text and overrides.
pub fn resolve_from_toml(toml: &str, overrides: &RunOverrides) -> ResolvedRun {
    let config: HarnessConfig = veritb_config::load_config_from_str(toml).unwrap();
    resolve_run(&config, overrides).unwrap()
}

/// `(a, b, cin, sum, cout)` for a published transaction.
pub fn fields(txn: &Transaction) -> (u64, u64, bool, u64, bool) {
    let i = txn.inputs();
    let o = txn.outputs().expect("published transaction without outputs");
    (i.a, i.b, i.cin, o.sum, o.cout)
}
