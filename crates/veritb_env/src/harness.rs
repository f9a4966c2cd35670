//! Test orchestration: build the environment, run a sequence, gate the end.
//!
//! A [`HarnessTest`] owns the completion gate. It raises one objection for
//! the lifetime of its sequence, and the driver raises one more per item
//! until the monitor has published it. The run ends once the gate is clear,
//! after which the scoreboard's counts are final.

use std::future::Future;
use std::sync::Arc;
use veritb_common::SimTime;
use veritb_config::{ResolvedRun, TestKind};
use veritb_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::analysis::Subscriber;
use crate::binding::Binding;
use crate::clock::CLOCK_TICK;
use crate::dut::dut_for_model;
use crate::env::EnvBuilder;
use crate::error::HarnessError;
use crate::objection::Objection;
use crate::report::{RunReport, Verdict};
use crate::sequence::{start_sequence, DirectedSequence, RandomSequence, Sequence};
use crate::transaction::Transaction;

/// A runnable test: one stimulus source against one environment.
pub struct HarnessTest {
    name: String,
    sequence: Box<dyn Sequence>,
    env: EnvBuilder,
    watchdog_cycles: Option<u64>,
}

impl HarnessTest {
    /// Creates a test that runs `sequence` on the environment `env` describes.
    pub fn new(name: impl Into<String>, sequence: Box<dyn Sequence>, env: EnvBuilder) -> Self {
        Self {
            name: name.into(),
            sequence,
            env,
            watchdog_cycles: None,
        }
    }

    /// Fails the run if the gate is still held after `cycles` clock edges.
    pub fn with_watchdog(mut self, cycles: Option<u64>) -> Self {
        self.watchdog_cycles = cycles;
        self
    }

    /// Adds an analysis subscriber next to the scoreboard.
    pub fn subscribe(mut self, subscriber: Arc<dyn Subscriber<Transaction>>) -> Self {
        self.env = self.env.subscribe(subscriber);
        self
    }

    /// Test name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sink that receives the run's records.
    ///
    /// Records emitted before a fatal error are still available here.
    pub fn sink(&self) -> Arc<DiagnosticSink> {
        Arc::clone(self.env.record_sink())
    }

    /// Runs the test to completion on the current runtime.
    ///
    /// The runtime should have a paused clock so that clock edges advance in
    /// virtual time; see [`execute`].
    pub async fn run(mut self) -> Result<RunReport, HarnessError> {
        let sink = self.sink();
        let capture = self.env.capture_mode();
        let objection = Arc::new(Objection::new());
        let env = self.env.build(&objection)?;
        let binding = Arc::clone(env.binding());
        let mut running = env.start();
        let sequencer = running.sequencer();

        tracing::info!(test = %self.name, dut = binding.dut_name(), %capture, "test started");
        objection.raise(&self.name);

        let name = self.name.clone();
        let sequence = self.sequence.as_mut();
        let gate = async {
            let generated = start_sequence(sequence, &sequencer).await?;
            objection.drop_objection(&name)?;
            objection.wait_all_dropped().await;
            Ok::<_, HarnessError>(generated)
        };

        // A failed component also closes the sequencer under the source, so
        // its own error is checked first.
        let outcome = tokio::select! {
            biased;
            failure = running.task_failure() => Err(failure),
            result = guard(self.watchdog_cycles, &objection, gate) => result,
        };

        let edge = binding.current_edge();
        let summary = running.scoreboard().summary();
        running.shutdown().await;

        let generated = match outcome {
            Ok(generated) => generated,
            Err(err) => {
                record_protocol_error(&sink, &self.name, &err, edge.cycle, edge.time);
                tracing::error!(test = %self.name, cycle = edge.cycle, "{err}");
                return Err(err);
            }
        };

        let verdict = Verdict::from_summary(&summary);
        tracing::info!(
            test = %self.name,
            %verdict,
            cycles = edge.cycle,
            objections = objection.raised_total(),
            errors = sink.error_count(),
            warnings = sink.warning_count(),
            "test finished"
        );
        Ok(RunReport {
            test: self.name,
            dut: binding.dut_name().to_string(),
            width: binding.width(),
            capture,
            seed: self.sequence.seed(),
            generated,
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            cycles: edge.cycle,
            end_time: edge.time,
            verdict,
            records: sink.diagnostics(),
        })
    }
}

impl std::fmt::Debug for HarnessTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessTest")
            .field("name", &self.name)
            .field("sequence", &self.sequence.name())
            .field("env", &self.env)
            .field("watchdog_cycles", &self.watchdog_cycles)
            .finish()
    }
}

async fn guard<F>(
    watchdog_cycles: Option<u64>,
    objection: &Objection,
    gate: F,
) -> Result<usize, HarnessError>
where
    F: Future<Output = Result<usize, HarnessError>>,
{
    let Some(cycles) = watchdog_cycles else {
        return gate.await;
    };
    let limit = CLOCK_TICK.saturating_mul(u32::try_from(cycles).unwrap_or(u32::MAX));
    match tokio::time::timeout(limit, gate).await {
        Ok(result) => result,
        Err(_) => Err(HarnessError::Watchdog {
            cycles,
            outstanding: objection.outstanding(),
        }),
    }
}

fn record_protocol_error(
    sink: &DiagnosticSink,
    test: &str,
    err: &HarnessError,
    cycle: u64,
    time: SimTime,
) {
    let record = match err {
        HarnessError::Watchdog { outstanding, .. } => {
            Diagnostic::error(DiagnosticCode::WATCHDOG_EXPIRED, test, err.to_string())
                .with_note(format!("{outstanding} objection(s) still raised"))
        }
        HarnessError::ObjectionUnderflow => {
            Diagnostic::error(DiagnosticCode::OBJECTION_UNDERFLOW, test, err.to_string())
        }
        _ => return,
    };
    sink.emit(record.at(cycle, time));
}

/// Builds the test a resolved run selects.
pub fn build_test(run: &ResolvedRun) -> HarnessTest {
    let binding = Binding::new(dut_for_model(run.dut), run.width, run.period_fs);
    let sequence: Box<dyn Sequence> = match run.test {
        TestKind::Directed => Box::new(DirectedSequence::corner_cases(run.width)),
        TestKind::Random => Box::new(RandomSequence::new(run.width, run.count, run.seed)),
    };
    let env = EnvBuilder::new().binding(binding).capture(run.capture);
    let test =
        HarnessTest::new(run.test.test_name(), sequence, env).with_watchdog(run.watchdog_cycles);
    if run.test == TestKind::Directed && run.seed.is_some() {
        test.sink().emit(
            Diagnostic::warning(
                DiagnosticCode::SETTING_IGNORED,
                &run.name,
                format!("stimulus.seed has no effect on {}", run.test.test_name()),
            )
            .with_note("the directed test always applies the fixed corner cases"),
        );
    }
    test
}

/// Runs a test on a fresh single-threaded runtime with a paused clock.
pub fn execute(test: HarnessTest) -> Result<RunReport, HarnessError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()?;
    runtime.block_on(test.run())
}
