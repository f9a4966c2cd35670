//! The environment: one agent, one scoreboard, and their wiring.
//!
//! Components receive the binding handle through [`EnvBuilder`] instead of
//! looking it up from shared state. Building without a binding fails before
//! any task starts.

use std::sync::Arc;
use tokio::task::JoinSet;
use veritb_config::CaptureMode;
use veritb_diagnostics::DiagnosticSink;

use crate::agent::Agent;
use crate::analysis::Subscriber;
use crate::binding::BindingHandle;
use crate::clock::ClockGenerator;
use crate::error::HarnessError;
use crate::objection::Objection;
use crate::scoreboard::Scoreboard;
use crate::sequencer::SequencerHandle;
use crate::transaction::Transaction;

const ENV_NAME: &str = "env";

/// Collects what an [`Environment`] needs before it is wired.
pub struct EnvBuilder {
    binding: Option<BindingHandle>,
    capture: CaptureMode,
    sink: Arc<DiagnosticSink>,
    subscribers: Vec<Arc<dyn Subscriber<Transaction>>>,
}

impl EnvBuilder {
    /// Starts a builder with no binding, the default capture window, and a
    /// fresh record sink.
    pub fn new() -> Self {
        Self {
            binding: None,
            capture: CaptureMode::default(),
            sink: Arc::new(DiagnosticSink::new()),
            subscribers: Vec::new(),
        }
    }

    /// Sets the hardware binding shared by the driver and monitor.
    pub fn binding(mut self, binding: BindingHandle) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Selects the monitor capture window.
    pub fn capture(mut self, capture: CaptureMode) -> Self {
        self.capture = capture;
        self
    }

    /// Records go to `sink` instead of a private one.
    pub fn sink(mut self, sink: Arc<DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Adds a subscriber to the monitor's analysis port, after the scoreboard.
    pub fn subscribe(mut self, subscriber: Arc<dyn Subscriber<Transaction>>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// The sink records will be written to.
    pub fn record_sink(&self) -> &Arc<DiagnosticSink> {
        &self.sink
    }

    /// The selected capture window.
    pub fn capture_mode(&self) -> CaptureMode {
        self.capture
    }

    /// Instantiates the agent and scoreboard and connects the monitor's port.
    pub fn build(self, objection: &Arc<Objection>) -> Result<Environment, HarnessError> {
        let agent_name = format!("{ENV_NAME}.agent");
        let binding = self.binding.ok_or_else(|| HarnessError::MissingBinding {
            component: agent_name.clone(),
        })?;
        let mut agent = Agent::new(agent_name, Some(binding.clone()), self.capture, objection)?;

        let scoreboard = Arc::new(Scoreboard::new(
            format!("{ENV_NAME}.scoreboard"),
            binding.width(),
            self.sink,
        ));
        agent.connect(scoreboard.clone());
        for subscriber in self.subscribers {
            agent.connect(subscriber);
        }

        Ok(Environment {
            binding,
            agent,
            scoreboard,
        })
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EnvBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvBuilder")
            .field("binding", &self.binding)
            .field("capture", &self.capture)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// A wired environment that has not started yet.
#[derive(Debug)]
pub struct Environment {
    binding: BindingHandle,
    agent: Agent,
    scoreboard: Arc<Scoreboard>,
}

impl Environment {
    /// The shared binding.
    pub fn binding(&self) -> &BindingHandle {
        &self.binding
    }

    /// The agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// The scoreboard.
    pub fn scoreboard(&self) -> &Arc<Scoreboard> {
        &self.scoreboard
    }

    /// Spawns the agent's tasks and the clock on the current runtime.
    pub fn start(self) -> RunningEnvironment {
        let mut tasks = JoinSet::new();
        let sequencer = self.agent.spawn(&mut tasks);
        tasks.spawn(ClockGenerator::new(self.binding.clone()).run());
        tracing::info!(dut = self.binding.dut_name(), width = %self.binding.width(), "environment started");
        RunningEnvironment {
            sequencer,
            tasks,
            binding: self.binding,
            scoreboard: self.scoreboard,
        }
    }
}

/// An environment whose tasks are running.
///
/// Dropping it aborts every task.
#[derive(Debug)]
pub struct RunningEnvironment {
    sequencer: SequencerHandle,
    tasks: JoinSet<Result<(), HarnessError>>,
    binding: BindingHandle,
    scoreboard: Arc<Scoreboard>,
}

impl RunningEnvironment {
    /// A handle for starting sequences on the agent.
    pub fn sequencer(&self) -> SequencerHandle {
        self.sequencer.clone()
    }

    /// The shared binding.
    pub fn binding(&self) -> &BindingHandle {
        &self.binding
    }

    /// The scoreboard.
    pub fn scoreboard(&self) -> &Arc<Scoreboard> {
        &self.scoreboard
    }

    /// Resolves with the first error raised by a component task.
    ///
    /// Never resolves while every task is healthy.
    pub async fn task_failure(&mut self) -> HarnessError {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => return err,
                Err(join) => return HarnessError::TaskFailed(join.to_string()),
            }
        }
        std::future::pending().await
    }

    /// Abandons the forever-running tasks.
    pub async fn shutdown(mut self) {
        self.tasks.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TransactionLog;
    use crate::binding::Binding;
    use crate::dut::RippleCarryAdder;
    use crate::transaction::AdderInputs;
    use veritb_common::BitWidth;

    fn binding() -> BindingHandle {
        Binding::new(Box::new(RippleCarryAdder), BitWidth::new(4).unwrap(), 10_000_000)
    }

    #[test]
    fn build_without_binding_fails() {
        let objection = Arc::new(Objection::new());
        let err = EnvBuilder::new().build(&objection).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: no hardware binding available for env.agent"
        );
    }

    #[test]
    fn scoreboard_is_connected_first() {
        let objection = Arc::new(Objection::new());
        let env = EnvBuilder::new()
            .binding(binding())
            .subscribe(Arc::new(TransactionLog::new()))
            .build(&objection)
            .unwrap();
        assert_eq!(env.agent().analysis_port().subscriber_count(), 2);
        assert_eq!(env.scoreboard().name(), "env.scoreboard");
        assert_eq!(env.binding().width().bits(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn items_flow_to_scoreboard() {
        let objection = Arc::new(Objection::new());
        let log = Arc::new(TransactionLog::new());
        let env = EnvBuilder::new()
            .binding(binding())
            .subscribe(log.clone())
            .build(&objection)
            .unwrap();
        let running = env.start();
        let handle = running.sequencer();

        for (a, b) in [(1, 2), (7, 9)] {
            handle
                .execute(Transaction::new(AdderInputs { a, b, cin: false }))
                .await
                .unwrap();
        }
        objection.wait_all_dropped().await;

        assert_eq!(log.len(), 2);
        let summary = running.scoreboard().summary();
        assert_eq!((summary.passed, summary.failed), (2, 0));
        running.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn task_error_is_reported() {
        let objection = Arc::new(Objection::new());
        let env = EnvBuilder::new()
            .binding(binding())
            .capture(CaptureMode::SingleEdge)
            .build(&objection)
            .unwrap();
        let mut running = env.start();
        // Monitor publishes with nothing raised on the gate.
        running
            .binding()
            .drive(AdderInputs { a: 1, b: 1, cin: false })
            .unwrap();
        let err = running.task_failure().await;
        assert!(matches!(err, HarnessError::ObjectionUnderflow));
        running.shutdown().await;
    }
}
