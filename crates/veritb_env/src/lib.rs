//! Transaction-level, self-checking verification environment.
//!
//! This crate drives a combinational adder DUT through a layered testbench:
//! sequences produce [`Transaction`]s, the [`Sequencer`] hands them to the
//! [`Driver`] one at a time, the driver applies them to the [`Binding`] on a
//! clock edge, the [`Monitor`] reconstructs completed transactions from the
//! pins and broadcasts them on an [`AnalysisPort`], and the [`Scoreboard`]
//! checks each one against a reference model.
//!
//! # Time
//!
//! Runs execute on a current-thread tokio runtime with a paused clock. The
//! [`ClockGenerator`] sleeps one tick of virtual time per edge, and virtual
//! time only advances once every task is blocked, so all work belonging to
//! one edge finishes before the next edge fires. Drives are non-blocking
//! assignments: a value driven during edge `n` is committed at edge `n + 1`.
//!
//! # Usage
//!
//! ```ignore
//! use veritb_env::{build_test, execute};
//!
//! let test = build_test(&resolved_run);
//! let report = execute(test)?;
//! println!("{}", report.render_text());
//! ```
//!
//! # Modules
//!
//! - `transaction`: Transaction descriptor and capture timing
//! - `dut`: DUT contract and adder models
//! - `binding`: Hardware binding handle (pins, non-blocking drives, clock event)
//! - `clock`: Periodic clock-edge generator
//! - `sequence`: Random and directed stimulus sources
//! - `sequencer`: Source-to-driver hand-off with completion back-pressure
//! - `driver` / `monitor`: Pin-level stimulus and observation
//! - `analysis`: One-to-many broadcast port and transaction log
//! - `scoreboard`: Reference model and pass/fail accounting
//! - `objection`: Reference-counted completion gate
//! - `agent` / `env` / `harness`: Composition and run orchestration
//! - `report`: End-of-run summary

#![warn(missing_docs)]

pub mod agent;
pub mod analysis;
pub mod binding;
pub mod clock;
pub mod driver;
pub mod dut;
pub mod env;
pub mod error;
pub mod harness;
pub mod monitor;
pub mod objection;
pub mod report;
pub mod scoreboard;
pub mod sequence;
pub mod sequencer;
pub mod transaction;

pub use agent::Agent;
pub use analysis::{AnalysisPort, Subscriber, TransactionLog};
pub use binding::{Binding, BindingHandle, ClockEdge, PinSnapshot};
pub use clock::{ClockGenerator, CLOCK_TICK};
pub use driver::Driver;
pub use dut::{dut_for_model, Dut, FnDut, NoCarryAdder, RippleCarryAdder, StuckSumAdder};
pub use env::{EnvBuilder, Environment, RunningEnvironment};
pub use error::HarnessError;
pub use harness::{build_test, execute, HarnessTest};
pub use monitor::Monitor;
pub use objection::Objection;
pub use report::{RunReport, Verdict};
pub use scoreboard::{reference_model, CheckOutcome, Scoreboard, ScoreboardSummary};
pub use sequence::{start_sequence, DirectedSequence, RandomSequence, Sequence};
pub use sequencer::{SequenceItem, Sequencer, SequencerHandle};
pub use transaction::{AdderInputs, AdderOutputs, CaptureTiming, Transaction};
pub use veritb_config::CaptureMode;
