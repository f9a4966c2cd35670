//! Run record creation, severity management, and multi-format rendering.
//!
//! Components of a verification run report what they saw as structured
//! [`Diagnostic`] records: the scoreboard emits one per check, the run
//! orchestrator emits protocol and configuration problems. The thread-safe
//! [`DiagnosticSink`] accumulates them while the run executes, and a
//! [`DiagnosticRenderer`] formats them for the terminal or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
