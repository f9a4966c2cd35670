//! Structured run records with severity, code, origin, and time stamp.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use veritb_common::SimTime;

/// A structured record emitted by a harness component.
///
/// Each record includes:
/// - A severity level and unique code
/// - The hierarchical path of the component that emitted it (`env.scoreboard`)
/// - The virtual time and clock cycle it refers to, when it refers to one
/// - A primary message plus optional explanatory notes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this record.
    pub severity: Severity,
    /// The unique code identifying the kind of record.
    pub code: DiagnosticCode,
    /// The main message.
    pub message: String,
    /// Hierarchical path of the emitting component.
    pub origin: String,
    /// Virtual time the record refers to.
    pub time: Option<SimTime>,
    /// Clock cycle the record refers to.
    pub cycle: Option<u64>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a record with the given severity.
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        origin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            origin: origin.into(),
            time: None,
            cycle: None,
            notes: Vec::new(),
        }
    }

    /// Creates an informational record.
    pub fn info(code: DiagnosticCode, origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, origin, message)
    }

    /// Creates a warning record.
    pub fn warning(
        code: DiagnosticCode,
        origin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, code, origin, message)
    }

    /// Creates an error record.
    pub fn error(code: DiagnosticCode, origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, origin, message)
    }

    /// Stamps the record with the clock cycle and virtual time it refers to.
    pub fn at(mut self, cycle: u64, time: SimTime) -> Self {
        self.cycle = Some(cycle);
        self.time = Some(time);
        self
    }

    /// Adds a note to this record.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}
