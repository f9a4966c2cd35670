//! Record rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering records into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single record into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders records in a compiler-style terminal format.
///
/// Produces output like:
/// ```text
/// error[C101]: mismatch for a=8 b=8 cin=0: expected sum=0 cout=1, got sum=0 cout=0
///   --> env.scoreboard @ cycle 7 (70 ns)
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_label(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        let ansi = match severity {
            Severity::Info => "32",
            Severity::Warning => "33",
            Severity::Error => "31",
        };
        format!("\x1b[1;{ansi}m{severity}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{}[{}]: {}\n",
            self.severity_label(diag.severity),
            diag.code,
            diag.message
        ));

        out.push_str(&format!("  --> {}", diag.origin));
        match (diag.cycle, diag.time) {
            (Some(cycle), Some(time)) => out.push_str(&format!(" @ cycle {cycle} ({time})\n")),
            (Some(cycle), None) => out.push_str(&format!(" @ cycle {cycle}\n")),
            _ => out.push('\n'),
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }
}

/// Renders each record as a single line of JSON.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        // Diagnostic holds only plain data; serialization cannot fail.
        serde_json::to_string(diag).unwrap_or_default()
    }
}
