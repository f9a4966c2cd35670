//! Record severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a run record.
///
/// Ordered from least severe (`Info`) to most severe (`Error`), matching the
/// derived `PartialOrd`/`Ord` implementation based on declaration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational record, e.g. a passing check.
    Info,
    /// Something suspicious that does not fail the run on its own.
    Warning,
    /// A failed check or a problem that fails the run.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn is_error() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
        assert!(!Severity::Info.is_error());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Info), "info");
    }
}
