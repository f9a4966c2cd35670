//! Record codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a record code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Reference-model checks, prefixed with `C`.
    Check,
    /// Run protocol problems (watchdog, gate misuse), prefixed with `P`.
    Protocol,
    /// Configuration problems, prefixed with `G`.
    Config,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Check => 'C',
            Category::Protocol => 'P',
            Category::Config => 'G',
        }
    }
}

/// A record code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `C001`, `C101`, `P201`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this record.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A scoreboard check whose observed outputs matched the reference model.
    pub const CHECK_PASSED: DiagnosticCode = DiagnosticCode::new(Category::Check, 1);
    /// A scoreboard check whose observed outputs disagreed with the reference model.
    pub const CHECK_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Check, 101);
    /// The completion gate did not close before the watchdog expired.
    pub const WATCHDOG_EXPIRED: DiagnosticCode = DiagnosticCode::new(Category::Protocol, 201);
    /// An objection was dropped more times than it was raised.
    pub const OBJECTION_UNDERFLOW: DiagnosticCode = DiagnosticCode::new(Category::Protocol, 202);
    /// The run could not be configured.
    pub const CONFIG_ERROR: DiagnosticCode = DiagnosticCode::new(Category::Config, 301);
    /// A configured setting has no effect on the selected run.
    pub const SETTING_IGNORED: DiagnosticCode = DiagnosticCode::new(Category::Config, 302);

    /// Creates a new record code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
