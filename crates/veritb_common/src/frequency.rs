//! Clock frequency values with unit parsing and period derivation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time::FS_PER_S;

/// A clock frequency stored in Hertz.
///
/// Supports parsing from strings like "100MHz", "250KHz", "1GHz", "48000Hz",
/// and bare numeric values (interpreted as Hz). The harness clock generator
/// uses [`period_fs`](Self::period_fs) to space edges in virtual time.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the clock period in whole femtoseconds.
    ///
    /// Returns `None` for non-positive or non-finite frequencies, and for
    /// frequencies so high that the period rounds down to zero.
    pub fn period_fs(&self) -> Option<u64> {
        if !self.0.is_finite() || self.0 <= 0.0 {
            return None;
        }
        let period = (FS_PER_S as f64 / self.0).round();
        if period < 1.0 || period > u64::MAX as f64 {
            return None;
        }
        Some(period as u64)
    }
}

impl Default for Frequency {
    /// 100 MHz, a 10 ns clock period.
    fn default() -> Self {
        Self(100_000_000.0)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1_000_000_000.0)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        Ok(Frequency(val * scale))
    }
}
