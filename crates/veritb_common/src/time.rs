//! Simulation timestamps with femtosecond precision.
//!
//! [`SimTime`] marks the virtual time at which a clock edge fires. The
//! harness never advances time itself; the clock generator derives each
//! edge's timestamp from the edge index and the configured period.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = 1_000_000_000_000_000;

/// A point in virtual simulation time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Simulation time in femtoseconds.
    pub fs: u64,
}

impl SimTime {
    /// Time zero.
    pub fn zero() -> Self {
        Self { fs: 0 }
    }

    /// Creates a time from a femtosecond value.
    pub fn from_fs(fs: u64) -> Self {
        Self { fs }
    }

    /// Creates a time from a nanosecond value.
    pub fn from_ns(ns: u64) -> Self {
        Self { fs: ns * FS_PER_NS }
    }

    /// Timestamp of edge `cycle` for a clock with the given period.
    ///
    /// Saturates instead of wrapping for absurdly long runs.
    pub fn at_cycle(cycle: u64, period_fs: u64) -> Self {
        Self {
            fs: cycle.saturating_mul(period_fs),
        }
    }

    /// Converts the timestamp to nanoseconds (truncated).
    pub fn to_ns(&self) -> u64 {
        self.fs / FS_PER_NS
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.fs;
        if fs == 0 {
            write!(f, "0 fs")
        } else if fs >= FS_PER_MS && fs.is_multiple_of(FS_PER_MS) {
            write!(f, "{} ms", fs / FS_PER_MS)
        } else if fs >= FS_PER_US && fs.is_multiple_of(FS_PER_US) {
            write!(f, "{} us", fs / FS_PER_US)
        } else if fs >= FS_PER_NS && fs.is_multiple_of(FS_PER_NS) {
            write!(f, "{} ns", fs / FS_PER_NS)
        } else if fs >= FS_PER_PS && fs.is_multiple_of(FS_PER_PS) {
            write!(f, "{} ps", fs / FS_PER_PS)
        } else {
            write!(f, "{fs} fs")
        }
    }
}
