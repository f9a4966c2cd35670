//! Declared bit widths for fixed-width unsigned signal fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The width in bits of an unsigned signal field.
///
/// Widths are limited to 1..=63 so that an N-bit addition with carry-in
/// always fits in a `u64` with room for the carry bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BitWidth(u32);

/// Error returned when constructing a [`BitWidth`] outside 1..=63.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bit width {0} is out of range (expected 1..={max})", max = BitWidth::MAX_BITS)]
pub struct InvalidWidthError(pub u32);

impl BitWidth {
    /// The widest supported field.
    pub const MAX_BITS: u32 = 63;

    /// A single-bit field, used for carry-in and carry-out.
    pub const BIT: BitWidth = BitWidth(1);

    /// Creates a width, rejecting zero and anything wider than [`Self::MAX_BITS`].
    pub fn new(bits: u32) -> Result<Self, InvalidWidthError> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(InvalidWidthError(bits));
        }
        Ok(Self(bits))
    }

    /// Returns the number of bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns the largest value representable in this width (all ones).
    pub fn max_value(self) -> u64 {
        (1u64 << self.0) - 1
    }

    /// Returns `value` truncated to this width.
    pub fn mask(self, value: u64) -> u64 {
        value & self.max_value()
    }

    /// Returns `true` if `value` fits in this width without truncation.
    pub fn contains(self, value: u64) -> bool {
        value <= self.max_value()
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = InvalidWidthError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<BitWidth> for u32 {
    fn from(width: BitWidth) -> Self {
        width.0
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.0)
    }
}
