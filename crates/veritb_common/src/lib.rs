//! Shared foundational types used across the veritb verification harness.
//!
//! This crate provides bit-width-checked unsigned field widths, clock
//! frequencies with period derivation, and femtosecond simulation
//! timestamps.

#![warn(missing_docs)]

pub mod frequency;
pub mod time;
pub mod width;

pub use frequency::{Frequency, ParseFrequencyError};
pub use time::SimTime;
pub use width::{BitWidth, InvalidWidthError};
