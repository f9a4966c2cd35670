//! Parsing and validation of `veritb.toml` harness configuration files.
//!
//! This crate reads the optional harness configuration file, produces a
//! strongly-typed [`HarnessConfig`], and layers command-line overrides on top
//! of it to produce a validated [`ResolvedRun`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_run, ResolvedRun, RunOverrides};
pub use types::*;
