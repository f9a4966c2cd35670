//! Shared command setup: logging, configuration discovery, record output.

use std::path::{Path, PathBuf};

use veritb_config::{ConfigError, HarnessConfig};
use veritb_diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticRenderer, Severity, TerminalRenderer,
};

use crate::GlobalArgs;

/// Maps the `-q`/`-v` flags to a tracing filter directive.
pub fn log_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        return "error";
    }
    match global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr tracing subscriber.
///
/// `RUST_LOG` is not consulted; the level comes from the command line.
pub fn init_logging(global: &GlobalArgs) {
    // A second initialisation (only possible in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_level(global))
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
}

/// Loads the harness configuration selected by `--config`.
///
/// A file path is loaded directly. A directory, or the current directory when
/// no path is given, is searched for `veritb.toml`; if none is found the
/// defaults are used.
pub fn load_harness_config(global: &GlobalArgs) -> Result<(HarnessConfig, Option<PathBuf>), ConfigError> {
    let location = match global.config {
        Some(ref path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    if location.is_dir() {
        let candidate = location.join(veritb_config::CONFIG_FILE_NAME);
        let source = candidate.is_file().then_some(candidate);
        let config = veritb_config::discover_config(&location)?;
        match source {
            Some(ref path) => tracing::debug!(path = %path.display(), "loaded configuration"),
            None => tracing::debug!(dir = %location.display(), "no configuration file, using defaults"),
        }
        Ok((config, source))
    } else {
        let config = veritb_config::load_config(&location)?;
        tracing::debug!(path = %location.display(), "loaded configuration");
        Ok((config, Some(location)))
    }
}

/// Builds the record reported for a configuration problem.
pub fn config_record(err: &ConfigError, source: Option<&Path>) -> Diagnostic {
    let origin = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "command line".to_string());
    Diagnostic::error(DiagnosticCode::CONFIG_ERROR, origin, err.to_string())
}

/// Prints records to stderr. Informational records are only shown with `-v`.
///
/// Returns how many records were printed.
pub fn render_records(records: &[Diagnostic], global: &GlobalArgs) -> usize {
    let renderer = TerminalRenderer::new(global.color);
    let mut shown = 0;
    for record in records {
        if record.severity == Severity::Info && global.verbose == 0 {
            continue;
        }
        if global.quiet && record.severity != Severity::Error {
            continue;
        }
        eprint!("{}", renderer.render(record));
        shown += 1;
    }
    shown
}
