//! Run resolution: merging command-line overrides onto the file configuration.

use crate::error::ConfigError;
use crate::loader::{validate_count, validate_frequency, validate_watchdog, validate_width};
use crate::types::{CaptureMode, DutModel, HarnessConfig, TestKind};
use veritb_common::{BitWidth, Frequency};

/// Values given at process start that take precedence over `veritb.toml`.
#[derive(Debug, Default, Clone)]
pub struct RunOverrides {
    /// Test variant to run.
    pub test: Option<TestKind>,
    /// DUT model.
    pub dut: Option<DutModel>,
    /// Operand width in bits.
    pub width: Option<u32>,
    /// Clock frequency string.
    pub frequency: Option<String>,
    /// Random transaction count.
    pub count: Option<usize>,
    /// Random seed.
    pub seed: Option<u64>,
    /// Monitor capture window.
    pub capture: Option<CaptureMode>,
    /// Watchdog limit in clock cycles.
    pub watchdog_cycles: Option<u64>,
}

/// A fully resolved, validated run selection.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    /// Harness display name.
    pub name: String,
    /// Test variant to run.
    pub test: TestKind,
    /// DUT model.
    pub dut: DutModel,
    /// Operand width.
    pub width: BitWidth,
    /// Clock frequency.
    pub frequency: Frequency,
    /// Clock period in femtoseconds, derived from `frequency`.
    pub period_fs: u64,
    /// Random transaction count.
    pub count: usize,
    /// Random seed, if pinned.
    pub seed: Option<u64>,
    /// Monitor capture window.
    pub capture: CaptureMode,
    /// Watchdog limit in clock cycles.
    pub watchdog_cycles: Option<u64>,
}

/// Resolves the run by layering overrides on top of the file configuration.
///
/// Overridden values are validated with the same rules as file values.
pub fn resolve_run(
    config: &HarnessConfig,
    overrides: &RunOverrides,
) -> Result<ResolvedRun, ConfigError> {
    let width = validate_width(overrides.width.unwrap_or(config.dut.width))?;
    let frequency_text = overrides
        .frequency
        .as_deref()
        .unwrap_or(&config.clock.frequency);
    let (frequency, period_fs) = validate_frequency(frequency_text)?;
    let count = overrides.count.unwrap_or(config.stimulus.count);
    validate_count(count)?;
    let watchdog_cycles = overrides.watchdog_cycles.or(config.run.watchdog_cycles);
    validate_watchdog(watchdog_cycles)?;

    Ok(ResolvedRun {
        name: config.harness.name.clone(),
        test: overrides.test.unwrap_or(config.harness.test),
        dut: overrides.dut.unwrap_or(config.dut.model),
        width,
        frequency,
        period_fs,
        count,
        seed: overrides.seed.or(config.stimulus.seed),
        capture: overrides.capture.unwrap_or(config.monitor.capture),
        watchdog_cycles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    fn sample_config() -> HarnessConfig {
        load_config_from_str(
            r#"
[harness]
test = "random"

[dut]
width = 8

[stimulus]
count = 20
seed = 9
"#,
        )
        .unwrap()
    }

    #[test]
    fn no_overrides_uses_file_values() {
        let run = resolve_run(&sample_config(), &RunOverrides::default()).unwrap();
        assert_eq!(run.test, TestKind::Random);
        assert_eq!(run.width.bits(), 8);
        assert_eq!(run.count, 20);
        assert_eq!(run.seed, Some(9));
        assert_eq!(run.period_fs, 10_000_000);
        assert_eq!(run.capture, CaptureMode::TwoEdge);
    }

    #[test]
    fn overrides_take_precedence() {
        let overrides = RunOverrides {
            test: Some(TestKind::Directed),
            dut: Some(DutModel::StuckSum),
            width: Some(4),
            frequency: Some("1GHz".to_string()),
            count: Some(3),
            seed: Some(1),
            capture: Some(CaptureMode::SingleEdge),
            watchdog_cycles: Some(100),
        };
        let run = resolve_run(&sample_config(), &overrides).unwrap();
        assert_eq!(run.test, TestKind::Directed);
        assert_eq!(run.dut, DutModel::StuckSum);
        assert_eq!(run.width.bits(), 4);
        assert_eq!(run.period_fs, 1_000_000);
        assert_eq!(run.count, 3);
        assert_eq!(run.seed, Some(1));
        assert_eq!(run.capture, CaptureMode::SingleEdge);
        assert_eq!(run.watchdog_cycles, Some(100));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = RunOverrides {
            width: Some(0),
            ..RunOverrides::default()
        };
        let err = resolve_run(&sample_config(), &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let overrides = RunOverrides {
            count: Some(0),
            ..RunOverrides::default()
        };
        assert!(resolve_run(&sample_config(), &overrides).is_err());
    }
}
