//! Configuration types deserialized from `veritb.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The top-level harness configuration parsed from `veritb.toml`.
///
/// Every section is optional; a missing file or an empty file yields the
/// defaults (directed test, 4-bit ripple-carry DUT, 100 MHz clock).
#[derive(Debug, Default, Deserialize)]
pub struct HarnessConfig {
    /// Harness metadata and default test selection.
    #[serde(default)]
    pub harness: HarnessMeta,
    /// Device under test selection.
    #[serde(default)]
    pub dut: DutConfig,
    /// Clock generator settings.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Random stimulus settings.
    #[serde(default)]
    pub stimulus: StimulusConfig,
    /// Monitor capture settings.
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Run-level settings (watchdog).
    #[serde(default)]
    pub run: RunConfig,
}

/// Harness metadata.
#[derive(Debug, Deserialize)]
pub struct HarnessMeta {
    /// A display name for the harness.
    #[serde(default = "default_name")]
    pub name: String,
    /// The test variant run when none is selected on the command line.
    #[serde(default)]
    pub test: TestKind,
}

impl Default for HarnessMeta {
    fn default() -> Self {
        Self {
            name: default_name(),
            test: TestKind::default(),
        }
    }
}

fn default_name() -> String {
    "adder".to_string()
}

/// DUT model and operand width.
#[derive(Debug, Deserialize)]
pub struct DutConfig {
    /// Which adder model stands in for the device under test.
    #[serde(default)]
    pub model: DutModel,
    /// Operand width N in bits; `sum` is N bits, `cin`/`cout` are 1 bit.
    #[serde(default = "default_width")]
    pub width: u32,
}

impl Default for DutConfig {
    fn default() -> Self {
        Self {
            model: DutModel::default(),
            width: default_width(),
        }
    }
}

fn default_width() -> u32 {
    4
}

/// Clock generator configuration.
#[derive(Debug, Deserialize)]
pub struct ClockConfig {
    /// Clock frequency as a string (e.g., "100MHz"), parsed to [`Frequency`](veritb_common::Frequency).
    #[serde(default = "default_frequency")]
    pub frequency: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
        }
    }
}

fn default_frequency() -> String {
    "100MHz".to_string()
}

/// Random stimulus configuration.
#[derive(Debug, Deserialize)]
pub struct StimulusConfig {
    /// Number of transactions the random test generates.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Seed for reproducible random stimulus. Drawn from entropy if absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            seed: None,
        }
    }
}

fn default_count() -> usize {
    50
}

/// Monitor configuration.
#[derive(Debug, Default, Deserialize)]
pub struct MonitorConfig {
    /// How many clock edges the monitor spans to capture one transaction.
    #[serde(default)]
    pub capture: CaptureMode,
}

/// Run-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct RunConfig {
    /// Abort the run if the completion gate is still held after this many cycles.
    #[serde(default)]
    pub watchdog_cycles: Option<u64>,
}

/// The test variants a run can select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    /// Fixed corner-case stimulus.
    #[default]
    Directed,
    /// Uniformly random stimulus.
    Random,
}

impl TestKind {
    /// All test variants, in listing order.
    pub const ALL: [TestKind; 2] = [TestKind::Directed, TestKind::Random];

    /// The name used on the command line and in `veritb.toml`.
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Directed => "directed",
            TestKind::Random => "random",
        }
    }

    /// The name the test reports itself under.
    pub fn test_name(self) -> &'static str {
        match self {
            TestKind::Directed => "adder_directed_test",
            TestKind::Random => "adder_random_test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = ConfigError;

    /// Accepts both the short name (`directed`) and the reported name
    /// (`adder_directed_test`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestKind::ALL
            .into_iter()
            .find(|kind| s == kind.as_str() || s == kind.test_name())
            .ok_or_else(|| ConfigError::UnknownTest(s.to_string()))
    }
}

/// The adder models available as a device under test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutModel {
    /// Correct ripple-carry adder.
    #[default]
    Ripple,
    /// Faulty adder that never propagates or produces a carry.
    NoCarry,
    /// Faulty adder whose sum bit 0 is stuck at zero.
    StuckSum,
}

impl DutModel {
    /// All DUT models, in listing order.
    pub const ALL: [DutModel; 3] = [DutModel::Ripple, DutModel::NoCarry, DutModel::StuckSum];

    /// The name used on the command line and in `veritb.toml`.
    pub fn as_str(self) -> &'static str {
        match self {
            DutModel::Ripple => "ripple",
            DutModel::NoCarry => "no-carry",
            DutModel::StuckSum => "stuck-sum",
        }
    }
}

impl fmt::Display for DutModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DutModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DutModel::ALL
            .into_iter()
            .find(|model| s == model.as_str())
            .ok_or_else(|| ConfigError::UnknownDut(s.to_string()))
    }
}

/// Monitor capture window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    /// Inputs on the edge the drive takes effect, outputs on the following edge.
    #[default]
    TwoEdge,
    /// Inputs and settled outputs on the same edge.
    SingleEdge,
}

impl CaptureMode {
    /// The name used on the command line and in `veritb.toml`.
    pub fn as_str(self) -> &'static str {
        match self {
            CaptureMode::TwoEdge => "two-edge",
            CaptureMode::SingleEdge => "single-edge",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptureMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-edge" => Ok(CaptureMode::TwoEdge),
            "single-edge" => Ok(CaptureMode::SingleEdge),
            other => Err(ConfigError::ValidationError(format!(
                "unknown capture mode '{other}' (expected two-edge or single-edge)"
            ))),
        }
    }
}
