//! End-of-run summary.

use serde::Serialize;
use std::fmt;
use veritb_common::{BitWidth, SimTime};
use veritb_config::CaptureMode;
use veritb_diagnostics::Diagnostic;

use crate::scoreboard::ScoreboardSummary;

/// Overall outcome of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Every check matched.
    Pass,
    /// At least one check failed.
    Fail,
}

impl Verdict {
    /// PASS iff the fail count is exactly zero.
    pub fn from_summary(summary: &ScoreboardSummary) -> Self {
        if summary.is_pass() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASSED"),
            Verdict::Fail => f.write_str("FAILED"),
        }
    }
}

/// Everything a finished run reports.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// Test that ran.
    pub test: String,
    /// DUT model name.
    pub dut: String,
    /// Operand width.
    pub width: BitWidth,
    /// Monitor capture window.
    pub capture: CaptureMode,
    /// Seed of the stimulus, for randomized tests.
    pub seed: Option<u64>,
    /// Transactions the stimulus source produced.
    pub generated: usize,
    /// Transactions checked.
    pub total: u64,
    /// Checks that matched.
    pub passed: u64,
    /// Checks that failed.
    pub failed: u64,
    /// Clock edges simulated.
    pub cycles: u64,
    /// Virtual time of the last edge.
    pub end_time: SimTime,
    /// Overall outcome.
    pub verdict: Verdict,
    /// Records emitted during the run.
    pub records: Vec<Diagnostic>,
}

impl RunReport {
    /// Returns `true` for a PASS verdict.
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// The textual summary printed at the end of a run.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Test {}: dut={} width={} capture={}",
            self.test, self.dut, self.width, self.capture
        ));
        if let Some(seed) = self.seed {
            out.push_str(&format!(" seed={seed}"));
        }
        out.push('\n');
        out.push_str(&format!(
            "Simulated {} cycles ({}), {} transactions generated\n",
            self.cycles, self.end_time, self.generated
        ));
        out.push_str(&format!(
            "Scoreboard: total={} passed={} failed={}\n",
            self.total, self.passed, self.failed
        ));
        out.push_str(&format!("TEST {}\n", self.verdict));
        out
    }
}
