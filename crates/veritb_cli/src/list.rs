//! `veritb list`: show the selectable tests and DUT models.

use veritb_config::{DutModel, TestKind};

use crate::setup::load_harness_config;
use crate::GlobalArgs;

/// Runs the `veritb list` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (config, _) = load_harness_config(global)?;
    print!("{}", render(config.harness.test, config.dut.model));
    Ok(0)
}

/// Lists every test and DUT model, marking the configured defaults with `*`.
fn render(default_test: TestKind, default_dut: DutModel) -> String {
    let mut out = String::from("Tests:\n");
    for kind in TestKind::ALL {
        let mark = if kind == default_test { '*' } else { ' ' };
        out.push_str(&format!(" {mark} {:<10} {}\n", kind.as_str(), kind.test_name()));
    }
    out.push_str("DUT models:\n");
    for model in DutModel::ALL {
        let mark = if model == default_dut { '*' } else { ' ' };
        out.push_str(&format!(" {mark} {model}\n"));
    }
    out
}
