//! `veritb run`: execute one test and report the verdict.
//!
//! Loads the configuration, layers the command-line overrides on top, builds
//! the selected test, runs it to completion, and prints the scoreboard
//! summary. The exit code is 0 for PASS and 1 for FAIL.

use std::path::Path;
use std::sync::Arc;

use veritb_config::{resolve_run, ResolvedRun, RunOverrides};
use veritb_diagnostics::{Diagnostic, DiagnosticRenderer, JsonRenderer, TerminalRenderer};
use veritb_env::{build_test, execute, RunReport, TransactionLog};

use crate::setup::{config_record, load_harness_config, render_records};
use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Runs the `veritb run` command.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (config, source) = match load_harness_config(global) {
        Ok(loaded) => loaded,
        Err(e) => {
            let source = global.config.as_deref().map(Path::new);
            report_config_error(&config_record(&e, source), args.format, global);
            return Ok(1);
        }
    };

    let run = match resolve_run(&config, &overrides(args)) {
        Ok(run) => run,
        Err(e) => {
            report_config_error(&config_record(&e, source.as_deref()), args.format, global);
            return Ok(1);
        }
    };

    tracing::info!(
        harness = %run.name,
        test = %run.test,
        dut = %run.dut,
        width = run.width.bits(),
        period_fs = run.period_fs,
        seed = ?run.seed,
        "run resolved"
    );
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("{}", status_line(&run));
    }

    let log = Arc::new(TransactionLog::new());
    let mut test = build_test(&run);
    if args.dump {
        test = test.subscribe(log.clone());
    }
    let sink = test.sink();

    let report = match execute(test) {
        Ok(report) => report,
        Err(e) => {
            tracing::debug!(records = sink.diagnostics().len(), "run aborted");
            render_records(&sink.diagnostics(), global);
            return Err(e.into());
        }
    };

    if args.dump {
        for txn in log.entries() {
            println!("{txn}");
        }
    }

    match args.format {
        ReportFormat::Text => print_text(&report, global),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.passed() { 0 } else { 1 })
}

fn status_line(run: &ResolvedRun) -> String {
    format!(
        "   Running {} [{}] on {} ({}, {}, {} capture)",
        run.test.test_name(),
        run.name,
        run.dut,
        run.width,
        run.frequency,
        run.capture
    )
}

/// Collects the command-line overrides.
fn overrides(args: &RunArgs) -> RunOverrides {
    RunOverrides {
        test: args.test,
        dut: args.dut,
        width: args.width,
        frequency: args.frequency.clone(),
        count: args.count,
        seed: args.seed,
        capture: args.capture,
        watchdog_cycles: args.watchdog,
    }
}

fn report_config_error(
    record: &Diagnostic,
    format: ReportFormat,
    global: &GlobalArgs,
) {
    match format {
        ReportFormat::Text => eprint!("{}", TerminalRenderer::new(global.color).render(record)),
        ReportFormat::Json => println!("{}", JsonRenderer.render(record)),
    }
}

fn print_text(report: &RunReport, global: &GlobalArgs) {
    render_records(&report.records, global);
    if global.quiet {
        // The verdict line is always printed.
        if let Some(verdict) = report.render_text().lines().last() {
            println!("{verdict}");
        }
        return;
    }
    print!("{}", report.render_text());
}
