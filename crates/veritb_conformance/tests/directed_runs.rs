//! End-to-end runs of the directed corner cases against each DUT model.

use veritb_conformance::{fields, run_directed};
use veritb_diagnostics::DiagnosticCode;
use veritb_env::{CaptureMode, NoCarryAdder, RippleCarryAdder, StuckSumAdder, Verdict};

#[test]
fn ripple_adder_passes_every_corner_case() {
    let result = run_directed(Box::new(RippleCarryAdder), CaptureMode::TwoEdge);

    assert_eq!(result.report.verdict, Verdict::Pass);
    assert_eq!(result.report.total, 5);
    assert_eq!(result.report.passed, 5);
    assert_eq!(result.report.failed, 0);
    assert_eq!(result.report.generated, 5);
    assert!(result.errors().is_empty());

    let observed: Vec<_> = result.published.iter().map(fields).collect();
    assert_eq!(
        observed,
        vec![
            (0, 0, false, 0, false),
            (15, 15, true, 15, true),
            (15, 15, false, 14, true),
            (5, 3, false, 8, false),
            (8, 8, false, 0, true),
        ]
    );
}

#[test]
fn ripple_adder_passes_with_single_edge_capture() {
    let result = run_directed(Box::new(RippleCarryAdder), CaptureMode::SingleEdge);
    assert!(result.report.passed());
    assert_eq!(result.report.total, 5);
}

#[test]
fn no_carry_adder_fails_and_names_the_operands() {
    let result = run_directed(Box::new(NoCarryAdder), CaptureMode::TwoEdge);

    assert_eq!(result.report.verdict, Verdict::Fail);
    assert_eq!(result.report.total, 5);
    assert_eq!(result.report.passed, 1);
    assert_eq!(result.report.failed, 4);

    let errors = result.errors();
    assert_eq!(errors.len(), 4);
    assert!(errors.iter().all(|d| d.code == DiagnosticCode::CHECK_MISMATCH));
    assert!(errors.iter().all(|d| d.origin == "env.scoreboard"));

    let messages: Vec<&str> = errors.iter().map(|d| d.message.as_str()).collect();
    assert!(messages.contains(
        &"mismatch for a=8 b=8 cin=0: expected sum=0 cout=1, got sum=0 cout=0"
    ));
    assert!(messages.contains(
        &"mismatch for a=15 b=15 cin=1: expected sum=15 cout=1, got sum=1 cout=0"
    ));
    assert!(messages.contains(
        &"mismatch for a=5 b=3 cin=0: expected sum=8 cout=0, got sum=6 cout=0"
    ));
}

#[test]
fn stuck_sum_adder_fails_exactly_one_case() {
    let result = run_directed(Box::new(StuckSumAdder), CaptureMode::TwoEdge);

    assert!(!result.report.passed());
    assert_eq!(result.report.failed, 1);
    assert_eq!(result.report.passed, 4);

    let errors = result.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "mismatch for a=15 b=15 cin=1: expected sum=15 cout=1, got sum=14 cout=1"
    );
    // The record points at the cycle the outputs were sampled on.
    let timing = result.published[1].timing().unwrap();
    assert_eq!(errors[0].cycle, Some(timing.outputs_cycle));
}

#[test]
fn report_text_ends_with_the_verdict() {
    let pass = run_directed(Box::new(RippleCarryAdder), CaptureMode::TwoEdge);
    let text = pass.report.render_text();
    assert!(text.starts_with("Test adder_directed_test: dut=ripple width=4-bit capture=two-edge\n"));
    assert!(text.contains("Scoreboard: total=5 passed=5 failed=0\n"));
    assert!(text.ends_with("TEST PASSED\n"));

    let fail = run_directed(Box::new(NoCarryAdder), CaptureMode::TwoEdge);
    assert!(fail.report.render_text().ends_with("TEST FAILED\n"));
}
