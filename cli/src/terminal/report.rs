//! # Sweep Report
//!
//! The fixed stdout layout of the tool. Pure formatting: no probing logic,
//! no state. Status tags are colorized, but `colored` suppresses ANSI when
//! stdout is not a terminal, so piped output stays plain text.

use colored::*;
use sweepr_common::network::range::NetworkRange;
use sweepr_core::probe::{ProbeOutcome, ProbeResult};
use sweepr_core::sweep::SweepSummary;

const SEPARATOR_WIDTH: usize = 45;

pub fn print_header(range: &NetworkRange) {
    println!("\nScanning network {range}...");
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
}

pub fn print_host(result: &ProbeResult) {
    println!("{}", host_line(result));
}

pub fn print_summary(summary: &SweepSummary) {
    println!("{}", summary_block(summary));
}

/// One per-host line: address left-justified to 15 columns, a 5-column
/// status tag, then the latency (UP) or the reason (DOWN/ERROR) in
/// parentheses.
fn host_line(result: &ProbeResult) -> String {
    let addr = format!("{:<15}", result.addr);
    match &result.outcome {
        ProbeOutcome::Up(latency) => {
            format!("{addr} - {} ({latency})", "UP   ".green().bold())
        }
        ProbeOutcome::Down { reason } => {
            format!("{addr} - {} ({reason})", "DOWN ".yellow())
        }
        ProbeOutcome::Error { detail } => {
            format!("{addr} - {} ({detail})", "ERROR".red().bold())
        }
    }
}

fn summary_block(summary: &SweepSummary) -> String {
    let active = format!("{} active hosts", summary.up).green().bold();
    format!(
        "\nScan complete.\nFound {active}, {} down, {} error\nScan duration: {:.2} seconds",
        summary.down,
        summary.error,
        summary.elapsed.as_secs_f64()
    )
}
