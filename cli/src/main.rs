mod terminal;

use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use clap::error::ErrorKind;
use sweepr_common::config::Config;
use sweepr_common::network::range::NetworkRange;
use sweepr_core::probe::PingProber;
use sweepr_core::sweep;

use crate::terminal::{logging, report};

#[derive(Parser)]
#[command(name = "sweepr")]
#[command(about = "Sweep a CIDR block for live hosts with single-shot ICMP echo probes.")]
pub struct CommandLine {
    /// Network to sweep, in CIDR notation (e.g. 192.168.1.0/24)
    pub cidr: String,

    /// Maximum number of probes in flight at once
    #[arg(short, long, default_value_t = 64)]
    pub concurrency: usize,

    /// Per-probe timeout in whole seconds
    #[arg(short, long, default_value_t = 1)]
    pub timeout: u64,

    /// Only log probe diagnostics at error level
    #[arg(short, long)]
    pub quiet: bool,
}

#[tokio::main]
async fn main() {
    let commands = CommandLine::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
            // Bad usage exits 1, not clap's default 2.
            _ => process::exit(1),
        }
    });

    logging::init(commands.quiet);

    // The only fatal error: everything past this point runs to completion.
    let range = match NetworkRange::from_str(&commands.cidr) {
        Ok(range) => range,
        Err(err) => {
            println!("Invalid CIDR notation: {err}");
            process::exit(1);
        }
    };

    let cfg = Config {
        concurrency: commands.concurrency,
        timeout: Duration::from_secs(commands.timeout),
    };

    report::print_header(&range);

    let prober = PingProber::new(cfg.timeout);
    let summary = sweep::run(&range, &prober, cfg.concurrency, |result| {
        report::print_host(result);
    })
    .await;

    // Unreachable hosts are normal scan outcomes, not tool failures:
    // reaching the summary always exits 0.
    report::print_summary(&summary);
}
