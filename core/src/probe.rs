//! # Host Liveness Probing
//!
//! One ICMP echo request per host, classified into a three-way outcome:
//!
//! * `Up` — a reply came back within the timeout, with the round-trip time
//!   when the ping utility's output carries one.
//! * `Down` — the probe ran but got no reply (expected unreachability).
//! * `Error` — the probe itself malfunctioned (spawn failure, missing
//!   binary, permission problem). Distinct from `Down` and never merged.
//!
//! The probe boundary swallows everything: [`Prober::probe`] cannot fail,
//! so a single broken host can never take the sweep down with it.

use std::net::IpAddr;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::trace;

const NO_RESPONSE: &str = "no response";

/// Extra headroom over the ping utility's own deadline before the probe is
/// forcefully abandoned.
const KILL_GRACE: Duration = Duration::from_secs(1);

/// Round-trip time of a successful probe.
///
/// `Unknown` is an explicit sentinel for replies whose tool output carries
/// no parsable time value; it is still a successful probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Latency {
    Measured(Duration),
    Unknown,
}

impl std::fmt::Display for Latency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Latency::Measured(rtt) => {
                let ms = rtt.as_nanos() as f64 / 1e6;
                write!(f, "{ms}ms")
            }
            Latency::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Up(Latency),
    Down { reason: String },
    Error { detail: String },
}

/// Outcome of probing a single address. Produced once per host, consumed by
/// the presenter and the aggregate counters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub addr: IpAddr,
    pub outcome: ProbeOutcome,
}

/// Strategy seam for issuing a liveness probe against one address.
///
/// Implementations must be infallible from the caller's perspective: any
/// internal failure is folded into [`ProbeOutcome::Error`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr) -> ProbeResult;
}

/// Probes by invoking the platform `ping` utility with count = 1.
pub struct PingProber {
    timeout: Duration,
}

impl PingProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(&self, addr: IpAddr) -> Command {
        let mut cmd = Command::new("ping");
        if cfg!(windows) {
            let wait_ms = self.timeout.as_millis().max(1).to_string();
            cmd.args(["-n", "1", "-w", wait_ms.as_str()]);
        } else {
            let wait_secs = self.timeout.as_secs().max(1).to_string();
            cmd.args(["-c", "1", "-W", wait_secs.as_str()]);
        }
        cmd.arg(addr.to_string());
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }

    async fn run_ping(&self, addr: IpAddr) -> ProbeOutcome {
        let mut cmd = self.command(addr);
        match tokio::time::timeout(self.timeout + KILL_GRACE, cmd.output()).await {
            // The utility itself hung past its deadline; the child is
            // killed on drop and the host counts as unreachable.
            Err(_) => ProbeOutcome::Down {
                reason: NO_RESPONSE.to_string(),
            },
            Ok(Err(err)) => ProbeOutcome::Error {
                detail: err.to_string(),
            },
            Ok(Ok(output)) => classify(
                output.status.success(),
                &String::from_utf8_lossy(&output.stdout),
            ),
        }
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, addr: IpAddr) -> ProbeResult {
        let outcome = self.run_ping(addr).await;
        trace!(%addr, ?outcome, "probe finished");
        ProbeResult { addr, outcome }
    }
}

/// Maps a finished ping invocation onto the three-way outcome. A zero exit
/// status means a reply arrived; anything else is "no response".
fn classify(success: bool, stdout: &str) -> ProbeOutcome {
    if success {
        ProbeOutcome::Up(extract_latency(stdout))
    } else {
        ProbeOutcome::Down {
            reason: NO_RESPONSE.to_string(),
        }
    }
}

static LATENCY_RE: OnceLock<Regex> = OnceLock::new();

/// Pulls the round-trip time out of ping's stdout.
///
/// The `time=11.4 ms` / `time<1ms` shapes cover GNU iputils, busybox, macOS
/// and Windows, but the format is an adapter boundary: anything that does
/// not match is reported as [`Latency::Unknown`], never as an error.
fn extract_latency(stdout: &str) -> Latency {
    let re = LATENCY_RE
        .get_or_init(|| Regex::new(r"time[=<]?\s*(\d+\.?\d*)").expect("latency pattern"));

    let Some(caps) = re.captures(stdout) else {
        return Latency::Unknown;
    };
    let Ok(ms) = caps[1].parse::<f64>() else {
        return Latency::Unknown;
    };
    // A hostile or garbled time value must degrade, not crash the probe.
    if !ms.is_finite() || ms < 0.0 {
        return Latency::Unknown;
    }
    match Duration::try_from_secs_f64(ms / 1000.0) {
        Ok(rtt) => Latency::Measured(rtt),
        Err(_) => Latency::Unknown,
    }
}
