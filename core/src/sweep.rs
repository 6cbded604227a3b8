//! # Sweep Orchestration
//!
//! Fans probes out over every usable host of a range with bounded
//! concurrency and aggregates the outcomes.
//!
//! Results are delivered to the caller in ascending address order:
//! [`futures::StreamExt::buffered`] runs up to `concurrency` probes at once
//! but yields them in submission order, so the output is reproducible
//! without an explicit reorder buffer and still streams one result at a
//! time instead of batching at the end.

use std::time::{Duration, Instant};

use futures::{StreamExt, stream};
use sweepr_common::network::range::NetworkRange;
use tracing::debug;

use crate::probe::{ProbeOutcome, ProbeResult, Prober};

/// Aggregate counters for one finished sweep.
///
/// `up + down + error` always equals the number of addresses enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepSummary {
    pub up: usize,
    pub down: usize,
    pub error: usize,
    /// Wall-clock time from first enumeration to last aggregated result.
    pub elapsed: Duration,
}

impl SweepSummary {
    pub fn total(&self) -> usize {
        self.up + self.down + self.error
    }
}

/// Probes every usable host of `range` exactly once and returns the
/// aggregate counters. `on_result` sees each result as it is emitted, in
/// ascending address order.
///
/// The prober contract guarantees per-host failures arrive as
/// [`ProbeOutcome::Error`] values, so no single host can abort the sweep.
pub async fn run<F>(
    range: &NetworkRange,
    prober: &dyn Prober,
    concurrency: usize,
    mut on_result: F,
) -> SweepSummary
where
    F: FnMut(&ProbeResult),
{
    let started = Instant::now();
    debug!(%range, hosts = %range.host_count(), concurrency, "starting sweep");

    let mut results = stream::iter(range.hosts())
        .map(|addr| prober.probe(addr))
        .buffered(concurrency.max(1));

    let mut summary = SweepSummary::default();
    while let Some(result) = results.next().await {
        match result.outcome {
            ProbeOutcome::Up(_) => summary.up += 1,
            ProbeOutcome::Down { .. } => summary.down += 1,
            ProbeOutcome::Error { .. } => summary.error += 1,
        }
        on_result(&result);
    }

    summary.elapsed = started.elapsed();
    debug!(
        up = summary.up,
        down = summary.down,
        error = summary.error,
        "sweep finished"
    );
    summary
}
