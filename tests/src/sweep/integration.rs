#![cfg(test)]
use std::collections::HashMap;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::config::Config;
use sweepr_common::network::range::NetworkRange;
use sweepr_core::probe::{Latency, PingProber, ProbeOutcome, ProbeResult, Prober};
use sweepr_core::sweep;

/// Scripted prober: answers from a fixed table, everything else is DOWN.
/// Deterministic and network-free.
struct TableProber {
    outcomes: HashMap<IpAddr, ProbeOutcome>,
}

impl TableProber {
    fn new(entries: &[(&str, ProbeOutcome)]) -> Self {
        let outcomes = entries
            .iter()
            .map(|(addr, outcome)| (addr.parse().unwrap(), outcome.clone()))
            .collect();
        Self { outcomes }
    }
}

#[async_trait]
impl Prober for TableProber {
    async fn probe(&self, addr: IpAddr) -> ProbeResult {
        let outcome = self.outcomes.get(&addr).cloned().unwrap_or(ProbeOutcome::Down {
            reason: "no response".to_string(),
        });
        ProbeResult { addr, outcome }
    }
}

#[tokio::test]
async fn sweep_small_network_end_to_end() {
    let cfg = Config {
        concurrency: 4,
        timeout: Duration::from_secs(1),
    };

    let range = NetworkRange::from_str("192.168.1.0/30").unwrap();
    let prober = TableProber::new(&[
        (
            "192.168.1.1",
            ProbeOutcome::Up(Latency::Measured(Duration::from_micros(450))),
        ),
        (
            "192.168.1.2",
            ProbeOutcome::Error {
                detail: "permission denied".to_string(),
            },
        ),
    ]);

    let mut emitted = Vec::new();
    let summary = sweep::run(&range, &prober, cfg.concurrency, |result| {
        emitted.push(result.clone());
    })
    .await;

    // /30 has exactly the two usable hosts .1 and .2, in address order.
    let addrs: Vec<IpAddr> = emitted.iter().map(|r| r.addr).collect();
    assert_eq!(
        addrs,
        vec![
            "192.168.1.1".parse::<IpAddr>().unwrap(),
            "192.168.1.2".parse::<IpAddr>().unwrap(),
        ]
    );
    assert!(matches!(emitted[0].outcome, ProbeOutcome::Up(_)));
    assert!(matches!(emitted[1].outcome, ProbeOutcome::Error { .. }));

    assert_eq!(summary.up, 1);
    assert_eq!(summary.down, 0);
    assert_eq!(summary.error, 1);
    assert_eq!(summary.total() as u128, range.host_count());
}

#[tokio::test]
async fn host_bits_in_the_cidr_do_not_change_the_sweep() {
    let aligned = NetworkRange::from_str("10.0.0.0/29").unwrap();
    let unaligned = NetworkRange::from_str("10.0.0.5/29").unwrap();

    let prober = TableProber::new(&[("10.0.0.3", ProbeOutcome::Up(Latency::Unknown))]);

    let mut seen_aligned = Vec::new();
    let a = sweep::run(&aligned, &prober, 2, |r| seen_aligned.push(r.addr)).await;

    let mut seen_unaligned = Vec::new();
    let b = sweep::run(&unaligned, &prober, 2, |r| seen_unaligned.push(r.addr)).await;

    assert_eq!(seen_aligned, seen_unaligned);
    assert_eq!(a.up, 1);
    assert_eq!(b.up, 1);
}

#[tokio::test]
async fn wide_sweep_counts_every_host_once() {
    let range = NetworkRange::from_str("172.16.5.0/24").unwrap();
    let prober = TableProber::new(&[
        ("172.16.5.10", ProbeOutcome::Up(Latency::Unknown)),
        ("172.16.5.20", ProbeOutcome::Up(Latency::Unknown)),
    ]);

    let mut emitted = Vec::new();
    let summary = sweep::run(&range, &prober, 64, |r| emitted.push(r.addr)).await;

    assert_eq!(summary.total(), 254);
    assert_eq!(summary.up, 2);
    assert_eq!(summary.down, 252);

    // Every host exactly once, ascending.
    let expected: Vec<IpAddr> = range.hosts().collect();
    assert_eq!(emitted, expected);
}

/// Requires a working `ping` binary and loopback ICMP; run explicitly with
/// `cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn real_ping_prober_reaches_loopback() {
    let prober = PingProber::new(Duration::from_secs(1));
    let result = prober.probe("127.0.0.1".parse().unwrap()).await;
    assert!(
        matches!(result.outcome, ProbeOutcome::Up(_)),
        "loopback probe was not UP: {:?}",
        result.outcome
    );
}
