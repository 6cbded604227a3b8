//! # Network Range Model
//!
//! Parses and represents the CIDR block under sweep.
//!
//! Parsing is non-strict: an address with host bits set (e.g. `10.0.0.5/24`)
//! is silently masked down to its network boundary. A bare address without a
//! prefix is treated as a full-length prefix.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};

use crate::error::InvalidRange;

/// A validated, normalized CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkRange {
    net: IpNetwork,
}

impl NetworkRange {
    /// Builds a range from an address and prefix length, masking away any
    /// host bits so the stored form is always the network boundary.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, InvalidRange> {
        let net = match addr {
            IpAddr::V4(v4) => {
                let net = Ipv4Network::new(v4, prefix)
                    .map_err(|_| InvalidRange::PrefixOutOfRange { prefix, max: 32 })?;
                let net = Ipv4Network::new(net.network(), prefix)
                    .map_err(|_| InvalidRange::PrefixOutOfRange { prefix, max: 32 })?;
                IpNetwork::V4(net)
            }
            IpAddr::V6(v6) => {
                let net = Ipv6Network::new(v6, prefix)
                    .map_err(|_| InvalidRange::PrefixOutOfRange { prefix, max: 128 })?;
                let net = Ipv6Network::new(net.network(), prefix)
                    .map_err(|_| InvalidRange::PrefixOutOfRange { prefix, max: 128 })?;
                IpNetwork::V6(net)
            }
        };
        Ok(Self { net })
    }

    /// Lazy iterator over the usable host addresses of the range, in
    /// ascending order. Restartable: every call yields the same sequence.
    ///
    /// IPv4 blocks narrower than /31 exclude the network and broadcast
    /// addresses; /31 and /32 have no exclusions. IPv6 blocks wider than
    /// /127 exclude only the subnet-router anycast (network) address.
    pub fn hosts(&self) -> Hosts {
        match self.net {
            IpNetwork::V4(net) => {
                let first = u64::from(u32::from(net.network()));
                let last = u64::from(u32::from(net.broadcast()));
                if net.prefix() >= 31 {
                    Hosts::V4 { next: first, last }
                } else {
                    Hosts::V4 {
                        next: first + 1,
                        last: last - 1,
                    }
                }
            }
            IpNetwork::V6(net) => {
                let first = u128::from(net.network());
                let host_bits = 128 - u32::from(net.prefix());
                let last = if host_bits == 128 {
                    u128::MAX
                } else {
                    first | ((1u128 << host_bits) - 1)
                };
                let next = if net.prefix() >= 127 { first } else { first + 1 };
                Hosts::V6 {
                    next,
                    last,
                    done: false,
                }
            }
        }
    }

    /// Number of addresses [`hosts`](Self::hosts) will yield.
    pub fn host_count(&self) -> u128 {
        match self.net {
            IpNetwork::V4(net) => {
                let size = 1u128 << (32 - u32::from(net.prefix()));
                if net.prefix() >= 31 { size } else { size - 2 }
            }
            IpNetwork::V6(net) => {
                let host_bits = 128 - u32::from(net.prefix());
                if net.prefix() >= 127 {
                    1u128 << host_bits
                } else if host_bits == 128 {
                    u128::MAX
                } else {
                    (1u128 << host_bits) - 1
                }
            }
        }
    }
}

impl FromStr for NetworkRange {
    type Err = InvalidRange;

    /// Parses CIDR notation like `192.168.1.0/24`, `10.0.0.5/24` (host bits
    /// masked off) or `fd00::/64`. A plain address is accepted as /32 (IPv4)
    /// or /128 (IPv6).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_str, prefix_str) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let addr = addr_str
            .parse::<IpAddr>()
            .map_err(|_| InvalidRange::BadAddress(addr_str.to_string()))?;

        let prefix = match prefix_str {
            Some(p) => p
                .parse::<u8>()
                .map_err(|_| InvalidRange::BadPrefix(p.to_string()))?,
            None if addr.is_ipv4() => 32,
            None => 128,
        };

        Self::new(addr, prefix)
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

/// Lazy host-address iterator, one variant per address family.
///
/// Bounds are widened (u64 / u128 with a done flag) so the inclusive upper
/// end of a full-width range cannot overflow.
#[derive(Debug, Clone)]
pub enum Hosts {
    V4 { next: u64, last: u64 },
    V6 { next: u128, last: u128, done: bool },
}

impl Iterator for Hosts {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        match self {
            Hosts::V4 { next, last } => {
                if *next > *last {
                    return None;
                }
                let ip = Ipv4Addr::from(*next as u32);
                *next += 1;
                Some(IpAddr::V4(ip))
            }
            Hosts::V6 { next, last, done } => {
                if *done {
                    return None;
                }
                let ip = Ipv6Addr::from(*next);
                if *next == *last {
                    *done = true;
                } else {
                    *next += 1;
                }
                Some(IpAddr::V6(ip))
            }
        }
    }
}
