use thiserror::Error;

/// Reasons a CIDR argument is rejected before any probing starts.
///
/// This is the only fatal error in the tool: everything that goes wrong
/// after parsing is folded into per-host probe outcomes instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRange {
    #[error("'{0}' is not a valid IP address")]
    BadAddress(String),
    #[error("'{0}' is not a valid prefix length")]
    BadPrefix(String),
    #[error("prefix /{prefix} is out of range (maximum /{max})")]
    PrefixOutOfRange { prefix: u8, max: u8 },
}
