use std::time::Duration;

/// Run settings resolved once from the command line.
pub struct Config {
    /// Maximum number of probes allowed in flight at the same time.
    pub concurrency: usize,
    /// Time budget handed to each individual probe.
    pub timeout: Duration,
}
