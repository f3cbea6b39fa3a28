//! Run statistics.
//!
//! [`measure`] is an optional decorator around a transform invocation that
//! reports wall-clock time and peak memory growth. It lives entirely outside
//! the transform engine — nothing in the core tracks timing or memory — and
//! is consumed by the CLI's `--stats` flag.

use std::time::{Duration, Instant};

/// Resource usage of one measured run.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    /// Wall-clock time the closure took.
    pub elapsed: Duration,
    /// Growth of the process's peak resident set size during the run, in
    /// kilobytes. `None` where the platform offers no cheap way to read it.
    pub peak_rss_delta_kb: Option<i64>,
}

/// Run `operation` and measure its elapsed time and peak memory growth.
///
/// # Example
///
/// ```
/// use reframe::measure;
///
/// let (sum, stats) = measure(|| (0..1_000_u64).sum::<u64>());
/// assert_eq!(sum, 499_500);
/// println!("took {:?}", stats.elapsed);
/// ```
pub fn measure<T, F: FnOnce() -> T>(operation: F) -> (T, RunStats) {
    let rss_before = peak_rss_kb();
    let start = Instant::now();
    let value = operation();
    let elapsed = start.elapsed();
    let rss_after = peak_rss_kb();

    let peak_rss_delta_kb = match (rss_before, rss_after) {
        (Some(before), Some(after)) => Some(after - before),
        _ => None,
    };

    (
        value,
        RunStats {
            elapsed,
            peak_rss_delta_kb,
        },
    )
}

/// Peak resident set size of this process in kilobytes.
///
/// Reads the `VmHWM` line of `/proc/self/status`.
#[cfg(target_os = "linux")]
fn peak_rss_kb() -> Option<i64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmHWM:") {
            return rest.trim().trim_end_matches("kB").trim().parse().ok();
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn peak_rss_kb() -> Option<i64> {
    None
}
