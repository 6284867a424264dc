use std::time::{Duration, Instant};

/// Render a duration with two decimals and an automatic unit, e.g. `1.94ms`, `2.34s`.
pub fn fmt_duration(d: Duration) -> String {
    format!("{d:.2?}")
}

/// Warn when an operation that started at `start` took longer than `threshold`.
///
/// Returns whether the warning fired.
pub fn log_if_slow(start: Instant, threshold: Duration, operation: &str) -> bool {
    let elapsed = start.elapsed();
    let slow = elapsed > threshold;
    if slow {
        tracing::warn!(
            operation,
            duration = fmt_duration(elapsed),
            threshold = fmt_duration(threshold),
            "slow operation"
        );
    }
    slow
}
