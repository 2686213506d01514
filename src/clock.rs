//! Monotonic time source

/// Monotonic microsecond clock supplied by the host
///
/// The filter integrates gyro rates over the measured time between updates,
/// so the clock must not jump. Any `FnMut() -> u64` closure is a clock.
///
/// # Example
/// ```
/// use mpu6050_fusion::Clock;
///
/// let mut ticks = 0u64;
/// let mut clock = move || {
///     ticks += 1_000;
///     ticks
/// };
/// assert_eq!(clock.now_us(), 1_000);
/// assert_eq!(clock.now_us(), 2_000);
/// ```
pub trait Clock {
    /// Current time in microseconds
    fn now_us(&mut self) -> u64;
}

impl<F> Clock for F
where
    F: FnMut() -> u64,
{
    fn now_us(&mut self) -> u64 {
        self()
    }
}

/// Seconds elapsed from `since` to `now`
///
/// A clock that steps backwards yields zero instead of a negative interval.
pub fn interval_seconds(since: u64, now: u64) -> f32 {
    now.saturating_sub(since) as f32 * 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        assert!((interval_seconds(1_000, 21_000) - 0.02).abs() < 1e-9);
        assert_eq!(interval_seconds(5_000, 5_000), 0.0);
        assert_eq!(interval_seconds(5_000, 4_000), 0.0);
    }
}
