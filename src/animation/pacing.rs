use std::time::Duration;

/// Works out how long to wait before the next tick so ticks land roughly `interval` apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePacer {
    interval: Duration,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// The time left in the current interval after a tick that took `tick_cost`.
    ///
    /// Ticks slower than the interval get rescheduled right away.
    pub fn next_delay(&self, tick_cost: Duration) -> Duration {
        self.interval.saturating_sub(tick_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::free(0, 25)]
    #[case::partial(10, 15)]
    #[case::exact(25, 0)]
    #[case::slow(80, 0)]
    fn delay(#[case] cost_ms: u64, #[case] expected_ms: u64) {
        let pacer = FramePacer::new(Duration::from_millis(25));
        assert_eq!(pacer.next_delay(Duration::from_millis(cost_ms)), Duration::from_millis(expected_ms));
    }
}
