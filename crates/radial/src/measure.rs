use std::time::{Duration, Instant};

/// Minimum spacing between two emitted bounding-box measurements.
pub const MEASURE_INTERVAL: Duration = Duration::from_millis(100);

/// Leading-edge throttle with a trailing, last-write-wins pending value.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    fn window_open(&self, now: Instant) -> bool {
        self.last_emit
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        if self.window_open(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    pub fn flush(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_none() || !self.window_open(now) {
            return None;
        }
        self.last_emit = Some(now);
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Throttle<T> {
    fn default() -> Self {
        Self::new(MEASURE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_leading_edge_emits_immediately() {
        let t0 = Instant::now();
        let mut throttle = Throttle::default();
        assert_eq!(throttle.offer(1, t0), Some(1));
        assert_eq!(throttle.offer(2, t0 + ms(150)), Some(2));
    }

    #[test]
    fn test_trailing_value_is_last_write() {
        let t0 = Instant::now();
        let mut throttle = Throttle::default();
        throttle.offer(1, t0);
        assert_eq!(throttle.offer(2, t0 + ms(20)), None);
        assert_eq!(throttle.offer(3, t0 + ms(40)), None);
        assert!(throttle.has_pending());

        assert_eq!(throttle.flush(t0 + ms(60)), None);
        assert_eq!(throttle.flush(t0 + ms(100)), Some(3));
        assert_eq!(throttle.flush(t0 + ms(300)), None);
    }

    #[test]
    fn test_emission_drops_stale_pending() {
        let t0 = Instant::now();
        let mut throttle = Throttle::default();
        throttle.offer(1, t0);
        throttle.offer(2, t0 + ms(50));
        assert_eq!(throttle.offer(3, t0 + ms(120)), Some(3));
        assert!(!throttle.has_pending());
        assert_eq!(throttle.flush(t0 + ms(500)), None);
    }

    #[test]
    fn test_flush_restarts_window() {
        let t0 = Instant::now();
        let mut throttle = Throttle::default();
        throttle.offer(1, t0);
        throttle.offer(2, t0 + ms(10));
        assert_eq!(throttle.flush(t0 + ms(110)), Some(2));
        assert_eq!(throttle.offer(4, t0 + ms(150)), None);
    }
}
