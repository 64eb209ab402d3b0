use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Monotonic time source used to measure parse duration.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    fn elapsed_ms(&self, since: Instant) -> u64 {
        let elapsed = self.now().saturating_duration_since(since);
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Advances by a fixed step on every reading.
#[derive(Debug)]
pub struct SteppingClock {
    current: Mutex<Instant>,
    step: Duration,
}

impl SteppingClock {
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            current: Mutex::new(Instant::now()),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Instant {
        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let reading = *current;
        *current = reading + self.step;
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_clock_advances_per_reading() {
        let clock = SteppingClock::new(Duration::from_millis(25));
        let start = clock.now();
        assert_eq!(clock.elapsed_ms(start), 25);
        assert_eq!(clock.elapsed_ms(start), 50);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
