use std::collections::VecDeque;
use std::time::Instant;

/// Source of elapsed seconds since the session started. Read once per frame.
pub trait Clock: Send {
    fn elapsed(&mut self) -> f32;
}

/// Wall clock started at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn elapsed(&mut self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Scripted clock: returns the queued times in order, then holds the last one.
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    times: VecDeque<f32>,
    last: f32,
}

impl FakeClock {
    pub fn new(times: impl IntoIterator<Item = f32>) -> Self {
        Self {
            times: times.into_iter().collect(),
            last: 0.0,
        }
    }

    /// Evenly spaced samples `0, step, 2*step, ...` (`count` of them).
    pub fn stepped(step: f32, count: usize) -> Self {
        Self::new((0..count).map(|i| i as f32 * step))
    }

    pub fn remaining(&self) -> usize {
        self.times.len()
    }
}

impl Clock for FakeClock {
    fn elapsed(&mut self) -> f32 {
        if let Some(t) = self.times.pop_front() {
            self.last = t;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_replays_then_holds() {
        let mut clock = FakeClock::new([0.0, 1.0, 2.0]);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.elapsed(), 1.0);
        assert_eq!(clock.remaining(), 1);
        assert_eq!(clock.elapsed(), 2.0);
        assert_eq!(clock.elapsed(), 2.0);
    }

    #[test]
    fn stepped_samples() {
        let mut clock = FakeClock::stepped(0.5, 3);
        let seen: Vec<_> = (0..3).map(|_| clock.elapsed()).collect();
        assert_eq!(seen, [0.0, 0.5, 1.0]);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::start();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
