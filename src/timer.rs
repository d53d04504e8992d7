//! Frame-driven timers. Time only moves when the owner feeds in the frame delta,
//! which keeps every transition deterministic under test.

use std::time::Duration;

/// Repeating timer. `cancel` is the handle that stops it; nothing fires until
/// `restart` is called again.
#[derive(Debug, Clone)]
pub struct Timer {
    interval: Duration,
    elapsed: Duration,
    active: bool,
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            active: false,
        }
    }

    /// Arms the timer from zero, keeping the current interval.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.elapsed = Duration::ZERO;
        self.active = false;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns how many times the timer fired during `dt`.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        if !self.active {
            return 0;
        }
        if self.interval.is_zero() {
            return 1;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// One-shot delay.
#[derive(Debug, Clone, Default)]
pub struct Delay {
    remaining: Option<Duration>,
}

impl Delay {
    pub fn schedule(&mut self, after: Duration) {
        self.remaining = Some(after);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// True exactly once, on the tick where the delay runs out.
    pub fn tick(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(left) if dt >= left => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_timer_inactive_until_restart() {
        let mut t = Timer::new(ms(100));
        assert_eq!(t.tick(ms(500)), 0);
        t.restart();
        assert_eq!(t.tick(ms(99)), 0);
        assert_eq!(t.tick(ms(1)), 1);
    }

    #[test]
    fn test_timer_fires_repeatedly() {
        let mut t = Timer::new(ms(50));
        t.restart();
        assert_eq!(t.tick(ms(175)), 3);
        assert_eq!(t.tick(ms(25)), 1);
    }

    #[test]
    fn test_timer_cancel_stops_firing() {
        let mut t = Timer::new(ms(50));
        t.restart();
        t.tick(ms(40));
        t.cancel();
        assert_eq!(t.tick(ms(100)), 0);
    }

    #[test]
    fn test_delay_fires_once() {
        let mut d = Delay::default();
        assert!(!d.tick(ms(10)));
        d.schedule(ms(300));
        assert!(!d.tick(ms(200)));
        assert!(d.is_pending());
        assert!(d.tick(ms(100)));
        assert!(!d.is_pending());
        assert!(!d.tick(ms(300)));
    }

    #[test]
    fn test_delay_cancel() {
        let mut d = Delay::default();
        d.schedule(ms(300));
        d.cancel();
        assert!(!d.tick(ms(300)));
    }
}
