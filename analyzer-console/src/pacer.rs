use std::thread;
use std::time::{Duration, Instant};

/// Fixed-interval frame clock. A frame that overruns its slot makes the
/// following ticks fall on the next free deadline instead of queuing up.
pub struct Pacer {
    next_deadline: Instant,
    frame: Duration,
    skipped: u64,
}

impl Pacer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            next_deadline: Instant::now(),
            frame: Duration::from_millis(interval_ms.max(1) as u64),
            skipped: 0,
        }
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Frames dropped so far because a tick ran late.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Sleeps until the current deadline and schedules the next one.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next_deadline {
            thread::sleep(self.next_deadline - now);
        }
        self.schedule(Instant::now());
    }

    fn schedule(&mut self, now: Instant) {
        self.next_deadline += self.frame;
        if now >= self.next_deadline {
            let behind = now - self.next_deadline;
            let missed = behind.as_micros() / self.frame.as_micros().max(1) + 1;
            self.skipped += missed as u64;
            self.next_deadline += self.frame * missed as u32;
        }
    }
}
