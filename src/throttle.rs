// src/throttle.rs
// =============================================================================
// A small request-rate throttle shared by concurrent tasks.
//
// `Throttle::new(20, 1s)` hands out one slot every 50ms. Each caller reserves
// the next free slot under a lock, releases the lock, and then sleeps until
// its slot arrives, so many tasks can wait at the same time.
// =============================================================================

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Allow at most `count` acquisitions per `period`
    pub fn new(count: u32, period: Duration) -> Self {
        Self {
            interval: period / count.max(1),
            next_slot: Mutex::new(None),
        }
    }

    /// Time between two consecutive slots
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next free slot
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };
        sleep_until(slot).await;
    }
}
