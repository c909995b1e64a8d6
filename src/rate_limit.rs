//! Client-wide request rate limiting.
//!
//! A token bucket holding `capacity` tokens in which every spent token is
//! returned exactly one `period` after it was spent. Consequently no more than
//! `capacity` permits are granted within any sliding window of length
//! `period`, bursts included.
//!
//! Waiting is an async sleep until the oldest token comes back; the caller
//! can abandon the wait at any point by dropping the future, which is how the
//! client applies cancellation.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

#[derive(Debug)]
struct Bucket {
    capacity: usize,
    period: Duration,
    /// When each currently spent token was taken, oldest first.
    spent: VecDeque<Instant>,
}

impl Bucket {
    fn new(capacity: u32, period: Duration) -> Self {
        let capacity = capacity.max(1) as usize;
        Self {
            capacity,
            period,
            spent: VecDeque::with_capacity(capacity),
        }
    }

    /// Return tokens whose period has elapsed.
    fn refill(&mut self, now: Instant) {
        while let Some(&taken) = self.spent.front() {
            if taken + self.period <= now {
                self.spent.pop_front();
            } else {
                break;
            }
        }
    }

    /// Take a token, or report when the next one comes back.
    fn try_take(&mut self, now: Instant) -> Result<(), Instant> {
        self.refill(now);
        if self.spent.len() < self.capacity {
            self.spent.push_back(now);
            return Ok(());
        }
        match self.spent.front() {
            Some(&oldest) => Err(oldest + self.period),
            None => Ok(()),
        }
    }

    fn available(&mut self, now: Instant) -> usize {
        self.refill(now);
        self.capacity - self.spent.len()
    }
}

/// Token-bucket rate limiter shared by all clones of a client.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<Bucket>>,
    rate: u32,
}

impl RateLimiter {
    /// `rate` requests per second. A rate of zero is treated as one.
    pub fn per_second(rate: u32) -> Self {
        Self::new(rate, Duration::from_secs(1))
    }

    /// `capacity` requests per `period`.
    pub fn new(capacity: u32, period: Duration) -> Self {
        Self {
            bucket: Arc::new(Mutex::new(Bucket::new(capacity, period))),
            rate: capacity.max(1),
        }
    }

    /// Configured number of requests per period.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Wait until a request may be made.
    pub async fn wait(&self) {
        loop {
            let ready_at = {
                let mut bucket = self.bucket.lock().await;
                match bucket.try_take(Instant::now()) {
                    Ok(()) => return,
                    Err(ready_at) => ready_at,
                }
            };
            sleep_until(ready_at).await;
        }
    }

    /// Take a permit without waiting.
    ///
    /// Returns `false` if the request would exceed the rate.
    pub async fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        bucket.try_take(Instant::now()).is_ok()
    }

    /// Number of permits that can be taken right now.
    pub async fn available(&self) -> usize {
        let mut bucket = self.bucket.lock().await;
        bucket.available(Instant::now())
    }
}
