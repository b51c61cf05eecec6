// src/media/throttle.rs
//! Bounded call queue for rate-limited providers.
//!
//! Calls pass through a semaphore (concurrency 1 by default) and every call after
//! the first waits `DelayPolicy::delay_for(n)` before it starts. One queue is
//! owned per generation run, so no state leaks across runs.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::config::MediaConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPolicy {
    None,
    Fixed(Duration),
    Exponential { base: Duration, max: Duration },
}

impl DelayPolicy {
    /// Delay before the `n`-th call (0-based). The first call never waits.
    pub fn delay_for(&self, n: u32) -> Duration {
        if n == 0 {
            return Duration::ZERO;
        }
        match *self {
            DelayPolicy::None => Duration::ZERO,
            DelayPolicy::Fixed(d) => d,
            DelayPolicy::Exponential { base, max } => {
                let shift = (n - 1).min(16);
                base.saturating_mul(1u32 << shift).min(max)
            }
        }
    }

    pub fn from_config(cfg: &MediaConfig) -> Self {
        match cfg.backoff.as_str() {
            "none" => DelayPolicy::None,
            "exponential" => DelayPolicy::Exponential {
                base: cfg.query_delay(),
                max: Duration::from_millis(cfg.backoff_max_ms.max(cfg.query_delay_ms)),
            },
            _ => DelayPolicy::Fixed(cfg.query_delay()),
        }
    }
}

#[derive(Debug)]
pub struct CallQueue {
    permits: Semaphore,
    policy: DelayPolicy,
    issued: AtomicU32,
}

impl CallQueue {
    pub fn new(policy: DelayPolicy) -> Self {
        Self::with_concurrency(policy, 1)
    }

    pub fn with_concurrency(policy: DelayPolicy, concurrency: usize) -> Self {
        Self {
            permits: Semaphore::new(concurrency.max(1)),
            policy,
            issued: AtomicU32::new(0),
        }
    }

    pub fn policy(&self) -> DelayPolicy {
        self.policy
    }

    /// Number of calls started so far.
    pub fn issued(&self) -> u32 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Run `call` once a slot is free and the policy delay has elapsed.
    pub async fn run<F, Fut, T>(&self, call: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // Never closed; a failed acquire just runs the call unthrottled.
        let _permit = self.permits.acquire().await.ok();
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        let wait = self.policy.delay_for(n);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        call().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_doubles_and_caps() {
        let p = DelayPolicy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(500),
        };
        let got: Vec<u128> = (0..6).map(|n| p.delay_for(n).as_millis()).collect();
        assert_eq!(got, vec![0, 100, 200, 400, 500, 500]);
    }

    #[test]
    fn fixed_waits_after_first() {
        let p = DelayPolicy::Fixed(Duration::from_millis(500));
        assert_eq!(p.delay_for(0), Duration::ZERO);
        assert_eq!(p.delay_for(3), Duration::from_millis(500));
        assert_eq!(DelayPolicy::None.delay_for(7), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn queue_spaces_calls() {
        let q = CallQueue::new(DelayPolicy::Fixed(Duration::from_millis(500)));
        let t0 = tokio::time::Instant::now();
        for _ in 0..3 {
            q.run(|| async {}).await;
        }
        assert_eq!(q.issued(), 3);
        assert!(t0.elapsed() >= Duration::from_millis(1000));
    }
}
