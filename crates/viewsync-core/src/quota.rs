//! Local request accounting shared by every caller of one client.
//!
//! Two independent limits: a rolling request window (N requests per D
//! seconds) and a daily quota counter. The check and the increment happen
//! under one lock so concurrent callers can never overshoot the window.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

const DAY: Duration = Duration::from_secs(86_400);

/// Limits enforced before any provider call is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    /// Requests allowed per rolling window.
    pub window_limit: u32,
    /// Length of the rolling window.
    pub window: Duration,
    /// Requests allowed per 24 hours.
    pub daily_limit: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            window_limit: 100,
            window: Duration::from_secs(100),
            daily_limit: 10_000,
        }
    }
}

/// Why a request slot was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDenial {
    /// Rolling window is full.
    RateLimited,
    /// Daily quota is spent, locally counted or reported by the provider.
    QuotaExhausted { retry_after: Duration },
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaSnapshot {
    pub window_count: u32,
    pub window_limit: u32,
    pub window_secs: u64,
    pub daily_used: u32,
    pub daily_limit: u32,
    /// Seconds left on a provider-reported exhaustion, if any.
    pub exhausted_for_secs: Option<u64>,
}

#[derive(Debug)]
struct QuotaState {
    request_count: u32,
    window_start: Instant,
    daily_used: u32,
    day_start: Instant,
    exhausted_until: Option<Instant>,
}

impl QuotaState {
    /// Reset counters whose window has elapsed.
    fn roll(&mut self, now: Instant, limits: &QuotaLimits) {
        if now.duration_since(self.window_start) >= limits.window {
            self.request_count = 0;
            self.window_start = now;
        }
        if now.duration_since(self.day_start) >= DAY {
            self.daily_used = 0;
            self.day_start = now;
        }
        if self.exhausted_until.is_some_and(|until| now >= until) {
            self.exhausted_until = None;
        }
    }
}

#[derive(Debug)]
pub struct QuotaTracker {
    limits: QuotaLimits,
    state: Mutex<QuotaState>,
}

impl QuotaTracker {
    pub fn new(limits: QuotaLimits) -> Self {
        let now = Instant::now();
        Self {
            limits,
            state: Mutex::new(QuotaState {
                request_count: 0,
                window_start: now,
                daily_used: 0,
                day_start: now,
                exhausted_until: None,
            }),
        }
    }

    pub fn limits(&self) -> QuotaLimits {
        self.limits
    }

    fn lock(&self) -> MutexGuard<'_, QuotaState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take one request slot. Every attempt, failed or not, consumes a slot.
    pub fn try_acquire(&self) -> Result<(), QuotaDenial> {
        let now = Instant::now();
        let mut state = self.lock();
        state.roll(now, &self.limits);

        if let Some(until) = state.exhausted_until {
            return Err(QuotaDenial::QuotaExhausted {
                retry_after: until.duration_since(now),
            });
        }
        if state.daily_used >= self.limits.daily_limit {
            return Err(QuotaDenial::QuotaExhausted {
                retry_after: DAY.saturating_sub(now.duration_since(state.day_start)),
            });
        }
        if state.request_count >= self.limits.window_limit {
            return Err(QuotaDenial::RateLimited);
        }

        state.request_count += 1;
        state.daily_used += 1;
        Ok(())
    }

    /// Record a provider-reported exhaustion; calls fail locally until it lapses.
    pub fn mark_exhausted(&self, retry_after: Duration) {
        let until = Instant::now() + retry_after;
        let mut state = self.lock();
        state.exhausted_until = Some(match state.exhausted_until {
            Some(existing) if existing > until => existing,
            _ => until,
        });
    }

    pub fn snapshot(&self) -> QuotaSnapshot {
        let now = Instant::now();
        let mut state = self.lock();
        state.roll(now, &self.limits);
        QuotaSnapshot {
            window_count: state.request_count,
            window_limit: self.limits.window_limit,
            window_secs: self.limits.window.as_secs(),
            daily_used: state.daily_used,
            daily_limit: self.limits.daily_limit,
            exhausted_for_secs: state
                .exhausted_until
                .map(|until| until.duration_since(now).as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(window_limit: u32, window_secs: u64, daily_limit: u32) -> QuotaLimits {
        QuotaLimits {
            window_limit,
            window: Duration::from_secs(window_secs),
            daily_limit,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn window_fills_then_resets() {
        let q = QuotaTracker::new(limits(3, 100, 1_000));
        for _ in 0..3 {
            q.try_acquire().unwrap();
        }
        assert_eq!(q.try_acquire(), Err(QuotaDenial::RateLimited));

        tokio::time::advance(Duration::from_secs(99)).await;
        assert_eq!(q.try_acquire(), Err(QuotaDenial::RateLimited));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(q.try_acquire().is_ok());
        assert_eq!(q.snapshot().window_count, 1);
        assert_eq!(q.snapshot().daily_used, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn daily_limit_exhausts() {
        let q = QuotaTracker::new(limits(10, 1, 2));
        q.try_acquire().unwrap();
        q.try_acquire().unwrap();
        assert!(matches!(
            q.try_acquire(),
            Err(QuotaDenial::QuotaExhausted { .. })
        ));

        tokio::time::advance(DAY).await;
        assert!(q.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn provider_exhaustion_blocks_until_lapsed() {
        let q = QuotaTracker::new(QuotaLimits::default());
        q.mark_exhausted(Duration::from_secs(60));
        match q.try_acquire() {
            Err(QuotaDenial::QuotaExhausted { retry_after }) => {
                assert_eq!(retry_after, Duration::from_secs(60))
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert_eq!(q.snapshot().exhausted_for_secs, Some(60));
        // Refused attempts do not consume budget.
        assert_eq!(q.snapshot().daily_used, 0);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(q.try_acquire().is_ok());
        assert_eq!(q.snapshot().exhausted_for_secs, None);
    }
}
