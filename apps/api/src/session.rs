//! Free-tier request gating.
//!
//! The counter is plain explicit state: the gate is a method on
//! `SessionCounter`, and `SessionStore` is the only place that holds one.
//! Nothing ambient, nothing persisted — a session dies with the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

/// Per-session request counter. Lives for the duration of one session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCounter {
    count: u32,
    max: u32,
}

impl SessionCounter {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    /// Gate check and increment in one step.
    ///
    /// A caller-supplied API key bypasses the gate unconditionally and
    /// leaves the counter untouched. Otherwise the call is rejected at the
    /// cap with `RateLimitExceeded`, or the counter is incremented exactly
    /// once and the call proceeds.
    pub fn try_acquire(&mut self, has_own_key: bool) -> Result<GateOutcome, AppError> {
        if has_own_key {
            return Ok(GateOutcome::Bypassed);
        }
        if self.count >= self.max {
            return Err(AppError::RateLimitExceeded {
                used: self.count,
                max: self.max,
            });
        }
        self.count += 1;
        Ok(GateOutcome::Metered(FreeTierUsage {
            used: self.count,
            remaining: self.max - self.count,
        }))
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Outcome of a successful gate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Caller brought their own key; the meter was not consulted.
    Bypassed,
    /// A free-tier credit was consumed.
    Metered(FreeTierUsage),
}

impl GateOutcome {
    pub fn usage(&self) -> Option<FreeTierUsage> {
        match self {
            GateOutcome::Metered(usage) => Some(*usage),
            GateOutcome::Bypassed => None,
        }
    }
}

/// Usage snapshot returned to the caller after a metered call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeTierUsage {
    pub used: u32,
    pub remaining: u32,
}

/// In-memory store of per-session counters, keyed by a client-held UUID.
/// An unknown id starts a fresh counter — "new session" is just a new id.
#[derive(Clone)]
pub struct SessionStore {
    max_requests: u32,
    sessions: Arc<Mutex<HashMap<Uuid, SessionCounter>>>,
}

impl SessionStore {
    pub fn new(max_requests: u32) -> Self {
        Self {
            max_requests,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Runs the gate for `session_id`, creating the counter on first use.
    pub fn gate(&self, session_id: Uuid, has_own_key: bool) -> Result<GateOutcome, AppError> {
        let mut sessions = self.sessions.lock().expect("session store mutex poisoned");
        let counter = sessions
            .entry(session_id)
            .or_insert_with(|| SessionCounter::new(self.max_requests));
        counter.try_acquire(has_own_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_three_calls_pass_then_fourth_rejects() {
        let mut counter = SessionCounter::new(3);

        for expected in 1..=3 {
            let outcome = counter.try_acquire(false).unwrap();
            assert_eq!(
                outcome.usage().unwrap(),
                FreeTierUsage {
                    used: expected,
                    remaining: 3 - expected
                }
            );
        }
        assert_eq!(counter.count(), 3);

        let err = counter.try_acquire(false).unwrap_err();
        assert!(matches!(
            err,
            AppError::RateLimitExceeded { used: 3, max: 3 }
        ));
        // Rejection must not mutate the counter.
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn test_own_key_bypasses_gate_at_any_count() {
        let mut counter = SessionCounter::new(3);
        for _ in 0..3 {
            counter.try_acquire(false).unwrap();
        }
        // Over the cap, but a caller-supplied key still passes.
        let outcome = counter.try_acquire(true).unwrap();
        assert_eq!(outcome, GateOutcome::Bypassed);
        assert_eq!(outcome.usage(), None);
    }

    #[test]
    fn test_bypass_does_not_consume_credits() {
        let mut counter = SessionCounter::new(3);
        for _ in 0..5 {
            counter.try_acquire(true).unwrap();
        }
        assert_eq!(counter.count(), 0);
        // All three free credits are still available afterwards.
        for _ in 0..3 {
            counter.try_acquire(false).unwrap();
        }
        assert!(counter.try_acquire(false).is_err());
    }

    #[test]
    fn test_zero_max_rejects_immediately() {
        let mut counter = SessionCounter::new(0);
        assert!(counter.try_acquire(false).is_err());
        assert!(counter.try_acquire(true).is_ok());
    }

    #[test]
    fn test_store_isolates_sessions() {
        let store = SessionStore::new(1);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.gate(a, false).unwrap();
        assert!(store.gate(a, false).is_err());

        // Session b has its own counter.
        store.gate(b, false).unwrap();
    }
}
