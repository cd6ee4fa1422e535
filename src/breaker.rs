//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for recipe-generation
//! API calls. When the completion endpoint fails repeatedly, the breaker
//! "opens" and callers fail fast instead of piling requests onto an
//! upstream that is already struggling.
//!
//! # State Machine
//!
//! - **Closed**: normal operation, requests pass through
//! - **Open**: failure threshold exceeded, requests fail fast
//! - After the reset timeout elapses, the next check closes the circuit
//!   and requests pass through again

use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::config::BreakerConfig;

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    last_failure_at: Option<Instant>,
}

/// Circuit breaker guarding the recipe-generation API.
///
/// Tracks consecutive failures; once `failure_threshold` is reached the
/// circuit opens for `reset_after_secs`. A recorded success closes it
/// immediately. Thread-safe; shared by reference between concurrent
/// request handlers.
///
/// # Examples
///
/// ```rust
/// use pantry_recipes::breaker::CircuitBreaker;
/// use pantry_recipes::config::BreakerConfig;
///
/// let breaker = CircuitBreaker::new(BreakerConfig::default());
/// assert!(!breaker.is_open());
/// ```
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: BreakerConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    /// Check whether the circuit is open (blocking requests).
    ///
    /// Returns `true` while the failure count has reached the threshold
    /// and the reset timeout has not yet elapsed. Once it elapses, the
    /// state resets and subsequent checks return `false`.
    pub fn is_open(&self) -> bool {
        let mut state = self.state.lock().unwrap();

        if state.consecutive_failures < self.config.failure_threshold {
            return false;
        }

        match state.last_failure_at {
            Some(last_failure) => {
                if last_failure.elapsed() < Duration::from_secs(self.config.reset_after_secs) {
                    true
                } else {
                    info!("Circuit breaker reset timeout elapsed, closing circuit");
                    *state = BreakerState::default();
                    false
                }
            }
            None => false,
        }
    }

    /// Record a failed generation call
    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap();
        state.consecutive_failures += 1;
        state.last_failure_at = Some(Instant::now());

        if state.consecutive_failures == self.config.failure_threshold {
            warn!(
                "Circuit breaker opened after {} consecutive failures",
                state.consecutive_failures
            );
        }
    }

    /// Record a successful generation call, closing the circuit
    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap();
        *state = BreakerState::default();
    }
}
