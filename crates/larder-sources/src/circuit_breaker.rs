// ABOUTME: Circuit breaker guarding calls to a single food data source
// ABOUTME: Skips a failing source for a cool-down period instead of waiting on it every search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::errors::provider::ProviderError;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through, failures are counted
    Closed,
    /// Calls are rejected until the cool-down elapses
    Open,
    /// Probe calls run one at a time until enough succeed to close the circuit
    HalfOpen,
}

/// Thresholds for a circuit breaker
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive retryable failures that open the circuit
    pub failure_threshold: u32,
    /// How long an open circuit rejects calls before probing
    pub recovery_timeout: Duration,
    /// Successful probes needed to close the circuit again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 1,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a configuration with explicit thresholds
    #[must_use]
    pub const fn new(
        failure_threshold: u32,
        recovery_timeout: Duration,
        success_threshold: u32,
    ) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            success_threshold,
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    probe_successes: u32,
    opened_at: Option<Instant>,
    probe_started: Option<Instant>,
}

/// How a call was let through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Pass,
    Probe,
}

/// Re-opens the circuit if a probe is dropped before it reports back
struct ProbeGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.abandon_probe();
        }
    }
}

/// Per-source circuit breaker
///
/// Only retryable failures (network, timeout, 5xx, 429) count toward opening the
/// circuit; a malformed payload or a missing credential says nothing about availability.
#[derive(Debug)]
pub struct CircuitBreaker {
    source_name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Create a breaker with the default thresholds
    #[must_use]
    pub fn new(source_name: &str) -> Self {
        Self::with_config(source_name, CircuitBreakerConfig::default())
    }

    /// Create a breaker with custom thresholds
    #[must_use]
    pub fn with_config(source_name: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            source_name: source_name.to_owned(),
            config,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                probe_successes: 0,
                opened_at: None,
                probe_started: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Consecutive failures counted so far
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// Whether a call may proceed now; moves an expired open circuit to half-open
    ///
    /// While half-open, a call admitted here is the recovery probe and must be followed
    /// by [`Self::record_success`] or [`Self::record_failure`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.admit().is_some()
    }

    fn admit(&self) -> Option<Admission> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Some(Admission::Pass),
            CircuitState::HalfOpen => {
                // a probe that never reported back stops blocking after one cool-down
                let free = inner
                    .probe_started
                    .is_none_or(|at| at.elapsed() >= self.config.recovery_timeout);
                if free {
                    inner.probe_started = Some(Instant::now());
                    Some(Admission::Probe)
                } else {
                    None
                }
            }
            CircuitState::Open => {
                let expired = inner
                    .opened_at
                    .is_none_or(|at| at.elapsed() >= self.config.recovery_timeout);
                if !expired {
                    return None;
                }
                inner.state = CircuitState::HalfOpen;
                inner.probe_successes = 0;
                inner.probe_started = Some(Instant::now());
                info!(source = %self.source_name, "Circuit half-open, probing source");
                Some(Admission::Probe)
            }
        }
    }

    fn abandon_probe(&self) {
        let mut inner = self.lock();
        if inner.state == CircuitState::HalfOpen {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(Instant::now());
            inner.probe_started = None;
            warn!(source = %self.source_name, "Recovery probe cancelled, circuit re-opened");
        }
    }

    /// Record a successful call
    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.probe_started = None;
        match inner.state {
            CircuitState::Closed => inner.consecutive_failures = 0,
            CircuitState::HalfOpen => {
                inner.probe_successes += 1;
                if inner.probe_successes >= self.config.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    inner.opened_at = None;
                    info!(source = %self.source_name, "Circuit closed, source recovered");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a retryable failure
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.probe_started = None;
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.opened_at = Some(Instant::now());
                    warn!(
                        source = %self.source_name,
                        failures = inner.consecutive_failures,
                        cool_down_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit opened, source will be skipped"
                    );
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                warn!(source = %self.source_name, "Recovery probe failed, circuit re-opened");
            }
            CircuitState::Open => inner.opened_at = Some(Instant::now()),
        }
    }

    /// Seconds until an open circuit allows a probe, rounded up
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        let inner = self.lock();
        inner.opened_at.map_or(0, |at| {
            let remaining = self.config.recovery_timeout.saturating_sub(at.elapsed());
            remaining.as_millis().div_ceil(1000) as u64
        })
    }

    /// Run `operation` under the breaker
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::CircuitBreakerOpen` without running the operation when the
    /// circuit is open, otherwise the operation's own error.
    pub async fn call<F, T>(&self, operation: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let Some(admission) = self.admit() else {
            return Err(ProviderError::CircuitBreakerOpen {
                provider: self.source_name.clone(),
                retry_after_secs: self.retry_after_secs(),
            });
        };

        let mut guard = ProbeGuard {
            breaker: self,
            armed: admission == Admission::Probe,
        };
        let outcome = operation.await;
        guard.armed = false;

        match outcome {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => {
                if error.is_retryable() {
                    self.record_failure();
                } else if self.state() == CircuitState::HalfOpen {
                    // the source answered, so it is reachable again
                    self.record_success();
                }
                Err(error)
            }
        }
    }

    /// Force the breaker back to closed
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.probe_successes = 0;
        inner.opened_at = None;
        inner.probe_started = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_error() -> ProviderError {
        ProviderError::Network {
            provider: "usda".to_owned(),
            message: "connection refused".to_owned(),
        }
    }

    #[test]
    fn test_opens_after_threshold() {
        let breaker = CircuitBreaker::with_config(
            "usda",
            CircuitBreakerConfig::new(2, Duration::from_secs(60), 1),
        );
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.is_allowed());
    }

    #[test]
    fn test_zero_cool_down_moves_to_half_open() {
        let breaker =
            CircuitBreaker::with_config("usda", CircuitBreakerConfig::new(1, Duration::ZERO, 1));
        breaker.record_failure();
        assert!(breaker.is_allowed());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_open_circuit_short_circuits_call() {
        let breaker = CircuitBreaker::with_config(
            "nutritionix",
            CircuitBreakerConfig::new(1, Duration::from_secs(60), 1),
        );
        let first: Result<(), _> = breaker.call(async { Err(network_error()) }).await;
        assert!(first.is_err());

        let second = breaker.call(async { Ok::<_, ProviderError>(42) }).await;
        assert!(matches!(
            second,
            Err(ProviderError::CircuitBreakerOpen { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancelled_probe_does_not_lock_the_circuit() {
        let breaker =
            CircuitBreaker::with_config("usda", CircuitBreakerConfig::new(1, Duration::ZERO, 1));
        let failed: Result<(), _> = breaker.call(async { Err(network_error()) }).await;
        assert!(failed.is_err());

        let cancelled = tokio::time::timeout(
            Duration::from_millis(10),
            breaker.call(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ProviderError>(0)
            }),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(breaker.state(), CircuitState::Open);

        for _ in 0..5 {
            let value = breaker.call(async { Ok::<_, ProviderError>(7) }).await;
            assert_eq!(value.unwrap(), 7);
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_closes_after_success_threshold_probes() {
        let breaker =
            CircuitBreaker::with_config("usda", CircuitBreakerConfig::new(1, Duration::ZERO, 2));
        let failed: Result<(), _> = breaker.call(async { Err(network_error()) }).await;
        assert!(failed.is_err());

        assert_eq!(breaker.call(async { Ok::<_, ProviderError>(1) }).await.unwrap(), 1);
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        assert_eq!(breaker.call(async { Ok::<_, ProviderError>(2) }).await.unwrap(), 2);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn test_half_open_admits_one_probe_at_a_time() {
        let breaker = CircuitBreaker::with_config(
            "usda",
            CircuitBreakerConfig::new(1, Duration::from_millis(50), 1),
        );
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(60));
        assert!(breaker.is_allowed());
        assert!(!breaker.is_allowed());
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test]
    async fn test_parse_errors_do_not_trip() {
        let breaker = CircuitBreaker::with_config(
            "openFoodFacts",
            CircuitBreakerConfig::new(1, Duration::from_secs(60), 1),
        );
        let result: Result<(), _> = breaker
            .call(async { Err(ProviderError::parse("openFoodFacts", "bad json")) })
            .await;
        assert!(result.is_err());
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
