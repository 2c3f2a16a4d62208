// ABOUTME: Error type for failures reaching external food data providers
// ABOUTME: Classifies network, HTTP, parse and configuration failures with retry hints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Failure while talking to an external food data provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider answered with a non-success HTTP status
    #[error("{provider} API error (HTTP {status}): {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Request never produced a response
    #[error("{provider} network error: {message}")]
    Network {
        /// Provider name
        provider: String,
        /// Underlying transport message
        message: String,
    },

    /// Request exceeded its time budget
    #[error("{provider} request timed out after {timeout_ms} ms")]
    Timeout {
        /// Provider name
        provider: String,
        /// Budget that was exceeded
        timeout_ms: u64,
    },

    /// Payload could not be decoded into the expected shape
    #[error("{provider} returned a malformed payload: {message}")]
    Parse {
        /// Provider name
        provider: String,
        /// Decoder message
        message: String,
    },

    /// Provider has no credentials configured
    #[error("{provider} is not configured")]
    NotConfigured {
        /// Provider name
        provider: String,
    },

    /// Provider rejected the request because of quota
    #[error("{provider} rate limit exceeded")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
    },

    /// Circuit breaker is open for this provider
    #[error("{provider} circuit breaker open, retry in {retry_after_secs}s")]
    CircuitBreakerOpen {
        /// Provider name
        provider: String,
        /// Seconds until the breaker allows a recovery probe
        retry_after_secs: u64,
    },
}

impl ProviderError {
    /// Whether the failure is transient and should count against the circuit breaker
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { status, .. } => *status >= 500 || *status == 429,
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimitExceeded { .. } => true,
            Self::Parse { .. } | Self::NotConfigured { .. } | Self::CircuitBreakerOpen { .. } => {
                false
            }
        }
    }

    /// Whether the failure is an expected configuration gap rather than a real error
    #[must_use]
    pub const fn is_configuration_gap(&self) -> bool {
        matches!(self, Self::NotConfigured { .. })
    }

    /// Build an error from an HTTP status and body
    pub fn from_status(provider: &str, status: u16, message: impl Into<String>) -> Self {
        if status == 429 {
            return Self::RateLimitExceeded {
                provider: provider.to_owned(),
            };
        }
        Self::ApiError {
            provider: provider.to_owned(),
            status,
            message: message.into(),
        }
    }

    /// Build a parse error
    pub fn parse(provider: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            provider: provider.to_owned(),
            message: message.into(),
        }
    }

    /// Convert a transport error into a provider error for the named provider
    #[cfg(feature = "provider-errors")]
    #[must_use]
    pub fn from_reqwest(provider: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout {
                provider: provider.to_owned(),
                timeout_ms: 0,
            };
        }
        if error.is_decode() {
            return Self::parse(provider, error.to_string());
        }
        if let Some(status) = error.status() {
            return Self::from_status(provider, status.as_u16(), error.to_string());
        }
        Self::Network {
            provider: provider.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
