//! Runtime Configuration
//!
//! Values come from the environment (optionally seeded from `.env`) and can
//! be overridden by CLI flags in the binary.

use std::time::Duration;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Simulated round-trip latency applied to every gateway call
pub const GATEWAY_DELAY_MS_DEFAULT: u64 = 500;

/// Upper bound on the simulated latency
pub const GATEWAY_DELAY_MS_MAX: u64 = 60_000;

/// Environment variable overriding the simulated latency
pub const GATEWAY_DELAY_ENV: &str = "USERDESK_DELAY_MS";

/// Default HTTP bind address
pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:8285";

// =============================================================================
// Gateway Config
// =============================================================================

/// Settings for [`UserGateway`](crate::gateway::UserGateway).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Delay before each store call
    pub delay: Duration,
}

impl GatewayConfig {
    /// Config with the given delay in milliseconds.
    pub fn with_delay_ms(delay_ms: u64) -> Result<Self, ConfigError> {
        if delay_ms > GATEWAY_DELAY_MS_MAX {
            return Err(ConfigError::DelayTooLong {
                delay_ms,
                max: GATEWAY_DELAY_MS_MAX,
            });
        }
        Ok(Self {
            delay: Duration::from_millis(delay_ms),
        })
    }

    /// No simulated latency.
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Read [`GATEWAY_DELAY_ENV`], falling back to the default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(GATEWAY_DELAY_ENV) {
            Ok(raw) => Self::parse_delay(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    fn parse_delay(raw: &str) -> Result<Self, ConfigError> {
        let delay_ms = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDelay(raw.to_string()))?;
        Self::with_delay_ms(delay_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(GATEWAY_DELAY_MS_DEFAULT),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid delay '{0}': expected milliseconds as a non-negative integer")]
    InvalidDelay(String),

    #[error("delay {delay_ms}ms exceeds max {max}ms")]
    DelayTooLong { delay_ms: u64, max: u64 },
}
