//! Rate limiting configuration for the login endpoint.
//!
//! - `RATE_LIMIT_ENABLED`: `false` disables limiting (default: true)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: replenished requests per second (default: 5)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: bucket size (default: 10)
//!
//! The limiter is a token bucket keyed by peer IP address: tokens are added at
//! `auth_per_second`, each attempt consumes one, and at most
//! `auth_burst_size` can accumulate.

use std::num::NonZeroU32;

use governor::Quota;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub auth_per_second: u32,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 5,
            auth_burst_size: 10,
        }
    }
}

impl RateLimitConfig {
    /// Falls back to the defaults for unset or unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            auth_per_second: crate::parsed_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: crate::parsed_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// Disabled configuration, used by tests that drive the router without a peer address.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Quota for authentication attempts, `None` when limiting is disabled.
    ///
    /// Zero values are raised to one.
    #[must_use]
    pub fn auth_quota(&self) -> Option<Quota> {
        if !self.enabled {
            return None;
        }
        let per_second = NonZeroU32::new(self.auth_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.auth_burst_size).unwrap_or(NonZeroU32::MIN);
        Some(Quota::per_second(per_second).allow_burst(burst))
    }
}
