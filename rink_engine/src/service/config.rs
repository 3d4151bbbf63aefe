//! Engine configuration.

use std::env;

use crate::pairing::{DEFAULT_MAX_SEARCH_STEPS, PairingConfig};
use crate::standings::StandingsOptions;
use crate::store::RetryPolicy;
use crate::tournament::{DEFAULT_RINKS_PER_ZONE, DEFAULT_ZONES, ResourcePool, ValidationResult};

/// Settings shared by every service operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Rinks available to every round
    pub resource_pool: ResourcePool,

    /// Pairing search budget and seeding rules
    pub pairing: PairingConfig,

    /// Timeout and retry policy for store reads
    pub retry: RetryPolicy,

    /// Which matches the reported standings count
    pub standings: StandingsOptions,
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `RINK_ZONES`: green letters, e.g. `AB` (default: AB)
    /// - `RINK_RINKS_PER_ZONE`: rinks on each green (default: 6)
    /// - `RINK_MAX_PAIRING_STEPS`: strict-pass search budget (default: 200000)
    /// - `RINK_REQUIRE_VERIFIED`: count only verified matches (default: true)
    /// - plus the store variables read by [`RetryPolicy::from_env`]
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// * `ValidationError::EmptyResourcePool` - `RINK_ZONES` has no letters
    ///   or `RINK_RINKS_PER_ZONE` is zero
    pub fn from_env() -> ValidationResult<Self> {
        let zones: Vec<char> = env::var("RINK_ZONES")
            .map(|v| v.chars().filter(char::is_ascii_alphabetic).collect())
            .unwrap_or_else(|_| DEFAULT_ZONES.to_vec());
        let rinks_per_zone = env::var("RINK_RINKS_PER_ZONE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RINKS_PER_ZONE);

        let max_search_steps = env::var("RINK_MAX_PAIRING_STEPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_SEARCH_STEPS);
        let require_verified = env::var("RINK_REQUIRE_VERIFIED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        let standings = StandingsOptions { require_verified };
        Ok(Self {
            resource_pool: ResourcePool::new(zones, rinks_per_zone)?,
            pairing: PairingConfig {
                max_search_steps,
                seeding: standings,
            },
            retry: RetryPolicy::from_env(),
            standings,
        })
    }
}
