use std::time::Duration;

use foxhole_war_api::config::{DEFAULT_DYNAMIC_DATA_CACHE_SECS, DEFAULT_WAR_DATA_CACHE_SECS};
use foxhole_war_api::CacheConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CACHE_SWEEP_SECS: u64 = 300;
pub const DEFAULT_WAR_API_TIMEOUT_SECS: u64 = 10;

/// Integer from the environment, or `None` when unset or invalid.
fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Like [`env_u64`], but 0 also falls back to the default.
fn env_positive(name: &str) -> Option<u64> {
    env_u64(name).filter(|value| *value > 0)
}

pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Cache durations. 0 is accepted and means the data never expires.
pub fn cache_config() -> CacheConfig {
    CacheConfig {
        war_data_ttl: Duration::from_secs(
            env_u64("WAR_DATA_CACHE_SECS").unwrap_or(DEFAULT_WAR_DATA_CACHE_SECS),
        ),
        dynamic_data_ttl: Duration::from_secs(
            env_u64("DYNAMIC_DATA_CACHE_SECS").unwrap_or(DEFAULT_DYNAMIC_DATA_CACHE_SECS),
        ),
    }
}

pub fn cache_sweep_interval() -> Duration {
    Duration::from_secs(env_positive("CACHE_SWEEP_SECS").unwrap_or(DEFAULT_CACHE_SWEEP_SECS))
}

/// Per-request timeout of the HTTP client talking to the War API.
pub fn war_api_timeout() -> Duration {
    Duration::from_secs(
        env_positive("WAR_API_TIMEOUT_SECS").unwrap_or(DEFAULT_WAR_API_TIMEOUT_SECS),
    )
}
