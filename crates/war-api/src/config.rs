use std::time::Duration;

pub const DEFAULT_WAR_DATA_CACHE_SECS: u64 = 60;
pub const DEFAULT_DYNAMIC_DATA_CACHE_SECS: u64 = 30;

/// Expiry for the resources that expire at all. Static map data and map
/// names are cached for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub war_data_ttl: Duration,
    /// Dynamic map state and war reports.
    pub dynamic_data_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            war_data_ttl: Duration::from_secs(DEFAULT_WAR_DATA_CACHE_SECS),
            dynamic_data_ttl: Duration::from_secs(DEFAULT_DYNAMIC_DATA_CACHE_SECS),
        }
    }
}

/// Partial update for [`CacheConfig`]; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfigOverrides {
    pub war_data_ttl: Option<Duration>,
    pub dynamic_data_ttl: Option<Duration>,
}

impl CacheConfig {
    pub fn apply(&mut self, overrides: CacheConfigOverrides) {
        if let Some(ttl) = overrides.war_data_ttl {
            self.war_data_ttl = ttl;
        }
        if let Some(ttl) = overrides.dynamic_data_ttl {
            self.dynamic_data_ttl = ttl;
        }
    }
}
