use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use foxhole_shared::models::Shard;
use serde::Serialize;

use crate::clock::Clock;

/// What a cache entry holds. Each kind always stores the same Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    WarData,
    MapNames,
    MapStatic,
    MapDynamic,
    MapReport,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::WarData => "war-data",
            ResourceKind::MapNames => "map-names",
            ResourceKind::MapStatic => "map-static",
            ResourceKind::MapDynamic => "map-dynamic",
            ResourceKind::MapReport => "map-report",
        }
    }
}

/// Identifies one logical request: resource kind, shard, and ordered extra
/// parameters (the map name for map-scoped requests).
///
/// Components stay structured so eviction can match on shard or kind exactly;
/// the rendered `kind:shard[:param...]` form is for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: ResourceKind,
    shard: Shard,
    params: Vec<String>,
    rendered: String,
}

impl CacheKey {
    pub fn new(kind: ResourceKind, shard: Shard, params: &[&str]) -> Self {
        let mut rendered = format!("{}:{}", kind.as_str(), shard.as_str());
        for param in params {
            rendered.push(':');
            rendered.push_str(param);
        }
        CacheKey {
            kind,
            shard,
            params: params.iter().map(|p| p.to_string()).collect(),
            rendered,
        }
    }

    pub fn for_shard(kind: ResourceKind, shard: Shard) -> Self {
        CacheKey::new(kind, shard, &[])
    }

    pub fn for_map(kind: ResourceKind, shard: Shard, map_name: &str) -> Self {
        CacheKey::new(kind, shard, &[map_name])
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn shard(&self) -> Shard {
        self.shard
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}

struct CacheEntry {
    data: Arc<dyn Any + Send + Sync>,
    timestamp: DateTime<Utc>,
    /// `None` never expires.
    expiry: Option<DateTime<Utc>>,
    approx_bytes: usize,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }
}

/// What gets measured for the size estimate: the entry as it would look
/// serialized to JSON.
#[derive(Serialize)]
struct EntryFootprint<'a, T> {
    key: &'a str,
    data: &'a T,
    timestamp: i64,
    expiry: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    /// Estimated from each entry's JSON serialization, not measured.
    pub approximate_bytes: usize,
    /// Fetches currently running. The cache alone always reports 0.
    pub in_flight_requests: usize,
}

impl CacheStats {
    pub fn memory_usage(&self) -> String {
        format!("{:.2} KB", self.approximate_bytes as f64 / 1024.0)
    }
}

/// Keyed store of fetched results with per-entry expiry.
///
/// Values are type-erased; callers read them back with the type their key's
/// [`ResourceKind`] stores. Expiry is enforced lazily on `get` and in bulk by
/// `sweep_expired`.
pub struct RequestCache {
    clock: Arc<dyn Clock>,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl RequestCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        RequestCache {
            clock,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Live data for `key`. An expired entry is removed and reported absent.
    pub fn get<T: Clone + 'static>(&mut self, key: &CacheKey) -> Option<T> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;
        if entry.is_expired(now) {
            tracing::debug!(key = %key, "cache entry expired");
            self.entries.remove(key);
            return None;
        }
        match entry.data.downcast_ref::<T>() {
            Some(data) => Some(data.clone()),
            None => {
                tracing::warn!(key = %key, "cache entry holds a different type than requested");
                None
            }
        }
    }

    /// Store `data`, replacing any previous entry. Without a `ttl`, or with a
    /// zero one, the entry never expires.
    pub fn set<T>(&mut self, key: CacheKey, data: T, ttl: Option<Duration>)
    where
        T: Serialize + Send + Sync + 'static,
    {
        let now = self.clock.now();
        // A ttl too large to represent is treated as no expiry.
        let expiry = ttl.filter(|ttl| !ttl.is_zero()).and_then(|ttl| {
            TimeDelta::from_std(ttl)
                .ok()
                .and_then(|delta| now.checked_add_signed(delta))
        });
        let footprint = EntryFootprint {
            key: key.as_str(),
            data: &data,
            timestamp: now.timestamp_millis(),
            expiry: expiry.map(|e| e.timestamp_millis()),
        };
        let approx_bytes = serde_json::to_vec(&footprint).map(|v| v.len()).unwrap_or(0);

        self.entries.insert(
            key,
            CacheEntry {
                data: Arc::new(data),
                timestamp: now,
                expiry,
                approx_bytes,
            },
        );
    }

    /// When the entry for `key` was written.
    #[cfg(test)]
    pub fn written_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|e| e.timestamp)
    }

    pub fn evict_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&CacheKey) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        before - self.entries.len()
    }

    pub fn clear_shard(&mut self, shard: Shard) -> usize {
        self.evict_where(|key| key.shard() == shard)
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Remove every expired entry. Never-expiring entries are untouched.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        CacheStats {
            total_entries: self.entries.len(),
            expired_entries: self.entries.values().filter(|e| e.is_expired(now)).count(),
            approximate_bytes: self.entries.values().map(|e| e.approx_bytes).sum(),
            in_flight_requests: 0,
        }
    }
}
