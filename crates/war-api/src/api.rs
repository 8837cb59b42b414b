use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use foxhole_shared::models::{Shard, WarData, WarMapData, WarMapReport, WarVictoryPointSummary};
use foxhole_shared::victory::victory_point_summary;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CacheStats, ResourceKind};
use crate::clock::{Clock, SystemClock};
use crate::config::{CacheConfig, CacheConfigOverrides};
use crate::error::{FetchError, FetchResult};
use crate::fetch::CachedFetcher;
use crate::shard::ShardRouter;
use crate::transport::Transport;

async fn fetch_json<T: DeserializeOwned>(
    transport: Arc<dyn Transport>,
    url: String,
) -> FetchResult<T> {
    let value = transport.get_json(&url).await?;
    serde_json::from_value(value).map_err(|e| FetchError::Decode {
        url,
        message: e.to_string(),
    })
}

/// Cached, deduplicated access to the War API of every shard.
///
/// Construct one per process and share it; the cache lives and dies with it.
pub struct WarApi {
    router: ShardRouter,
    transport: Arc<dyn Transport>,
    fetcher: CachedFetcher,
    config: RwLock<CacheConfig>,
}

impl WarApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        WarApi {
            router: ShardRouter::default(),
            transport,
            fetcher: CachedFetcher::new(Arc::new(SystemClock)),
            config: RwLock::new(CacheConfig::default()),
        }
    }

    pub fn with_router(mut self, router: ShardRouter) -> Self {
        self.router = router;
        self
    }

    /// Replaces the cache, so call this before the first fetch.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.fetcher = CachedFetcher::new(clock);
        self
    }

    pub fn with_cache_config(self, config: CacheConfig) -> Self {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        self
    }

    pub fn router(&self) -> &ShardRouter {
        &self.router
    }

    pub fn cache_config(&self) -> CacheConfig {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current war metadata, or `None` when the shard has no war to report.
    /// A failed request also reads as `None`, and that answer is cached for
    /// the war-data duration like a real one.
    pub async fn get_current_war_data(&self, shard: Option<Shard>) -> Option<WarData> {
        let shard = shard.unwrap_or_default();
        let key = CacheKey::for_shard(ResourceKind::WarData, shard);
        let url = self.router.war_url(Some(shard));
        let transport = Arc::clone(&self.transport);
        let ttl = self.cache_config().war_data_ttl;

        let result = self
            .fetcher
            .get_or_fetch(key, Some(ttl), move || async move {
                match fetch_json::<WarData>(transport, url).await {
                    Ok(war) => Ok(Some(war)),
                    Err(e) => {
                        warn!(%shard, error = %e, "No current war data");
                        Ok(None)
                    }
                }
            })
            .await;

        result.unwrap_or_else(|e| {
            warn!(%shard, error = %e, "No current war data");
            None
        })
    }

    pub async fn get_map_names(&self, shard: Option<Shard>) -> FetchResult<Vec<String>> {
        let shard = shard.unwrap_or_default();
        let key = CacheKey::for_shard(ResourceKind::MapNames, shard);
        let url = self.router.maps_url(Some(shard));
        let transport = Arc::clone(&self.transport);

        self.fetcher
            .get_or_fetch(key, None, move || fetch_json::<Vec<String>>(transport, url))
            .await
    }

    /// Structure layout of a map. Never expires: it does not change for the
    /// life of a war.
    pub async fn get_map_static_data(
        &self,
        shard: Option<Shard>,
        map_name: &str,
    ) -> FetchResult<WarMapData> {
        self.fetch_map_data(shard, map_name, ResourceKind::MapStatic).await
    }

    pub async fn get_map_dynamic_data(
        &self,
        shard: Option<Shard>,
        map_name: &str,
    ) -> FetchResult<WarMapData> {
        self.fetch_map_data(shard, map_name, ResourceKind::MapDynamic).await
    }

    async fn fetch_map_data(
        &self,
        shard: Option<Shard>,
        map_name: &str,
        kind: ResourceKind,
    ) -> FetchResult<WarMapData> {
        let shard = shard.unwrap_or_default();
        let key = CacheKey::for_map(kind, shard, map_name);
        let (url, ttl) = match kind {
            ResourceKind::MapDynamic => (
                self.router.map_dynamic_url(Some(shard), map_name),
                Some(self.cache_config().dynamic_data_ttl),
            ),
            _ => (self.router.map_static_url(Some(shard), map_name), None),
        };
        let transport = Arc::clone(&self.transport);
        let map_name = map_name.to_string();

        self.fetcher
            .get_or_fetch(key, ttl, move || async move {
                let mut data = fetch_json::<WarMapData>(transport, url).await?;
                data.map_name = map_name;
                Ok(data)
            })
            .await
    }

    /// Enlistment and casualty counts for one map.
    pub async fn get_map_report(
        &self,
        shard: Option<Shard>,
        map_name: &str,
    ) -> FetchResult<WarMapReport> {
        let shard = shard.unwrap_or_default();
        let key = CacheKey::for_map(ResourceKind::MapReport, shard, map_name);
        let url = self.router.war_report_url(Some(shard), map_name);
        let ttl = self.cache_config().dynamic_data_ttl;
        let transport = Arc::clone(&self.transport);
        let map_name = map_name.to_string();

        self.fetcher
            .get_or_fetch(key, Some(ttl), move || async move {
                let mut report = fetch_json::<WarMapReport>(transport, url).await?;
                report.map_name = map_name;
                Ok(report)
            })
            .await
    }

    pub async fn get_all_map_static_data(
        &self,
        shard: Option<Shard>,
    ) -> FetchResult<BTreeMap<String, WarMapData>> {
        self.fetch_all_maps(shard, ResourceKind::MapStatic).await
    }

    pub async fn get_all_map_dynamic_data(
        &self,
        shard: Option<Shard>,
    ) -> FetchResult<BTreeMap<String, WarMapData>> {
        self.fetch_all_maps(shard, ResourceKind::MapDynamic).await
    }

    /// Fan out one fetch per map. Any failing map fails the whole call.
    async fn fetch_all_maps(
        &self,
        shard: Option<Shard>,
        kind: ResourceKind,
    ) -> FetchResult<BTreeMap<String, WarMapData>> {
        let names = self.get_map_names(shard).await?;
        let maps = try_join_all(
            names
                .iter()
                .map(|name| self.fetch_map_data(shard, name, kind)),
        )
        .await?;
        Ok(names.into_iter().zip(maps).collect())
    }

    /// Victory towns held by each side across the whole war. `None` when the
    /// shard has no current war, whatever the map data says.
    pub async fn get_victory_point_counts(
        &self,
        shard: Option<Shard>,
    ) -> FetchResult<Option<WarVictoryPointSummary>> {
        let (war, maps) = futures::join!(
            self.get_current_war_data(shard),
            self.get_all_map_dynamic_data(shard)
        );
        let Some(war) = war else {
            return Ok(None);
        };
        let maps = maps?;
        Ok(Some(victory_point_summary(
            war.required_victory_towns,
            maps.values(),
        )))
    }

    pub fn set_cache_config(&self, overrides: CacheConfigOverrides) -> CacheConfig {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.apply(overrides);
        info!(
            war_data_secs = config.war_data_ttl.as_secs(),
            dynamic_data_secs = config.dynamic_data_ttl.as_secs(),
            "Cache config updated"
        );
        *config
    }

    /// Empty the cache and forget in-flight requests.
    pub fn clear_cache(&self) {
        self.fetcher.clear_all();
        info!("Cache cleared");
    }

    pub fn clear_cache_for_shard(&self, shard: Shard) -> usize {
        let removed = self.fetcher.clear_shard(shard);
        debug!(%shard, removed, "Cleared shard cache");
        removed
    }

    /// Force the next read of every dynamic map on `shard` to hit the network.
    pub fn refresh_dynamic_data(&self, shard: Option<Shard>) -> usize {
        let shard = shard.unwrap_or_default();
        let removed = self
            .fetcher
            .evict_where(|key| key.kind() == ResourceKind::MapDynamic && key.shard() == shard);
        debug!(%shard, removed, "Evicted dynamic map data");
        removed
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        self.fetcher.stats()
    }

    pub fn cleanup_expired_entries(&self) -> usize {
        self.fetcher.sweep_expired()
    }
}
