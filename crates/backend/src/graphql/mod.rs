use std::sync::Arc;
use std::time::Duration;

use async_graphql::{Context, Enum, InputObject, Object, SimpleObject};
use foxhole_shared::{
    hexes::hex_display_name,
    models::{self, Shard, TeamId},
    structures::structure_friendly_name,
};
use foxhole_war_api::{CacheConfig, CacheConfigOverrides, CacheStats, FetchError, WarApi};

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlShard {
    Able,
    Baker,
    Charlie,
    Dev,
}

impl From<Shard> for GqlShard {
    fn from(s: Shard) -> Self {
        match s {
            Shard::Able => GqlShard::Able,
            Shard::Baker => GqlShard::Baker,
            Shard::Charlie => GqlShard::Charlie,
            Shard::Dev => GqlShard::Dev,
        }
    }
}

impl From<GqlShard> for Shard {
    fn from(s: GqlShard) -> Self {
        match s {
            GqlShard::Able => Shard::Able,
            GqlShard::Baker => Shard::Baker,
            GqlShard::Charlie => Shard::Charlie,
            GqlShard::Dev => Shard::Dev,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlTeam {
    #[graphql(name = "NONE")]
    Neutral,
    Wardens,
    Colonials,
    Unknown,
}

impl From<TeamId> for GqlTeam {
    fn from(t: TeamId) -> Self {
        match t {
            TeamId::None => GqlTeam::Neutral,
            TeamId::Wardens => GqlTeam::Wardens,
            TeamId::Colonials => GqlTeam::Colonials,
            TeamId::Unknown => GqlTeam::Unknown,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlWarData {
    pub war_id: String,
    pub war_number: u64,
    pub winner: GqlTeam,
    pub conquest_start_time: Option<i64>,
    pub conquest_end_time: Option<i64>,
    pub resistance_start_time: Option<i64>,
    pub required_victory_towns: i64,
}

impl From<models::WarData> for GqlWarData {
    fn from(w: models::WarData) -> Self {
        GqlWarData {
            war_id: w.war_id,
            war_number: w.war_number,
            winner: w.winner.into(),
            conquest_start_time: w.conquest_start_time,
            conquest_end_time: w.conquest_end_time,
            resistance_start_time: w.resistance_start_time,
            required_victory_towns: w.required_victory_towns,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlMapItem {
    pub team_id: GqlTeam,
    pub icon_type: u32,
    pub structure_name: String,
    pub x: f64,
    pub y: f64,
    pub flags: u32,
    pub is_victory_point: bool,
    pub is_scorched: bool,
}

#[derive(SimpleObject)]
pub struct GqlMapTextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub major: bool,
}

#[derive(SimpleObject)]
pub struct GqlWarMap {
    pub map_name: String,
    pub display_name: String,
    pub region_id: i64,
    pub scorched_victory_towns: i64,
    pub last_updated: i64,
    pub version: i64,
    pub map_items: Vec<GqlMapItem>,
    pub map_text_items: Vec<GqlMapTextItem>,
}

impl From<models::WarMapData> for GqlWarMap {
    fn from(m: models::WarMapData) -> Self {
        GqlWarMap {
            display_name: hex_display_name(&m.map_name).to_string(),
            region_id: m.region_id,
            scorched_victory_towns: m.scorched_victory_towns,
            last_updated: m.last_updated,
            version: m.version,
            map_items: m
                .map_items
                .into_iter()
                .map(|item| GqlMapItem {
                    team_id: item.team_id.into(),
                    icon_type: item.icon_type,
                    structure_name: structure_friendly_name(item.icon_type),
                    x: item.x,
                    y: item.y,
                    flags: item.flags,
                    is_victory_point: item.is_victory_point(),
                    is_scorched: item.is_scorched(),
                })
                .collect(),
            map_text_items: m
                .map_text_items
                .into_iter()
                .map(|t| GqlMapTextItem {
                    text: t.text,
                    x: t.x,
                    y: t.y,
                    major: t.map_marker_type == models::MapMarkerType::Major,
                })
                .collect(),
            map_name: m.map_name,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlWarReport {
    pub map_name: String,
    pub total_enlistments: u64,
    pub colonial_casualties: u64,
    pub warden_casualties: u64,
    pub day_of_war: u64,
}

impl From<models::WarMapReport> for GqlWarReport {
    fn from(r: models::WarMapReport) -> Self {
        GqlWarReport {
            map_name: r.map_name,
            total_enlistments: r.total_enlistments,
            colonial_casualties: r.colonial_casualties,
            warden_casualties: r.warden_casualties,
            day_of_war: r.day_of_war,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlVictoryPoints {
    pub warden: i64,
    pub colonial: i64,
    pub scorched: i64,
    /// Can be negative when more towns are scorched than the war requires.
    pub required: i64,
}

impl From<models::WarVictoryPointSummary> for GqlVictoryPoints {
    fn from(s: models::WarVictoryPointSummary) -> Self {
        GqlVictoryPoints {
            warden: s.warden,
            colonial: s.colonial,
            scorched: s.scorched,
            required: s.required,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCacheStats {
    pub total_entries: u64,
    pub expired_entries: u64,
    pub approximate_bytes: u64,
    pub memory_usage: String,
    pub in_flight_requests: u64,
}

impl From<CacheStats> for GqlCacheStats {
    fn from(s: CacheStats) -> Self {
        GqlCacheStats {
            total_entries: s.total_entries as u64,
            expired_entries: s.expired_entries as u64,
            approximate_bytes: s.approximate_bytes as u64,
            memory_usage: s.memory_usage(),
            in_flight_requests: s.in_flight_requests as u64,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCacheConfig {
    pub war_data_cache_secs: u64,
    pub dynamic_data_cache_secs: u64,
}

impl From<CacheConfig> for GqlCacheConfig {
    fn from(c: CacheConfig) -> Self {
        GqlCacheConfig {
            war_data_cache_secs: c.war_data_ttl.as_secs(),
            dynamic_data_cache_secs: c.dynamic_data_ttl.as_secs(),
        }
    }
}

// Input types

#[derive(InputObject)]
pub struct CacheConfigInput {
    pub war_data_cache_secs: Option<u64>,
    pub dynamic_data_cache_secs: Option<u64>,
}

fn fetch_error(e: FetchError) -> async_graphql::Error {
    async_graphql::Error::new(e.to_string())
}

fn shard_arg(shard: Option<GqlShard>) -> Option<Shard> {
    shard.map(Shard::from)
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn shards(&self) -> Vec<GqlShard> {
        Shard::ALL.into_iter().map(GqlShard::from).collect()
    }

    async fn current_war(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
    ) -> async_graphql::Result<Option<GqlWarData>> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let war = api.get_current_war_data(shard_arg(shard)).await;
        Ok(war.map(GqlWarData::from))
    }

    async fn map_names(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
    ) -> async_graphql::Result<Vec<String>> {
        let api = ctx.data::<Arc<WarApi>>()?;
        api.get_map_names(shard_arg(shard)).await.map_err(fetch_error)
    }

    async fn map_static_data(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
        map_name: String,
    ) -> async_graphql::Result<GqlWarMap> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let map = api
            .get_map_static_data(shard_arg(shard), &map_name)
            .await
            .map_err(fetch_error)?;
        Ok(map.into())
    }

    async fn map_dynamic_data(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
        map_name: String,
    ) -> async_graphql::Result<GqlWarMap> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let map = api
            .get_map_dynamic_data(shard_arg(shard), &map_name)
            .await
            .map_err(fetch_error)?;
        Ok(map.into())
    }

    async fn map_report(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
        map_name: String,
    ) -> async_graphql::Result<GqlWarReport> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let report = api
            .get_map_report(shard_arg(shard), &map_name)
            .await
            .map_err(fetch_error)?;
        Ok(report.into())
    }

    async fn all_map_static_data(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
    ) -> async_graphql::Result<Vec<GqlWarMap>> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let maps = api
            .get_all_map_static_data(shard_arg(shard))
            .await
            .map_err(fetch_error)?;
        Ok(maps.into_values().map(GqlWarMap::from).collect())
    }

    async fn all_map_dynamic_data(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
    ) -> async_graphql::Result<Vec<GqlWarMap>> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let maps = api
            .get_all_map_dynamic_data(shard_arg(shard))
            .await
            .map_err(fetch_error)?;
        Ok(maps.into_values().map(GqlWarMap::from).collect())
    }

    /// `null` when the shard has no current war.
    async fn victory_points(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
    ) -> async_graphql::Result<Option<GqlVictoryPoints>> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let summary = api
            .get_victory_point_counts(shard_arg(shard))
            .await
            .map_err(fetch_error)?;
        Ok(summary.map(GqlVictoryPoints::from))
    }

    async fn cache_stats(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlCacheStats> {
        let api = ctx.data::<Arc<WarApi>>()?;
        Ok(api.get_cache_stats().into())
    }

    async fn cache_config(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlCacheConfig> {
        let api = ctx.data::<Arc<WarApi>>()?;
        Ok(api.cache_config().into())
    }
}

// Mutation root

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn set_cache_config(
        &self,
        ctx: &Context<'_>,
        input: CacheConfigInput,
    ) -> async_graphql::Result<GqlCacheConfig> {
        let api = ctx.data::<Arc<WarApi>>()?;
        let config = api.set_cache_config(CacheConfigOverrides {
            war_data_ttl: input.war_data_cache_secs.map(Duration::from_secs),
            dynamic_data_ttl: input.dynamic_data_cache_secs.map(Duration::from_secs),
        });
        Ok(config.into())
    }

    async fn clear_cache(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        let api = ctx.data::<Arc<WarApi>>()?;
        api.clear_cache();
        Ok(true)
    }

    /// Returns the number of entries removed.
    async fn clear_cache_for_shard(
        &self,
        ctx: &Context<'_>,
        shard: GqlShard,
    ) -> async_graphql::Result<u64> {
        let api = ctx.data::<Arc<WarApi>>()?;
        Ok(api.clear_cache_for_shard(shard.into()) as u64)
    }

    async fn refresh_dynamic_data(
        &self,
        ctx: &Context<'_>,
        shard: Option<GqlShard>,
    ) -> async_graphql::Result<u64> {
        let api = ctx.data::<Arc<WarApi>>()?;
        Ok(api.refresh_dynamic_data(shard_arg(shard)) as u64)
    }

    async fn cleanup_expired_entries(&self, ctx: &Context<'_>) -> async_graphql::Result<u64> {
        let api = ctx.data::<Arc<WarApi>>()?;
        Ok(api.cleanup_expired_entries() as u64)
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(api: Arc<WarApi>) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(api)
        .finish()
}
