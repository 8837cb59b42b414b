use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use foxhole_shared::models::{Shard, WarVictoryPointSummary};
use foxhole_war_api::{
    CacheConfigOverrides, FetchError, FetchResult, ManualClock, ShardRouter, Transport, WarApi,
};
use futures::future::{BoxFuture, FutureExt};
use serde_json::{json, Value};

const ABLE: &str = "http://able.test/api";
const BAKER: &str = "http://baker.test/api";

/// Canned responses per URL, counting how often each URL is requested.
#[derive(Default)]
struct StubTransport {
    responses: Mutex<HashMap<String, Result<Value, FetchError>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubTransport {
    fn respond(&self, url: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body));
    }

    fn fail(&self, url: &str) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            }),
        );
    }

    fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl Transport for StubTransport {
    fn get_json(&self, url: &str) -> BoxFuture<'static, FetchResult<Value>> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            });
        futures::future::ready(response).boxed()
    }
}

struct Harness {
    stub: Arc<StubTransport>,
    clock: Arc<ManualClock>,
    api: WarApi,
}

fn harness() -> Harness {
    let stub = Arc::new(StubTransport::default());
    let clock = Arc::new(ManualClock::default());
    let router = ShardRouter::default()
        .with_base_url(Shard::Able, ABLE)
        .with_base_url(Shard::Baker, BAKER);
    let api = WarApi::new(stub.clone())
        .with_router(router)
        .with_clock(clock.clone());
    Harness { stub, clock, api }
}

fn war(required_victory_towns: i64) -> Value {
    json!({
        "warId": "war-1",
        "warNumber": 117,
        "winner": "NONE",
        "conquestStartTime": 1_700_000_000_000i64,
        "conquestEndTime": null,
        "resistanceStartTime": null,
        "requiredVictoryTowns": required_victory_towns
    })
}

fn map_with_town(team: &str, flags: u32) -> Value {
    json!({
        "regionId": 3,
        "scorchedVictoryTowns": 0,
        "mapItems": [{"teamId": team, "iconType": 56, "x": 0.5, "y": 0.5, "flags": flags}],
        "mapTextItems": [],
        "lastUpdated": 1,
        "version": 2
    })
}

/// Two maps: A holds a Warden victory town, B a scorched one.
fn seed_war(stub: &StubTransport, base: &str) {
    stub.respond(&format!("{base}/worldconquest/war"), war(5));
    stub.respond(&format!("{base}/worldconquest/maps"), json!(["MapAHex", "MapBHex"]));
    stub.respond(
        &format!("{base}/worldconquest/maps/MapAHex/dynamic/public"),
        map_with_town("WARDENS", 0x01),
    );
    stub.respond(
        &format!("{base}/worldconquest/maps/MapBHex/dynamic/public"),
        map_with_town("COLONIALS", 0x11),
    );
    stub.respond(
        &format!("{base}/worldconquest/maps/MapAHex/static"),
        map_with_town("NONE", 0x01),
    );
    stub.respond(
        &format!("{base}/worldconquest/maps/MapBHex/static"),
        map_with_town("NONE", 0x01),
    );
}

#[tokio::test]
async fn test_victory_point_scenario() {
    let h = harness();
    seed_war(&h.stub, ABLE);

    let summary = h.api.get_victory_point_counts(None).await.unwrap();
    assert_eq!(
        summary,
        Some(WarVictoryPointSummary {
            warden: 1,
            colonial: 0,
            scorched: 1,
            required: 4,
        })
    );
}

#[tokio::test]
async fn test_victory_points_warm_cache_issues_no_fetches() {
    let h = harness();
    seed_war(&h.stub, ABLE);

    let first = h.api.get_victory_point_counts(None).await.unwrap();
    let calls_after_first = h.stub.total_calls();
    let second = h.api.get_victory_point_counts(None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.stub.total_calls(), calls_after_first);
    assert_eq!(calls_after_first, 4);
}

#[tokio::test]
async fn test_victory_points_absent_without_war() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    h.api.get_all_map_dynamic_data(None).await.unwrap();
    h.stub.fail(&format!("{ABLE}/worldconquest/war"));

    assert_eq!(h.api.get_current_war_data(None).await, None);
    assert_eq!(h.api.get_victory_point_counts(None).await, Ok(None));
}

#[tokio::test]
async fn test_victory_points_fail_when_a_map_fails() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    h.stub.fail(&format!("{ABLE}/worldconquest/maps/MapBHex/dynamic/public"));

    let result = h.api.get_victory_point_counts(None).await;
    assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_concurrent_requests_share_one_fetch() {
    let h = harness();
    seed_war(&h.stub, ABLE);

    let (a, b, c) = tokio::join!(
        h.api.get_map_names(None),
        h.api.get_map_names(Some(Shard::Able)),
        h.api.get_map_names(None),
    );
    assert_eq!(a.unwrap(), vec!["MapAHex", "MapBHex"]);
    assert_eq!(b.unwrap(), vec!["MapAHex", "MapBHex"]);
    assert_eq!(c.unwrap(), vec!["MapAHex", "MapBHex"]);
    assert_eq!(h.stub.calls(&format!("{ABLE}/worldconquest/maps")), 1);
}

#[tokio::test]
async fn test_concurrent_aggregates_fetch_each_map_once() {
    let h = harness();
    seed_war(&h.stub, ABLE);

    let (a, b) = tokio::join!(
        h.api.get_all_map_dynamic_data(None),
        h.api.get_all_map_dynamic_data(None),
    );
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(
        h.stub.calls(&format!("{ABLE}/worldconquest/maps/MapAHex/dynamic/public")),
        1
    );
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let h = harness();
    let url = format!("{ABLE}/worldconquest/maps");
    h.stub.fail(&url);

    assert!(h.api.get_map_names(None).await.is_err());
    assert!(h.api.get_map_names(None).await.is_err());
    assert_eq!(h.stub.calls(&url), 2);

    h.stub.respond(&url, json!(["MapAHex"]));
    assert_eq!(h.api.get_map_names(None).await.unwrap(), vec!["MapAHex"]);
    assert_eq!(h.stub.calls(&url), 3);
}

#[tokio::test]
async fn test_absent_war_is_cached_for_war_data_duration() {
    let h = harness();
    let url = format!("{ABLE}/worldconquest/war");
    h.stub.fail(&url);

    assert_eq!(h.api.get_current_war_data(None).await, None);
    h.stub.respond(&url, war(5));
    assert_eq!(h.api.get_current_war_data(None).await, None);
    assert_eq!(h.stub.calls(&url), 1);

    h.clock.advance(Duration::from_secs(60));
    let war = h.api.get_current_war_data(None).await.unwrap();
    assert_eq!(war.required_victory_towns, 5);
    assert_eq!(h.stub.calls(&url), 2);
}

#[tokio::test]
async fn test_dynamic_data_expires_but_static_does_not() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    let dynamic_url = format!("{ABLE}/worldconquest/maps/MapAHex/dynamic/public");
    let static_url = format!("{ABLE}/worldconquest/maps/MapAHex/static");

    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    h.api.get_map_static_data(None, "MapAHex").await.unwrap();

    h.clock.advance(Duration::from_secs(29));
    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    assert_eq!(h.stub.calls(&dynamic_url), 1);

    h.clock.advance(Duration::from_secs(24 * 3600));
    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    h.api.get_map_static_data(None, "MapAHex").await.unwrap();
    assert_eq!(h.stub.calls(&dynamic_url), 2);
    assert_eq!(h.stub.calls(&static_url), 1);
}

#[tokio::test]
async fn test_map_payloads_carry_their_map_name() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    h.stub.respond(
        &format!("{ABLE}/worldconquest/warreport/MapAHex"),
        json!({
            "totalEnlistments": 10,
            "colonialCasualties": 3,
            "wardenCasualties": 4,
            "dayOfWar": 12
        }),
    );

    let dynamic = h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    let statics = h.api.get_all_map_static_data(None).await.unwrap();
    let report = h.api.get_map_report(None, "MapAHex").await.unwrap();

    assert_eq!(dynamic.map_name, "MapAHex");
    assert_eq!(statics["MapBHex"].map_name, "MapBHex");
    assert_eq!(report.map_name, "MapAHex");
    assert_eq!(report.day_of_war, 12);
}

#[tokio::test]
async fn test_shards_are_cached_independently() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    seed_war(&h.stub, BAKER);

    h.api.get_map_names(Some(Shard::Able)).await.unwrap();
    h.api.get_map_names(Some(Shard::Baker)).await.unwrap();
    assert_eq!(h.stub.calls(&format!("{ABLE}/worldconquest/maps")), 1);
    assert_eq!(h.stub.calls(&format!("{BAKER}/worldconquest/maps")), 1);

    assert_eq!(h.api.clear_cache_for_shard(Shard::Baker), 1);
    h.api.get_map_names(Some(Shard::Able)).await.unwrap();
    h.api.get_map_names(Some(Shard::Baker)).await.unwrap();
    assert_eq!(h.stub.calls(&format!("{ABLE}/worldconquest/maps")), 1);
    assert_eq!(h.stub.calls(&format!("{BAKER}/worldconquest/maps")), 2);
}

#[tokio::test]
async fn test_refresh_dynamic_data_only_evicts_dynamic_maps_of_shard() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    seed_war(&h.stub, BAKER);
    h.api.get_all_map_dynamic_data(Some(Shard::Able)).await.unwrap();
    h.api.get_all_map_static_data(Some(Shard::Able)).await.unwrap();
    h.api.get_all_map_dynamic_data(Some(Shard::Baker)).await.unwrap();
    let before = h.stub.total_calls();

    assert_eq!(h.api.refresh_dynamic_data(None), 2);

    h.api.get_all_map_dynamic_data(Some(Shard::Able)).await.unwrap();
    h.api.get_all_map_static_data(Some(Shard::Able)).await.unwrap();
    h.api.get_all_map_dynamic_data(Some(Shard::Baker)).await.unwrap();
    assert_eq!(h.stub.total_calls(), before + 2);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    h.api.get_current_war_data(None).await.unwrap();
    h.api.clear_cache();
    assert_eq!(h.api.get_cache_stats().total_entries, 0);

    h.api.get_current_war_data(None).await.unwrap();
    assert_eq!(h.stub.calls(&format!("{ABLE}/worldconquest/war")), 2);
}

#[tokio::test]
async fn test_cache_config_override_applies_to_next_fetch() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    let url = format!("{ABLE}/worldconquest/maps/MapAHex/dynamic/public");

    let config = h.api.set_cache_config(CacheConfigOverrides {
        dynamic_data_ttl: Some(Duration::from_secs(5)),
        ..Default::default()
    });
    assert_eq!(config.dynamic_data_ttl, Duration::from_secs(5));
    assert_eq!(config.war_data_ttl, Duration::from_secs(60));

    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    h.clock.advance(Duration::from_secs(6));
    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    assert_eq!(h.stub.calls(&url), 2);
}

#[tokio::test]
async fn test_zero_dynamic_duration_caches_forever() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    let url = format!("{ABLE}/worldconquest/maps/MapAHex/dynamic/public");

    h.api.set_cache_config(CacheConfigOverrides {
        dynamic_data_ttl: Some(Duration::ZERO),
        ..Default::default()
    });

    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    h.clock.advance(Duration::from_secs(24 * 3600));
    h.api.get_map_dynamic_data(None, "MapAHex").await.unwrap();
    assert_eq!(h.stub.calls(&url), 1);
    assert_eq!(h.api.cleanup_expired_entries(), 0);
    assert_eq!(h.api.get_cache_stats().expired_entries, 0);
}

#[tokio::test]
async fn test_stats_and_cleanup() {
    let h = harness();
    seed_war(&h.stub, ABLE);
    h.api.get_victory_point_counts(None).await.unwrap();

    // war data, map names, two dynamic maps
    let stats = h.api.get_cache_stats();
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.expired_entries, 0);
    assert!(stats.approximate_bytes > 0);
    assert_eq!(stats.in_flight_requests, 0);

    h.clock.advance(Duration::from_secs(45));
    assert_eq!(h.api.get_cache_stats().expired_entries, 2);
    assert_eq!(h.api.cleanup_expired_entries(), 2);

    h.clock.advance(Duration::from_secs(3600));
    assert_eq!(h.api.cleanup_expired_entries(), 1);
    assert_eq!(h.api.get_cache_stats().total_entries, 1);
}

#[tokio::test]
async fn test_undecodable_payload_is_a_decode_error() {
    let h = harness();
    h.stub.respond(&format!("{ABLE}/worldconquest/maps"), json!({"not": "a list"}));
    let result = h.api.get_map_names(None).await;
    assert!(matches!(result, Err(FetchError::Decode { .. })));
}
