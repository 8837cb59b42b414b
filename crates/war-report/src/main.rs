use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use foxhole_shared::models::{Shard, WarData, WarVictoryPointSummary};
use foxhole_war_api::{FetchResult, ReqwestTransport, WarApi};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn format_span(secs: i64) -> String {
    let secs = secs.max(0);
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    format!("{days} days, {hours} hours")
}

fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

fn format_war_state(war: &WarData, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("=== War Status ===\n");
    out.push_str(&format!("  War Number: {}\n", war.war_number));
    out.push_str(&format!("  Winner: {}\n", war.winner));
    out.push_str(&format!(
        "  Victory Towns Required: {}\n",
        war.required_victory_towns
    ));

    let start = war.conquest_start_time.and_then(millis_to_utc);
    let end = war.conquest_end_time.and_then(millis_to_utc);
    match (start, end) {
        (Some(start), Some(end)) => {
            let span = format_span((end - start).num_seconds());
            out.push_str(&format!("  War Duration: {span}\n"));
        }
        (Some(start), None) => {
            let span = format_span((now - start).num_seconds());
            out.push_str(&format!("  War Duration So Far: {span} (ongoing)\n"));
        }
        _ => {}
    }
    out.push('\n');
    out
}

fn format_victory_points(summary: &WarVictoryPointSummary) -> String {
    let mut out = String::new();
    out.push_str("=== Victory Points ===\n");
    out.push_str(&format!("  Warden:   {}\n", summary.warden));
    out.push_str(&format!("  Colonial: {}\n", summary.colonial));
    out.push_str(&format!("  Scorched: {}\n", summary.scorched));
    out.push_str(&format!("  Required: {}\n", summary.required));
    out
}

/// Full report for `shard`, or "No active war" when the shard has none.
async fn build_report(api: &WarApi, shard: Shard, now: DateTime<Utc>) -> FetchResult<String> {
    info!(%shard, "Fetching war state");
    let Some(war) = api.get_current_war_data(Some(shard)).await else {
        return Ok("No active war\n".to_string());
    };

    info!(%shard, war_number = war.war_number, "Tallying victory points");
    let mut report = format_war_state(&war, now);
    match api.get_victory_point_counts(Some(shard)).await? {
        Some(summary) => report.push_str(&format_victory_points(&summary)),
        // The war ended between the two lookups.
        None => report.push_str("No active war\n"),
    }
    Ok(report)
}

fn get_arg(flag: &str) -> Option<String> {
    std::env::args()
        .skip_while(|a| a != flag)
        .nth(1)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let shard = get_arg("--shard")
        .map(|s| Shard::parse_or_default(&s))
        .unwrap_or_default();

    let transport = ReqwestTransport::with_timeout(HTTP_TIMEOUT).unwrap_or_else(|e| {
        error!("Failed to build HTTP client: {e}");
        std::process::exit(1);
    });
    let api = WarApi::new(Arc::new(transport));

    match build_report(&api, shard, Utc::now()).await {
        Ok(report) => print!("{report}"),
        Err(e) => {
            error!("Failed to tally victory points: {e}");
            std::process::exit(1);
        }
    }
}
