use std::sync::Arc;
use std::time::Duration;

use foxhole_war_api::WarApi;
use tracing::{debug, info};

/// Periodically drop expired cache entries. Expiry is already enforced on
/// read; this only keeps memory from holding stale entries nobody asks for.
pub async fn run(api: Arc<WarApi>, interval: Duration) {
    info!("Cache sweeper started (interval: {}s)", interval.as_secs());

    let mut ticker = tokio::time::interval(interval);
    // Consume the immediate tick; nothing has expired at startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        sweep_once(&api);
    }
}

fn sweep_once(api: &WarApi) -> usize {
    let removed = api.cleanup_expired_entries();
    if removed > 0 {
        info!(removed, "Swept expired cache entries");
    } else {
        debug!("Cache sweep found nothing to remove");
    }
    removed
}
