use foxhole_shared::models::Shard;

pub const ABLE_BASE_URL: &str = "https://war-service-live.foxholeservices.com/api";
pub const BAKER_BASE_URL: &str = "https://war-service-live-2.foxholeservices.com/api";
pub const CHARLIE_BASE_URL: &str = "https://war-service-live-3.foxholeservices.com/api";
pub const DEV_BASE_URL: &str = "https://war-service-dev.foxholeservices.com/api";

/// Resolves a shard to the base URL of its War API host and builds endpoint
/// URLs under it. A missing shard means the default shard.
#[derive(Debug, Clone)]
pub struct ShardRouter {
    able: String,
    baker: String,
    charlie: String,
    dev: String,
}

impl Default for ShardRouter {
    fn default() -> Self {
        ShardRouter {
            able: ABLE_BASE_URL.to_string(),
            baker: BAKER_BASE_URL.to_string(),
            charlie: CHARLIE_BASE_URL.to_string(),
            dev: DEV_BASE_URL.to_string(),
        }
    }
}

impl ShardRouter {
    /// Point one shard at a different host, e.g. a local mirror.
    pub fn with_base_url(mut self, shard: Shard, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        match shard {
            Shard::Able => self.able = base_url,
            Shard::Baker => self.baker = base_url,
            Shard::Charlie => self.charlie = base_url,
            Shard::Dev => self.dev = base_url,
        }
        self
    }

    pub fn base_url(&self, shard: Option<Shard>) -> &str {
        match shard.unwrap_or_default() {
            Shard::Able => &self.able,
            Shard::Baker => &self.baker,
            Shard::Charlie => &self.charlie,
            Shard::Dev => &self.dev,
        }
    }

    pub fn war_url(&self, shard: Option<Shard>) -> String {
        format!("{}/worldconquest/war", self.base_url(shard))
    }

    pub fn maps_url(&self, shard: Option<Shard>) -> String {
        format!("{}/worldconquest/maps", self.base_url(shard))
    }

    pub fn map_static_url(&self, shard: Option<Shard>, map_name: &str) -> String {
        format!("{}/worldconquest/maps/{}/static", self.base_url(shard), map_name)
    }

    pub fn map_dynamic_url(&self, shard: Option<Shard>, map_name: &str) -> String {
        format!(
            "{}/worldconquest/maps/{}/dynamic/public",
            self.base_url(shard),
            map_name
        )
    }

    pub fn war_report_url(&self, shard: Option<Shard>, map_name: &str) -> String {
        format!("{}/worldconquest/warreport/{}", self.base_url(shard), map_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_shard_resolves_to_able() {
        let router = ShardRouter::default();
        assert_eq!(router.base_url(None), ABLE_BASE_URL);
        assert_eq!(router.base_url(Some(Shard::Able)), ABLE_BASE_URL);
    }

    #[test]
    fn test_each_shard_has_its_own_host() {
        let router = ShardRouter::default();
        assert_eq!(router.base_url(Some(Shard::Baker)), BAKER_BASE_URL);
        assert_eq!(router.base_url(Some(Shard::Charlie)), CHARLIE_BASE_URL);
        assert_eq!(router.base_url(Some(Shard::Dev)), DEV_BASE_URL);
    }

    #[test]
    fn test_endpoint_urls() {
        let router = ShardRouter::default().with_base_url(Shard::Dev, "http://localhost:9000/api/");
        assert_eq!(
            router.war_url(Some(Shard::Dev)),
            "http://localhost:9000/api/worldconquest/war"
        );
        assert_eq!(
            router.map_dynamic_url(Some(Shard::Dev), "DeadLandsHex"),
            "http://localhost:9000/api/worldconquest/maps/DeadLandsHex/dynamic/public"
        );
        assert_eq!(
            router.map_static_url(None, "DeadLandsHex"),
            format!("{ABLE_BASE_URL}/worldconquest/maps/DeadLandsHex/static")
        );
        assert_eq!(
            router.war_report_url(Some(Shard::Baker), "GutterHex"),
            format!("{BAKER_BASE_URL}/worldconquest/warreport/GutterHex")
        );
        assert_eq!(
            router.maps_url(Some(Shard::Charlie)),
            format!("{CHARLIE_BASE_URL}/worldconquest/maps")
        );
    }
}
