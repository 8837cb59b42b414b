use serde::{Deserialize, Serialize};

/// Map item flag: the structure is a victory town.
pub const FLAG_VICTORY_BASE: u32 = 0x01;
/// Map item flag: the structure has been scorched and no longer counts for
/// either side.
pub const FLAG_SCORCHED: u32 = 0x10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shard {
    #[default]
    Able,
    Baker,
    Charlie,
    Dev,
}

impl Shard {
    pub const ALL: [Shard; 4] = [Shard::Able, Shard::Baker, Shard::Charlie, Shard::Dev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shard::Able => "able",
            Shard::Baker => "baker",
            Shard::Charlie => "charlie",
            Shard::Dev => "dev",
        }
    }

    /// Lenient parse: anything unrecognised resolves to the default shard.
    /// Accepts the `live-N` names the War API hosts are published under.
    pub fn parse_or_default(s: &str) -> Shard {
        match s.trim().to_ascii_lowercase().as_str() {
            "able" | "live-1" => Shard::Able,
            "baker" | "live-2" => Shard::Baker,
            "charlie" | "live-3" => Shard::Charlie,
            "dev" => Shard::Dev,
            other => {
                tracing::warn!(shard = other, "Unknown shard, using default");
                Shard::default()
            }
        }
    }
}

impl std::fmt::Display for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamId {
    #[default]
    None,
    Wardens,
    Colonials,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamId::None => write!(f, "NONE"),
            TeamId::Wardens => write!(f, "WARDENS"),
            TeamId::Colonials => write!(f, "COLONIALS"),
            TeamId::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// `GET /worldconquest/war`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarData {
    pub war_id: String,
    pub war_number: u64,
    #[serde(default)]
    pub winner: TeamId,
    pub conquest_start_time: Option<i64>,
    pub conquest_end_time: Option<i64>,
    pub resistance_start_time: Option<i64>,
    pub required_victory_towns: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapItem {
    #[serde(default)]
    pub team_id: TeamId,
    pub icon_type: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub flags: u32,
}

impl MapItem {
    pub fn is_victory_point(&self) -> bool {
        self.flags & FLAG_VICTORY_BASE == FLAG_VICTORY_BASE
    }

    pub fn is_scorched(&self) -> bool {
        self.flags & FLAG_SCORCHED == FLAG_SCORCHED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapMarkerType {
    Major,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub map_marker_type: MapMarkerType,
}

/// Static or dynamic map payload. The API does not echo the map name, so
/// `map_name` is filled in after the fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarMapData {
    #[serde(default)]
    pub map_name: String,
    pub region_id: i64,
    #[serde(default)]
    pub scorched_victory_towns: i64,
    #[serde(default)]
    pub map_items: Vec<MapItem>,
    #[serde(default)]
    pub map_text_items: Vec<MapTextItem>,
    #[serde(default)]
    pub last_updated: i64,
    #[serde(default)]
    pub version: i64,
}

/// `GET /worldconquest/warreport/{map}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarMapReport {
    #[serde(default)]
    pub map_name: String,
    pub total_enlistments: u64,
    pub colonial_casualties: u64,
    pub warden_casualties: u64,
    pub day_of_war: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarVictoryPointSummary {
    pub warden: i64,
    pub colonial: i64,
    pub scorched: i64,
    /// Towns still needed for victory. Negative when more towns are scorched
    /// than the war requires.
    pub required: i64,
}
