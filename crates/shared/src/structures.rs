// Structure icon types reported in `mapItems[].iconType`. Retired types stay
// so old wars and the dev shard still decode.
macro_rules! map_structures {
    ($($name:ident = $id:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MapStructure {
            $($name = $id),+
        }

        impl MapStructure {
            pub fn from_id(id: u32) -> Option<MapStructure> {
                match id {
                    $($id => Some(MapStructure::$name),)+
                    _ => None,
                }
            }

            /// The variant identifier, e.g. `"TownBase1"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(MapStructure::$name => stringify!($name)),+
                }
            }
        }
    };
}

map_structures! {
    StaticBase1 = 5,
    StaticBase2 = 6,
    StaticBase3 = 7,
    ForwardBase1 = 8,
    ForwardBase2 = 9,
    ForwardBase3 = 10,
    Hospital = 11,
    VehicleFactory = 12,
    Armory = 13,
    SupplyStation = 14,
    Workshop = 15,
    ManufacturingPlant = 16,
    Refinery = 17,
    Shipyard = 18,
    TechCenter = 19,
    SalvageField = 20,
    ComponentField = 21,
    FuelField = 22,
    SulfurField = 23,
    WorldMapTent = 24,
    TravelTent = 25,
    TrainingArea = 26,
    SpecialBaseKeep = 27,
    ObservationTower = 28,
    Fort = 29,
    TroopShip = 30,
    SulfurMine = 32,
    StorageFacility = 33,
    Factory = 34,
    GarrisonStation = 35,
    AmmoFactory = 36,
    RocketSite = 37,
    SalvageMine = 38,
    ConstructionYard = 39,
    ComponentMine = 40,
    OilWell = 41,
    RelicBase1 = 45,
    RelicBase2 = 46,
    RelicBase3 = 47,
    MassProductionFactory = 51,
    Seaport = 52,
    CoastalGun = 53,
    SoulFactory = 54,
    TownBase1 = 56,
    TownBase2 = 57,
    TownBase3 = 58,
    StormCannon = 59,
    IntelCenter = 60,
    CoalField = 61,
    OilField = 62,
    RocketTarget = 70,
    RocketGroundZero = 71,
    RocketSiteWithRocket = 72,
    FacilityMineOilRig = 75,
    WeatherStation = 83,
    MortarHouse = 84,
    AircraftDepot = 88,
    AircraftFactory = 89,
    AircraftRadar = 90,
    AircraftRunwayT1 = 91,
    AircraftRunwayT2 = 92,
}

pub const UNKNOWN_STRUCTURE: &str = "Unknown Structure";

impl MapStructure {
    /// Split the identifier into words: `TownBase1` -> `Town Base 1`.
    pub fn friendly_name(&self) -> String {
        let mut spaced = String::new();
        let mut prev: Option<char> = None;
        for c in self.name().chars() {
            let digit_run = c.is_ascii_digit() && prev.is_some_and(|p| p.is_ascii_digit());
            if prev.is_some() && (c.is_ascii_uppercase() || c.is_ascii_digit()) && !digit_run {
                spaced.push(' ');
            }
            spaced.push(c);
            prev = Some(c);
        }

        spaced
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_ascii_uppercase().to_string()
                            + &chars.as_str().to_ascii_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Friendly name for a raw icon type. Unknown ids are logged and mapped to a
/// placeholder instead of failing.
pub fn structure_friendly_name(icon_type: u32) -> String {
    match MapStructure::from_id(icon_type) {
        Some(structure) => structure.friendly_name(),
        None => {
            tracing::warn!(icon_type, "Unknown map structure");
            UNKNOWN_STRUCTURE.to_string()
        }
    }
}
