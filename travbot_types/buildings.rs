use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Build menu tab a building is listed under when constructing on an empty place.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum BuildingGroup {
    Infrastructure,
    Military,
    Resources,
}

impl BuildingGroup {
    /// Category code used by the build menu (`build.php?id=..&category=N`).
    pub fn category(&self) -> u8 {
        match self {
            BuildingGroup::Infrastructure => 1,
            BuildingGroup::Military => 2,
            BuildingGroup::Resources => 3,
        }
    }
}

/// The two storages whose capacity can block a construction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum StorageKind {
    Warehouse,
    Granary,
}

impl StorageKind {
    pub fn building(&self) -> BuildingName {
        match self {
            StorageKind::Warehouse => BuildingName::Warehouse,
            StorageKind::Granary => BuildingName::Granary,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize,
)]
pub enum BuildingName {
    Woodcutter,
    ClayPit,
    IronMine,
    Cropland,
    Sawmill,
    Brickyard,
    IronFoundry,
    GrainMill,
    Bakery,
    Warehouse,
    Granary,
    Smithy,
    TournamentSquare,
    MainBuilding,
    RallyPoint,
    Marketplace,
    Embassy,
    Barracks,
    Stable,
    Workshop,
    Academy,
    Cranny,
    TownHall,
    Residence,
    Palace,
    Treasury,
    TradeOffice,
    GreatBarracks,
    GreatStable,
    CityWall,
    EarthWall,
    Palisade,
    StonemasonsLodge,
    Brewery,
    Trapper,
    HeroMansion,
    GreatWarehouse,
    GreatGranary,
    WonderOfTheWorld,
    HorseDrinkingTrough,
    GreatWorkshop,
}

impl BuildingName {
    pub const ALL: [BuildingName; 41] = [
        BuildingName::Woodcutter,
        BuildingName::ClayPit,
        BuildingName::IronMine,
        BuildingName::Cropland,
        BuildingName::Sawmill,
        BuildingName::Brickyard,
        BuildingName::IronFoundry,
        BuildingName::GrainMill,
        BuildingName::Bakery,
        BuildingName::Warehouse,
        BuildingName::Granary,
        BuildingName::Smithy,
        BuildingName::TournamentSquare,
        BuildingName::MainBuilding,
        BuildingName::RallyPoint,
        BuildingName::Marketplace,
        BuildingName::Embassy,
        BuildingName::Barracks,
        BuildingName::Stable,
        BuildingName::Workshop,
        BuildingName::Academy,
        BuildingName::Cranny,
        BuildingName::TownHall,
        BuildingName::Residence,
        BuildingName::Palace,
        BuildingName::Treasury,
        BuildingName::TradeOffice,
        BuildingName::GreatBarracks,
        BuildingName::GreatStable,
        BuildingName::CityWall,
        BuildingName::EarthWall,
        BuildingName::Palisade,
        BuildingName::StonemasonsLodge,
        BuildingName::Brewery,
        BuildingName::Trapper,
        BuildingName::HeroMansion,
        BuildingName::GreatWarehouse,
        BuildingName::GreatGranary,
        BuildingName::WonderOfTheWorld,
        BuildingName::HorseDrinkingTrough,
        BuildingName::GreatWorkshop,
    ];

    /// Stable game code (the `gid` used by the site).
    pub fn id(&self) -> u8 {
        match self {
            BuildingName::Woodcutter => 1,
            BuildingName::ClayPit => 2,
            BuildingName::IronMine => 3,
            BuildingName::Cropland => 4,
            BuildingName::Sawmill => 5,
            BuildingName::Brickyard => 6,
            BuildingName::IronFoundry => 7,
            BuildingName::GrainMill => 8,
            BuildingName::Bakery => 9,
            BuildingName::Warehouse => 10,
            BuildingName::Granary => 11,
            BuildingName::Smithy => 13,
            BuildingName::TournamentSquare => 14,
            BuildingName::MainBuilding => 15,
            BuildingName::RallyPoint => 16,
            BuildingName::Marketplace => 17,
            BuildingName::Embassy => 18,
            BuildingName::Barracks => 19,
            BuildingName::Stable => 20,
            BuildingName::Workshop => 21,
            BuildingName::Academy => 22,
            BuildingName::Cranny => 23,
            BuildingName::TownHall => 24,
            BuildingName::Residence => 25,
            BuildingName::Palace => 26,
            BuildingName::Treasury => 27,
            BuildingName::TradeOffice => 28,
            BuildingName::GreatBarracks => 29,
            BuildingName::GreatStable => 30,
            BuildingName::CityWall => 31,
            BuildingName::EarthWall => 32,
            BuildingName::Palisade => 33,
            BuildingName::StonemasonsLodge => 34,
            BuildingName::Brewery => 35,
            BuildingName::Trapper => 36,
            BuildingName::HeroMansion => 37,
            BuildingName::GreatWarehouse => 38,
            BuildingName::GreatGranary => 39,
            BuildingName::WonderOfTheWorld => 40,
            BuildingName::HorseDrinkingTrough => 41,
            BuildingName::GreatWorkshop => 42,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|name| name.id() == id)
    }

    /// Matches the label the game prints for a building, e.g. `"Main Building"`.
    pub fn from_display_name(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.to_string().eq_ignore_ascii_case(label))
    }

    /// Resource fields are always present on slots 1-18 and never constructed.
    pub fn is_resource_field(&self) -> bool {
        matches!(
            self,
            BuildingName::Woodcutter
                | BuildingName::ClayPit
                | BuildingName::IronMine
                | BuildingName::Cropland
        )
    }

    /// Tribe specific walls, all of them living on the reserved wall slot.
    pub fn is_wall(&self) -> bool {
        matches!(
            self,
            BuildingName::CityWall | BuildingName::EarthWall | BuildingName::Palisade
        )
    }
}

impl fmt::Display for BuildingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildingName::Woodcutter => "Woodcutter",
            BuildingName::ClayPit => "Clay Pit",
            BuildingName::IronMine => "Iron Mine",
            BuildingName::Cropland => "Cropland",
            BuildingName::Sawmill => "Sawmill",
            BuildingName::Brickyard => "Brickyard",
            BuildingName::IronFoundry => "Iron Foundry",
            BuildingName::GrainMill => "Grain Mill",
            BuildingName::Bakery => "Bakery",
            BuildingName::Warehouse => "Warehouse",
            BuildingName::Granary => "Granary",
            BuildingName::Smithy => "Smithy",
            BuildingName::TournamentSquare => "Tournament Square",
            BuildingName::MainBuilding => "Main Building",
            BuildingName::RallyPoint => "Rally Point",
            BuildingName::Marketplace => "Marketplace",
            BuildingName::Embassy => "Embassy",
            BuildingName::Barracks => "Barracks",
            BuildingName::Stable => "Stable",
            BuildingName::Workshop => "Workshop",
            BuildingName::Academy => "Academy",
            BuildingName::Cranny => "Cranny",
            BuildingName::TownHall => "Town Hall",
            BuildingName::Residence => "Residence",
            BuildingName::Palace => "Palace",
            BuildingName::Treasury => "Treasury",
            BuildingName::TradeOffice => "Trade Office",
            BuildingName::GreatBarracks => "Great Barracks",
            BuildingName::GreatStable => "Great Stable",
            BuildingName::CityWall => "City Wall",
            BuildingName::EarthWall => "Earth Wall",
            BuildingName::Palisade => "Palisade",
            BuildingName::StonemasonsLodge => "Stonemason's Lodge",
            BuildingName::Brewery => "Brewery",
            BuildingName::Trapper => "Trapper",
            BuildingName::HeroMansion => "Hero's Mansion",
            BuildingName::GreatWarehouse => "Great Warehouse",
            BuildingName::GreatGranary => "Great Granary",
            BuildingName::WonderOfTheWorld => "Wonder of the World",
            BuildingName::HorseDrinkingTrough => "Horse Drinking Trough",
            BuildingName::GreatWorkshop => "Great Workshop",
        };

        f.write_str(name)
    }
}

impl FromStr for BuildingName {
    type Err = String;

    /// Accepts both the variant name (`MainBuilding`) and the label (`Main Building`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

        Self::ALL
            .iter()
            .copied()
            .find(|name| {
                format!("{name:?}").eq_ignore_ascii_case(&wanted)
                    || name.to_string().eq_ignore_ascii_case(s.trim())
            })
            .ok_or_else(|| format!("unknown building: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<u8> = BuildingName::ALL.iter().map(|b| b.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), BuildingName::ALL.len());
    }

    #[test]
    fn test_from_id() {
        assert_eq!(BuildingName::from_id(15), Some(BuildingName::MainBuilding));
        assert_eq!(BuildingName::from_id(22), Some(BuildingName::Academy));
        assert_eq!(BuildingName::from_id(12), None);
    }

    #[test]
    fn test_from_display_name() {
        assert_eq!(
            BuildingName::from_display_name("Main Building"),
            Some(BuildingName::MainBuilding)
        );
        assert_eq!(
            BuildingName::from_display_name("stonemason's lodge"),
            Some(BuildingName::StonemasonsLodge)
        );
        assert_eq!(BuildingName::from_display_name("Castle"), None);
    }

    #[test]
    fn test_from_str_accepts_variant_and_label() {
        assert_eq!(
            "MainBuilding".parse::<BuildingName>(),
            Ok(BuildingName::MainBuilding)
        );
        assert_eq!(
            "rally point".parse::<BuildingName>(),
            Ok(BuildingName::RallyPoint)
        );
        assert!("Moat".parse::<BuildingName>().is_err());
    }

    #[test]
    fn test_resource_fields_and_walls() {
        let fields: Vec<_> = BuildingName::ALL
            .iter()
            .filter(|b| b.is_resource_field())
            .collect();
        assert_eq!(fields.len(), 4);
        assert!(BuildingName::Palisade.is_wall());
        assert!(!BuildingName::Warehouse.is_wall());
    }
}
