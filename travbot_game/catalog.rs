//! Static building and troop metadata.
//!
//! The catalog is read once at startup from `data/catalog.json` (embedded in the
//! binary) or from a file given by configuration, validated against the
//! enumerated building and unit types, then shared read-only for the whole run.

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use travbot_types::{
    army::UnitName,
    buildings::{BuildingGroup, BuildingName},
    common::ResourceGroup,
    errors::CatalogError,
    tribe::Tribe,
};

static EMBEDDED_CATALOG: &str = include_str!("data/catalog.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuildingRequirement {
    pub building: BuildingName,
    pub level: u8,
}

/// Rules that are not expressed as a level of another building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SpecialRequirement {
    OnlyCapital,
    NonCapital,
    Tribe(Tribe),
    ConflictsWith(BuildingName),
    WorldWonderVillage,
    ConstructionPlan,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildingInfo {
    pub id: u8,
    pub name: BuildingName,
    pub display_name: String,
    pub group: BuildingGroup,
    pub max_level: u8,
    /// Ordered as the game enforces them.
    pub requirements: Vec<BuildingRequirement>,
    pub special_requirements: Vec<SpecialRequirement>,
    pub duplicates: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TroopInfo {
    pub name: UnitName,
    pub tribe: Tribe,
    pub attack: u32,
    pub defense_infantry: u32,
    pub defense_cavalry: u32,
    pub speed: u8,
    pub capacity: u32,
    pub upkeep: u32,
    pub cost: ResourceGroup,
    pub training_time: u32,
    pub requirements: Vec<BuildingRequirement>,
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    buildings: Vec<BuildingInfo>,
    troops: Vec<TroopInfo>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    // indexed by `BuildingName as usize`, complete after validation
    buildings: Vec<BuildingInfo>,
    troops: BTreeMap<(Tribe, UnitName), TroopInfo>,
}

impl Catalog {
    /// Catalog shipped with the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loading catalog from {}", path.display());

        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(raw)?;
        let catalog = Self::validate(data)?;
        tracing::info!(
            buildings = catalog.buildings.len(),
            troops = catalog.troops.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    pub fn building(&self, name: &BuildingName) -> &BuildingInfo {
        &self.buildings[*name as usize]
    }

    /// Returns `None` when the unit doesn't belong to the tribe.
    pub fn troop(&self, tribe: &Tribe, unit: &UnitName) -> Option<&TroopInfo> {
        self.troops.get(&(*tribe, *unit))
    }

    fn validate(data: CatalogData) -> Result<Self, CatalogError> {
        if data.buildings.len() != BuildingName::ALL.len() {
            return Err(CatalogError::CountMismatch {
                kind: "building",
                expected: BuildingName::ALL.len(),
                found: data.buildings.len(),
            });
        }

        let expected_troops: usize = Tribe::PLAYABLE.iter().map(|t| t.units().len()).sum();
        if data.troops.len() != expected_troops {
            return Err(CatalogError::CountMismatch {
                kind: "troop",
                expected: expected_troops,
                found: data.troops.len(),
            });
        }

        let mut by_name: BTreeMap<BuildingName, BuildingInfo> = BTreeMap::new();
        for info in data.buildings {
            if info.id != info.name.id() {
                return Err(CatalogError::IdMismatch {
                    building: format!("{:?}", info.name),
                    expected: info.name.id(),
                    found: info.id,
                });
            }
            if info.display_name != info.name.to_string() {
                return Err(CatalogError::LabelMismatch {
                    building: format!("{:?}", info.name),
                    expected: info.name.to_string(),
                    found: info.display_name,
                });
            }
            if info.max_level == 0 {
                return Err(CatalogError::InvalidRequirement {
                    entry: format!("{:?}", info.name),
                    reason: "max level can't be 0".to_string(),
                });
            }
            let name = info.name;
            if by_name.insert(name, info).is_some() {
                return Err(CatalogError::DuplicateEntry(format!("{name:?}")));
            }
        }

        // every requirement must be reachable: known building, level within its max
        for info in by_name.values() {
            for req in &info.requirements {
                if req.building == info.name {
                    return Err(CatalogError::InvalidRequirement {
                        entry: format!("{:?}", info.name),
                        reason: "requires itself".to_string(),
                    });
                }
                let max = by_name
                    .get(&req.building)
                    .map(|target| target.max_level)
                    .unwrap_or_default();
                if req.level == 0 || req.level > max {
                    return Err(CatalogError::InvalidRequirement {
                        entry: format!("{:?}", info.name),
                        reason: format!("{:?} level {} is unreachable", req.building, req.level),
                    });
                }
            }
        }

        let mut buildings = Vec::with_capacity(BuildingName::ALL.len());
        for name in BuildingName::ALL {
            let info = by_name
                .remove(&name)
                .ok_or_else(|| CatalogError::MissingEntry(format!("{name:?}")))?;
            buildings.push(info);
        }

        let mut troops = BTreeMap::new();
        for troop in data.troops {
            if !troop.tribe.has_unit(&troop.name) {
                return Err(CatalogError::MissingEntry(format!(
                    "{:?} in {:?} roster",
                    troop.name, troop.tribe
                )));
            }
            let key = (troop.tribe, troop.name);
            if troops.insert(key, troop).is_some() {
                return Err(CatalogError::DuplicateEntry(format!("{:?}", key)));
            }
        }

        let missing: BTreeSet<_> = Tribe::PLAYABLE
            .iter()
            .flat_map(|tribe| tribe.units().iter().map(move |unit| (*tribe, *unit)))
            .filter(|key| !troops.contains_key(key))
            .collect();
        if let Some(key) = missing.first() {
            return Err(CatalogError::MissingEntry(format!("{key:?}")));
        }

        Ok(Self { buildings, troops })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn embedded_json() -> Value {
        serde_json::from_str(EMBEDDED_CATALOG).unwrap()
    }

    #[test]
    fn test_embedded_catalog_is_complete() {
        let catalog = Catalog::embedded().unwrap();

        for name in BuildingName::ALL {
            assert_eq!(catalog.building(&name).name, name);
        }
        assert_eq!(catalog.building(&BuildingName::Cranny).max_level, 10);
        assert!(catalog.building(&BuildingName::Warehouse).duplicates);
        assert!(!catalog.building(&BuildingName::MainBuilding).duplicates);
    }

    #[test]
    fn test_requirements_keep_declared_order() {
        let catalog = Catalog::embedded().unwrap();
        let sawmill = catalog.building(&BuildingName::Sawmill);

        assert_eq!(
            sawmill.requirements,
            vec![
                BuildingRequirement {
                    building: BuildingName::Woodcutter,
                    level: 10
                },
                BuildingRequirement {
                    building: BuildingName::MainBuilding,
                    level: 5
                },
            ]
        );

        let academy = catalog.building(&BuildingName::Academy);
        assert_eq!(academy.requirements[0].building, BuildingName::MainBuilding);
        assert_eq!(academy.requirements[1].building, BuildingName::Barracks);
    }

    #[test]
    fn test_special_requirements() {
        let catalog = Catalog::embedded().unwrap();

        let palisade = catalog.building(&BuildingName::Palisade);
        assert_eq!(
            palisade.special_requirements,
            vec![SpecialRequirement::Tribe(Tribe::Gaul)]
        );

        let residence = catalog.building(&BuildingName::Residence);
        assert!(
            residence
                .special_requirements
                .contains(&SpecialRequirement::ConflictsWith(BuildingName::Palace))
        );
    }

    #[test]
    fn test_troop_lookup() {
        let catalog = Catalog::embedded().unwrap();

        let legionnaire = catalog.troop(&Tribe::Roman, &UnitName::Legionnaire).unwrap();
        assert_eq!(legionnaire.attack, 40);
        assert_eq!(legionnaire.cost, ResourceGroup::new(120, 100, 150, 30));

        let gaul_ram = catalog.troop(&Tribe::Gaul, &UnitName::Ram).unwrap();
        let teuton_ram = catalog.troop(&Tribe::Teuton, &UnitName::Ram).unwrap();
        assert_ne!(gaul_ram.cost, teuton_ram.cost);

        assert!(catalog.troop(&Tribe::Roman, &UnitName::Ram).is_none());
    }

    #[test]
    fn test_building_count_mismatch_is_fatal() {
        let mut json = embedded_json();
        json["buildings"].as_array_mut().unwrap().pop();

        let err = Catalog::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CountMismatch {
                kind: "building",
                ..
            }
        ));
    }

    #[test]
    fn test_troop_count_mismatch_is_fatal() {
        let mut json = embedded_json();
        json["troops"].as_array_mut().unwrap().truncate(12);

        let err = Catalog::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::CountMismatch { kind: "troop", .. }));
    }

    #[test]
    fn test_duplicate_building_is_fatal() {
        let mut json = embedded_json();
        let buildings = json["buildings"].as_array_mut().unwrap();
        let first = buildings[0].clone();
        buildings[1] = first;

        let err = Catalog::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateEntry(_) | CatalogError::IdMismatch { .. }
        ));
    }

    #[test]
    fn test_wrong_id_is_fatal() {
        let mut json = embedded_json();
        json["buildings"][14]["id"] = Value::from(99);

        let err = Catalog::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::IdMismatch { found: 99, .. }));
    }

    #[test]
    fn test_malformed_and_missing_files() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Malformed(_))
        ));
        assert!(matches!(
            Catalog::load("/definitely/not/here.json"),
            Err(CatalogError::Io { .. })
        ));
    }
}
