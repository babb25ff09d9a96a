use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use travbot_types::buildings::BuildingName;

use super::buildings::{Building, SiteLabel};

pub const RESOURCE_FIELDS_LAST_SITE_ID: u8 = 18;
pub const RALLY_POINT_SITE_ID: u8 = 39;
pub const WALL_SITE_ID: u8 = 40;
pub const MAX_VILLAGE_SITE_ID: u8 = 40;

/// Site a building is bound to, if any (rally point and walls).
pub fn reserved_site(name: &BuildingName) -> Option<u8> {
    match name {
        BuildingName::RallyPoint => Some(RALLY_POINT_SITE_ID),
        name if name.is_wall() => Some(WALL_SITE_ID),
        _ => None,
    }
}

pub fn is_resource_site(site_id: u8) -> bool {
    (1..=RESOURCE_FIELDS_LAST_SITE_ID).contains(&site_id)
}

pub fn is_village_site(site_id: u8) -> bool {
    (RESOURCE_FIELDS_LAST_SITE_ID + 1..=MAX_VILLAGE_SITE_ID).contains(&site_id)
}

/// Buildings of a village as read from the screens at one moment.
///
/// Never kept around: the live page can change between two operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageSnapshot {
    buildings: BTreeMap<BuildingName, Vec<Building>>,
    empty_places: BTreeSet<u8>,
}

impl VillageSnapshot {
    /// Groups parsed site markers by building, keeping the listing order.
    pub fn from_sites(sites: impl IntoIterator<Item = (u8, SiteLabel)>) -> Self {
        let mut buildings: BTreeMap<BuildingName, Vec<Building>> = BTreeMap::new();
        let mut empty_places = BTreeSet::new();
        let mut seen_sites = BTreeSet::new();

        for (site_id, label) in sites {
            if !seen_sites.insert(site_id) {
                continue;
            }

            let Some(name) = label.building() else {
                empty_places.insert(site_id);
                continue;
            };

            let occurrences = buildings.entry(name).or_default();
            // the wall is drawn by more than one marker, only the first counts
            if name.is_wall() && !occurrences.is_empty() {
                continue;
            }
            occurrences.push(Building::new(site_id, label.level()));
        }

        for occurrences in buildings.values_mut() {
            occurrences.sort_by(Building::listing_order);
        }

        Self {
            buildings,
            empty_places,
        }
    }

    /// Occurrences of a building, ascending by level.
    pub fn occurrences(&self, name: &BuildingName) -> &[Building] {
        self.buildings
            .get(name)
            .map(|list| list.as_slice())
            .unwrap_or_default()
    }

    /// Highest level occurrence.
    pub fn highest(&self, name: &BuildingName) -> Option<Building> {
        self.occurrences(name).last().copied()
    }

    /// Resource fields exist at level 0, everything else from level 1.
    pub fn is_built(&self, name: &BuildingName) -> bool {
        match self.highest(name) {
            Some(_) if name.is_resource_field() => true,
            Some(building) => building.level > 0,
            None => false,
        }
    }

    pub fn satisfies(&self, name: &BuildingName, level: u8) -> bool {
        self.is_built(name)
            && self
                .highest(name)
                .is_some_and(|building| building.level >= level)
    }

    /// Distinct empty places, ascending.
    pub fn empty_places(&self) -> Vec<u8> {
        self.empty_places.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BuildingName, &Vec<Building>)> {
        self.buildings.iter()
    }

    /// Merges the buildings of another screen into this snapshot.
    pub fn merge(&mut self, other: VillageSnapshot) {
        for (name, occurrences) in other.buildings {
            let list = self.buildings.entry(name).or_default();
            list.extend(occurrences);
            list.sort_by(Building::listing_order);
        }
        self.empty_places.extend(other.empty_places);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(name: BuildingName, level: u8) -> SiteLabel {
        SiteLabel::Built { name, level }
    }

    #[test]
    fn test_reserved_sites() {
        assert_eq!(reserved_site(&BuildingName::RallyPoint), Some(39));
        assert_eq!(reserved_site(&BuildingName::EarthWall), Some(40));
        assert_eq!(reserved_site(&BuildingName::Academy), None);
        assert!(is_resource_site(18));
        assert!(!is_resource_site(19));
        assert!(is_village_site(40));
    }

    #[test]
    fn test_snapshot_orders_duplicates() {
        let snapshot = VillageSnapshot::from_sites(vec![
            (1, built(BuildingName::Woodcutter, 2)),
            (3, built(BuildingName::Woodcutter, 1)),
            (14, built(BuildingName::Woodcutter, 1)),
            (17, built(BuildingName::Woodcutter, 0)),
        ]);

        assert_eq!(
            snapshot.occurrences(&BuildingName::Woodcutter),
            &[
                Building::new(17, 0),
                Building::new(14, 1),
                Building::new(3, 1),
                Building::new(1, 2),
            ]
        );
        assert_eq!(
            snapshot.highest(&BuildingName::Woodcutter),
            Some(Building::new(1, 2))
        );
    }

    #[test]
    fn test_wall_keeps_first_marker_only() {
        let snapshot = VillageSnapshot::from_sites(vec![
            (40, built(BuildingName::CityWall, 3)),
            (41, built(BuildingName::CityWall, 3)),
        ]);

        assert_eq!(
            snapshot.occurrences(&BuildingName::CityWall),
            &[Building::new(40, 3)]
        );
    }

    #[test]
    fn test_unbuilt_placeholders_and_empty_places() {
        let snapshot = VillageSnapshot::from_sites(vec![
            (39, SiteLabel::Unbuilt(BuildingName::RallyPoint)),
            (22, SiteLabel::EmptyPlace),
            (21, SiteLabel::EmptyPlace),
            (22, SiteLabel::EmptyPlace),
            (26, built(BuildingName::MainBuilding, 1)),
        ]);

        assert_eq!(
            snapshot.occurrences(&BuildingName::RallyPoint),
            &[Building::new(39, 0)]
        );
        assert!(!snapshot.is_built(&BuildingName::RallyPoint));
        assert!(snapshot.is_built(&BuildingName::MainBuilding));
        assert_eq!(snapshot.empty_places(), vec![21, 22]);
    }

    #[test]
    fn test_satisfies() {
        let snapshot = VillageSnapshot::from_sites(vec![
            (5, built(BuildingName::Cropland, 0)),
            (26, built(BuildingName::MainBuilding, 3)),
        ]);

        assert!(snapshot.satisfies(&BuildingName::MainBuilding, 3));
        assert!(!snapshot.satisfies(&BuildingName::MainBuilding, 5));
        assert!(snapshot.satisfies(&BuildingName::Cropland, 0));
        assert!(!snapshot.satisfies(&BuildingName::Barracks, 1));
    }

    #[test]
    fn test_merge_screens() {
        let mut overview =
            VillageSnapshot::from_sites(vec![(1, built(BuildingName::Woodcutter, 1))]);
        let village = VillageSnapshot::from_sites(vec![
            (26, built(BuildingName::MainBuilding, 1)),
            (19, SiteLabel::EmptyPlace),
        ]);
        overview.merge(village);

        assert!(overview.is_built(&BuildingName::Woodcutter));
        assert!(overview.is_built(&BuildingName::MainBuilding));
        assert_eq!(overview.empty_places(), vec![19]);
    }
}
