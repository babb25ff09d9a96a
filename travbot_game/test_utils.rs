use std::collections::BTreeMap;

use travbot_types::buildings::BuildingName;

use crate::models::buildings::SiteLabel;

/// Resource field layout of a standard 4-4-4-6 village, by site id.
pub const STANDARD_FIELDS: [BuildingName; 18] = [
    BuildingName::Woodcutter,
    BuildingName::Cropland,
    BuildingName::Woodcutter,
    BuildingName::IronMine,
    BuildingName::ClayPit,
    BuildingName::ClayPit,
    BuildingName::IronMine,
    BuildingName::Cropland,
    BuildingName::Cropland,
    BuildingName::IronMine,
    BuildingName::IronMine,
    BuildingName::Cropland,
    BuildingName::Cropland,
    BuildingName::Woodcutter,
    BuildingName::Cropland,
    BuildingName::ClayPit,
    BuildingName::Woodcutter,
    BuildingName::ClayPit,
];

#[derive(Default, Clone)]
pub struct VillageSitesFactoryOptions {
    /// Level of every resource field, defaults to 0.
    pub field_level: Option<u8>,
    /// Extra `(site_id, building, level)` entries on the village sites.
    pub buildings: Vec<(u8, BuildingName, u8)>,
}

/// Occupied sites of a fresh village: the resource fields plus `options.buildings`.
pub fn village_sites_factory(
    options: VillageSitesFactoryOptions,
) -> BTreeMap<u8, (BuildingName, u8)> {
    let field_level = options.field_level.unwrap_or(0);
    let mut sites: BTreeMap<u8, (BuildingName, u8)> = STANDARD_FIELDS
        .iter()
        .enumerate()
        .map(|(idx, name)| ((idx + 1) as u8, (*name, field_level)))
        .collect();

    for (site_id, name, level) in options.buildings {
        sites.insert(site_id, (name, level));
    }

    sites
}

/// Labels as the game prints them for the given occupied sites.
pub fn site_labels_factory(sites: &BTreeMap<u8, (BuildingName, u8)>) -> Vec<(u8, SiteLabel)> {
    sites
        .iter()
        .map(|(site_id, (name, level))| {
            (
                *site_id,
                SiteLabel::Built {
                    name: *name,
                    level: *level,
                },
            )
        })
        .collect()
}
