use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use travbot_types::buildings::BuildingName;

/// A building occurrence on a village site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Building {
    pub site_id: u8,
    pub level: u8,
}

impl Building {
    pub fn new(site_id: u8, level: u8) -> Self {
        Self { site_id, level }
    }

    /// Order used by the game listings: ascending level, then descending site.
    pub fn listing_order(a: &Building, b: &Building) -> Ordering {
        a.level
            .cmp(&b.level)
            .then_with(|| b.site_id.cmp(&a.site_id))
    }
}

/// What a site marker says about the site it points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteLabel {
    /// Free slot, any building can go there.
    EmptyPlace,
    /// Reserved slot (rally point, wall) whose building doesn't exist yet.
    Unbuilt(BuildingName),
    Built { name: BuildingName, level: u8 },
}

impl SiteLabel {
    pub fn building(&self) -> Option<BuildingName> {
        match self {
            SiteLabel::EmptyPlace => None,
            SiteLabel::Unbuilt(name) => Some(*name),
            SiteLabel::Built { name, .. } => Some(*name),
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            SiteLabel::Built { level, .. } => *level,
            _ => 0,
        }
    }
}
