use travbot_game::models::{buildings::Building, village::VillageSnapshot};
use travbot_types::buildings::BuildingName;

use crate::cqrs::Query;

#[derive(Debug, Clone, Default)]
pub struct GetVillageSnapshot;

impl Query for GetVillageSnapshot {
    type Output = VillageSnapshot;
}

#[derive(Debug, Clone)]
pub struct GetBuildings {
    pub name: BuildingName,
}

impl Query for GetBuildings {
    type Output = Vec<Building>;
}
