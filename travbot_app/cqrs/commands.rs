use travbot_types::buildings::BuildingName;

use crate::{
    cqrs::Command,
    workflow::{BuildOptions, BuildOutcome, DemolitionReport},
};

#[derive(Debug, Clone)]
pub struct ConstructBuilding {
    pub name: BuildingName,
    pub options: BuildOptions,
}

impl Command for ConstructBuilding {
    type Output = BuildOutcome;
}

#[derive(Debug, Clone)]
pub struct LevelUpBuilding {
    pub site_id: u8,
    pub options: BuildOptions,
}

impl Command for LevelUpBuilding {
    type Output = BuildOutcome;
}

#[derive(Debug, Clone)]
pub struct DemolishBuildings {
    /// Demolished in this order, one level each.
    pub site_ids: Vec<u8>,
}

impl Command for DemolishBuildings {
    type Output = DemolitionReport;
}
