mod get_buildings;
mod get_village_snapshot;

pub use get_buildings::GetBuildingsHandler;
pub use get_village_snapshot::GetVillageSnapshotHandler;
