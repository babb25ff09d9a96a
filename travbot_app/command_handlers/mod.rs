mod construct_building;
mod demolish_buildings;
mod level_up_building;

pub use construct_building::ConstructBuildingCommandHandler;
pub use demolish_buildings::DemolishBuildingsCommandHandler;
pub use level_up_building::LevelUpBuildingCommandHandler;
