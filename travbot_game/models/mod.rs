pub mod buildings;
pub mod village;
