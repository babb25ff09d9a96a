pub mod army;
pub mod buildings;
pub mod common;
pub mod errors;
pub mod tribe;

pub use errors::Result;
