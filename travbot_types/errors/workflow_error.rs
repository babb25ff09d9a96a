use thiserror::Error;

use super::DriverError;
use crate::buildings::{BuildingName, StorageKind};

/// Blocking conditions the page may report before a construction/upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreconditionKind {
    Storage(StorageKind),
    Resources,
    Workers,
}

/// Outcomes of the building workflow that are not a success.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Building {0} not found in the village")]
    BuildingNotFound(BuildingName),

    #[error("No buildings found on site {site_id}")]
    EmptySite { site_id: u8 },

    #[error("No construction contract available on site {site_id}")]
    ContractNotFound { site_id: u8 },

    #[error("Precondition not met: {0:?}")]
    PreconditionUnmet(PreconditionKind),

    #[error("Building on site {site_id} has already reached max level")]
    MaxLevel { site_id: u8 },

    #[error("Can't reach {url}")]
    NavigationFailed { url: String },

    #[error("Can't parse {what} from {text:?}")]
    ParseFailed { what: &'static str, text: String },

    #[error("Building requirements not met: requires {building} at level {level}")]
    DependencyUnmet { building: BuildingName, level: u8 },

    #[error("Village has no empty place left")]
    VillageFull,

    #[error("Site {site_id} is not valid for this action")]
    InvalidSite { site_id: u8 },

    #[error("Submission on site {site_id} was rejected")]
    SubmitRejected { site_id: u8 },

    #[error("Building {building} can't be built here: {requirement}")]
    SpecialRequirementUnmet {
        building: BuildingName,
        requirement: String,
    },

    #[error("Gave up waiting out {0:?}: forced retries exhausted")]
    RetryBudgetExhausted(PreconditionKind),

    #[error("Timer on site {site_id} never ran out")]
    TimerStuck { site_id: u8 },

    #[error("Too many nested constructions while resolving {0}")]
    DependencyDepthExceeded(BuildingName),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl WorkflowError {
    pub fn parse(what: &'static str, text: impl Into<String>) -> Self {
        WorkflowError::ParseFailed {
            what,
            text: text.into(),
        }
    }
}
