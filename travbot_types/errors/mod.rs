use thiserror::Error;

pub mod app_error;
pub mod catalog_error;
pub mod driver_error;
pub mod workflow_error;

pub use app_error::AppError;
pub use catalog_error::CatalogError;
pub use driver_error::DriverError;
pub use workflow_error::{PreconditionKind, WorkflowError};

pub type Result<T, E = ApplicationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for ApplicationError {
    fn from(err: anyhow::Error) -> Self {
        ApplicationError::Unknown(format!("{err:#}"))
    }
}
