use thiserror::Error;

/// Errors surfaced by the browser driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    #[error("page did not settle within {0}ms")]
    Timeout(u64),
}
