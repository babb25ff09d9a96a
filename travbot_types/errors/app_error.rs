use thiserror::Error;

/// Errors for app wiring (configuration, session).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("You need to set env {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value {value:?} for env {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Login failed for user {0}")]
    LoginFailed(String),
}
