//! Error types for the hp-app service layer.

use std::path::PathBuf;

use hp_thermal::{LifecyclePhase, ThermalError};

/// Application error type that wraps errors from the backend crates
/// and gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The asset's lifecycle does not allow the requested operation.
    #[error("Asset {asset} is {phase}; cannot {operation}")]
    InvalidState {
        asset: String,
        phase: LifecyclePhase,
        operation: &'static str,
    },

    /// Kernel errors stay typed so callers can tell a domain violation apart.
    #[error("Thermal model error: {0}")]
    Thermal(#[from] ThermalError),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The domain violation that ended an asset, if this is one.
    pub fn domain_violation(&self) -> Option<&ThermalError> {
        match self {
            AppError::Thermal(err) if err.is_domain_violation() => Some(err),
            _ => None,
        }
    }
}

impl From<hp_project::ProjectError> for AppError {
    fn from(err: hp_project::ProjectError) -> Self {
        match err {
            hp_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<hp_project::ValidationError> for AppError {
    fn from(err: hp_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<hp_results::ResultsError> for AppError {
    fn from(err: hp_results::ResultsError) -> Self {
        match err {
            hp_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<hp_core::CoreError> for AppError {
    fn from(err: hp_core::CoreError) -> Self {
        AppError::Thermal(ThermalError::from(err))
    }
}
