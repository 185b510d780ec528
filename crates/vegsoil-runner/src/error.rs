//! Error types for the runner.

use thiserror::Error;
use vegsoil_client::ClientError;
use vegsoil_expr::ExprError;

/// Errors that can occur while configuring or running the export script.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid computation: {0}")]
    Expr(#[from] ExprError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
