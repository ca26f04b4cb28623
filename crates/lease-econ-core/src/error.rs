use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseEconError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown scenario '{0}' (expected optimistic, baseline or conservative)")]
    UnknownScenario(String),

    #[error("Unknown sensitivity variable '{0}'")]
    UnknownVariable(String),

    #[error("Unknown sensitivity target '{0}'")]
    UnknownTarget(String),
}
