use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("context restoration failed: {0}")]
    ContextRestore(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid slot value for {field}: {reason}")]
    InvalidSlot { field: String, reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short error code string surfaced to callers (see error handling design).
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Config(_) => "CONFIG_ERROR",
            CoreError::ContextRestore(_) => "CONTEXT_RESTORE_FAILED",
            CoreError::Serialization(_) => "SERIALIZATION_ERROR",
            CoreError::InvalidSlot { .. } => "INVALID_SLOT",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
