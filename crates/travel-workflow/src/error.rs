use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A StateGuard rule blocked the intent — expected flow, not a bug.
    #[error("flow blocked: {0}")]
    Blocked(String),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
