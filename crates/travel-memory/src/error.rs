use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("no reference could be resolved for {0:?}")]
    Unresolved(String),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
