use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("llm extraction error: {0}")]
    Llm(String),

    #[error("extraction produced no usable intent")]
    Empty,
}

pub type Result<T> = std::result::Result<T, IntentError>;
