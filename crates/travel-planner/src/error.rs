use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("task graph is not a DAG: cycle detected among {0:?}")]
    Cycle(Vec<String>),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
