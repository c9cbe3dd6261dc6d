#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("no itinerary builder is active for this session")]
    NoActiveBuilder,
}

pub type Result<T> = std::result::Result<T, BuilderError>;
