pub mod category;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod geo;
pub mod types;

pub use config::TravelConfig;
pub use context::Context;
pub use error::{CoreError, Result};
