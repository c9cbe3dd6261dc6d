pub mod build;
pub mod dag;
pub mod error;

pub use build::build_plan;
pub use error::{PlannerError, Result};
