pub mod autogen;
pub mod error;
pub mod input;
pub mod step;

pub use error::{BuilderError, Result};
pub use step::{candidate_pool, finalize, handle_day_input, handle_month_selection, handle_start_date, offer_for_day, start, DayOutcome};
