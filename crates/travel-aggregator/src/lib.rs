pub mod clean;
pub mod cost;
pub mod multi;
pub mod single;

pub use multi::{assemble, combined_reply, combined_ui_data, itinerary_template, Section};
pub use single::{
    format_cost, format_finalized_itinerary, format_food, format_general_info, format_hotels, format_itinerary,
    format_spots, Formatted,
};
