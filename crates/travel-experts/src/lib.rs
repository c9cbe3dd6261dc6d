pub mod cost;
pub mod dispatch;
pub mod expert;
pub mod food;
pub mod general_info;
pub mod hotel;
pub mod itinerary;
pub mod json_extract;
pub mod spot;

pub use cost::CostCalculatorExpert;
pub use dispatch::ExpertDispatcher;
pub use expert::Expert;
pub use food::FoodExpert;
pub use general_info::GeneralInfoExpert;
pub use hotel::HotelExpert;
pub use itinerary::ItineraryExpert;
pub use spot::SpotExpert;
