//! Special-intent handlers (spec §4.1 step 7): a fixed set of intents never
//! reach the Planner — each has a direct, cheap response path. Greeting and
//! small-talk intents are canned; the rest reuse existing experts/formatters
//! (Cost Calculator, General Info) or resolve directly against Context.

use std::sync::Arc;

use serde_json::{Map, Value};

use travel_core::collaborators::{DocumentStore, LlmClient, WeatherService};
use travel_core::context::Context;
use travel_core::geo;
use travel_experts::expert::Expert;
use travel_experts::{CostCalculatorExpert, GeneralInfoExpert};
use travel_memory::ReferenceResolver;
use travel_protocol::chunk::UiType;
use travel_protocol::intent::{Intent, IntentRecord};

pub struct Special {
    pub reply: String,
    pub ui_type: UiType,
    pub ui_data: Map<String, Value>,
}

impl Special {
    fn text(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), ui_type: UiType::Text, ui_data: Map::new() }
    }
}

pub struct SpecialHandlers {
    llm: Option<Arc<dyn LlmClient>>,
    weather: Option<Arc<dyn WeatherService>>,
    document_store: Arc<dyn DocumentStore>,
}

impl SpecialHandlers {
    pub fn new(
        llm: Option<Arc<dyn LlmClient>>,
        weather: Option<Arc<dyn WeatherService>>,
        document_store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self { llm, weather, document_store }
    }

    /// `None` means the intent is not one of the special-cased ones — the
    /// caller should proceed to the Planner instead.
    pub async fn handle(&self, record: &IntentRecord, utterance: &str, ctx: &mut Context) -> Option<Special> {
        match record.primary_intent {
            Intent::Greeting => Some(Special {
                reply: "Xin chào! Mình có thể giúp bạn lên kế hoạch chuyến đi, tìm khách sạn, quán ăn hoặc địa điểm tham quan.".to_string(),
                ui_type: UiType::Greeting,
                ui_data: Map::new(),
            }),
            Intent::Chitchat => Some(Special::text("Mình là trợ lý du lịch, rất vui được trò chuyện! Bạn muốn đi đâu nào?").with_type(UiType::Chitchat)),
            Intent::Thanks => Some(Special::text("Không có gì, chúc bạn có chuyến đi vui vẻ!").with_type(UiType::Thanks)),
            Intent::Farewell => Some(Special::text("Hẹn gặp lại bạn!").with_type(UiType::Farewell)),
            Intent::ShowItinerary => Some(self.show_itinerary(ctx)),
            Intent::CalculateCost => Some(self.calculate_cost(record, ctx).await),
            Intent::BookHotel => Some(self.book_hotel(record, ctx)),
            Intent::UpdatePeopleCount => Some(self.update_people_count(record, ctx)),
            Intent::GetDistance => Some(self.get_distance(record, ctx)),
            Intent::GetLocationTips => Some(self.get_location_tips(ctx).await),
            Intent::GetPlaceDetails | Intent::GetDetail => Some(self.get_place_details(utterance, ctx)),
            Intent::GetWeatherForecast => Some(self.get_weather_forecast(ctx).await),
            _ => None,
        }
    }

    fn show_itinerary(&self, ctx: &Context) -> Special {
        let Some(itinerary) = &ctx.last_itinerary else {
            return Special::text("Bạn chưa có lịch trình nào được lưu. Hãy bắt đầu lên kế hoạch chuyến đi trước nhé.");
        };
        let formatted = travel_aggregator::format_finalized_itinerary(itinerary);
        Special { reply: formatted.reply, ui_type: formatted.ui_type, ui_data: formatted.ui_data }
    }

    async fn calculate_cost(&self, record: &IntentRecord, ctx: &Context) -> Special {
        let mut parameters = Map::new();
        parameters.insert("duration".to_string(), serde_json::json!(ctx.duration.unwrap_or(3)));
        parameters.insert("people_count".to_string(), serde_json::json!(ctx.people_count.unwrap_or(1)));
        if let Some(level) = ctx.budget_level {
            parameters.insert("budget_level".to_string(), serde_json::json!(level));
        }
        if let Some(price) = ctx.selected_hotel_price {
            parameters.insert("hotel_data".to_string(), serde_json::json!([{"price": price}]));
        } else if let Some(hotel) = ctx.last_hotels.iter().find(|h| h.price.is_some()) {
            parameters.insert("hotel_data".to_string(), serde_json::json!([{"price": hotel.price}]));
        }

        let result = CostCalculatorExpert.execute(&record.reformulated_or("chi phí chuyến đi"), &parameters).await;
        let formatted = travel_aggregator::format_cost(&result);
        Special { reply: format!("💰 {}", formatted.reply), ui_type: UiType::CostBreakdown, ui_data: formatted.ui_data }
    }

    fn book_hotel(&self, record: &IntentRecord, ctx: &mut Context) -> Special {
        let Some(hotel_name) = &record.hotel_name else {
            return Special::text("Bạn muốn đặt khách sạn nào? Vui lòng cho mình biết tên khách sạn.");
        };

        let resolver = ReferenceResolver::new(None);
        let candidates: Vec<_> = ctx.last_hotels.iter().cloned().collect();
        let matched = resolver.resolve(hotel_name, &candidates).ok().cloned();

        ctx.selected_hotel = Some(hotel_name.clone());
        ctx.selected_hotel_price = matched.as_ref().and_then(|h| h.price);
        travel_workflow::state::on_hotel_selected(ctx);

        let mut ui_data = Map::new();
        ui_data.insert("selected_hotel".to_string(), Value::String(hotel_name.clone()));
        Special {
            reply: format!("Đã ghi nhận đặt phòng tại {hotel_name}."),
            ui_type: UiType::Booking,
            ui_data,
        }
    }

    fn update_people_count(&self, record: &IntentRecord, ctx: &mut Context) -> Special {
        let count = record.people_count.unwrap_or(ctx.people_count.unwrap_or(1)).max(1);
        ctx.people_count = Some(count);
        Special::text(format!("Đã cập nhật số lượng người: {count}."))
    }

    fn get_distance(&self, record: &IntentRecord, ctx: &Context) -> Special {
        let (Some(origin), Some(target)) = (&ctx.destination, &record.location) else {
            return Special::text("Mình cần biết hai địa điểm để tính khoảng cách.").with_type(UiType::DistanceInfo);
        };
        let origin_province = geo::normalize_location(origin);
        let target_province = geo::normalize_location(target);
        let (Some(a), Some(b)) = (geo::coords_for(&origin_province), geo::coords_for(&target_province)) else {
            return Special::text("Mình chưa có dữ liệu toạ độ cho một trong hai địa điểm này.").with_type(UiType::DistanceInfo);
        };
        let km = geo::haversine_km(a, b);
        let mut ui_data = Map::new();
        ui_data.insert("distance_km".to_string(), serde_json::json!((km * 10.0).round() / 10.0));
        Special {
            reply: format!("Khoảng cách giữa {origin} và {target} khoảng {km:.0} km."),
            ui_type: UiType::DistanceInfo,
            ui_data,
        }
    }

    async fn get_location_tips(&self, ctx: &Context) -> Special {
        let expert = GeneralInfoExpert::new(self.llm.clone(), Arc::clone(&self.document_store));
        let mut parameters = Map::new();
        if let Some(dest) = &ctx.destination {
            parameters.insert("location".to_string(), Value::String(dest.clone()));
        }
        let result = expert.execute("mẹo du lịch", &parameters).await;
        let formatted = travel_aggregator::format_general_info(&result);
        Special { reply: formatted.reply, ui_type: UiType::Tips, ui_data: formatted.ui_data }
    }

    fn get_place_details(&self, utterance: &str, ctx: &Context) -> Special {
        let resolver = ReferenceResolver::new(None);
        let spots: Vec<_> = ctx.last_spots.iter().cloned().collect();
        let hotels: Vec<_> = ctx.last_hotels.iter().cloned().collect();

        if let Ok(spot) = resolver.resolve(utterance, &spots) {
            let mut ui_data = Map::new();
            ui_data.insert("spot".to_string(), serde_json::to_value(spot).unwrap_or(Value::Null));
            return Special { reply: format!("Đây là thông tin về {}.", spot.name), ui_type: UiType::SpotDetail, ui_data };
        }
        if let Ok(hotel) = resolver.resolve(utterance, &hotels) {
            let mut ui_data = Map::new();
            ui_data.insert("hotel".to_string(), serde_json::to_value(hotel).unwrap_or(Value::Null));
            return Special { reply: format!("Đây là thông tin về {}.", hotel.name), ui_type: UiType::HotelDetail, ui_data };
        }
        Special::text("Mình chưa rõ bạn muốn xem chi tiết địa điểm nào, bạn có thể nói rõ hơn không?")
    }

    async fn get_weather_forecast(&self, ctx: &Context) -> Special {
        let Some(weather) = &self.weather else {
            return Special::text("Hiện mình chưa có dữ liệu thời tiết cho địa điểm này.");
        };
        let Some(dest) = &ctx.destination else {
            return Special::text("Bạn muốn xem thời tiết ở đâu?");
        };
        let province = geo::normalize_location(dest);
        let start_date = ctx.start_date.clone().unwrap_or_else(|| "2026-01-01".to_string());
        match weather.get_weather(&province, &start_date, ctx.duration.unwrap_or(3)).await {
            Ok(forecast) => Special::text(format!(
                "Thời tiết tại {dest} nhìn chung {}.",
                forecast.overall_comfort_level
            )),
            Err(_) => Special::text("Mình chưa lấy được dự báo thời tiết lúc này, bạn thử lại sau nhé."),
        }
    }
}

impl Special {
    fn with_type(mut self, ui_type: UiType) -> Self {
        self.ui_type = ui_type;
        self
    }
}

trait ReformulatedOr {
    fn reformulated_or(&self, fallback: &str) -> String;
}

impl ReformulatedOr for IntentRecord {
    fn reformulated_or(&self, fallback: &str) -> String {
        self.location.clone().map(|l| format!("chi phí cho {l}")).unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use travel_core::collaborators::{CollabResult, Filter};
    use travel_core::types::SessionId;

    struct EmptyStore;
    #[async_trait]
    impl DocumentStore for EmptyStore {
        async fn find(&self, _collection: &str, _filter: &Filter) -> CollabResult<Vec<Value>> {
            Ok(Vec::new())
        }
        async fn find_one(&self, _collection: &str, _filter: &Filter) -> CollabResult<Option<Value>> {
            Ok(None)
        }
    }

    fn handlers() -> SpecialHandlers {
        SpecialHandlers::new(None, None, Arc::new(EmptyStore))
    }

    #[tokio::test]
    async fn greeting_is_canned_and_recognized() {
        let mut ctx = Context::new(SessionId::from("s1"));
        let record = IntentRecord::fallback(Intent::Greeting, 0.9);
        let special = handlers().handle(&record, "chào bạn", &mut ctx).await.unwrap();
        assert_eq!(special.ui_type, UiType::Greeting);
    }

    #[tokio::test]
    async fn non_special_intent_returns_none() {
        let mut ctx = Context::new(SessionId::from("s1"));
        let record = IntentRecord::fallback(Intent::FindSpot, 0.9);
        assert!(handlers().handle(&record, "tìm địa điểm", &mut ctx).await.is_none());
    }

    #[tokio::test]
    async fn show_itinerary_without_saved_plan_prompts_to_start() {
        let mut ctx = Context::new(SessionId::from("s1"));
        let record = IntentRecord::fallback(Intent::ShowItinerary, 0.9);
        let special = handlers().handle(&record, "xem lịch trình", &mut ctx).await.unwrap();
        assert!(special.reply.contains("chưa có lịch trình"));
    }

    #[tokio::test]
    async fn book_hotel_without_name_prompts_for_one() {
        let mut ctx = Context::new(SessionId::from("s1"));
        let record = IntentRecord::fallback(Intent::BookHotel, 0.9);
        let special = handlers().handle(&record, "đặt phòng", &mut ctx).await.unwrap();
        assert!(special.reply.contains("khách sạn nào"));
    }

    #[tokio::test]
    async fn update_people_count_sets_context() {
        let mut ctx = Context::new(SessionId::from("s1"));
        let mut record = IntentRecord::fallback(Intent::UpdatePeopleCount, 0.9);
        record.people_count = Some(5);
        handlers().handle(&record, "5 người", &mut ctx).await;
        assert_eq!(ctx.people_count, Some(5));
    }
}
