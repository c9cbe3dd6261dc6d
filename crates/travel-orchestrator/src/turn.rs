//! The Master Orchestrator (C9, spec §4.1): wires every other component
//! into the unary turn algorithm and its streaming variant (spec §5).

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Datelike;
use futures_util::FutureExt;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use travel_builder::DayOutcome;
use travel_core::collaborators::{DocumentStore, HybridSearch, LlmClient, WeatherService};
use travel_core::config::TravelConfig;
use travel_core::context::{Context, WorkflowState};
use travel_core::geo;
use travel_core::types::{SessionId, TaskId};
use travel_experts::dispatch::ExpertDispatcher;
use travel_experts::{CostCalculatorExpert, FoodExpert, GeneralInfoExpert, HotelExpert, ItineraryExpert, SpotExpert};
use travel_intent::MultiIntentExtractor;
use travel_protocol::chunk::{ChunkStatus, ResponseChunk, TurnMessage, TurnRequest, UiType};
use travel_protocol::expert::ExpertResult;
use travel_protocol::intent::{Intent, IntentRecord};
use travel_protocol::task::{ExecutionPlan, TaskType};
use travel_verifier::Verifier;
use travel_workflow::gate::{self, GateDecision};
use travel_workflow::guard::{self, GuardVerdict};

use crate::convert::to_recent_record;
use crate::special::SpecialHandlers;
use crate::{merge, metadata, rerank, stage};

pub struct Orchestrator {
    extractor: MultiIntentExtractor,
    dispatcher: ExpertDispatcher,
    verifier: Verifier,
    special: SpecialHandlers,
    weather: Option<Arc<dyn WeatherService>>,
    config: TravelConfig,
}

struct ReplyBundle {
    reply: String,
    ui_type: UiType,
    ui_data: Map<String, serde_json::Value>,
}

impl Orchestrator {
    pub fn new(
        llm: Option<Arc<dyn LlmClient>>,
        weather: Option<Arc<dyn WeatherService>>,
        hybrid_search: Option<Arc<dyn HybridSearch>>,
        document_store: Arc<dyn DocumentStore>,
        config: TravelConfig,
    ) -> Self {
        let mut dispatcher = ExpertDispatcher::new();
        dispatcher.register(Box::new(SpotExpert::new(hybrid_search.clone(), Arc::clone(&document_store))));
        dispatcher.register(Box::new(HotelExpert::new(hybrid_search.clone(), Arc::clone(&document_store))));
        dispatcher.register(Box::new(FoodExpert::new(Arc::clone(&document_store))));
        dispatcher.register(Box::new(ItineraryExpert::new(llm.clone(), weather.clone())));
        dispatcher.register(Box::new(CostCalculatorExpert));
        dispatcher.register(Box::new(GeneralInfoExpert::new(llm.clone(), Arc::clone(&document_store))));

        Self {
            extractor: MultiIntentExtractor::new(llm.clone()),
            dispatcher,
            verifier: Verifier::new(llm.clone()),
            special: SpecialHandlers::new(llm, weather.clone(), document_store),
            weather,
            config,
        }
    }

    /// Run one unary turn (spec §4.1's 11 steps). Never panics out to the
    /// caller — a panic anywhere in the turn body is caught here and turned
    /// into an error chunk, the only panic boundary in the system.
    pub async fn run_turn(&self, request: TurnRequest) -> ResponseChunk {
        let session_id = session_id_of(&request);
        let span = tracing::info_span!("turn", session = %session_id.0);
        let _enter = span.enter();

        match AssertUnwindSafe(self.run_turn_inner(request, session_id.clone())).catch_unwind().await {
            Ok(chunk) => chunk,
            Err(_) => {
                tracing::error!("turn panicked, returning error chunk");
                ResponseChunk::error(
                    "Đã có lỗi xảy ra, vui lòng thử lại.",
                    serde_json::json!({"session_id": session_id.0}),
                )
            }
        }
    }

    /// Streaming variant (spec §5): executes stages in the fixed order, and
    /// yields a partial chunk after each stage that produced content. While
    /// `workflow_state` is one of the early, spot-selection-heavy states,
    /// priority-break mode stops after the first content-yielding stage so
    /// the client doesn't get flooded with sections it can't act on yet.
    pub async fn run_turn_streaming(&self, request: TurnRequest) -> mpsc::Receiver<ResponseChunk> {
        let (tx, rx) = mpsc::channel(8);
        let session_id = session_id_of(&request);

        let Some(last_user) = request.messages.iter().rev().find(|m| m.role == "user").cloned() else {
            let _ = tx.send(ResponseChunk::error("no user message in the turn request", serde_json::Value::Null)).await;
            return rx;
        };

        let mut ctx = Context::restore_or_fresh(session_id.clone(), request.context.as_ref());
        for message in &request.messages {
            ctx.push_chat(&message.role, &message.content);
        }

        let utterance = last_user.content.clone();
        let record = self.extract_or_fallback(&utterance, &ctx).await;
        merge::apply(&mut ctx, &record);

        let record = match gate::apply(record, &ctx, &utterance) {
            GateDecision::Proceed(r) => r,
            GateDecision::ShortCircuitToBuilder => {
                let bundle = self.route_builder_turn(&mut ctx, &utterance, false).await;
                ctx.push_chat("assistant", &bundle.reply);
                let chunk = ResponseChunk::complete(bundle.reply, context_value(&ctx)).with_ui(bundle.ui_type, bundle.ui_data);
                let _ = tx.send(chunk).await;
                return rx;
            }
            GateDecision::BacktrackToBuilder => {
                let bundle = self.route_builder_turn(&mut ctx, &utterance, true).await;
                ctx.push_chat("assistant", &bundle.reply);
                let chunk = ResponseChunk::complete(bundle.reply, context_value(&ctx)).with_ui(bundle.ui_type, bundle.ui_data);
                let _ = tx.send(chunk).await;
                return rx;
            }
        };

        if let GuardVerdict::Blocked { prompt } = guard::check(record.primary_intent, &ctx) {
            let _ = tx.send(blocked_chunk(prompt, &ctx)).await;
            return rx;
        }

        if let Some(special) = self.special.handle(&record, &utterance, &mut ctx).await {
            ctx.push_chat("assistant", &special.reply);
            let meta = metadata::build(&record, &ctx, record.primary_intent, record.flow_action);
            let chunk = ResponseChunk::complete(special.reply, context_value(&ctx))
                .with_ui(special.ui_type, special.ui_data)
                .with_metadata(meta);
            let _ = tx.send(chunk).await;
            return rx;
        }

        let plan = match travel_planner::build_plan(&record) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "planning failed");
                let _ = tx.send(ResponseChunk::error("Mình chưa lên được kế hoạch cho yêu cầu này.", context_value(&ctx))).await;
                return rx;
            }
        };

        let priority_break = matches!(
            ctx.workflow_state,
            WorkflowState::Initial | WorkflowState::ChoosingSpots | WorkflowState::ChoosingHotel
        );
        let workflow_state_for_stages = ctx.workflow_state;

        let results = self.execute_plan(&plan).await;
        self.merge_results_into_context(&mut ctx, &plan, &results);
        self.transition_workflow(&mut ctx, &record);

        let groups = stage::group(&plan, workflow_state_for_stages);

        for (_stage, tasks) in &groups {
            let mut any_content = false;
            for task in tasks {
                if let Some(result) = results.get(&task.task_id) {
                    if !result.data.is_empty() {
                        any_content = true;
                    }
                    let formatted = format_single(task.task_type, result);
                    let chunk = ResponseChunk::partial(formatted.reply, context_value(&ctx))
                        .with_ui(formatted.ui_type, formatted.ui_data);
                    if tx.send(chunk).await.is_err() {
                        return rx;
                    }
                }
            }
            if any_content && priority_break {
                break;
            }
        }

        let effective_intent = rerank::select(&by_task_type(&plan, &results), record.primary_intent, &self.config.rerank);
        let bundle = self.aggregate(&plan, &results);
        ctx.push_chat("assistant", &bundle.reply);
        let meta = metadata::build(&record, &ctx, effective_intent, record.flow_action);
        let final_chunk = ResponseChunk::complete(bundle.reply, context_value(&ctx))
            .with_ui(bundle.ui_type, bundle.ui_data)
            .with_metadata(meta);
        let _ = tx.send(final_chunk).await;

        rx
    }

    async fn run_turn_inner(&self, request: TurnRequest, session_id: SessionId) -> ResponseChunk {
        let Some(last_user) = request.messages.iter().rev().find(|m| m.role == "user") else {
            return ResponseChunk::error("no user message in the turn request", serde_json::Value::Null);
        };
        let utterance = last_user.content.clone();

        let mut ctx = Context::restore_or_fresh(session_id, request.context.as_ref());
        for message in &request.messages {
            ctx.push_chat(&message.role, &message.content);
        }

        let record = self.extract_or_fallback(&utterance, &ctx).await;
        merge::apply(&mut ctx, &record);

        let record = match gate::apply(record, &ctx, &utterance) {
            GateDecision::Proceed(r) => r,
            GateDecision::ShortCircuitToBuilder => {
                let bundle = self.route_builder_turn(&mut ctx, &utterance, false).await;
                ctx.push_chat("assistant", &bundle.reply);
                return ResponseChunk::complete(bundle.reply, context_value(&ctx)).with_ui(bundle.ui_type, bundle.ui_data);
            }
            GateDecision::BacktrackToBuilder => {
                let bundle = self.route_builder_turn(&mut ctx, &utterance, true).await;
                ctx.push_chat("assistant", &bundle.reply);
                return ResponseChunk::complete(bundle.reply, context_value(&ctx)).with_ui(bundle.ui_type, bundle.ui_data);
            }
        };

        if let GuardVerdict::Blocked { prompt } = guard::check(record.primary_intent, &ctx) {
            return blocked_chunk(prompt, &ctx);
        }

        if let Some(special) = self.special.handle(&record, &utterance, &mut ctx).await {
            ctx.push_chat("assistant", &special.reply);
            let meta = metadata::build(&record, &ctx, record.primary_intent, record.flow_action);
            return ResponseChunk::complete(special.reply, context_value(&ctx))
                .with_ui(special.ui_type, special.ui_data)
                .with_metadata(meta);
        }

        let plan = match travel_planner::build_plan(&record) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "planning failed");
                return ResponseChunk::error("Mình chưa lên được kế hoạch cho yêu cầu này.", context_value(&ctx));
            }
        };

        let results = self.execute_plan(&plan).await;
        self.merge_results_into_context(&mut ctx, &plan, &results);
        self.transition_workflow(&mut ctx, &record);

        let effective_intent = rerank::select(&by_task_type(&plan, &results), record.primary_intent, &self.config.rerank);
        let bundle = self.aggregate(&plan, &results);
        ctx.push_chat("assistant", &bundle.reply);

        let meta = metadata::build(&record, &ctx, effective_intent, record.flow_action);
        ResponseChunk::complete(bundle.reply, context_value(&ctx))
            .with_ui(bundle.ui_type, bundle.ui_data)
            .with_metadata(meta)
    }

    async fn extract_or_fallback(&self, utterance: &str, ctx: &Context) -> IntentRecord {
        match self.extractor.extract(utterance, ctx).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "intent extraction failed, falling back to general_qa");
                IntentRecord::fallback(Intent::GeneralQa, 0.3)
            }
        }
    }

    async fn execute_plan(&self, plan: &ExecutionPlan) -> HashMap<TaskId, ExpertResult> {
        let mut results: HashMap<TaskId, ExpertResult> = HashMap::new();
        for (_priority, group) in plan.parallel_tasks() {
            let futures = group.iter().map(|task| self.dispatcher.dispatch(task, &results));
            let group_results = futures_util::future::join_all(futures).await;
            for (task, result) in group.iter().zip(group_results) {
                results.insert(task.task_id.clone(), result);
            }
        }
        results
    }

    fn merge_results_into_context(&self, ctx: &mut Context, plan: &ExecutionPlan, results: &HashMap<TaskId, ExpertResult>) {
        for task in &plan.tasks {
            let Some(result) = results.get(&task.task_id) else { continue };
            if !result.success {
                continue;
            }
            match task.task_type {
                TaskType::FindSpots => ctx.push_recent_spots(result.data.iter().map(to_recent_record)),
                TaskType::FindHotels => ctx.push_recent_hotels(result.data.iter().map(to_recent_record)),
                TaskType::FindFood => ctx.push_recent_foods(result.data.iter().map(to_recent_record)),
                TaskType::CreateItinerary | TaskType::CalculateCost | TaskType::GeneralInfo => {}
            }
        }
    }

    fn transition_workflow(&self, ctx: &mut Context, record: &IntentRecord) {
        if record.primary_intent == Intent::PlanTrip {
            travel_workflow::state::on_plan_trip_started(ctx);
            if ctx.workflow_state == WorkflowState::ChoosingSpots && ctx.itinerary_builder.is_none() {
                if let (Some(location), Some(duration)) = (ctx.destination.clone(), ctx.duration) {
                    let candidates: Vec<_> = ctx.last_spots.iter().cloned().collect();
                    travel_builder::start(ctx, location, duration, candidates);
                }
            }
        }
    }

    fn aggregate(&self, plan: &ExecutionPlan, results: &HashMap<TaskId, ExpertResult>) -> ReplyBundle {
        if plan.tasks.len() == 1 {
            let task = &plan.tasks[0];
            let Some(result) = results.get(&task.task_id) else {
                return ReplyBundle { reply: "Mình chưa tìm được thông tin phù hợp.".to_string(), ui_type: UiType::Text, ui_data: Map::new() };
            };
            let formatted = format_single(task.task_type, result);
            return ReplyBundle { reply: formatted.reply, ui_type: formatted.ui_type, ui_data: formatted.ui_data };
        }

        let pairs: Vec<(TaskType, &ExpertResult)> =
            plan.tasks.iter().filter_map(|t| results.get(&t.task_id).map(|r| (t.task_type, r))).collect();
        let header = Some(format!("Đây là kế hoạch cho chuyến đi tới {}.", plan.location.as_deref().unwrap_or("điểm đến của bạn")));
        let sections = travel_aggregator::assemble(&pairs, header);
        let reply = travel_aggregator::combined_reply(&sections);
        let ui_data = travel_aggregator::combined_ui_data(&sections);
        ReplyBundle { reply, ui_type: UiType::Comprehensive, ui_data }
    }

    /// Routes a turn the gate diverted away from planning into the
    /// in-progress builder's continuation (spec §4.6). `backtrack` rebuilds
    /// the builder from `last_itinerary` first when it was already cleared
    /// by an earlier `finalize`.
    async fn route_builder_turn(&self, ctx: &mut Context, utterance: &str, backtrack: bool) -> ReplyBundle {
        if backtrack {
            travel_workflow::state::on_backtrack_to_spots(ctx);
            if let Some(builder) = ctx.itinerary_builder.as_mut() {
                if builder.available_spots.is_empty() {
                    builder.available_spots = ctx.last_spots.iter().cloned().collect();
                }
            }
            return self.offer_day_bundle(ctx, "Bạn muốn thêm hoặc đổi địa điểm nào cho lịch trình hiện tại?");
        }

        let Some(builder) = ctx.itinerary_builder.clone() else {
            return no_active_builder_bundle();
        };

        if builder.waiting_for_start_date {
            let province = geo::normalize_location(&builder.location);
            return match travel_builder::handle_start_date(ctx, utterance, self.weather.as_deref(), &province).await {
                Ok(best_months) => {
                    let waiting_for_month =
                        ctx.itinerary_builder.as_ref().map(|b| b.waiting_for_month_selection).unwrap_or(false);
                    if waiting_for_month {
                        month_selector_bundle(best_months)
                    } else {
                        self.offer_day_bundle(ctx, "Đã ghi nhận ngày khởi hành. Đây là một vài địa điểm cho ngày 1:")
                    }
                }
                Err(_) => no_active_builder_bundle(),
            };
        }

        if builder.waiting_for_month_selection {
            let Some(month) = parse_month(utterance) else {
                return month_selector_bundle(Vec::new());
            };
            travel_builder::handle_month_selection(ctx, month, chrono::Utc::now().year());
            return self.offer_day_bundle(ctx, "Đã chọn tháng, đây là một vài địa điểm cho ngày 1:");
        }

        match travel_builder::handle_day_input(ctx, utterance, &self.verifier).await {
            Ok(DayOutcome::Continuing) => self.offer_day_bundle(ctx, "Đây là thêm vài lựa chọn, bạn muốn chọn gì?"),
            Ok(DayOutcome::AdvancedDay(day)) => {
                self.offer_day_bundle(ctx, &format!("Đã ghi nhận, sang ngày {day} nhé. Bạn muốn chọn địa điểm nào?"))
            }
            Ok(DayOutcome::Finished(itinerary)) => {
                let formatted = travel_aggregator::format_finalized_itinerary(&itinerary);
                ReplyBundle { reply: formatted.reply, ui_type: formatted.ui_type, ui_data: formatted.ui_data }
            }
            Ok(DayOutcome::AbandonedForAutoGenerate) => ReplyBundle {
                reply: "Được rồi, mình sẽ tự động tạo lịch trình còn lại cho bạn.".to_string(),
                ui_type: UiType::Text,
                ui_data: Map::new(),
            },
            Ok(DayOutcome::Cancelled) => ReplyBundle {
                reply: "Đã huỷ việc chọn địa điểm cho lịch trình này.".to_string(),
                ui_type: UiType::Text,
                ui_data: Map::new(),
            },
            Err(_) => no_active_builder_bundle(),
        }
    }

    fn offer_day_bundle(&self, ctx: &Context, preamble: &str) -> ReplyBundle {
        let offer = travel_builder::offer_for_day(ctx);
        let mut ui_data = Map::new();
        ui_data.insert("spots".to_string(), serde_json::to_value(&offer).unwrap_or(Value::Null));
        ReplyBundle { reply: preamble.to_string(), ui_type: UiType::SpotSelectorTable, ui_data }
    }
}

fn no_active_builder_bundle() -> ReplyBundle {
    ReplyBundle {
        reply: "Mình chưa có lịch trình nào đang xây dựng, bạn muốn bắt đầu lên kế hoạch mới không?".to_string(),
        ui_type: UiType::Text,
        ui_data: Map::new(),
    }
}

fn month_selector_bundle(best_months: Vec<u32>) -> ReplyBundle {
    let months = if best_months.is_empty() { (1..=12).collect() } else { best_months };
    let reply = format!(
        "Mình chưa rõ ngày khởi hành cụ thể. Bạn muốn đi vào tháng nào? Gợi ý: {}.",
        months.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
    );
    let mut ui_data = Map::new();
    ui_data.insert("months".to_string(), serde_json::json!(months));
    ReplyBundle { reply, ui_type: UiType::MonthSelector, ui_data }
}

fn parse_month(text: &str) -> Option<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|tok| !tok.is_empty())
        .find_map(|tok| tok.parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
}

fn format_single(task_type: TaskType, result: &ExpertResult) -> travel_aggregator::Formatted {
    match task_type {
        TaskType::FindSpots => travel_aggregator::format_spots(result),
        TaskType::FindHotels => travel_aggregator::format_hotels(result),
        TaskType::FindFood => travel_aggregator::format_food(result),
        TaskType::CreateItinerary => travel_aggregator::format_itinerary(result),
        TaskType::CalculateCost => travel_aggregator::format_cost(result),
        TaskType::GeneralInfo => travel_aggregator::format_general_info(result),
    }
}

fn by_task_type(plan: &ExecutionPlan, results: &HashMap<TaskId, ExpertResult>) -> HashMap<TaskType, ExpertResult> {
    plan.tasks
        .iter()
        .filter_map(|t| results.get(&t.task_id).map(|r| (t.task_type, r.clone())))
        .collect()
}

fn session_id_of(request: &TurnRequest) -> SessionId {
    let raw = request.context.as_ref().and_then(|c| c.get("session_id")).and_then(|v| v.as_str());
    SessionId::from(raw.unwrap_or("anonymous"))
}

fn context_value(ctx: &Context) -> serde_json::Value {
    serde_json::to_value(ctx).unwrap_or(serde_json::Value::Null)
}

fn blocked_chunk(prompt: &'static str, ctx: &Context) -> ResponseChunk {
    let reply = match prompt {
        "find_hotel" => "Bạn đã chọn khách sạn nào chưa? Hãy tìm khách sạn trước khi tính chi phí nhé.",
        "destination" => "Bạn muốn đi đâu? Hãy cho mình biết điểm đến trước nhé.",
        _ => "Mình cần thêm thông tin trước khi thực hiện yêu cầu này.",
    };
    let mut chunk = ResponseChunk::complete(reply, context_value(ctx)).with_ui(UiType::Options, Map::new());
    chunk.status = ChunkStatus::Blocked;
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::collaborators::{CollabResult, Filter};
    use async_trait::async_trait;

    struct EmptyStore;
    #[async_trait]
    impl DocumentStore for EmptyStore {
        async fn find(&self, _collection: &str, _filter: &Filter) -> CollabResult<Vec<serde_json::Value>> {
            Ok(Vec::new())
        }
        async fn find_one(&self, _collection: &str, _filter: &Filter) -> CollabResult<Option<serde_json::Value>> {
            Ok(None)
        }
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(None, None, None, Arc::new(EmptyStore), TravelConfig::default())
    }

    fn request(text: &str) -> TurnRequest {
        TurnRequest { messages: vec![TurnMessage { role: "user".to_string(), content: text.to_string() }], context: None }
    }

    #[tokio::test]
    async fn greeting_short_circuits_without_planning() {
        let chunk = orchestrator().run_turn(request("chào bạn")).await;
        assert_eq!(chunk.ui_type, UiType::Greeting);
    }

    #[tokio::test]
    async fn empty_messages_yields_error_chunk() {
        let req = TurnRequest { messages: Vec::new(), context: None };
        let chunk = orchestrator().run_turn(req).await;
        assert_eq!(chunk.status, ChunkStatus::Error);
    }

    #[tokio::test]
    async fn calculate_cost_without_destination_is_blocked() {
        let chunk = orchestrator().run_turn(request("chi phí chuyến đi bao nhiêu")).await;
        assert_eq!(chunk.status, ChunkStatus::Blocked);
    }

    fn ctx_with_active_builder() -> Context {
        let mut ctx = Context::new(SessionId::from("s1"));
        ctx.destination = Some("lao-cai".to_string());
        ctx.duration = Some(2);
        ctx.workflow_state = WorkflowState::ChoosingSpots;
        let candidates = vec![travel_core::context::RecentRecord {
            id: "1".to_string(),
            name: "Fansipan".to_string(),
            category: Some("viewpoint".to_string()),
            rating: Some(4.8),
            price: None,
            lat: None,
            lng: None,
            image: None,
            best_visit_time: Vec::new(),
            avg_duration_min: None,
        }];
        travel_builder::start(&mut ctx, "lao-cai".to_string(), 2, candidates);
        if let Some(builder) = ctx.itinerary_builder.as_mut() {
            builder.waiting_for_start_date = false;
        }
        ctx
    }

    #[tokio::test]
    async fn builder_short_circuit_advances_the_day_instead_of_parroting_a_fixed_prompt() {
        let ctx = ctx_with_active_builder();
        let req = TurnRequest {
            messages: vec![TurnMessage { role: "user".to_string(), content: "Fansipan".to_string() }],
            context: Some(serde_json::to_value(&ctx).unwrap()),
        };
        let chunk = orchestrator().run_turn(req).await;
        assert_eq!(chunk.ui_type, UiType::SpotSelectorTable);
    }

    #[tokio::test]
    async fn backtrack_rebuilds_builder_and_offers_spots_again() {
        let mut ctx = Context::new(SessionId::from("s1"));
        ctx.workflow_state = WorkflowState::ChoosingHotel;
        ctx.last_itinerary = Some(travel_core::context::FinalizedItinerary {
            location: "lao-cai".to_string(),
            duration: 1,
            days: vec![],
            estimated_cost: None,
            verification_verdict: Some("pass".to_string()),
        });
        let req = TurnRequest {
            messages: vec![TurnMessage { role: "user".to_string(), content: "mình muốn thêm địa điểm nữa".to_string() }],
            context: Some(serde_json::to_value(&ctx).unwrap()),
        };
        let chunk = orchestrator().run_turn(req).await;
        assert_eq!(chunk.ui_type, UiType::SpotSelectorTable);
    }
}
