pub mod chunk;
pub mod expert;
pub mod intent;
pub mod task;
pub mod verification;

pub use chunk::{ChunkMetadata, ChunkStatus, ResponseChunk, TurnMessage, TurnRequest, UiType};
pub use expert::ExpertResult;
pub use intent::{Accommodation, ContextRelation, FlowAction, Intent, IntentRecord};
pub use task::{ExecutionPlan, SubTask, TaskType};
pub use verification::{IssueSeverity, Verdict, VerificationIssue, VerificationResult};
