mod adaptation;
mod graph;
mod scenario;

pub use adaptation::{
    AdaptationEvent, AdaptationKind, MinMaxParams, Renormalization, RenormalizationError,
};
pub use graph::{StreamWorkflow, TaskId, WorkflowError};
pub use scenario::{RunStats, StreamScenario};
