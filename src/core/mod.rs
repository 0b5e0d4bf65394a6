mod boundaries;
mod events;
mod feature_space;
mod observation;

pub use boundaries::Boundaries;
pub use events::{EventBatch, EventKind, StreamEvent};
pub use feature_space::FeatureSpace;
pub use observation::Observation;
