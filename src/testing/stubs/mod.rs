pub mod probes;
pub mod vec_source;

pub use probes::{FailingTask, ProbeTask, PulsePublisher, SharedLog, SpySubscriber, shared_log};
pub use vec_source::VecSource;
