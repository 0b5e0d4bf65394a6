pub mod dummies;
pub mod stubs;

pub use dummies::{batch_of, observation, space};
pub use stubs::{
    FailingTask, ProbeTask, PulsePublisher, SharedLog, SpySubscriber, VecSource, shared_log,
};
