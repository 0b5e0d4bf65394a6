mod boundary_detector;
mod moving_average;
mod normalizer_minmax;
mod sliding_window;
mod task;

pub use boundary_detector::BoundaryDetector;
pub use moving_average::MovingAverage;
pub use normalizer_minmax::NormalizerMinMax;
pub use sliding_window::SlidingWindow;
pub use task::{AdaptationPublisher, AdaptationSubscriber, StreamTask, TaskError};
