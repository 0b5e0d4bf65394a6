pub mod observations;

pub use observations::{batch_of, observation, space};
