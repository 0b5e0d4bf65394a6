pub mod core;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
