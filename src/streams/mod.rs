pub mod generators;
mod source;

pub use generators::DriftingClusterGenerator;
pub use source::ObservationSource;
