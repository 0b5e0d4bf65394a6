mod drifting_cluster;

pub use drifting_cluster::DriftingClusterGenerator;
