use crate::core::{FeatureSpace, Observation};
use std::io::Error;
use std::sync::Arc;

/// Pull-based interface for sources that produce [`Observation`]s.
///
/// Implementations may represent finite recordings or unbounded generators.
/// All returned observations must share the same, immutable [`FeatureSpace`]
/// and carry strictly increasing ids for the lifetime of the source.
pub trait ObservationSource {
    /// Returns the feature space every observation of this source lives in.
    fn feature_space(&self) -> &Arc<FeatureSpace>;

    /// Indicates whether the source *may* produce more observations.
    ///
    /// Finite sources should return `false` once exhausted; unbounded
    /// generators typically return `true` always. If it returns `false`, a
    /// subsequent call to [`next_observation`](Self::next_observation) must
    /// return `None`.
    fn has_more_observations(&self) -> bool;

    /// Produces the next observation, or `None` if the source is exhausted.
    fn next_observation(&mut self) -> Option<Observation>;

    /// Resets the source to its initial state.
    ///
    /// For generators this re-seeds the RNG and clears internal counters; the
    /// feature space must remain unchanged. Returns an error if the
    /// underlying data cannot be reopened.
    fn restart(&mut self) -> Result<(), Error>;
}
