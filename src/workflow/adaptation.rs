use crate::core::Boundaries;
use strum_macros::Display;
use thiserror::Error;

/// Tag identifying the named adaptation channel an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AdaptationKind {
    BoundariesChanged,
    Recalibrated,
}

/// Notification published by a calibrating task to its subscribers.
///
/// Ephemeral by design: constructed at publish time, consumed during
/// synchronous delivery, never stored by subscribers.
#[derive(Debug, Clone)]
pub enum AdaptationEvent {
    /// The observed value boundaries widened.
    BoundariesChanged(Boundaries),
    /// A normalizer switched parameters; carries the old-to-new mapping.
    Recalibrated(Renormalization),
}

impl AdaptationEvent {
    pub fn kind(&self) -> AdaptationKind {
        match self {
            AdaptationEvent::BoundariesChanged(_) => AdaptationKind::BoundariesChanged,
            AdaptationEvent::Recalibrated(_) => AdaptationKind::Recalibrated,
        }
    }
}

/// Reasons a renormalization cannot be carried out. All of these are
/// recoverable: the caller logs and keeps its state unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenormalizationError {
    #[error("no prior calibration to invert from")]
    NoPriorCalibration,

    #[error("dimensionality mismatch: expected {expected}, got {actual}")]
    DimensionalityMismatch { expected: usize, actual: usize },

    #[error("non-invertible scale on dimension {0}")]
    DegenerateScale(usize),
}

/// Per-dimension affine mapping `normalized = scale * raw + shift`.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxParams {
    scale: Vec<f64>,
    shift: Vec<f64>,
}

impl MinMaxParams {
    pub fn new(scale: Vec<f64>, shift: Vec<f64>) -> MinMaxParams {
        MinMaxParams { scale, shift }
    }

    /// Derives the mapping that takes each dimension's observed interval onto
    /// `[dst_low, dst_high]`.
    ///
    /// A dimension whose interval has collapsed to a single point keeps unit
    /// scale and is shifted onto the destination midpoint, so the mapping
    /// stays invertible.
    pub fn from_boundaries(bounds: &Boundaries, dst_low: f64, dst_high: f64) -> MinMaxParams {
        let dim = bounds.dimensionality();
        let mut scale = Vec::with_capacity(dim);
        let mut shift = Vec::with_capacity(dim);

        for d in 0..dim {
            let lower = bounds.lower_at(d).unwrap_or(f64::INFINITY);
            let upper = bounds.upper_at(d).unwrap_or(f64::NEG_INFINITY);
            let range = upper - lower;
            if range > 0.0 {
                let a = (dst_high - dst_low) / range;
                scale.push(a);
                shift.push(dst_low - lower * a);
            } else {
                scale.push(1.0);
                shift.push((dst_low + dst_high) / 2.0 - lower);
            }
        }

        MinMaxParams { scale, shift }
    }

    pub fn dimensionality(&self) -> usize {
        self.scale.len()
    }

    pub fn scale_at(&self, dim: usize) -> Option<f64> {
        self.scale.get(dim).copied()
    }

    /// Maps raw values into the normalized space.
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, RenormalizationError> {
        self.check_dimensionality(values)?;
        Ok(values
            .iter()
            .zip(self.scale.iter().zip(&self.shift))
            .map(|(v, (a, b))| a * v + b)
            .collect())
    }

    /// Maps normalized values back into the raw space.
    pub fn invert(&self, values: &[f64]) -> Result<Vec<f64>, RenormalizationError> {
        self.check_dimensionality(values)?;
        if let Some(dim) = self
            .scale
            .iter()
            .position(|a| *a == 0.0 || !a.is_finite())
        {
            return Err(RenormalizationError::DegenerateScale(dim));
        }
        Ok(values
            .iter()
            .zip(self.scale.iter().zip(&self.shift))
            .map(|(v, (a, b))| (v - b) / a)
            .collect())
    }

    fn check_dimensionality(&self, values: &[f64]) -> Result<(), RenormalizationError> {
        if values.len() != self.scale.len() {
            return Err(RenormalizationError::DimensionalityMismatch {
                expected: self.scale.len(),
                actual: values.len(),
            });
        }
        Ok(())
    }
}

/// The capability a recalibrated normalizer hands to its subscribers: maps a
/// value computed under the previous parameters to its equivalent under the
/// current ones, by inverting the old scale/shift and applying the new.
#[derive(Debug, Clone)]
pub struct Renormalization {
    previous: Option<MinMaxParams>,
    current: MinMaxParams,
}

impl Renormalization {
    pub fn new(previous: Option<MinMaxParams>, current: MinMaxParams) -> Renormalization {
        Renormalization { previous, current }
    }

    pub fn current(&self) -> &MinMaxParams {
        &self.current
    }

    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, RenormalizationError> {
        let previous = self
            .previous
            .as_ref()
            .ok_or(RenormalizationError::NoPriorCalibration)?;
        let raw = previous.invert(values)?;
        self.current.apply(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(pairs: &[(f64, f64)]) -> Boundaries {
        let mut b = Boundaries::new(pairs.len());
        b.expand(&pairs.iter().map(|p| p.0).collect::<Vec<_>>());
        b.expand(&pairs.iter().map(|p| p.1).collect::<Vec<_>>());
        b
    }

    #[test]
    fn maps_interval_ends_onto_destination_range() {
        let params = MinMaxParams::from_boundaries(&bounds(&[(0.0, 10.0), (-5.0, 5.0)]), -1.0, 1.0);
        assert_eq!(params.apply(&[0.0, -5.0]).unwrap(), vec![-1.0, -1.0]);
        assert_eq!(params.apply(&[10.0, 5.0]).unwrap(), vec![1.0, 1.0]);
        assert_eq!(params.apply(&[5.0, 0.0]).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn apply_then_invert_is_identity() {
        let params = MinMaxParams::from_boundaries(&bounds(&[(2.0, 8.0)]), 0.0, 1.0);
        let normalized = params.apply(&[3.5]).unwrap();
        let raw = params.invert(&normalized).unwrap();
        assert!((raw[0] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn collapsed_interval_stays_invertible() {
        let mut b = Boundaries::new(1);
        b.expand(&[4.0]);
        let params = MinMaxParams::from_boundaries(&b, -1.0, 1.0);
        assert_eq!(params.apply(&[4.0]).unwrap(), vec![0.0]);
        assert!((params.invert(&[0.0]).unwrap()[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn dimensionality_mismatch_is_reported() {
        let params = MinMaxParams::from_boundaries(&bounds(&[(0.0, 1.0)]), -1.0, 1.0);
        let err = params.apply(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            RenormalizationError::DimensionalityMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn zero_scale_cannot_be_inverted() {
        let params = MinMaxParams::new(vec![0.0], vec![0.5]);
        let err = params.invert(&[0.5]).unwrap_err();
        assert_eq!(err, RenormalizationError::DegenerateScale(0));
    }

    #[test]
    fn renormalization_without_prior_calibration_fails() {
        let current = MinMaxParams::from_boundaries(&bounds(&[(0.0, 1.0)]), -1.0, 1.0);
        let renorm = Renormalization::new(None, current);
        assert_eq!(
            renorm.apply(&[0.5]).unwrap_err(),
            RenormalizationError::NoPriorCalibration
        );
    }

    #[test]
    fn widened_range_rescales_stored_values() {
        // Range [0, 10] onto [0, 1], later [0, 20] onto [0, 1]: a stored 5.0
        // must end up at 2.5.
        let old = MinMaxParams::from_boundaries(&bounds(&[(0.0, 10.0)]), 0.0, 1.0);
        let new = MinMaxParams::from_boundaries(&bounds(&[(0.0, 20.0)]), 0.0, 1.0);
        let renorm = Renormalization::new(Some(old), new);
        let out = renorm.apply(&[5.0]).unwrap();
        assert!((out[0] - 2.5).abs() < 1e-12, "got {}", out[0]);
    }

    #[test]
    fn event_kinds_match_variants() {
        let b = bounds(&[(0.0, 1.0)]);
        let params = MinMaxParams::from_boundaries(&b, -1.0, 1.0);
        assert_eq!(
            AdaptationEvent::BoundariesChanged(b).kind(),
            AdaptationKind::BoundariesChanged
        );
        assert_eq!(
            AdaptationEvent::Recalibrated(Renormalization::new(None, params)).kind(),
            AdaptationKind::Recalibrated
        );
    }
}
