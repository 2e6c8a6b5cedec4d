//! Neighborhood modes and the annealing schedule
//!
//! Learning rate and radius are pure functions of the absolute epoch index,
//! recomputed fresh every epoch. There is no running decay state to carry
//! between calls, so retraining an epoch reproduces its exact coefficients.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SomError};

/// How far a sample's update reaches beyond its BMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborhoodMode {
    /// Only the BMU itself is updated, with influence 1.
    BmuOnly,
    /// Cells within the radius get Gaussian influence `exp(−d²/(2·radius²))`.
    GaussianRadius,
    /// Cells within the radius get influence 1, others are skipped.
    ConstantRadius,
}

impl Default for NeighborhoodMode {
    fn default() -> Self {
        Self::GaussianRadius
    }
}

impl NeighborhoodMode {
    /// Whether this mode's inclusion test depends on the decayed radius.
    pub fn uses_radius(&self) -> bool {
        !matches!(self, NeighborhoodMode::BmuOnly)
    }

    /// Influence of an update at squared lattice distance `dist_sq` from the
    /// BMU, or `None` when the cell falls outside the neighborhood.
    ///
    /// `radius` is ignored by [`NeighborhoodMode::BmuOnly`], where only the
    /// BMU itself (lattice distance 0) is inside.
    pub fn influence(&self, dist_sq: f64, radius: f64) -> Option<f64> {
        match self {
            NeighborhoodMode::BmuOnly => (dist_sq == 0.0).then_some(1.0),
            NeighborhoodMode::GaussianRadius => {
                let radius_sq = radius * radius;
                (dist_sq < radius_sq).then(|| (-dist_sq / (2.0 * radius_sq)).exp())
            }
            NeighborhoodMode::ConstantRadius => (dist_sq < radius * radius).then_some(1.0),
        }
    }
}

/// Two-parameter annealing schedule over a fixed number of epochs.
///
/// `rate(e) = rate₀·exp(−e/epochs)`; `radius(e) = radius₀·exp(−e/time_constant)`
/// with `time_constant = epochs/ln(radius₀)`. The epoch index is clamped to
/// `[0, epochs)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecaySchedule {
    initial_rate: f64,
    initial_radius: f64,
    /// None for [`NeighborhoodMode::BmuOnly`], whose updates never use a radius.
    time_constant: Option<f64>,
    epochs: usize,
}

impl DecaySchedule {
    /// Build the schedule for a training run.
    ///
    /// A radius-based mode with `initial_radius ≤ 1` is rejected: its decay
    /// time constant would divide by a non-positive logarithm.
    pub fn new(
        mode: NeighborhoodMode,
        initial_rate: f64,
        initial_radius: f64,
        epochs: usize,
    ) -> Result<Self> {
        if epochs == 0 {
            return Err(SomError::ConfigError(
                "cannot build a schedule for 0 epochs (load-only mode)".to_string(),
            ));
        }
        if !(initial_rate > 0.0) || !initial_rate.is_finite() {
            return Err(SomError::ConfigError(format!(
                "initial learning rate must be positive and finite, got {}",
                initial_rate
            )));
        }
        let time_constant = if mode.uses_radius() {
            if initial_radius <= 1.0 {
                return Err(SomError::ConfigError(format!(
                    "initial radius {} is degenerate for a radius-based mode; \
                     the lattice must be large enough that max_dim/2 > 1",
                    initial_radius
                )));
            }
            Some(epochs as f64 / initial_radius.ln())
        } else {
            None
        };
        Ok(Self {
            initial_rate,
            initial_radius,
            time_constant,
            epochs,
        })
    }

    /// Learning rate at a 0-indexed epoch. Decays identically in all modes.
    pub fn rate_at(&self, epoch: usize) -> f64 {
        let e = self.clamp_epoch(epoch);
        self.initial_rate * (-(e as f64) / self.epochs as f64).exp()
    }

    /// Neighborhood radius at a 0-indexed epoch; `None` in BMU-only mode.
    pub fn radius_at(&self, epoch: usize) -> Option<f64> {
        let e = self.clamp_epoch(epoch);
        self.time_constant
            .map(|tc| self.initial_radius * (-(e as f64) / tc).exp())
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    fn clamp_epoch(&self, epoch: usize) -> usize {
        epoch.min(self.epochs - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_influence_is_one_at_bmu() {
        for mode in [
            NeighborhoodMode::BmuOnly,
            NeighborhoodMode::GaussianRadius,
            NeighborhoodMode::ConstantRadius,
        ] {
            assert_eq!(mode.influence(0.0, 3.0), Some(1.0));
        }
    }

    #[test]
    fn test_gaussian_influence_monotone() {
        let mode = NeighborhoodMode::GaussianRadius;
        let radius = 4.0;
        let mut prev = 1.0;
        for d in 1..16 {
            let dist_sq = d as f64;
            match mode.influence(dist_sq, radius) {
                Some(h) => {
                    assert!(h <= prev, "influence must not increase with distance");
                    assert!(h > 0.0 && h <= 1.0);
                    prev = h;
                }
                None => assert!(dist_sq >= radius * radius),
            }
        }
    }

    #[test]
    fn test_outside_radius_is_excluded() {
        let r = 2.0;
        assert_eq!(NeighborhoodMode::GaussianRadius.influence(4.0, r), None);
        assert_eq!(NeighborhoodMode::ConstantRadius.influence(4.0, r), None);
        assert_eq!(NeighborhoodMode::ConstantRadius.influence(3.99, r), Some(1.0));
    }

    #[test]
    fn test_bmu_only_ignores_radius() {
        let mode = NeighborhoodMode::BmuOnly;
        assert_eq!(mode.influence(1.0, 100.0), None);
        assert_eq!(mode.influence(0.0, 0.0), Some(1.0));
    }

    #[test]
    fn test_rate_decay() {
        let s = DecaySchedule::new(NeighborhoodMode::GaussianRadius, 0.5, 5.0, 10).unwrap();
        assert!((s.rate_at(0) - 0.5).abs() < 1e-12);
        let expected = 0.5 * (-3.0_f64 / 10.0).exp();
        assert!((s.rate_at(3) - expected).abs() < 1e-12);
        assert!(s.rate_at(9) < s.rate_at(0));
    }

    #[test]
    fn test_radius_decay() {
        let s = DecaySchedule::new(NeighborhoodMode::GaussianRadius, 0.5, 5.0, 10).unwrap();
        let tc = 10.0 / 5.0_f64.ln();
        assert!((s.radius_at(0).unwrap() - 5.0).abs() < 1e-12);
        let expected = 5.0 * (-4.0 / tc).exp();
        assert!((s.radius_at(4).unwrap() - expected).abs() < 1e-12);
        // Radius anneals to 1 at the final virtual epoch e = epochs.
        assert!(s.radius_at(9).unwrap() > 1.0);
    }

    #[test]
    fn test_epoch_clamped() {
        let s = DecaySchedule::new(NeighborhoodMode::GaussianRadius, 0.5, 5.0, 10).unwrap();
        assert_eq!(s.rate_at(9), s.rate_at(100));
        assert_eq!(s.radius_at(9), s.radius_at(100));
    }

    #[test]
    fn test_bmu_only_has_no_radius() {
        let s = DecaySchedule::new(NeighborhoodMode::BmuOnly, 0.5, 0.5, 10).unwrap();
        assert_eq!(s.radius_at(0), None);
        // Rate still decays.
        assert!(s.rate_at(5) < s.rate_at(0));
    }

    #[test]
    fn test_degenerate_radius_rejected() {
        let err = DecaySchedule::new(NeighborhoodMode::GaussianRadius, 0.5, 1.0, 10);
        assert!(matches!(err, Err(SomError::ConfigError(_))));
        // Fine for BMU-only, which never consults the radius.
        assert!(DecaySchedule::new(NeighborhoodMode::BmuOnly, 0.5, 1.0, 10).is_ok());
    }

    #[test]
    fn test_zero_epochs_rejected() {
        assert!(DecaySchedule::new(NeighborhoodMode::GaussianRadius, 0.5, 5.0, 0).is_err());
    }
}
