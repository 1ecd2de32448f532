//! Branch kinematics
//!
//! A branch is one coherent polarization sub-state of a photon: its own
//! position, direction, amplitude and probability weight. All photon motion
//! lives here; the photon itself is just the set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::polarization::Polarization;

/// What happens when a branch crosses the world boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Leaving the bench absorbs the branch (composes cleanly with pruning)
    #[default]
    Absorb,
    /// Crossing a boundary teleports to the opposite edge
    Wrap,
}

/// One polarization sub-state of a photon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// World position
    pub position: Vec2,
    /// Velocity; magnitude equals the configured simulation speed
    pub direction: Vec2,
    /// Polarization amplitude, unit length by construction
    amplitude: Polarization,
    /// Cached `atan2(amplitude.y, amplitude.x)`, recomputed on every
    /// amplitude change, never set independently
    rotation: f32,
    /// Probability weight relative to sibling branches, in [0, 1]
    pub weight: f32,
    /// Terminal flag; an absorbed branch is inert until pruned
    pub absorbed: bool,
    /// Last simulation time a waveplate fired on this branch
    pub last_waveplate_time: Option<f32>,
    /// Indices of beamsplitters whose trigger radius currently contains this
    /// branch; splitters fire on entry only
    #[serde(default)]
    pub inside_splitters: Vec<usize>,
}

impl Branch {
    /// Construct a branch, validating the amplitude
    pub fn new(
        position: Vec2,
        direction: Vec2,
        amplitude: Vec2,
        weight: f32,
    ) -> Result<Self, SimError> {
        let amplitude = Polarization::new(amplitude)?;
        Ok(Self::from_polarization(position, direction, amplitude, weight))
    }

    /// Construct from an already-validated polarization
    pub fn from_polarization(
        position: Vec2,
        direction: Vec2,
        amplitude: Polarization,
        weight: f32,
    ) -> Self {
        Branch {
            position,
            direction,
            amplitude,
            rotation: amplitude.angle(),
            weight,
            absorbed: false,
            last_waveplate_time: None,
            inside_splitters: Vec::new(),
        }
    }

    #[inline]
    pub fn amplitude(&self) -> Polarization {
        self.amplitude
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Replace the amplitude, recomputing the cached rotation
    pub fn set_amplitude(&mut self, amplitude: Polarization) {
        self.amplitude = amplitude;
        self.rotation = amplitude.angle();
    }

    /// Advance one step and apply the boundary policy
    pub fn advance(&mut self, width: f32, height: f32, policy: BoundaryPolicy) {
        self.position += self.direction;

        match policy {
            BoundaryPolicy::Absorb => {
                let p = self.position;
                if p.x < 0.0 || p.x > width || p.y < 0.0 || p.y > height {
                    self.absorbed = true;
                }
            }
            BoundaryPolicy::Wrap => {
                self.position.x = self.position.x.rem_euclid(width);
                self.position.y = self.position.y.rem_euclid(height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch_at(position: Vec2, direction: Vec2) -> Branch {
        Branch::new(position, direction, Vec2::new(1.0, 0.0), 1.0).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_amplitude() {
        let err = Branch::new(Vec2::ZERO, Vec2::X, Vec2::new(0.5, 0.5), 1.0);
        assert!(matches!(err, Err(SimError::InvalidState { .. })));
    }

    #[test]
    fn test_advance_moves_by_direction() {
        let mut b = branch_at(Vec2::new(10.0, 10.0), Vec2::new(5.0, 0.0));
        b.advance(100.0, 100.0, BoundaryPolicy::Absorb);
        assert_eq!(b.position, Vec2::new(15.0, 10.0));
        assert!(!b.absorbed);
    }

    #[test]
    fn test_advance_absorbs_on_exit() {
        let mut b = branch_at(Vec2::new(98.0, 50.0), Vec2::new(5.0, 0.0));
        b.advance(100.0, 100.0, BoundaryPolicy::Absorb);
        assert!(b.absorbed);
    }

    #[test]
    fn test_advance_wraps_on_exit() {
        let mut b = branch_at(Vec2::new(98.0, 50.0), Vec2::new(5.0, 0.0));
        b.advance(100.0, 100.0, BoundaryPolicy::Wrap);
        assert!(!b.absorbed);
        assert!((b.position.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_tracks_amplitude() {
        let mut b = branch_at(Vec2::ZERO, Vec2::X);
        assert_eq!(b.rotation(), 0.0);
        b.set_amplitude(Polarization::VERTICAL);
        assert!((b.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
