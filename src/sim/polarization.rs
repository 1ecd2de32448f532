//! Polarization state as a validated unit 2-vector
//!
//! A real-valued simplification of a quantum state vector in the
//! horizontal/vertical computational basis. The unit-norm invariant is
//! enforced at construction, so interaction code never re-checks it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use crate::consts::NORM_TOLERANCE;

/// A unit 2-vector in the computational basis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec2", into = "Vec2")]
pub struct Polarization(Vec2);

impl Polarization {
    /// Horizontal basis state (1, 0)
    pub const HORIZONTAL: Polarization = Polarization(Vec2::new(1.0, 0.0));
    /// Vertical basis state (0, 1)
    pub const VERTICAL: Polarization = Polarization(Vec2::new(0.0, 1.0));

    /// Validate and wrap an amplitude vector
    pub fn new(v: Vec2) -> Result<Self, SimError> {
        let norm_sq = v.length_squared();
        if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
            return Err(SimError::InvalidState { norm_sq });
        }
        Ok(Polarization(v))
    }

    /// Unit vector at `theta` radians: (cos θ, sin θ)
    pub fn from_angle(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Polarization(Vec2::new(cos, sin))
    }

    /// Polarization angle, `atan2(y, x)`
    #[inline]
    pub fn angle(&self) -> f32 {
        self.0.y.atan2(self.0.x)
    }

    /// Projection onto another polarization axis
    #[inline]
    pub fn dot(&self, axis: Polarization) -> f32 {
        self.0.dot(axis.0)
    }

    /// The underlying amplitude vector
    #[inline]
    pub fn vec(&self) -> Vec2 {
        self.0
    }
}

impl TryFrom<Vec2> for Polarization {
    type Error = SimError;

    fn try_from(v: Vec2) -> Result<Self, Self::Error> {
        Polarization::new(v)
    }
}

impl From<Polarization> for Vec2 {
    fn from(p: Polarization) -> Vec2 {
        p.0
    }
}
