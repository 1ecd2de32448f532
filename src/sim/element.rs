//! Optical element model
//!
//! Immutable descriptions of the four bench elements. Each has a fixed
//! position plus a variant-specific orientation datum; the interaction
//! routines themselves live in `interact` and `photon`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::polarization::Polarization;
use crate::consts::MIRROR_HALF_LENGTH;

/// A polarizing filter: measures along `axis`, absorbing or passing
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Filter {
    pub position: Vec2,
    /// Measurement basis, unit length by construction
    pub axis: Polarization,
}

impl Filter {
    pub fn new(position: Vec2, axis: Vec2) -> Result<Self, SimError> {
        let axis = Polarization::new(axis)
            .map_err(|_| SimError::InvalidConfig(format!("filter axis {axis} is not unit")))?;
        Ok(Filter { position, axis })
    }
}

/// A mirror: a line segment of fixed half-length centered on `position`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mirror {
    pub position: Vec2,
    /// Segment orientation in radians
    pub angle: f32,
}

impl Mirror {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Mirror { position, angle }
    }

    /// Unit vector along the segment
    #[inline]
    pub fn segment_dir(&self) -> Vec2 {
        let (sin, cos) = self.angle.sin_cos();
        Vec2::new(cos, sin)
    }

    /// Segment normal (segment direction rotated 90° counterclockwise)
    #[inline]
    pub fn normal(&self) -> Vec2 {
        let d = self.segment_dir();
        Vec2::new(-d.y, d.x)
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let dir = self.segment_dir();
        let t = (p - self.position)
            .dot(dir)
            .clamp(-MIRROR_HALF_LENGTH, MIRROR_HALF_LENGTH);
        self.position + dir * t
    }

    /// Distance from `p` to the segment
    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        (p - self.closest_point(p)).length()
    }
}

/// A waveplate: rotates polarization by `angle` once per pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waveplate {
    pub position: Vec2,
    /// Phase rotation applied per pass, radians
    pub angle: f32,
}

impl Waveplate {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Waveplate { position, angle }
    }
}

/// A beamsplitter: splits a single branch into weighted basis children,
/// or recombines an already-split photon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Beamsplitter {
    pub position: Vec2,
}

impl Beamsplitter {
    pub fn new(position: Vec2) -> Self {
        Beamsplitter { position }
    }
}

/// Any bench element. Fixed for the lifetime of a scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OpticalElement {
    Filter(Filter),
    Mirror(Mirror),
    Waveplate(Waveplate),
    Beamsplitter(Beamsplitter),
}

impl OpticalElement {
    pub fn position(&self) -> Vec2 {
        match self {
            OpticalElement::Filter(f) => f.position,
            OpticalElement::Mirror(m) => m.position,
            OpticalElement::Waveplate(w) => w.position,
            OpticalElement::Beamsplitter(b) => b.position,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OpticalElement::Filter(_) => "filter",
            OpticalElement::Mirror(_) => "mirror",
            OpticalElement::Waveplate(_) => "waveplate",
            OpticalElement::Beamsplitter(_) => "beamsplitter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_filter_rejects_non_unit_axis() {
        assert!(Filter::new(Vec2::ZERO, Vec2::new(2.0, 0.0)).is_err());
        assert!(Filter::new(Vec2::ZERO, Vec2::new(0.0, 1.0)).is_ok());
    }

    #[test]
    fn test_mirror_closest_point_on_segment() {
        // Horizontal segment through the origin
        let m = Mirror::new(Vec2::ZERO, 0.0);
        let c = m.closest_point(Vec2::new(10.0, 7.0));
        assert!((c - Vec2::new(10.0, 0.0)).length() < 1e-6);
        assert!((m.distance_to(Vec2::new(10.0, 7.0)) - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_mirror_closest_point_clamps_to_endpoint() {
        let m = Mirror::new(Vec2::ZERO, 0.0);
        let c = m.closest_point(Vec2::new(100.0, 0.0));
        assert!((c - Vec2::new(MIRROR_HALF_LENGTH, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_mirror_normal_perpendicular() {
        let m = Mirror::new(Vec2::ZERO, FRAC_PI_4);
        assert!(m.normal().dot(m.segment_dir()).abs() < 1e-6);
        assert!((m.normal().length() - 1.0).abs() < 1e-6);
    }
}
