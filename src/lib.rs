//! Photon Bench - a 2D optical bench polarization simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, element interactions, branching)
//! - `presets`: Data-driven bench layouts for the standard scenes
//!
//! The `sim` module is pure and headless: rendering, windowing and input
//! dispatch are external collaborators that consume its read-only accessors.

pub mod presets;
pub mod sim;

pub use presets::Preset;
pub use sim::{Scene, SceneConfig};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Tick clock used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World bounds of the bench
    pub const WORLD_WIDTH: f32 = 1000.0;
    pub const WORLD_HEIGHT: f32 = 800.0;

    /// Distance a branch travels per tick; also the element trigger radius,
    /// so a branch cannot step past an element in one tick
    pub const DEFAULT_SPEED: f32 = 5.0;

    /// Mirrors are line segments of this half-length, centered on position
    pub const MIRROR_HALF_LENGTH: f32 = 30.0;
    /// Branch-to-segment distance at which a mirror reflects
    pub const MIRROR_CONTACT_DIST: f32 = 5.0;

    /// Minimum time between waveplate applications to the same branch,
    /// so a branch lingering inside the trigger radius rotates once per pass
    pub const WAVEPLATE_COOLDOWN_SECS: f32 = 0.2;

    /// Tolerance on |amplitude|^2 - 1 at construction
    pub const NORM_TOLERANCE: f32 = 1e-4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotate a vector counterclockwise by `angle` radians
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rescale a vector to the given magnitude (zero vectors stay zero)
#[inline]
pub fn with_speed(v: Vec2, speed: f32) -> Vec2 {
    v.normalize_or_zero() * speed
}
