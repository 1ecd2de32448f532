//! Per-branch element interaction resolver
//!
//! For reproducibility every branch is checked against every element in one
//! fixed order per tick: filters, then mirrors, then waveplates. Beamsplitter
//! triggers are detected here but applied at the photon level, since split
//! and recombination restructure the whole branch set.

use glam::Vec2;
use rand::Rng;

use super::branch::Branch;
use super::element::{Filter, Mirror, OpticalElement, Waveplate};
use super::polarization::Polarization;
use crate::consts::{MIRROR_CONTACT_DIST, WAVEPLATE_COOLDOWN_SECS};
use crate::{normalize_angle, with_speed};

/// What an element did to a branch this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// Filter measurement; `passed == false` means the branch was absorbed
    Measured { passed: bool },
    /// Mirror reflection
    Reflected,
    /// Waveplate phase rotation
    PhaseShifted,
}

/// Apply filter, mirror and waveplate interactions to one branch.
///
/// Returns the interactions that fired, in application order. The RNG is
/// drawn from only at filter triggers, so draw order equals branch-then-filter
/// iteration order.
pub fn resolve_branch(
    branch: &mut Branch,
    elements: &[OpticalElement],
    now: f32,
    trigger_radius: f32,
    speed: f32,
    rng: &mut impl Rng,
) -> Vec<Interaction> {
    let mut fired = Vec::new();

    for element in elements {
        if let OpticalElement::Filter(f) = element {
            if branch.position.distance(f.position) < trigger_radius {
                let passed = measure(branch, f, rng);
                fired.push(Interaction::Measured { passed });
                if !passed {
                    // Terminal; nothing downstream can touch this branch
                    return fired;
                }
            }
        }
    }

    for element in elements {
        if let OpticalElement::Mirror(m) = element
            && reflect(branch, m, speed)
        {
            fired.push(Interaction::Reflected);
        }
    }

    for element in elements {
        if let OpticalElement::Waveplate(w) = element
            && phase_shift(branch, w, now, trigger_radius)
        {
            fired.push(Interaction::PhaseShifted);
        }
    }

    fired
}

/// Born-rule measurement at a filter. The one stochastic, irreversible
/// transition in the system.
pub fn measure(branch: &mut Branch, filter: &Filter, rng: &mut impl Rng) -> bool {
    let projection = branch.amplitude().dot(filter.axis);
    let probability = projection * projection;

    if rng.random::<f32>() < probability {
        // Passed: state collapses onto the measurement axis
        branch.set_amplitude(filter.axis);
        true
    } else {
        // Absorbed; amplitude stays a valid unit vector for determinism
        branch.absorbed = true;
        branch.set_amplitude(Polarization::HORIZONTAL);
        false
    }
}

/// Specular reflection off a mirror segment.
///
/// Fires only while the branch is inside the contact band AND moving toward
/// the segment, so a branch that just reflected does not re-reflect on its
/// way out of the band.
pub fn reflect(branch: &mut Branch, mirror: &Mirror, speed: f32) -> bool {
    let closest = mirror.closest_point(branch.position);
    let to_branch = branch.position - closest;
    if to_branch.length() >= MIRROR_CONTACT_DIST {
        return false;
    }

    // Orient the normal toward the branch's side of the segment
    let mut n = mirror.normal();
    if n.dot(to_branch) < 0.0 {
        n = -n;
    }
    if branch.direction.dot(n) >= 0.0 {
        return false;
    }

    let d = branch.direction;
    let reflected = d - 2.0 * d.dot(n) * n;
    branch.direction = with_speed(reflected, speed);
    true
}

/// Waveplate phase rotation, gated by the per-branch cooldown so a branch
/// lingering inside the trigger radius rotates once per pass.
pub fn phase_shift(branch: &mut Branch, plate: &Waveplate, now: f32, trigger_radius: f32) -> bool {
    if branch.position.distance(plate.position) >= trigger_radius {
        return false;
    }
    if let Some(last) = branch.last_waveplate_time
        && now - last <= WAVEPLATE_COOLDOWN_SECS
    {
        return false;
    }

    let rotation = normalize_angle(branch.rotation() + plate.angle);
    branch.set_amplitude(Polarization::from_angle(rotation));
    branch.last_waveplate_time = Some(now);
    true
}

/// Indices of beamsplitters whose trigger radius contains `position`
pub fn splitters_containing(
    position: Vec2,
    elements: &[OpticalElement],
    trigger_radius: f32,
) -> Vec<usize> {
    elements
        .iter()
        .enumerate()
        .filter_map(|(i, e)| match e {
            OpticalElement::Beamsplitter(b)
                if position.distance(b.position) < trigger_radius =>
            {
                Some(i)
            }
            _ => None,
        })
        .collect()
}
