//! Photon branch-set management
//!
//! A photon owns an insertion-ordered set of branches. Beamsplitters drive
//! the two macro-state transitions: a single-branch photon splits into up to
//! two weighted basis children, and an already-split photon recombines back
//! into one branch. Both are computed against a snapshot of the branch set
//! and swapped in wholesale, never edited in place mid-iteration.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::branch::Branch;
use super::polarization::Polarization;
use crate::{rotate_vec, with_speed};

/// The branch-set change a beamsplitter trigger produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Single branch replaced by `children` weighted basis branches
    Split { children: usize },
    /// `merged` branches collapsed back into one
    Recombined { merged: usize },
}

/// One photon: an ordered collection of branches, no kinematic state of its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photon {
    pub id: u32,
    branches: Vec<Branch>,
}

impl Photon {
    pub fn new(id: u32, initial: Branch) -> Self {
        Photon {
            id,
            branches: vec![initial],
        }
    }

    #[inline]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    #[inline]
    pub fn branches_mut(&mut self) -> &mut [Branch] {
        &mut self.branches
    }

    /// Number of branches not yet absorbed
    pub fn live_count(&self) -> usize {
        self.branches.iter().filter(|b| !b.absorbed).count()
    }

    /// Sum of live branch weights
    pub fn total_weight(&self) -> f32 {
        self.branches
            .iter()
            .filter(|b| !b.absorbed)
            .map(|b| b.weight)
            .sum()
    }

    /// Drop absorbed branches; returns how many were removed
    pub fn prune_absorbed(&mut self) -> usize {
        let before = self.branches.len();
        self.branches.retain(|b| !b.absorbed);
        before - self.branches.len()
    }

    pub fn is_spent(&self) -> bool {
        self.branches.is_empty()
    }

    /// Apply a beamsplitter trigger: split when the photon has one live
    /// branch, recombine when it has more.
    pub fn apply_beamsplitter(&mut self, splitter_idx: usize, speed: f32) -> Option<SplitOutcome> {
        match self.live_count() {
            0 => None,
            1 => {
                let parent = self.branches.iter().find(|b| !b.absorbed)?.clone();
                Some(self.split(parent, speed))
            }
            _ => Some(self.recombine(splitter_idx, speed)),
        }
    }

    /// Split the sole live branch into weighted horizontal/vertical children.
    ///
    /// `p = sin(rotation)^2` is the vertical-outcome probability; a child
    /// with zero weight is not spawned. Child weights sum exactly to the
    /// parent's weight.
    fn split(&mut self, parent: Branch, speed: f32) -> SplitOutcome {
        // Replacement set is computed in full before any mutation
        let p = parent.rotation().sin().powi(2);
        let mut replacement: Vec<Branch> =
            self.branches.iter().filter(|b| b.absorbed).cloned().collect();
        let mut children = 0;

        if 1.0 - p > 0.0 {
            let mut child = Branch::from_polarization(
                parent.position,
                with_speed(parent.direction, speed),
                Polarization::HORIZONTAL,
                parent.weight * (1.0 - p),
            );
            child.last_waveplate_time = parent.last_waveplate_time;
            child.inside_splitters = parent.inside_splitters.clone();
            replacement.push(child);
            children += 1;
        }
        if p > 0.0 {
            let mut child = Branch::from_polarization(
                parent.position,
                with_speed(rotate_vec(parent.direction, FRAC_PI_2), speed),
                Polarization::VERTICAL,
                parent.weight * p,
            );
            child.last_waveplate_time = parent.last_waveplate_time;
            child.inside_splitters = parent.inside_splitters.clone();
            replacement.push(child);
            children += 1;
        }

        self.branches = replacement;
        SplitOutcome::Split { children }
    }

    /// Collapse all live branches into one via weighted-rotation averaging.
    ///
    /// Tie-break: the survivor takes the position of the first live branch
    /// in insertion order (the siblings are colocated at the trigger point).
    fn recombine(&mut self, splitter_idx: usize, speed: f32) -> SplitOutcome {
        let live: Vec<&Branch> = self.branches.iter().filter(|b| !b.absorbed).collect();
        let merged = live.len();

        let theta: f32 = live.iter().map(|b| b.weight * b.rotation()).sum();
        let position = live.first().map(|b| b.position).unwrap_or_default();

        // Amplitude (sin θ, cos θ), expressed as a unit vector by construction
        let mut survivor = Branch::from_polarization(
            position,
            Vec2::new(0.0, speed),
            Polarization::from_angle(FRAC_PI_2 - theta),
            1.0,
        );
        survivor.inside_splitters = vec![splitter_idx];

        let mut replacement: Vec<Branch> =
            self.branches.iter().filter(|b| b.absorbed).cloned().collect();
        replacement.push(survivor);
        self.branches = replacement;

        SplitOutcome::Recombined { merged }
    }
}
