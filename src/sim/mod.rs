//! Deterministic optical bench simulation
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (measurement draws follow branch-then-filter order)
//! - Stable iteration order (insertion order for branches and photons)
//! - No rendering or platform dependencies

pub mod branch;
pub mod element;
pub mod error;
pub mod interact;
pub mod photon;
pub mod polarization;
pub mod scene;

pub use branch::{BoundaryPolicy, Branch};
pub use element::{Beamsplitter, Filter, Mirror, OpticalElement, Waveplate};
pub use error::SimError;
pub use interact::{Interaction, resolve_branch};
pub use photon::{Photon, SplitOutcome};
pub use polarization::Polarization;
pub use scene::{Scene, SceneConfig, SimEvent};
