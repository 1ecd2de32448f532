//! Simulation error types
//!
//! The engine is a pure function of (scene state, random draws, ticks), so
//! the only fallible operations are constructions that take caller data.

use std::fmt;

/// Errors surfaced from fallible construction
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// An amplitude vector whose squared magnitude deviates from 1
    InvalidState { norm_sq: f32 },
    /// A malformed element description (e.g. non-unit filter axis)
    InvalidConfig(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidState { norm_sq } => {
                write!(f, "not a valid state: |amplitude|^2 = {norm_sq}")
            }
            SimError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}
