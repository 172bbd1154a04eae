//! Error types for the simulation core.
//!
//! All errors here are about internal consistency of the simulation state.
//! The core has no user-facing error channel; construction-time validation
//! is the only place errors reach a caller.

use thiserror::Error;

/// Errors produced by simulation construction and force computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Two bodies occupy the same position, making the gravitational
    /// force undefined (division by zero). Rejected at spawn time.
    #[error("bodies coincide at ({x}, {y}); gravitational force is undefined")]
    DegenerateDistance { x: f64, y: f64 },

    /// Body names must be unique across the whole system.
    #[error("a body named `{0}` already exists")]
    DuplicateName(String),

    /// Primaries and secondaries require a central body to exist first.
    #[error("no central body has been spawned")]
    NoCentralBody,

    /// Lookup by name failed.
    #[error("no body named `{0}`")]
    UnknownBody(String),

    /// Non-positive mass/radius or other out-of-range construction input.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
