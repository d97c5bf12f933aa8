//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Index of a qubit within a simulated register.
/// Qubit 0 is the most significant bit of a basis-state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Coarse classification of a [`TeleportError`], for callers that branch on
/// the failure kind rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied data was rejected before any simulation took place.
    Validation,
    /// The simulation backend failed while executing a circuit.
    Simulation,
    /// A circuit violated its structural invariants while being built.
    InvalidCircuit,
}

/// Failures reported by the teleportation core.
///
/// The `Display` output of each variant is the human-readable failure report
/// shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeleportError {
    /// Input state had the wrong dimension or was not normalized, or another
    /// caller-provided argument was out of range.
    #[error("Validation Error: {message}")]
    Validation {
        /// Validation failure message
        message: String,
    },

    /// The backend could not execute the circuit.
    #[error("Simulation Error: {message}")]
    Simulation {
        /// Simulation failure message
        message: String,
    },

    /// The circuit is malformed (bad target, condition on an unmeasured bit, ...).
    #[error("Invalid Circuit: {message}")]
    InvalidCircuit {
        /// InvalidCircuit failure message
        message: String,
    },
}

impl TeleportError {
    /// Invalid caller input.
    pub fn validation(message: impl Into<String>) -> Self {
        TeleportError::Validation { message: message.into() }
    }

    /// Backend or engine failure.
    pub fn simulation(message: impl Into<String>) -> Self {
        TeleportError::Simulation { message: message.into() }
    }

    /// Circuit construction failure.
    pub fn invalid_circuit(message: impl Into<String>) -> Self {
        TeleportError::InvalidCircuit { message: message.into() }
    }

    /// Returns the kind of failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TeleportError::Validation { .. } => ErrorKind::Validation,
            TeleportError::Simulation { .. } => ErrorKind::Simulation,
            TeleportError::InvalidCircuit { .. } => ErrorKind::InvalidCircuit,
        }
    }

    /// The failure message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            TeleportError::Validation { message }
            | TeleportError::Simulation { message }
            | TeleportError::InvalidCircuit { message } => message,
        }
    }
}
