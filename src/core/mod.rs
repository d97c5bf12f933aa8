// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod bits;
pub mod error;
pub mod state;

// Re-export public types for convenient access via `teleport::core::TypeName`
pub use bits::{ClassicalBit, ClassicalRegister};
pub use error::{ErrorKind, QubitId, TeleportError};
pub use state::StateVector;
