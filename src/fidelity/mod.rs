// src/fidelity/mod.rs

//! Fidelity between pure states.

use crate::core::{StateVector, TeleportError};

/// Fidelity `|<a|b>|^2` of two pure states of equal dimension, clamped to `[0, 1]`.
///
/// Insensitive to global phase: 1.0 means the states are identical up to a phase.
///
/// # Examples
/// ```
/// use teleport::{StateVector, fidelity::state_fidelity};
///
/// let f = state_fidelity(&StateVector::plus(), &StateVector::zero()).unwrap();
/// assert!((f - 0.5).abs() < 1e-12);
/// ```
pub fn state_fidelity(a: &StateVector, b: &StateVector) -> Result<f64, TeleportError> {
    let overlap = a.inner_product(b)?;
    Ok(overlap.norm_sqr().clamp(0.0, 1.0))
}

/// `true` when `fidelity` is within `tolerance` of 1.
pub fn is_faithful(fidelity: f64, tolerance: f64) -> bool {
    fidelity >= 1.0 - tolerance
}
