// src/validation/mod.rs

//! Provides functions to validate caller-supplied [`StateVector`]s.

use crate::core::{StateVector, TeleportError};

/// Default allowed deviation of `Sum(|c_i|^2)` from 1.0.
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that the state has exactly `expected` amplitudes.
///
/// # Returns
/// * `Ok(())` if the dimension matches.
/// * `Err(TeleportError::Validation)` otherwise.
pub fn check_dimension(state: &StateVector, expected: usize) -> Result<(), TeleportError> {
    if state.dim() != expected {
        return Err(TeleportError::validation(format!(
            "state vector has dimension {}, expected {}",
            state.dim(),
            expected
        )));
    }
    Ok(())
}

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to [`DEFAULT_NORM_TOLERANCE`].
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(TeleportError::Validation)` if normalization fails or an amplitude is not finite.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<(), TeleportError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    if state.amplitudes().iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        return Err(TeleportError::validation("state vector contains non-finite amplitudes"));
    }
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(TeleportError::validation(format!(
            "state vector is not normalized: Sum(|c_i|^2) = {} (deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// Validates a teleportation input: a normalized 2-dimensional vector.
pub fn validate_single_qubit(state: &StateVector, tolerance: Option<f64>) -> Result<(), TeleportError> {
    check_dimension(state, 2)?;
    check_normalization(state, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_accepts_normalized_qubit() {
        assert!(validate_single_qubit(&StateVector::plus(), None).is_ok());
        assert!(validate_single_qubit(&StateVector::from_bloch_angles(0.4, 2.0), None).is_ok());
    }

    #[test]
    fn test_rejects_unnormalized() {
        let err = validate_single_qubit(&StateVector::from_reals(&[1.0, 1.0]), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains("not normalized"));
    }

    #[test]
    fn test_rejects_wrong_dimension() {
        let err = validate_single_qubit(&StateVector::from_reals(&[1.0, 0.0, 0.0]), None).unwrap_err();
        assert!(err.message().contains("dimension 3"));
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let almost = StateVector::from_reals(&[1.0005, 0.0]);
        assert!(check_normalization(&almost, None).is_err());
        assert!(check_normalization(&almost, Some(1e-2)).is_ok());
    }

    #[test]
    fn test_rejects_nan() {
        let nan = StateVector::from_reals(&[f64::NAN, 0.0]);
        assert!(check_normalization(&nan, Some(1.0)).is_err());
    }
}
