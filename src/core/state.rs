// src/core/state.rs

use super::error::{QubitId, TeleportError};
use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

/// Amplitudes whose squared magnitude falls below this are treated as absent.
pub(crate) const AMPLITUDE_TOLERANCE: f64 = 1e-12;

/// A pure quantum state over `n` qubits, stored as `2^n` complex amplitudes.
///
/// Basis states are ordered big-endian: qubit 0 is the most significant bit of
/// the basis index, so for three qubits index `0b110` is `|q0=1, q1=1, q2=0>`.
///
/// Construction from raw amplitudes is unchecked; use the functions in
/// [`crate::validation`] before trusting caller-supplied vectors.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Wraps the given amplitudes without validating dimension or norm.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Self {
        Self { amplitudes }
    }

    /// Builds a state from real amplitudes. Convenient for tests and the CLI.
    pub fn from_reals(values: &[f64]) -> Self {
        Self::from_amplitudes(values.iter().map(|v| Complex::new(*v, 0.0)).collect())
    }

    /// The all-zero state `|0...0>` over `qubit_count` qubits.
    pub fn zero_state(qubit_count: usize) -> Self {
        let mut amplitudes = vec![Complex::zero(); 1 << qubit_count];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self { amplitudes }
    }

    /// The computational basis state `|index>` over `qubit_count` qubits.
    pub fn basis_state(qubit_count: usize, index: usize) -> Result<Self, TeleportError> {
        let dim = 1usize << qubit_count;
        if index >= dim {
            return Err(TeleportError::validation(format!(
                "basis index {} is out of range for a {}-qubit state",
                index, qubit_count
            )));
        }
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[index] = Complex::new(1.0, 0.0);
        Ok(Self { amplitudes })
    }

    /// `|0>`
    pub fn zero() -> Self {
        Self::from_reals(&[1.0, 0.0])
    }

    /// `|1>`
    pub fn one() -> Self {
        Self::from_reals(&[0.0, 1.0])
    }

    /// `|+> = (|0> + |1>)/sqrt(2)`
    pub fn plus() -> Self {
        Self::from_reals(&[FRAC_1_SQRT_2, FRAC_1_SQRT_2])
    }

    /// `|-> = (|0> - |1>)/sqrt(2)`
    pub fn minus() -> Self {
        Self::from_reals(&[FRAC_1_SQRT_2, -FRAC_1_SQRT_2])
    }

    /// The single-qubit state `cos(theta/2)|0> + e^(i*phi) sin(theta/2)|1>`.
    pub fn from_bloch_angles(theta: f64, phi: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::from_amplitudes(vec![
            Complex::new(c, 0.0),
            Complex::from_polar(s, phi),
        ])
    }

    /// Read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of amplitudes.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits, or `None` if the dimension is not a power of two.
    pub fn qubit_count(&self) -> Option<usize> {
        let dim = self.dim();
        if dim.is_power_of_two() {
            Some(dim.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Sum of squared amplitude magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// The same state rescaled to unit norm.
    ///
    /// # Errors
    /// `TeleportError::Validation` if the vector has zero (or non-finite) norm.
    pub fn normalized(&self) -> Result<Self, TeleportError> {
        let norm = self.norm_sqr().sqrt();
        if !norm.is_finite() || norm * norm < AMPLITUDE_TOLERANCE {
            return Err(TeleportError::validation(format!("cannot normalize a vector of norm {}", norm)));
        }
        Ok(Self { amplitudes: self.amplitudes.iter().map(|c| c / norm).collect() })
    }

    /// Born-rule probability of observing basis state `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, |c| c.norm_sqr())
    }

    /// Tensor product `self ⊗ other`; `self` supplies the leading qubits.
    pub fn tensor(&self, other: &Self) -> Self {
        let mut amplitudes = Vec::with_capacity(self.dim() * other.dim());
        for a in &self.amplitudes {
            for b in &other.amplitudes {
                amplitudes.push(a * b);
            }
        }
        Self { amplitudes }
    }

    /// Inner product `<self|other>`.
    pub fn inner_product(&self, other: &Self) -> Result<Complex<f64>, TeleportError> {
        if self.dim() != other.dim() {
            return Err(TeleportError::validation(format!(
                "cannot take inner product of states with dimensions {} and {}",
                self.dim(),
                other.dim()
            )));
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// The normalized state of qubit `free` on the branch where every qubit in
    /// `fixed` has the given basis value.
    ///
    /// After the sender's qubits have collapsed, this is the receiver's state.
    pub fn qubit_branch(&self, fixed: &[(QubitId, u8)], free: QubitId) -> Result<Self, TeleportError> {
        let n = self.qubit_count().ok_or_else(|| {
            TeleportError::simulation(format!("state of dimension {} is not a qubit register", self.dim()))
        })?;
        let in_range = |q: QubitId| q.0 < n;
        if !in_range(free) || fixed.iter().any(|(q, _)| !in_range(*q) || *q == free) {
            return Err(TeleportError::simulation(format!(
                "branch selection {:?} / {} does not fit a {}-qubit state",
                fixed, free, n
            )));
        }

        let mut base = 0usize;
        for (q, value) in fixed {
            if *value == 1 {
                base |= 1 << (n - 1 - q.0);
            }
        }
        let free_mask = 1 << (n - 1 - free.0);
        let fixed_mask = fixed.iter().fold(0usize, |m, (q, _)| m | (1 << (n - 1 - q.0)));

        // Sum over unconstrained spectator qubits (none in the teleportation register).
        let mut branch: [Complex<f64>; 2] = [Complex::zero(); 2];
        for (index, amp) in self.amplitudes.iter().enumerate() {
            if index & fixed_mask == base {
                let bit = usize::from(index & free_mask != 0);
                branch[bit] += amp;
            }
        }

        let norm_sqr = branch[0].norm_sqr() + branch[1].norm_sqr();
        if norm_sqr < AMPLITUDE_TOLERANCE {
            return Err(TeleportError::simulation(format!(
                "branch {:?} has zero weight in the final state",
                fixed
            )));
        }
        let scale = 1.0 / norm_sqr.sqrt();
        Ok(Self::from_amplitudes(vec![branch[0] * scale, branch[1] * scale]))
    }

    /// Bloch-sphere coordinates `[x, y, z]` of a single-qubit state.
    /// Returns `None` for anything other than a 2-dimensional vector.
    pub fn bloch_vector(&self) -> Option<[f64; 3]> {
        if self.dim() != 2 {
            return None;
        }
        let (a, b) = (self.amplitudes[0], self.amplitudes[1]);
        let coherence = a.conj() * b;
        Some([
            2.0 * coherence.re,
            2.0 * coherence.im,
            a.norm_sqr() - b.norm_sqr(),
        ])
    }

    /// `true` if both states have the same dimension and agree up to a global phase.
    pub fn approx_eq_up_to_phase(&self, other: &Self, tolerance: f64) -> bool {
        match self.inner_product(other) {
            Ok(overlap) => (overlap.norm_sqr() - self.norm_sqr() * other.norm_sqr()).abs() <= tolerance,
            Err(_) => false,
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.qubit_count().unwrap_or(0);
        let mut written = false;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob <= AMPLITUDE_TOLERANCE {
                continue;
            }
            if written {
                write!(f, " + ")?;
            }
            write!(f, "({:.4}{:+.4}i)|{:0width$b}> [{:.1}%]", amp.re, amp.im, i, prob * 100.0, width = width)?;
            written = true;
        }
        if !written {
            write!(f, "(zero vector)")?;
        }
        Ok(())
    }
}
