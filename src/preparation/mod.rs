// src/preparation/mod.rs

//! Sources of single-qubit input states.

use crate::core::StateVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Supplies the state to teleport when the caller does not provide one.
pub trait StateSource {
    /// Returns a normalized 2-dimensional state vector.
    fn next_state(&mut self) -> StateVector;
}

/// Draws Haar-random pure single-qubit states.
///
/// Points are uniform on the Bloch sphere: `cos(theta) = 1 - 2u` and
/// `phi = 2*pi*v` for independent uniform `u`, `v`.
#[derive(Debug, Clone)]
pub struct RandomStateSource {
    rng: StdRng,
}

impl RandomStateSource {
    /// Creates a source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Creates a reproducible source.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomStateSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl StateSource for RandomStateSource {
    fn next_state(&mut self) -> StateVector {
        let u: f64 = self.rng.random();
        let v: f64 = self.rng.random();
        let theta = (1.0 - 2.0 * u).clamp(-1.0, 1.0).acos();
        StateVector::from_bloch_angles(theta, 2.0 * PI * v)
    }
}

/// Always returns the same state.
#[derive(Debug, Clone)]
pub struct FixedStateSource {
    state: StateVector,
}

impl FixedStateSource {
    /// Replays `state` on every call.
    pub fn new(state: StateVector) -> Self {
        Self { state }
    }
}

impl StateSource for FixedStateSource {
    fn next_state(&mut self) -> StateVector {
        self.state.clone()
    }
}
