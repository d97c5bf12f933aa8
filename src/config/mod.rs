// src/config/mod.rs

//! Run configuration shared by the orchestrator and the simulation backend.

use crate::validation::DEFAULT_NORM_TOLERANCE;

/// Default tolerance under which a teleported state counts as faithful (`F >= 1 - tol`).
pub const DEFAULT_FIDELITY_TOLERANCE: f64 = 1e-6;

/// Settings for a [`Teleporter`](crate::protocol::Teleporter).
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportConfig {
    /// Allowed deviation of an input state's squared norm from 1.
    pub norm_tolerance: f64,
    /// Allowed shortfall of the fidelity from 1 before a run is flagged as unfaithful.
    pub fidelity_tolerance: f64,
    /// Seed for the state source and the simulator. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            fidelity_tolerance: DEFAULT_FIDELITY_TOLERANCE,
            seed: None,
        }
    }
}

impl TeleportConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes runs reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the input normalization tolerance.
    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    /// Overrides the fidelity tolerance.
    pub fn with_fidelity_tolerance(mut self, tolerance: f64) -> Self {
        self.fidelity_tolerance = tolerance;
        self
    }

    /// Seed for the state source, if seeded.
    pub(crate) fn source_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Seed for the simulator, derived so it differs from the source's stream.
    pub(crate) fn simulator_seed(&self) -> Option<u64> {
        self.seed.map(|s| s ^ 0x9E37_79B9_7F4A_7C15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = TeleportConfig::new()
            .with_seed(7)
            .with_norm_tolerance(1e-6)
            .with_fidelity_tolerance(1e-3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.norm_tolerance, 1e-6);
        assert_eq!(config.fidelity_tolerance, 1e-3);
        assert_ne!(config.source_seed(), config.simulator_seed());
    }

    #[test]
    fn test_default_is_unseeded() {
        let config = TeleportConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.simulator_seed(), None);
    }
}
