// src/simulation/mod.rs

//! Executes [`Circuit`]s on a state vector.
//! This module contains the [`Backend`] seam the protocol talks to, the bundled
//! [`Simulator`] backend and the [`StateVectorEngine`] that evolves the state.

mod results;
pub mod engine;

// Re-export the main public interface types
pub use engine::{StateVectorEngine, StepOutcome};
pub use results::{MeasurementRecord, SimulationResult};

use crate::circuits::Circuit;
use crate::config::TeleportConfig;
use crate::core::{ClassicalRegister, StateVector, TeleportError};
use crate::validation;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

/// A circuit execution service.
///
/// Implementations run the circuit's operations in order starting from
/// `initial`, sampling measurements under the Born rule and honoring classical
/// conditions.
pub trait Backend {
    /// Short backend name for logs and reports.
    fn name(&self) -> &str;

    /// Runs `circuit` on `initial` and returns the final state and classical bits.
    ///
    /// # Errors
    /// `TeleportError::Simulation` when the backend cannot execute the circuit.
    fn execute(&mut self, circuit: &Circuit, initial: &StateVector) -> Result<SimulationResult, TeleportError>;
}

/// Noiseless state-vector backend.
///
/// Owns the random number generator used for measurement sampling; seed it
/// for reproducible runs.
#[derive(Debug, Clone)]
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    /// Creates a simulator seeded from OS entropy.
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Creates a simulator whose measurement outcomes are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Creates a simulator seeded according to `config`.
    pub fn from_config(config: &TeleportConfig) -> Self {
        match config.simulator_seed() {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Simulator {
    fn name(&self) -> &str {
        "statevector"
    }

    /// Executes the sequence of operations defined in the `circuit`, skipping
    /// conditional operations whose bit does not hold the expected value.
    fn execute(&mut self, circuit: &Circuit, initial: &StateVector) -> Result<SimulationResult, TeleportError> {
        if initial.qubit_count() != Some(circuit.qubit_count()) {
            return Err(TeleportError::simulation(format!(
                "initial state of dimension {} does not match a {}-qubit circuit",
                initial.dim(),
                circuit.qubit_count()
            )));
        }
        validation::check_normalization(initial, None)
            .map_err(|e| TeleportError::simulation(format!("initial state rejected: {}", e.message())))?;

        debug!(backend = self.name(), operations = circuit.len(), "executing circuit");

        // 1. Initialize the engine and an empty classical register.
        let mut engine = StateVectorEngine::new(initial.clone())?;
        let mut register = ClassicalRegister::new();
        let mut measurements = Vec::new();

        // 2. Iterate through the ordered sequence of operations in the circuit.
        for (step, op) in circuit.operations().iter().enumerate() {
            match engine.apply(op, &mut register, &mut self.rng)? {
                StepOutcome::Measured(records) => {
                    trace!(step, %op, %register, "measured");
                    measurements.extend(records);
                }
                outcome => trace!(step, %op, ?outcome, "applied"),
            }
        }

        // Final check on the evolved state.
        validation::check_normalization(engine.state(), None)
            .map_err(|e| TeleportError::simulation(format!("state lost normalization: {}", e.message())))?;

        Ok(SimulationResult::new(engine.into_state(), register, measurements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::{ClassicalBit, ErrorKind, QubitId};
    use crate::operations::GateOperation;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_empty_circuit_returns_initial_state() {
        let circuit = CircuitBuilder::new(1).build().unwrap();
        let mut simulator = Simulator::seeded(1);
        let result = simulator.execute(&circuit, &StateVector::plus()).unwrap();
        assert_eq!(result.final_state(), &StateVector::plus());
        assert!(result.measurements().is_empty());
    }

    #[test]
    fn test_rejects_mismatched_initial_state() {
        let circuit = CircuitBuilder::new(2).build().unwrap();
        let mut simulator = Simulator::seeded(1);
        let err = simulator.execute(&circuit, &StateVector::zero()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Simulation);

        let unnormalized = StateVector::from_reals(&[1.0, 1.0, 0.0, 0.0]);
        let err = simulator.execute(&circuit, &unnormalized).unwrap_err();
        assert!(err.message().contains("initial state rejected"), "{}", err);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let circuit = CircuitBuilder::new(2)
            .add_op(GateOperation::hadamard(q(0)))
            .add_op(GateOperation::hadamard(q(1)))
            .add_op(GateOperation::measure(vec![q(0), q(1)], vec![ClassicalBit::Z, ClassicalBit::X]))
            .build()
            .unwrap();
        let initial = StateVector::zero_state(2);

        let mut a = Simulator::seeded(42);
        let mut b = Simulator::seeded(42);
        for _ in 0..20 {
            let ra = a.execute(&circuit, &initial).unwrap();
            let rb = b.execute(&circuit, &initial).unwrap();
            assert_eq!(ra.register(), rb.register());
        }
    }

    #[test]
    fn test_measurement_log_matches_register() {
        let circuit = CircuitBuilder::new(2)
            .add_op(GateOperation::pauli_x(q(1)))
            .add_op(GateOperation::measure(vec![q(0), q(1)], vec![ClassicalBit::Z, ClassicalBit::X]))
            .build()
            .unwrap();
        let mut simulator = Simulator::seeded(5);
        let result = simulator.execute(&circuit, &StateVector::zero_state(2)).unwrap();
        assert_eq!(result.register().get(ClassicalBit::Z), Some(0));
        assert_eq!(result.register().get(ClassicalBit::X), Some(1));
        assert_eq!(result.measurements().len(), 2);
        assert!((result.measurements()[0].probability - 1.0).abs() < 1e-12);
    }
}
