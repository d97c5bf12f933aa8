// src/simulation/results.rs
use crate::core::{ClassicalBit, ClassicalRegister, QubitId, StateVector};
use std::fmt;

/// One measured qubit and the classical bit it was written to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRecord {
    /// The measured qubit.
    pub qubit: QubitId,
    /// Destination classical bit.
    pub bit: ClassicalBit,
    /// Observed value (0 or 1).
    pub value: u8,
    /// Born-rule probability of the joint outcome this record belongs to.
    pub probability: f64,
}

/// Holds the results of executing a circuit: the final state vector, the
/// classical register and the measurement log.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    final_state: StateVector,
    register: ClassicalRegister,
    measurements: Vec<MeasurementRecord>,
}

impl SimulationResult {
    /// Assembles a result. Backends other than [`Simulator`](super::Simulator) use this too.
    pub fn new(final_state: StateVector, register: ClassicalRegister, measurements: Vec<MeasurementRecord>) -> Self {
        Self { final_state, register, measurements }
    }

    /// The state vector after the last operation.
    pub fn final_state(&self) -> &StateVector {
        &self.final_state
    }

    /// Consumes the result, returning the final state vector.
    pub fn into_final_state(self) -> StateVector {
        self.final_state
    }

    /// Classical bits written during the run.
    pub fn register(&self) -> &ClassicalRegister {
        &self.register
    }

    /// Measurement log in execution order.
    pub fn measurements(&self) -> &[MeasurementRecord] {
        &self.measurements
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        writeln!(f, "  Classical register: {}", self.register)?;
        if self.measurements.is_empty() {
            writeln!(f, "  No qubits were measured.")?;
        } else {
            writeln!(f, "  Measurements:")?;
            for m in &self.measurements {
                writeln!(f, "    {} -> {} = {} (p={:.4})", m.qubit, m.bit, m.value, m.probability)?;
            }
        }
        writeln!(f, "  Final state: {}", self.final_state)
    }
}
