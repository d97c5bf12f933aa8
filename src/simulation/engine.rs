// src/simulation/engine.rs
use crate::core::state::AMPLITUDE_TOLERANCE;
use crate::core::{ClassicalRegister, QubitId, StateVector, TeleportError};
use crate::operations::{Condition, GateKind, GateOperation};
use crate::simulation::MeasurementRecord;
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::trace;

type Matrix2 = [[Complex<f64>; 2]; 2];

/// Outcome of applying a single operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The operation changed (or may have changed) the state.
    Applied,
    /// The operation's classical condition was false.
    Skipped,
    /// The operation was a measurement; one record per measured qubit.
    Measured(Vec<MeasurementRecord>),
}

/// Noiseless state-vector engine over a register of `n` qubits.
///
/// Holds the global state vector and evolves it in place, one
/// [`GateOperation`] at a time.
#[derive(Debug, Clone)]
pub struct StateVectorEngine {
    /// The global state vector. The dimension is 2^N.
    state: StateVector,
    /// Number of qubits being simulated (N).
    num_qubits: usize,
}

impl StateVectorEngine {
    /// Wraps `state`, which must have a power-of-two dimension.
    pub fn new(state: StateVector) -> Result<Self, TeleportError> {
        let num_qubits = state.qubit_count().ok_or_else(|| {
            TeleportError::simulation(format!(
                "state vector dimension {} is not a power of two",
                state.dim()
            ))
        })?;
        Ok(Self { state, num_qubits })
    }

    /// Current global state.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Consumes the engine, returning the global state.
    pub fn into_state(self) -> StateVector {
        self.state
    }

    /// Number of simulated qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Applies one operation, honoring its classical condition against `register`.
    ///
    /// Measurements sample from `rng` and write their outcomes into `register`.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        op: &GateOperation,
        register: &mut ClassicalRegister,
        rng: &mut R,
    ) -> Result<StepOutcome, TeleportError> {
        if let Condition::ConditionalOn { bit, expected } = op.condition {
            let value = register.read(bit)?;
            if value != expected {
                trace!(%op, %bit, value, "condition false, skipping");
                return Ok(StepOutcome::Skipped);
            }
        }

        let expected_arity = op.kind.arity().unwrap_or(op.targets.len());
        if op.targets.is_empty() || op.targets.len() != expected_arity {
            return Err(TeleportError::simulation(format!(
                "{} expects {} targets, got {}",
                op,
                expected_arity.max(1),
                op.targets.len()
            )));
        }
        for q in &op.targets {
            self.check_qubit(*q)?;
        }

        match &op.kind {
            GateKind::Init { amplitudes } => self.initialize(op.targets[0], amplitudes)?,
            GateKind::Hadamard => self.apply_single_qubit_gate(op.targets[0], &hadamard_matrix()),
            GateKind::PauliX => self.apply_single_qubit_gate(op.targets[0], &pauli_x_matrix()),
            GateKind::PauliZ => self.apply_single_qubit_gate(op.targets[0], &pauli_z_matrix()),
            GateKind::Cnot => {
                let (control, target) = (op.targets[0], op.targets[1]);
                if control == target {
                    return Err(TeleportError::simulation(
                        "control and target qubits cannot be the same for a controlled gate",
                    ));
                }
                self.apply_controlled_gate(control, target, &pauli_x_matrix());
            }
            GateKind::Measure { bits } => {
                if bits.len() != op.targets.len() {
                    return Err(TeleportError::simulation(format!(
                        "measurement of {} qubits into {} bits",
                        op.targets.len(),
                        bits.len()
                    )));
                }
                let (values, probability) = self.measure(&op.targets, rng)?;
                let mut records = Vec::with_capacity(values.len());
                for ((qubit, bit), value) in op.targets.iter().zip(bits).zip(values) {
                    register.set(*bit, value)?;
                    records.push(MeasurementRecord { qubit: *qubit, bit: *bit, value, probability });
                }
                return Ok(StepOutcome::Measured(records));
            }
        }
        Ok(StepOutcome::Applied)
    }

    /// Samples a joint computational-basis outcome of `targets` under the Born
    /// rule and collapses the state onto it.
    ///
    /// Returns the outcome bits (in `targets` order) and the probability of the
    /// sampled branch.
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        targets: &[QubitId],
        rng: &mut R,
    ) -> Result<(Vec<u8>, f64), TeleportError> {
        for q in targets {
            self.check_qubit(*q)?;
        }
        let masks: Vec<usize> = targets.iter().map(|q| self.mask(*q)).collect();

        // 1. Marginal distribution over the 2^k joint outcomes; targets[0] is the high bit.
        let mut probabilities = vec![0.0; 1 << targets.len()];
        for (index, amp) in self.state.amplitudes().iter().enumerate() {
            probabilities[outcome_of(index, &masks)] += amp.norm_sqr();
        }
        let total: f64 = probabilities.iter().sum();
        if total < AMPLITUDE_TOLERANCE {
            return Err(TeleportError::simulation("cannot measure a zero state vector"));
        }

        // 2. Outcome selection in ascending order against one uniform draw.
        let p_sample: f64 = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (outcome, p) in probabilities.iter().enumerate() {
            if *p <= AMPLITUDE_TOLERANCE {
                continue;
            }
            cumulative += *p;
            chosen = Some(outcome);
            if p_sample < cumulative {
                break;
            }
        }
        // Rounding can leave p_sample just above the last cumulative sum; the
        // last possible outcome is then kept.
        let chosen = chosen.ok_or_else(|| TeleportError::simulation("no measurement outcome has non-zero probability"))?;
        let probability = probabilities[chosen] / total;

        // 3. Collapse: drop the other branches and renormalize.
        let scale = 1.0 / probabilities[chosen].sqrt();
        for (index, amp) in self.state.amplitudes_mut().iter_mut().enumerate() {
            if outcome_of(index, &masks) == chosen {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }

        let k = targets.len();
        let bits = (0..k).map(|i| ((chosen >> (k - 1 - i)) & 1) as u8).collect();
        trace!(?targets, outcome = chosen, probability, "collapsed");
        Ok((bits, probability))
    }

    fn check_qubit(&self, qubit: QubitId) -> Result<(), TeleportError> {
        if qubit.0 >= self.num_qubits {
            return Err(TeleportError::simulation(format!(
                "qubit {} not found in a {}-qubit register",
                qubit, self.num_qubits
            )));
        }
        Ok(())
    }

    /// Bit mask of `qubit` within a basis index (qubit 0 is the most significant bit).
    fn mask(&self, qubit: QubitId) -> usize {
        1 << (self.num_qubits - 1 - qubit.0)
    }

    /// Prepares `target`, which must be in `|0>`, into `alpha|0> + beta|1>` by
    /// applying the unitary `[[alpha, -conj(beta)], [beta, conj(alpha)]]`.
    fn initialize(&mut self, target: QubitId, amplitudes: &[Complex<f64>; 2]) -> Result<(), TeleportError> {
        let [alpha, beta] = *amplitudes;
        let norm_sq = alpha.norm_sqr() + beta.norm_sqr();
        if (norm_sq - 1.0).abs() > 1e-9 {
            return Err(TeleportError::simulation(format!(
                "Init amplitudes are not normalized (norm^2 = {})",
                norm_sq
            )));
        }

        let mask = self.mask(target);
        let excited: f64 = self
            .state
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum();
        if excited > AMPLITUDE_TOLERANCE {
            return Err(TeleportError::simulation(format!(
                "Init requires {} to be in |0>, found weight {:.3e} on |1>",
                target, excited
            )));
        }

        let preparation: Matrix2 = [[alpha, -beta.conj()], [beta, alpha.conj()]];
        self.apply_single_qubit_gate(target, &preparation);
        Ok(())
    }

    /// Applies a 2x2 matrix to a single qubit of the global state vector.
    fn apply_single_qubit_gate(&mut self, target: QubitId, matrix: &Matrix2) {
        let k_mask = self.mask(target); // Mask for the target bit
        let lower_mask = k_mask - 1; // Mask for bits to the right

        let dim = self.state.dim();
        let vector = self.state.amplitudes_mut();

        // Iterate over pairs of basis states differing only at the target position
        for i in 0..dim / 2 {
            // Insert a 0 at the target position: bits of i at or above it move up one place.
            let i0 = ((i & !lower_mask) << 1) | (i & lower_mask);
            let i1 = i0 | k_mask;

            let psi_0 = vector[i0];
            let psi_1 = vector[i1];

            vector[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vector[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Applies `matrix` to `target` on the subspace where `control` is 1.
    fn apply_controlled_gate(&mut self, control: QubitId, target: QubitId, matrix: &Matrix2) {
        let c_mask = self.mask(control);
        let t_mask = self.mask(target);
        let vector = self.state.amplitudes_mut();

        for i0 in 0..vector.len() {
            if i0 & c_mask == 0 || i0 & t_mask != 0 {
                continue;
            }
            let i1 = i0 | t_mask;
            let psi_0 = vector[i0];
            let psi_1 = vector[i1];
            vector[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vector[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }
}

/// Joint outcome index of a basis state restricted to the measured qubits.
fn outcome_of(index: usize, masks: &[usize]) -> usize {
    masks.iter().fold(0, |acc, m| (acc << 1) | usize::from(index & m != 0))
}

fn hadamard_matrix() -> Matrix2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn pauli_x_matrix() -> Matrix2 {
    [
        [Complex::zero(), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::zero()],
    ]
}

fn pauli_z_matrix() -> Matrix2 {
    [
        [Complex::new(1.0, 0.0), Complex::zero()],
        [Complex::zero(), Complex::new(-1.0, 0.0)],
    ]
}
