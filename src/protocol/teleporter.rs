// src/protocol/teleporter.rs

//! The protocol orchestrator.

use super::outcome::{OutcomeCounts, TeleportationOutcome};
use super::{MESSAGE, RECEIVER, REGISTER_SIZE, SENDER_PAIR, teleportation_circuit};
use crate::circuits::Circuit;
use crate::config::TeleportConfig;
use crate::core::{ClassicalBit, StateVector, TeleportError};
use crate::fidelity::{is_faithful, state_fidelity};
use crate::preparation::{RandomStateSource, StateSource};
use crate::simulation::{Backend, Simulator};
use crate::validation;
use tracing::{debug, info, warn};

/// Runs the teleportation protocol end to end.
///
/// The state source and the simulation backend are injected so runs can be
/// made deterministic (seeded sources) or fail on purpose (test backends).
/// The orchestrator never prints; it reports through its return values and
/// `tracing` events.
///
/// # Examples
/// ```
/// use teleport::{StateVector, TeleportConfig, Teleporter};
///
/// let mut teleporter = Teleporter::new(TeleportConfig::new().with_seed(3));
/// let outcome = teleporter.run(Some(StateVector::plus())).unwrap();
/// assert!(outcome.fidelity > 1.0 - 1e-6);
/// assert!(outcome.output.approx_eq_up_to_phase(&StateVector::plus(), 1e-9));
/// ```
#[derive(Debug, Clone)]
pub struct Teleporter<S = RandomStateSource, B = Simulator> {
    source: S,
    backend: B,
    config: TeleportConfig,
}

impl Teleporter {
    /// Creates a teleporter with a random state source and the state-vector
    /// simulator, both seeded from `config.seed` when it is set.
    pub fn new(config: TeleportConfig) -> Self {
        let source = match config.source_seed() {
            Some(seed) => RandomStateSource::seeded(seed),
            None => RandomStateSource::from_entropy(),
        };
        let backend = Simulator::from_config(&config);
        Self { source, backend, config }
    }
}

impl Default for Teleporter {
    fn default() -> Self {
        Self::new(TeleportConfig::default())
    }
}

impl<S: StateSource, B: Backend> Teleporter<S, B> {
    /// Assembles a teleporter from explicit collaborators.
    pub fn with_parts(source: S, backend: B, config: TeleportConfig) -> Self {
        Self { source, backend, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    /// The simulation backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Teleports `input`, or a state drawn from the source when `input` is `None`.
    ///
    /// An input accepted within `norm_tolerance` is rescaled to unit norm; the
    /// outcome reports the rescaled state.
    ///
    /// # Errors
    /// * `TeleportError::Validation` if the state is not a normalized
    ///   2-dimensional vector. Nothing is simulated in that case.
    /// * `TeleportError::Simulation` if the backend fails.
    pub fn run(&mut self, input: Option<StateVector>) -> Result<TeleportationOutcome, TeleportError> {
        let input = match input {
            Some(state) => state,
            None => {
                let state = self.source.next_state();
                debug!(%state, "drew input state from source");
                state
            }
        };
        let input = self.accept(input)?;

        let circuit = teleportation_circuit(&input)?;
        let outcome = self.execute(&circuit, input)?;
        info!(
            z = outcome.z_bit,
            x = outcome.x_bit,
            fidelity = outcome.fidelity,
            backend = self.backend.name(),
            "teleportation complete"
        );
        Ok(outcome)
    }

    /// Teleports `input` `shots` times and tallies the measured `(z, x)` pairs.
    ///
    /// # Errors
    /// `TeleportError::Validation` for an invalid input or `shots == 0`;
    /// `TeleportError::Simulation` if any shot fails.
    pub fn sample_outcomes(&mut self, input: &StateVector, shots: usize) -> Result<OutcomeCounts, TeleportError> {
        if shots == 0 {
            return Err(TeleportError::validation("number of shots must be positive"));
        }
        let input = self.accept(input.clone())?;

        let circuit = teleportation_circuit(&input)?;
        let mut counts = OutcomeCounts::new();
        for _ in 0..shots {
            let outcome = self.execute(&circuit, input.clone())?;
            counts.record(outcome.z_bit, outcome.x_bit);
        }
        info!(shots, backend = self.backend.name(), "sampling complete");
        Ok(counts)
    }

    /// Validates `input` against the configured tolerance and rescales it to unit norm.
    fn accept(&self, input: StateVector) -> Result<StateVector, TeleportError> {
        validation::validate_single_qubit(&input, Some(self.config.norm_tolerance)).inspect_err(|e| {
            warn!(error = %e, "rejecting input state");
        })?;
        input.normalized()
    }

    /// Runs `circuit` from `|000>` and reads the receiver's state off the measured branch.
    fn execute(&mut self, circuit: &Circuit, input: StateVector) -> Result<TeleportationOutcome, TeleportError> {
        let initial = StateVector::zero_state(REGISTER_SIZE);
        let result = self.backend.execute(circuit, &initial)?;

        let z_bit = result.register().read(ClassicalBit::Z)?;
        let x_bit = result.register().read(ClassicalBit::X)?;
        let final_state = result.into_final_state();
        let output = final_state.qubit_branch(&[(MESSAGE, z_bit), (SENDER_PAIR, x_bit)], RECEIVER)?;

        let fidelity = state_fidelity(&input, &output)?;
        if !is_faithful(fidelity, self.config.fidelity_tolerance) {
            warn!(fidelity, tolerance = self.config.fidelity_tolerance, "teleported state deviates from input");
        }
        debug!(z_bit, x_bit, fidelity, "shot finished");

        Ok(TeleportationOutcome { input, output, fidelity, z_bit, x_bit, final_state })
    }
}

/// Teleports `input` (or a random state) with a default, entropy-seeded [`Teleporter`].
///
/// # Examples
/// ```
/// use teleport::{ErrorKind, StateVector, run_teleportation};
///
/// let outcome = run_teleportation(Some(StateVector::one())).unwrap();
/// assert!((outcome.fidelity - 1.0).abs() < 1e-9);
///
/// let err = run_teleportation(Some(StateVector::from_reals(&[1.0, 1.0]))).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Validation);
/// ```
pub fn run_teleportation(input: Option<StateVector>) -> Result<TeleportationOutcome, TeleportError> {
    Teleporter::default().run(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::preparation::FixedStateSource;
    use crate::simulation::SimulationResult;

    /// Backend that counts calls and always fails.
    struct BrokenBackend {
        calls: usize,
    }

    impl Backend for BrokenBackend {
        fn name(&self) -> &str {
            "broken"
        }

        fn execute(&mut self, _circuit: &Circuit, _initial: &StateVector) -> Result<SimulationResult, TeleportError> {
            self.calls += 1;
            Err(TeleportError::simulation("backend unavailable"))
        }
    }

    #[test]
    fn test_source_used_when_no_input() {
        let psi = StateVector::from_bloch_angles(0.3, 0.9);
        let mut teleporter = Teleporter::with_parts(
            FixedStateSource::new(psi.clone()),
            Simulator::seeded(8),
            TeleportConfig::default(),
        );
        let outcome = teleporter.run(None).unwrap();
        assert!(outcome.input.approx_eq_up_to_phase(&psi, 1e-12));
        assert!(outcome.fidelity > 1.0 - 1e-9);
    }

    #[test]
    fn test_validation_failure_skips_backend() {
        let mut teleporter = Teleporter::with_parts(
            FixedStateSource::new(StateVector::zero()),
            BrokenBackend { calls: 0 },
            TeleportConfig::default(),
        );
        let err = teleporter.run(Some(StateVector::from_reals(&[1.0, 1.0]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(teleporter.backend().calls, 0);
    }

    #[test]
    fn test_backend_failure_is_simulation_error() {
        let mut teleporter = Teleporter::with_parts(
            FixedStateSource::new(StateVector::zero()),
            BrokenBackend { calls: 0 },
            TeleportConfig::default(),
        );
        let err = teleporter.run(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Simulation);
        assert!(err.to_string().contains("backend unavailable"));
        assert_eq!(teleporter.backend().calls, 1);
    }

    #[test]
    fn test_zero_shots_rejected() {
        let mut teleporter = Teleporter::new(TeleportConfig::new().with_seed(1));
        let err = teleporter.sample_outcomes(&StateVector::plus(), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_norm_tolerance_from_config() {
        // norm^2 = 1.00016001
        let slightly_off = StateVector::from_reals(&[0.6, 0.8001]);
        let mut strict = Teleporter::new(TeleportConfig::new().with_seed(2));
        let err = strict.run(Some(slightly_off.clone())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let mut lenient = Teleporter::new(TeleportConfig::new().with_seed(2).with_norm_tolerance(1e-3));
        let outcome = lenient.run(Some(slightly_off.clone())).unwrap();
        assert!((outcome.input.norm_sqr() - 1.0).abs() < 1e-12);
        assert!((outcome.fidelity - 1.0).abs() < 1e-9);
        assert!(outcome.output.approx_eq_up_to_phase(&slightly_off.normalized().unwrap(), 1e-9));

        let counts = lenient.sample_outcomes(&slightly_off, 8).unwrap();
        assert_eq!(counts.shots(), 8);
    }
}
