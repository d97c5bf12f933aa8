// src/lib.rs

//! `teleport` - A simulation of single-qubit quantum teleportation
//!
//! A sender holding an unknown qubit state and one half of an entangled pair
//! transmits the state to a receiver using two classical bits. This library
//! builds that protocol as a gate circuit, executes it on a noiseless
//! state-vector backend and scores the received state by its fidelity.

pub mod config;
pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod preparation;
pub mod fidelity;
pub mod protocol;

// Re-export the most common types for easier top-level use
pub use config::TeleportConfig;
pub use core::{ClassicalBit, ClassicalRegister, ErrorKind, QubitId, StateVector, TeleportError};
pub use operations::{Condition, GateKind, GateOperation};
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{Backend, SimulationResult, Simulator};
pub use validation::{check_normalization, validate_single_qubit};
pub use preparation::{FixedStateSource, RandomStateSource, StateSource};
pub use fidelity::state_fidelity;
pub use protocol::{OutcomeCounts, TeleportationOutcome, Teleporter, run_teleportation};

// Example 1: Teleporting a fixed state
// Sends |1> and checks that the receiver ends up with |1>, whatever the
// measured bits were.
/// ```
/// use teleport::{StateVector, TeleportConfig, Teleporter};
///
/// let mut teleporter = Teleporter::new(TeleportConfig::new().with_seed(7));
/// let outcome = teleporter.run(Some(StateVector::one())).unwrap();
///
/// println!("{}", outcome);
/// assert!(outcome.z_bit <= 1 && outcome.x_bit <= 1);
/// assert!(outcome.output.approx_eq_up_to_phase(&StateVector::one(), 1e-9));
/// assert!((outcome.fidelity - 1.0).abs() < 1e-9);
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Running the Bell pair stage on its own
// Builds H + CNOT on two qubits and checks the amplitudes of (|00> + |11>)/sqrt(2).
/// ```
/// use teleport::{Backend, CircuitBuilder, QubitId, Simulator, StateVector};
/// use teleport::protocol::entangle;
/// use std::f64::consts::FRAC_1_SQRT_2;
///
/// let circuit = entangle(CircuitBuilder::new(2), QubitId(0), QubitId(1)).build().unwrap();
/// println!("{}", circuit);
///
/// let mut simulator = Simulator::seeded(0);
/// let result = simulator.execute(&circuit, &StateVector::zero_state(2)).unwrap();
/// let expected = [FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2];
/// for (amp, want) in result.final_state().amplitudes().iter().zip(expected) {
///     assert!((amp.re - want).abs() < 1e-9 && amp.im.abs() < 1e-9);
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 3: Rejected input
// An unnormalized input is reported as a validation error before anything runs.
/// ```
/// use teleport::{ErrorKind, StateVector, run_teleportation};
///
/// let err = run_teleportation(Some(StateVector::from_reals(&[1.0, 0.0, 0.0]))).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Validation);
/// println!("{}", err);
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
