// src/protocol/mod.rs

//! The teleportation protocol: circuit stages and the orchestrator that runs them.
//!
//! Register layout (big-endian, qubit 0 is the most significant bit):
//!
//! | qubit | role |
//! |---|---|
//! | [`MESSAGE`] | holds the state to teleport |
//! | [`SENDER_PAIR`] | sender's half of the Bell pair |
//! | [`RECEIVER`] | receiver's half of the Bell pair |
//!
//! The stage functions append operations to a [`CircuitBuilder`] and return it,
//! so they compose with method chaining.

mod outcome;
mod teleporter;

pub use outcome::{OutcomeCounts, TeleportationOutcome};
pub use teleporter::{Teleporter, run_teleportation};

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{ClassicalBit, QubitId, StateVector, TeleportError};
use crate::operations::GateOperation;

/// Width of the teleportation register.
pub const REGISTER_SIZE: usize = 3;
/// Qubit holding the unknown state.
pub const MESSAGE: QubitId = QubitId(0);
/// Sender's half of the entangled pair.
pub const SENDER_PAIR: QubitId = QubitId(1);
/// Receiver's half of the entangled pair.
pub const RECEIVER: QubitId = QubitId(2);

/// Appends `H(a)` then `CNOT(a -> b)`.
///
/// On two qubits in `|0>` this prepares `(|00> + |11>)/sqrt(2)`.
pub fn entangle(builder: CircuitBuilder, a: QubitId, b: QubitId) -> CircuitBuilder {
    builder
        .add_op(GateOperation::hadamard(a))
        .add_op(GateOperation::cnot(a, b))
}

/// Appends `CNOT(message -> pair)` then `H(message)`.
pub fn encode_sender(builder: CircuitBuilder, message: QubitId, pair: QubitId) -> CircuitBuilder {
    builder
        .add_op(GateOperation::cnot(message, pair))
        .add_op(GateOperation::hadamard(message))
}

/// Appends a joint measurement of the sender's qubits: `message` into the Z
/// bit and `pair` into the X bit.
pub fn measure_sender(builder: CircuitBuilder, message: QubitId, pair: QubitId) -> CircuitBuilder {
    builder.add_op(GateOperation::measure(
        vec![message, pair],
        vec![ClassicalBit::Z, ClassicalBit::X],
    ))
}

/// Appends the receiver's corrections: X if the X bit is 1, then Z if the Z bit is 1.
pub fn correct_receiver(builder: CircuitBuilder, receiver: QubitId) -> CircuitBuilder {
    builder
        .add_op(GateOperation::pauli_x(receiver).conditional_on(ClassicalBit::X, 1))
        .add_op(GateOperation::pauli_z(receiver).conditional_on(ClassicalBit::Z, 1))
}

/// Builds the full protocol circuit for teleporting `input`:
/// init, entangle, encode, measure, correct.
///
/// `input` must already be validated; its two amplitudes are rescaled to unit
/// norm before being written into the `Init` step.
pub fn teleportation_circuit(input: &StateVector) -> Result<Circuit, TeleportError> {
    let input = input.normalized()?;
    let amplitudes = match input.amplitudes() {
        [alpha, beta] => [*alpha, *beta],
        other => {
            return Err(TeleportError::validation(format!(
                "teleportation input must have 2 amplitudes, got {}",
                other.len()
            )));
        }
    };

    let builder = CircuitBuilder::new(REGISTER_SIZE).add_op(GateOperation::init(MESSAGE, amplitudes));
    let builder = entangle(builder, SENDER_PAIR, RECEIVER);
    let builder = encode_sender(builder, MESSAGE, SENDER_PAIR);
    let builder = measure_sender(builder, MESSAGE, SENDER_PAIR);
    correct_receiver(builder, RECEIVER).build()
}
