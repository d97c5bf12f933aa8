// src/operations/mod.rs

//! Gate operations that make up a teleportation circuit.
//!
//! Each [`GateOperation`] pairs a [`GateKind`] with its target qubits and an
//! optional classical [`Condition`]. Conditions are plain data; the simulator's
//! replay loop decides whether a conditional operation fires.

use crate::core::{ClassicalBit, QubitId};
use num_complex::Complex;
use std::fmt;

/// The kind of operation applied to the target qubits.
#[derive(Debug, Clone, PartialEq)] // Using PartialEq for simplicity; f64 comparison needs care in practice.
pub enum GateKind {
    /// Prepares a qubit that is in `|0>` into the given single-qubit state.
    Init {
        /// Amplitudes `[alpha, beta]` of the prepared state.
        amplitudes: [Complex<f64>; 2],
    },
    /// Hadamard gate.
    Hadamard,
    /// Controlled-NOT; `targets[0]` is the control, `targets[1]` the target.
    Cnot,
    /// Pauli-X (bit flip).
    PauliX,
    /// Pauli-Z (phase flip).
    PauliZ,
    /// Computational-basis measurement; `targets[i]` is written into `bits[i]`.
    Measure {
        /// Destination classical bits, one per target.
        bits: Vec<ClassicalBit>,
    },
}

impl GateKind {
    /// Number of targets this kind expects, `None` when it depends on the operation.
    pub fn arity(&self) -> Option<usize> {
        match self {
            GateKind::Init { .. } | GateKind::Hadamard | GateKind::PauliX | GateKind::PauliZ => Some(1),
            GateKind::Cnot => Some(2),
            GateKind::Measure { .. } => None,
        }
    }

    /// Short label used in circuit diagrams.
    pub fn symbol(&self) -> &'static str {
        match self {
            GateKind::Init { .. } => "Init",
            GateKind::Hadamard => "H",
            GateKind::Cnot => "X",
            GateKind::PauliX => "X",
            GateKind::PauliZ => "Z",
            GateKind::Measure { .. } => "M",
        }
    }
}

/// Whether an operation always runs or depends on a measured classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    /// Always applied.
    #[default]
    Unconditional,
    /// Applied only if `bit` holds `expected`.
    ConditionalOn {
        /// The classical bit to inspect.
        bit: ClassicalBit,
        /// The value (0 or 1) that enables the operation.
        expected: u8,
    },
}

/// A single step of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOperation {
    /// What the step does.
    pub kind: GateKind,
    /// Qubits the step acts on, in the order required by `kind`.
    pub targets: Vec<QubitId>,
    /// Classical guard.
    pub condition: Condition,
}

impl GateOperation {
    fn unconditional(kind: GateKind, targets: Vec<QubitId>) -> Self {
        Self { kind, targets, condition: Condition::Unconditional }
    }

    /// Prepares `target` (assumed `|0>`) into `alpha|0> + beta|1>`.
    pub fn init(target: QubitId, amplitudes: [Complex<f64>; 2]) -> Self {
        Self::unconditional(GateKind::Init { amplitudes }, vec![target])
    }

    /// Hadamard on `target`.
    pub fn hadamard(target: QubitId) -> Self {
        Self::unconditional(GateKind::Hadamard, vec![target])
    }

    /// CNOT with the given control and target.
    pub fn cnot(control: QubitId, target: QubitId) -> Self {
        Self::unconditional(GateKind::Cnot, vec![control, target])
    }

    /// Pauli-X on `target`.
    pub fn pauli_x(target: QubitId) -> Self {
        Self::unconditional(GateKind::PauliX, vec![target])
    }

    /// Pauli-Z on `target`.
    pub fn pauli_z(target: QubitId) -> Self {
        Self::unconditional(GateKind::PauliZ, vec![target])
    }

    /// Joint measurement of `targets`, writing outcome `i` into `bits[i]`.
    pub fn measure(targets: Vec<QubitId>, bits: Vec<ClassicalBit>) -> Self {
        Self::unconditional(GateKind::Measure { bits }, targets)
    }

    /// Guards this operation on `bit == expected`.
    pub fn conditional_on(mut self, bit: ClassicalBit, expected: u8) -> Self {
        self.condition = Condition::ConditionalOn { bit, expected };
        self
    }

    /// Classical bits this operation writes.
    pub fn written_bits(&self) -> &[ClassicalBit] {
        match &self.kind {
            GateKind::Measure { bits } => bits,
            _ => &[],
        }
    }

    /// The classical bit this operation reads, if any.
    pub fn read_bit(&self) -> Option<ClassicalBit> {
        match self.condition {
            Condition::Unconditional => None,
            Condition::ConditionalOn { bit, .. } => Some(bit),
        }
    }
}

impl fmt::Display for GateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.symbol())?;
        let targets: Vec<String> = self.targets.iter().map(ToString::to_string).collect();
        write!(f, "({})", targets.join(", "))?;
        if let GateKind::Measure { bits } = &self.kind {
            let bits: Vec<String> = bits.iter().map(ToString::to_string).collect();
            write!(f, " -> [{}]", bits.join(", "))?;
        }
        if let Condition::ConditionalOn { bit, expected } = self.condition {
            write!(f, " if {}=={}", bit, expected)?;
        }
        Ok(())
    }
}
