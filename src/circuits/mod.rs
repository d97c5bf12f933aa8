// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! gate operations ([`GateOperation`]) over a fixed qubit register.

use crate::core::{ClassicalBit, QubitId, TeleportError};
use crate::operations::{Condition, GateKind, GateOperation};
use std::collections::HashSet;
use std::fmt;

/// An ordered sequence of [`GateOperation`]s over a register of `qubit_count` qubits.
///
/// Operations execute strictly in insertion order. A `Circuit` can only be
/// obtained from [`CircuitBuilder::build`], which checks its invariants, and is
/// immutable afterwards.
#[derive(Clone, PartialEq)] // PartialEq useful for testing circuits
pub struct Circuit {
    /// Width of the register.
    qubit_count: usize,

    /// The ordered sequence of operations defining the circuit's logic.
    operations: Vec<GateOperation>,
}

impl Circuit {
    /// Number of qubits in the register the circuit acts on.
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[GateOperation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Classical bits written by some measurement in the circuit.
    pub fn measured_bits(&self) -> Vec<ClassicalBit> {
        self.operations.iter().flat_map(|op| op.written_bits().iter().copied()).collect()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
///
/// # Examples
/// ```
/// use teleport::{CircuitBuilder, GateOperation, QubitId};
///
/// let circuit = CircuitBuilder::new(2)
///     .add_op(GateOperation::hadamard(QubitId(0)))
///     .add_op(GateOperation::cnot(QubitId(0), QubitId(1)))
///     .build()
///     .expect("valid Bell-pair circuit");
/// assert_eq!(circuit.len(), 2);
/// ```
pub struct CircuitBuilder {
    qubit_count: usize,
    operations: Vec<GateOperation>,
}

impl CircuitBuilder {
    /// Creates a new, empty builder for a register of `qubit_count` qubits.
    pub fn new(qubit_count: usize) -> Self {
        Self { qubit_count, operations: Vec::new() }
    }

    /// Adds a single operation to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_op(mut self, op: GateOperation) -> Self {
        self.operations.push(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = GateOperation>,
    {
        self.operations.extend(ops);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    ///
    /// # Errors
    /// `TeleportError::InvalidCircuit` if any operation targets a qubit outside
    /// the register, repeats a target, has the wrong number of targets, writes
    /// a classical bit that was already written, or is conditioned on a bit
    /// that no earlier measurement writes.
    pub fn build(self) -> Result<Circuit, TeleportError> {
        let mut written: HashSet<ClassicalBit> = HashSet::new();

        for (step, op) in self.operations.iter().enumerate() {
            if op.targets.is_empty() {
                return Err(TeleportError::invalid_circuit(format!("step {} ({}) has no targets", step, op)));
            }
            if let Some(q) = op.targets.iter().find(|q| q.0 >= self.qubit_count) {
                return Err(TeleportError::invalid_circuit(format!(
                    "step {} ({}) targets {} outside a {}-qubit register",
                    step, op, q, self.qubit_count
                )));
            }
            let distinct: HashSet<QubitId> = op.targets.iter().copied().collect();
            if distinct.len() != op.targets.len() {
                return Err(TeleportError::invalid_circuit(format!(
                    "step {} ({}) repeats a target qubit",
                    step, op
                )));
            }
            let expected_arity = match &op.kind {
                GateKind::Measure { bits } => bits.len(),
                kind => kind.arity().unwrap_or(op.targets.len()),
            };
            if op.targets.len() != expected_arity {
                return Err(TeleportError::invalid_circuit(format!(
                    "step {} ({}) expects {} targets, got {}",
                    step,
                    op,
                    expected_arity,
                    op.targets.len()
                )));
            }

            // Guards are checked before this step's own writes: a measurement
            // cannot condition on the bit it produces.
            if let Condition::ConditionalOn { bit, expected } = op.condition {
                if expected > 1 {
                    return Err(TeleportError::invalid_circuit(format!(
                        "step {} ({}) compares bit {} against non-binary value {}",
                        step, op, bit, expected
                    )));
                }
                if !written.contains(&bit) {
                    return Err(TeleportError::invalid_circuit(format!(
                        "step {} ({}) is conditioned on bit {} before any measurement writes it",
                        step, op, bit
                    )));
                }
            }

            for bit in op.written_bits() {
                if !written.insert(*bit) {
                    return Err(TeleportError::invalid_circuit(format!(
                        "step {} ({}) writes bit {} a second time",
                        step, op, bit
                    )));
                }
            }
        }

        Ok(Circuit { qubit_count: self.qubit_count, operations: self.operations })
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            return writeln!(f, "Circuit[0 operations on {} qubits]", self.qubit_count);
        }

        // --- Setup ---
        let ops = &self.operations;
        let num_ops = ops.len();
        let num_qubits = self.qubit_count;

        let labels: Vec<String> = (0..num_qubits).map(|q| format!("{}: ", QubitId(q))).collect();
        let label_width = labels.iter().map(String::len).max().unwrap_or(0);
        let label_padding = " ".repeat(label_width);

        // Grid dimensions and padding
        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────"; // GATE_WIDTH dashes
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_qubits];
        // v_connect[row][time] stores the vertical connector char below this row at this time
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        fn connect(v_connect: &mut [Vec<char>], rows: &[usize], t: usize) {
            if let (Some(r_min), Some(r_max)) = (rows.iter().min(), rows.iter().max()) {
                for row_vec in v_connect.iter_mut().take(*r_max).skip(*r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }

        // --- Populate Grids ---
        for (t, op) in ops.iter().enumerate() {
            let rows: Vec<usize> = op.targets.iter().map(|q| q.0).collect();
            match &op.kind {
                GateKind::Cnot => {
                    op_grid[rows[0]][t] = format_gate("@");
                    op_grid[rows[1]][t] = format_gate("X");
                    connect(&mut v_connect, &rows, t);
                }
                GateKind::Measure { bits } => {
                    for (row, bit) in rows.iter().zip(bits) {
                        op_grid[*row][t] = format_gate(&format!("M>{}", bit));
                    }
                }
                kind => {
                    let symbol = match op.condition {
                        Condition::Unconditional => kind.symbol().to_string(),
                        Condition::ConditionalOn { bit, expected } => {
                            format!("{}[{}={}]", kind.symbol(), bit, expected)
                        }
                    };
                    for row in &rows {
                        op_grid[*row][t] = format_gate(&symbol);
                    }
                }
            }
        }

        // --- Format Output String ---
        writeln!(f, "Circuit[{} operations on {} qubits]", num_ops, num_qubits)?;
        for r in 0..num_qubits {
            write!(f, "{:<width$}", labels[r], width = label_width)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
