// tests/simulation_tests.rs

// Import necessary types from the teleport crate
use teleport::{
    Backend, Circuit, CircuitBuilder, ClassicalBit, ErrorKind, FixedStateSource, GateOperation, QubitId,
    SimulationResult, Simulator, StateVector, TeleportConfig, TeleportError, Teleporter,
};

use num_complex::Complex;
use std::f64::consts::FRAC_1_SQRT_2;

const TEST_TOLERANCE: f64 = 1e-9;

// Helper function to create QubitId for tests
fn qid(id: usize) -> QubitId {
    QubitId(id)
}

/// Asserts that two complex state vectors are approximately equal component-wise.
fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
    assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
    for i in 0..actual.len() {
        let dist_sq = (actual[i] - expected[i]).norm_sqr();
        assert!(
            dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
            "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
            i, actual[i], expected[i], context
        );
    }
}

fn c(re: f64, im: f64) -> Complex<f64> {
    Complex::new(re, im)
}

#[test]
fn test_empty_circuit() -> Result<(), TeleportError> {
    let circuit = CircuitBuilder::new(2).build()?;
    let mut simulator = Simulator::seeded(0);
    let initial = StateVector::basis_state(2, 0b01)?;
    let result = simulator.execute(&circuit, &initial)?;

    assert!(circuit.is_empty());
    assert_eq!(result.final_state(), &initial, "Empty circuit should leave the state untouched");
    assert!(!result.register().is_complete());
    Ok(())
}

#[test]
fn test_bell_pair_amplitudes() -> Result<(), TeleportError> {
    let circuit = teleport::protocol::entangle(CircuitBuilder::new(2), qid(0), qid(1)).build()?;
    let mut simulator = Simulator::seeded(1);
    let result = simulator.execute(&circuit, &StateVector::zero_state(2))?;

    let h = c(FRAC_1_SQRT_2, 0.0);
    let zero = c(0.0, 0.0);
    assert_complex_vec_approx_equal(result.final_state().amplitudes(), &[h, zero, zero, h], "Bell pair");
    Ok(())
}

#[test]
fn test_bell_pair_inside_register() -> Result<(), TeleportError> {
    // Entangling q1 and q2 of |000> leaves q0 alone: (|000> + |011>)/sqrt(2)
    let circuit = teleport::protocol::entangle(CircuitBuilder::new(3), qid(1), qid(2)).build()?;
    let mut simulator = Simulator::seeded(2);
    let result = simulator.execute(&circuit, &StateVector::zero_state(3))?;

    let state = result.final_state();
    assert!((state.probability(0b000) - 0.5).abs() < TEST_TOLERANCE);
    assert!((state.probability(0b011) - 0.5).abs() < TEST_TOLERANCE);
    Ok(())
}

#[test]
fn test_hadamard_twice_is_identity() -> Result<(), TeleportError> {
    let psi = StateVector::from_bloch_angles(1.2, -0.4);
    let circuit = CircuitBuilder::new(1)
        .add_op(GateOperation::hadamard(qid(0)))
        .add_op(GateOperation::hadamard(qid(0)))
        .build()?;
    let result = Simulator::seeded(3).execute(&circuit, &psi)?;
    assert_complex_vec_approx_equal(result.final_state().amplitudes(), psi.amplitudes(), "HH");
    Ok(())
}

#[test]
fn test_pauli_gates() -> Result<(), TeleportError> {
    let psi = StateVector::from_amplitudes(vec![c(0.6, 0.0), c(0.0, 0.8)]);

    let x = CircuitBuilder::new(1).add_op(GateOperation::pauli_x(qid(0))).build()?;
    let result = Simulator::seeded(4).execute(&x, &psi)?;
    assert_complex_vec_approx_equal(result.final_state().amplitudes(), &[c(0.0, 0.8), c(0.6, 0.0)], "X");

    let z = CircuitBuilder::new(1).add_op(GateOperation::pauli_z(qid(0))).build()?;
    let result = Simulator::seeded(4).execute(&z, &psi)?;
    assert_complex_vec_approx_equal(result.final_state().amplitudes(), &[c(0.6, 0.0), c(0.0, -0.8)], "Z");
    Ok(())
}

#[test]
fn test_measurement_of_basis_state_is_deterministic() -> Result<(), TeleportError> {
    let circuit = CircuitBuilder::new(3)
        .add_op(GateOperation::measure(vec![qid(0), qid(1)], vec![ClassicalBit::Z, ClassicalBit::X]))
        .build()?;
    let initial = StateVector::basis_state(3, 0b100)?;
    let mut simulator = Simulator::seeded(5);
    for _ in 0..10 {
        let result = simulator.execute(&circuit, &initial)?;
        assert_eq!(result.register().read(ClassicalBit::Z)?, 1);
        assert_eq!(result.register().read(ClassicalBit::X)?, 0);
        assert_eq!(result.final_state(), &initial);
    }
    Ok(())
}

#[test]
fn test_conditional_gate_follows_measured_bit() -> Result<(), TeleportError> {
    // Measure q0, then flip q1 only if q0 read 1: q1 must always end up equal to q0.
    let circuit = CircuitBuilder::new(2)
        .add_op(GateOperation::hadamard(qid(0)))
        .add_op(GateOperation::measure(vec![qid(0)], vec![ClassicalBit::Z]))
        .add_op(GateOperation::pauli_x(qid(1)).conditional_on(ClassicalBit::Z, 1))
        .build()?;
    let mut simulator = Simulator::seeded(6);
    let mut seen = [false; 2];
    for _ in 0..50 {
        let result = simulator.execute(&circuit, &StateVector::zero_state(2))?;
        let z = result.register().read(ClassicalBit::Z)?;
        seen[usize::from(z)] = true;
        let index = if z == 1 { 0b11 } else { 0b00 };
        assert!((result.final_state().probability(index) - 1.0).abs() < TEST_TOLERANCE);
    }
    assert!(seen[0] && seen[1], "both outcomes should occur in 50 shots");
    Ok(())
}

#[test]
fn test_builder_rejects_condition_on_unmeasured_bit() {
    let err = CircuitBuilder::new(1)
        .add_op(GateOperation::pauli_x(qid(0)).conditional_on(ClassicalBit::X, 1))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCircuit);
}

#[test]
fn test_builder_rejects_out_of_range_and_aliased_targets() {
    let out_of_range = CircuitBuilder::new(2).add_op(GateOperation::hadamard(qid(2))).build();
    assert_eq!(out_of_range.unwrap_err().kind(), ErrorKind::InvalidCircuit);

    let aliased = CircuitBuilder::new(2).add_op(GateOperation::cnot(qid(1), qid(1))).build();
    assert_eq!(aliased.unwrap_err().kind(), ErrorKind::InvalidCircuit);
}

#[test]
fn test_circuit_display() -> Result<(), TeleportError> {
    let circuit = teleport::protocol::teleportation_circuit(&StateVector::plus())?;
    let diagram = circuit.to_string();
    println!("{}", diagram);
    assert!(diagram.starts_with("Circuit[8 operations on 3 qubits]"));
    assert_eq!(diagram.lines().filter(|l| l.starts_with('q')).count(), 3);
    Ok(())
}

/// Backend that refuses every circuit.
struct OfflineBackend;

impl Backend for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    fn execute(&mut self, _circuit: &Circuit, _initial: &StateVector) -> Result<SimulationResult, TeleportError> {
        Err(TeleportError::simulation("device offline"))
    }
}

#[test]
fn test_failing_backend_surfaces_as_simulation_error() {
    let mut teleporter = Teleporter::with_parts(
        FixedStateSource::new(StateVector::plus()),
        OfflineBackend,
        TeleportConfig::default(),
    );
    let err = teleporter.run(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Simulation);
    assert_eq!(err.message(), "device offline");

    let err = teleporter.sample_outcomes(&StateVector::plus(), 5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Simulation);
}

#[test]
fn test_gates_on_every_register_position() -> Result<(), TeleportError> {
    // X on each qubit of |000> sets exactly that bit; H on each gives an even split.
    for (qubit, index) in [(0, 0b100), (1, 0b010), (2, 0b001)] {
        let flip = CircuitBuilder::new(3).add_op(GateOperation::pauli_x(qid(qubit))).build()?;
        let result = Simulator::seeded(20).execute(&flip, &StateVector::zero_state(3))?;
        assert!((result.final_state().probability(index) - 1.0).abs() < TEST_TOLERANCE, "X(q{})", qubit);

        let spread = CircuitBuilder::new(3).add_op(GateOperation::hadamard(qid(qubit))).build()?;
        let result = Simulator::seeded(20).execute(&spread, &StateVector::zero_state(3))?;
        assert!((result.final_state().probability(0) - 0.5).abs() < TEST_TOLERANCE, "H(q{})", qubit);
        assert!((result.final_state().probability(index) - 0.5).abs() < TEST_TOLERANCE, "H(q{})", qubit);
    }
    Ok(())
}
