//! Step-by-step walk through the teleportation circuit, then a few full runs

use num_complex::Complex;
use teleport::protocol::{
    MESSAGE, RECEIVER, REGISTER_SIZE, SENDER_PAIR, correct_receiver, encode_sender, entangle, measure_sender,
};
use teleport::{
    Backend, CircuitBuilder, ClassicalBit, GateOperation, Simulator, StateVector, TeleportConfig, Teleporter,
};

fn main() {
    println!("Qubits: message={}, sender={}, receiver={}", MESSAGE, SENDER_PAIR, RECEIVER);

    // The state to send: (0.6)|0> + (0.8i)|1>
    let psi = StateVector::from_amplitudes(vec![Complex::new(0.6, 0.0), Complex::new(0.0, 0.8)]);
    println!("Message state: {}", psi);

    // --- Build the circuit one stage at a time ---
    let builder = CircuitBuilder::new(REGISTER_SIZE)
        .add_op(GateOperation::init(MESSAGE, [psi.amplitudes()[0], psi.amplitudes()[1]]));
    println!("  Step 1: Prepare the message qubit.");

    let builder = entangle(builder, SENDER_PAIR, RECEIVER);
    println!("  Step 2: Share a Bell pair between sender and receiver.");

    let builder = encode_sender(builder, MESSAGE, SENDER_PAIR);
    println!("  Step 3: Rotate the sender's qubits into the Bell basis (CNOT, H).");

    let builder = measure_sender(builder, MESSAGE, SENDER_PAIR);
    println!("  Step 4: Measure the sender's qubits into bits z and x.");

    let builder = correct_receiver(builder, RECEIVER);
    println!("  Step 5: Receiver applies X if x == 1, then Z if z == 1.");

    let circuit = match builder.build() {
        Ok(circuit) => circuit,
        Err(e) => {
            eprintln!("Could not build circuit: {}", e);
            return;
        }
    };
    println!("\nQuantum Teleportation Circuit:\n{}", circuit);

    // --- Run it directly on the simulator ---
    let mut simulator = Simulator::seeded(7);
    match simulator.execute(&circuit, &StateVector::zero_state(REGISTER_SIZE)) {
        Ok(result) => {
            println!("Simulation Result Details:\n{}", result);
            if let (Some(z), Some(x)) = (result.register().get(ClassicalBit::Z), result.register().get(ClassicalBit::X)) {
                match result.final_state().qubit_branch(&[(MESSAGE, z), (SENDER_PAIR, x)], RECEIVER) {
                    Ok(received) => println!("Receiver holds: {}", received),
                    Err(e) => eprintln!("Could not read the receiver's qubit: {}", e),
                }
            }
        }
        Err(e) => {
            eprintln!("\n--- Simulation Failed ---");
            eprintln!("Error: {}", e);
        }
    }

    // --- Full protocol runs ---
    let mut teleporter = Teleporter::new(TeleportConfig::new().with_seed(2025));
    let inputs = [
        Some(StateVector::one()),
        Some(StateVector::minus()),
        Some(psi.clone()),
        None, // random
    ];
    for input in inputs {
        println!();
        match teleporter.run(input) {
            Ok(outcome) => println!("{}", outcome),
            Err(e) => eprintln!("An error occurred: {}", e),
        }
    }

    println!();
    match teleporter.sample_outcomes(&psi, 2000) {
        Ok(counts) => print!("{}", counts),
        Err(e) => eprintln!("An error occurred: {}", e),
    }

    // An invalid input is rejected before anything is simulated.
    println!();
    match teleporter.run(Some(StateVector::from_reals(&[1.0, 1.0]))) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected as expected: {}", e),
    }
}
