// src/protocol/outcome.rs
use crate::core::StateVector;
use std::fmt;

/// Everything a successful teleportation run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportationOutcome {
    /// The state that was teleported.
    pub input: StateVector,
    /// The receiver's qubit after correction, on the measured branch.
    pub output: StateVector,
    /// `|<input|output>|^2`.
    pub fidelity: f64,
    /// Measured value of the message qubit.
    pub z_bit: u8,
    /// Measured value of the sender's pair qubit.
    pub x_bit: u8,
    /// Full 3-qubit state vector at the end of the circuit.
    pub final_state: StateVector,
}

impl fmt::Display for TeleportationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input state:  {}", self.input)?;
        writeln!(f, "Classical bits: z={} x={}", self.z_bit, self.x_bit)?;
        writeln!(f, "Output state: {}", self.output)?;
        write!(f, "Fidelity of the teleported state: {:.4}", self.fidelity)
    }
}

/// Tally of measured `(z, x)` pairs over repeated runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    /// Indexed by `2*z + x`.
    counts: [usize; 4],
}

impl OutcomeCounts {
    /// An empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one run.
    pub fn record(&mut self, z: u8, x: u8) {
        self.counts[Self::slot(z, x)] += 1;
    }

    /// Number of runs that measured `(z, x)`.
    pub fn count(&self, z: u8, x: u8) -> usize {
        self.counts[Self::slot(z, x)]
    }

    /// Total number of runs.
    pub fn shots(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Observed frequency of `(z, x)`; 0 when nothing was recorded.
    pub fn frequency(&self, z: u8, x: u8) -> f64 {
        match self.shots() {
            0 => 0.0,
            n => self.count(z, x) as f64 / n as f64,
        }
    }

    fn slot(z: u8, x: u8) -> usize {
        (usize::from(z & 1) << 1) | usize::from(x & 1)
    }
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const BAR_WIDTH: f64 = 40.0;
        writeln!(f, "Outcome histogram ({} shots):", self.shots())?;
        for z in 0..2u8 {
            for x in 0..2u8 {
                let freq = self.frequency(z, x);
                let bar = "#".repeat((freq * BAR_WIDTH).round() as usize);
                writeln!(f, "  z={} x={} {:>6} {:>6.2}% {}", z, x, self.count(z, x), freq * 100.0, bar)?;
            }
        }
        Ok(())
    }
}
