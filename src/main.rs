//! teleport - Command-line driver for the quantum teleportation simulation

use clap::Parser;
use num_complex::Complex;
use std::process::ExitCode;
use teleport::protocol::teleportation_circuit;
use teleport::{StateVector, TeleportConfig, TeleportError, Teleporter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "teleport")]
#[command(version)]
#[command(about = "Teleport a single-qubit state over a simulated Bell pair", long_about = None)]
struct Args {
    /// State to teleport as comma-separated amplitudes, each `re` or `re:im`
    /// (e.g. `0,1` or `0.6:0,0:0.8`). A random state is used when absent.
    #[arg(short, long, value_name = "AMPLITUDES", allow_hyphen_values = true)]
    state: Option<String>,

    /// Seed for reproducible runs
    #[arg(long, env = "TELEPORT_SEED")]
    seed: Option<u64>,

    /// Allowed deviation of the input's squared norm from 1
    #[arg(long, env = "TELEPORT_NORM_TOLERANCE", default_value_t = teleport::validation::DEFAULT_NORM_TOLERANCE)]
    norm_tolerance: f64,

    /// Also teleport the state this many times and print the outcome histogram
    #[arg(long, default_value_t = 0)]
    shots: usize,

    /// Print the circuit diagram
    #[arg(long)]
    show_circuit: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "teleport=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("An error occurred: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), TeleportError> {
    let mut config = TeleportConfig::new().with_norm_tolerance(args.norm_tolerance);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let input = match &args.state {
        Some(text) => Some(StateVector::from_amplitudes(
            parse_amplitudes(text).map_err(TeleportError::validation)?,
        )),
        None => None,
    };

    let mut teleporter = Teleporter::new(config);
    let outcome = teleporter.run(input)?;

    if args.show_circuit {
        println!("{}", teleportation_circuit(&outcome.input)?);
    }

    println!("Input state:  {}", outcome.input);
    print_bloch("Input Bloch vector: ", &outcome.input);
    println!("Measured bits: z={} x={}", outcome.z_bit, outcome.x_bit);
    println!("Output state: {}", outcome.output);
    print_bloch("Output Bloch vector:", &outcome.output);
    println!("Fidelity of the teleported state: {:.4}", outcome.fidelity);

    if args.shots > 0 {
        let counts = teleporter.sample_outcomes(&outcome.input, args.shots)?;
        println!();
        print!("{}", counts);
    }
    Ok(())
}

fn print_bloch(label: &str, state: &StateVector) {
    if let Some([x, y, z]) = state.bloch_vector() {
        println!("{} ({:+.4}, {:+.4}, {:+.4})", label, x, y, z);
    }
}

/// Parses `re[:im],re[:im],...` into complex amplitudes.
fn parse_amplitudes(text: &str) -> Result<Vec<Complex<f64>>, String> {
    text.split(',')
        .map(|part| {
            let part = part.trim();
            let (re, im) = match part.split_once(':') {
                Some((re, im)) => (re.trim(), im.trim()),
                None => (part, "0"),
            };
            let re: f64 = re
                .parse()
                .map_err(|_| format!("invalid real part '{}' in amplitude '{}'", re, part))?;
            let im: f64 = im
                .parse()
                .map_err(|_| format!("invalid imaginary part '{}' in amplitude '{}'", im, part))?;
            Ok(Complex::new(re, im))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_real_amplitudes() {
        let amps = parse_amplitudes("0, 1").unwrap();
        assert_eq!(amps, vec![Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)]);
    }

    #[test]
    fn test_parse_complex_amplitudes() {
        let amps = parse_amplitudes("0.6:0,0:-0.8").unwrap();
        assert_eq!(amps, vec![Complex::new(0.6, 0.0), Complex::new(0.0, -0.8)]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_amplitudes("1,abc").is_err());
        assert!(parse_amplitudes("").is_err());
        assert!(parse_amplitudes("1:2:3").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["teleport", "--state", "0,1", "--seed", "4", "--shots", "10"]).unwrap();
        assert_eq!(args.state.as_deref(), Some("0,1"));
        assert_eq!(args.seed, Some(4));
        assert_eq!(args.shots, 10);
        assert!(!args.show_circuit);
    }
}
