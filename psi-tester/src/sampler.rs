use std::collections::HashSet;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::{print_circuit, print_section, BenchmarkResult};
use psi_core::{Circuit, ExecutionBackend, FeynmanEngine, RejectionSampler};

pub fn run_all(results: &mut Vec<BenchmarkResult>) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                   REJECTION SAMPLER TESTS");
    println!("═══════════════════════════════════════════════════════════════\n");

    test_uniform_register_sampling(results);
    test_entangled_register_sampling(results);
}

// Scenario F: sampling a uniform register (only the initial-H layer).
pub fn test_uniform_register_sampling(results: &mut Vec<BenchmarkResult>) {
    print_section("Rejection Sampling on a Uniform Register");

    // The Feynman engine initializes both halves to a uniform superposition,
    // so an empty circuit alone is the initial-H layer.
    let circuit = Circuit::new(10);
    print_circuit(&circuit);

    let engine =
        FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(5), ExecutionBackend::Sequential).unwrap();
    let sampler = RejectionSampler::new(engine);
    let mut rng = StdRng::seed_from_u64(42);

    let start = Instant::now();
    let samples = sampler.sample(128, 5e-4, &mut rng).expect("128 of 1024 states is modest");
    let elapsed = start.elapsed();

    let unique: HashSet<usize> = samples.bitstrings.iter().copied().collect();
    let all_uniform = samples
        .amplitudes
        .iter()
        .all(|a| (a.norm2() - 1.0 / 1024.0).abs() < 1e-3);

    println!(
        "drew {} distinct bitstrings in {:?}; all within tolerance of 2^-10: {}\n",
        unique.len(),
        elapsed,
        all_uniform
    );

    results.push(BenchmarkResult {
        name: "Rejection sampling on uniform register".to_string(),
        sequential_time: elapsed,
        parallel_time: elapsed,
        results_match: unique.len() == 128 && all_uniform,
    });
}

pub fn test_entangled_register_sampling(results: &mut Vec<BenchmarkResult>) {
    print_section("Rejection Sampling on an Entangled Register");

    // Starts from the engine's uniform-superposition init, then entangles
    // neighboring qubits with a CX chain.
    let mut circuit = Circuit::new(8);
    for i in 0..7 {
        circuit.cx(i, i + 1, 0);
    }
    print_circuit(&circuit);

    let engine =
        FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(4), ExecutionBackend::Sequential).unwrap();
    let sampler = RejectionSampler::new(engine);
    let mut rng = StdRng::seed_from_u64(7);

    let start = Instant::now();
    let samples = sampler.sample(32, 1e-3, &mut rng).expect("32 of 256 states is modest");
    let elapsed = start.elapsed();

    let unique: HashSet<usize> = samples.bitstrings.iter().copied().collect();
    println!("drew {} distinct bitstrings in {:?}\n", unique.len(), elapsed);

    results.push(BenchmarkResult {
        name: "Rejection sampling on entangled register".to_string(),
        sequential_time: elapsed,
        parallel_time: elapsed,
        results_match: unique.len() == 32,
    });
}
