use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::{print_circuit, print_section, BenchmarkResult};
use psi_core::{Circuit, ExecutionBackend, FeynmanEngine, StateVectorEngine};

pub fn run_all(results: &mut Vec<BenchmarkResult>) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     FEYNMAN ENGINE TESTS");
    println!("═══════════════════════════════════════════════════════════════\n");

    test_cross_cz_matches_schrodinger(results);
    test_flat_and_recursive_agree(results);
    test_cut_selection_under_memory_pressure(results);
}

fn reference_wave(circuit: &Circuit) -> Vec<psi_core::Complex<f64>> {
    let mut engine = StateVectorEngine::<f64>::for_circuit(circuit, ExecutionBackend::Sequential);
    engine.initialise_uniform_superposition();
    engine.run(circuit);
    engine.wave
}

// Scenario D: a single cross-CZ on 4 qubits, cut at 2.
pub fn test_cross_cz_matches_schrodinger(results: &mut Vec<BenchmarkResult>) {
    print_section("Cross-CZ vs Schrodinger Reference");

    let mut circuit = Circuit::new(4);
    circuit.cz(1, 2, 0);
    print_circuit(&circuit);

    let reference = reference_wave(&circuit);
    let engine = FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential)
        .expect("cut at 2 is feasible for 4 qubits");
    println!("num_xCZ = {}, num_paths = {}", engine.num_xcz, engine.num_paths);

    let bitstrings: Vec<usize> = (0..16).collect();
    let mut rng = StdRng::seed_from_u64(7);
    let amplitudes = engine.run_flat(&bitstrings, &mut rng);

    let mut max_err = 0.0_f64;
    for (b, amp) in bitstrings.iter().zip(amplitudes.iter()) {
        let err =
            ((amp.real - reference[*b].real).powi(2) + (amp.imaginary - reference[*b].imaginary).powi(2)).sqrt();
        max_err = max_err.max(err);
    }
    println!("max |amplitude error| vs reference: {max_err:e}\n");

    results.push(BenchmarkResult {
        name: "Feynman cross-CZ matches Schrodinger".to_string(),
        sequential_time: std::time::Duration::ZERO,
        parallel_time: std::time::Duration::ZERO,
        results_match: max_err < 1e-9,
    });
}

pub fn test_flat_and_recursive_agree(results: &mut Vec<BenchmarkResult>) {
    print_section("Flat vs Recursive Path Exploration");

    let mut circuit = Circuit::new(4);
    circuit.h(0, 0).cz(0, 2, 1).cz(1, 3, 1).x(2, 2);
    print_circuit(&circuit);

    let bitstrings: Vec<usize> = (0..16).collect();
    let flat_engine = FeynmanEngine::<f64>::new(circuit.clone(), 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential)
        .unwrap();
    let recursive_engine =
        FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential).unwrap();

    let mut rng_a = StdRng::seed_from_u64(11);
    let mut rng_b = StdRng::seed_from_u64(11);
    let flat = flat_engine.run_flat(&bitstrings, &mut rng_a);
    let recursive = recursive_engine.run_recursive(&bitstrings, &mut rng_b);

    let agree = flat
        .iter()
        .zip(recursive.iter())
        .all(|(f, r)| (f.real - r.real).abs() < 1e-9 && (f.imaginary - r.imaginary).abs() < 1e-9);
    println!("flat/recursive elementwise agreement: {agree}\n");

    results.push(BenchmarkResult {
        name: "Flat and recursive Feynman modes agree".to_string(),
        sequential_time: std::time::Duration::ZERO,
        parallel_time: std::time::Duration::ZERO,
        results_match: agree,
    });
}

// Invariant 4: shrinking max_memory never decreases the chosen cut's xCZ count.
pub fn test_cut_selection_under_memory_pressure(results: &mut Vec<BenchmarkResult>) {
    print_section("Cut-Selection Monotonicity");

    let mut circuit = Circuit::new(6);
    circuit.cz(0, 5, 0).cz(1, 4, 0).cz(2, 3, 0);
    print_circuit(&circuit);

    let elem_size = std::mem::size_of::<psi_core::Complex<f64>>();
    let generous =
        FeynmanEngine::<f64>::new(circuit.clone(), 1.0, usize::MAX, None, ExecutionBackend::Sequential).unwrap();
    let tight_budget = 4 * ((1usize << 1) + (1usize << 5)) * elem_size;
    let tight = FeynmanEngine::<f64>::new(circuit, 1.0, tight_budget, None, ExecutionBackend::Sequential).unwrap();

    println!(
        "generous budget chose cut={} (xCZ={}); tight budget chose cut={} (xCZ={})",
        generous.cut_idx, generous.num_xcz, tight.cut_idx, tight.num_xcz
    );

    results.push(BenchmarkResult {
        name: "Cut selection monotone under memory pressure".to_string(),
        sequential_time: std::time::Duration::ZERO,
        parallel_time: std::time::Duration::ZERO,
        results_match: tight.num_xcz >= generous.num_xcz,
    });
}
