use crate::common::{benchmark_circuit, print_circuit, print_section, BenchmarkResult};
use psi_core::{Circuit, ExecutionBackend, StateVectorEngine};

pub fn run_all(results: &mut Vec<BenchmarkResult>) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     CLIFFORD GATES TESTS");
    println!("═══════════════════════════════════════════════════════════════\n");

    test_bell_state(results);
    test_ghz_state(results);
    test_swap_via_cx(results);
    test_cz_phase(results);
    test_complex_circuit(results);
}

fn display(circuit: &Circuit) {
    let mut engine = StateVectorEngine::<f64>::for_circuit(circuit, ExecutionBackend::Sequential);
    engine.initialise_zero_ket();
    engine.run(circuit);
    for (i, amp) in engine.wave.iter().enumerate() {
        println!("  {:0width$b}: {amp}", i, width = circuit.num_qubits);
    }
    println!();
}

pub fn test_bell_state(results: &mut Vec<BenchmarkResult>) {
    print_section("Bell State");

    let builder = || {
        let mut circuit = Circuit::new(2);
        circuit.h(0, 0).cx(0, 1, 1);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("Bell State (2 qubits)", builder));
    display(&builder());
}

pub fn test_ghz_state(results: &mut Vec<BenchmarkResult>) {
    print_section("GHZ State");

    let builder = || {
        let mut circuit = Circuit::new(3);
        circuit.h(0, 0).cx(0, 1, 1).cx(0, 2, 1);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("GHZ State (3 qubits)", builder));
    display(&builder());
}

pub fn test_swap_via_cx(results: &mut Vec<BenchmarkResult>) {
    print_section("SWAP via 3 CXs");

    let builder = || {
        let mut circuit = Circuit::new(2);
        circuit.x(0, 0).cx(0, 1, 1).cx(1, 0, 2).cx(0, 1, 3);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("SWAP via CX (2 qubits)", builder));
    display(&builder());
}

// Scenario C: CZ phase on a uniform superposition.
pub fn test_cz_phase(results: &mut Vec<BenchmarkResult>) {
    print_section("CZ Phase on Uniform Superposition");

    let mut circuit = Circuit::new(2);
    circuit.cz(0, 1, 0);
    print_circuit(&circuit);

    let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
    engine.initialise_uniform_superposition();
    engine.run(&circuit);
    for (i, amp) in engine.wave.iter().enumerate() {
        println!("  {:0width$b}: {amp}", i, width = circuit.num_qubits);
    }
    println!();

    let expected = [0.5, 0.5, 0.5, -0.5];
    let matches = engine
        .wave
        .iter()
        .zip(expected.iter())
        .all(|(amp, &e)| (amp.real - e).abs() < 1e-9 && amp.imaginary.abs() < 1e-9);

    results.push(BenchmarkResult {
        name: "CZ phase on uniform superposition".to_string(),
        sequential_time: std::time::Duration::ZERO,
        parallel_time: std::time::Duration::ZERO,
        results_match: matches,
    });
}

pub fn test_complex_circuit(results: &mut Vec<BenchmarkResult>) {
    print_section("Complex Circuit");

    let builder = || {
        let mut circuit = Circuit::new(4);
        circuit.h(0, 0).h(1, 0).cx(0, 2, 1).cx(1, 3, 1).cz(2, 3, 2);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("Complex (4 qubits)", builder));
    display(&builder());
}
