use crate::common::{benchmark_circuit, print_circuit, print_section, BenchmarkResult};
use psi_core::{Circuit, ExecutionBackend, StateVectorEngine};

pub fn run_all(results: &mut Vec<BenchmarkResult>) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                   NON-CLIFFORD GATES TESTS");
    println!("═══════════════════════════════════════════════════════════════\n");

    test_fixed_phase_gates(results);
    test_sqrt_gates(results);
    test_t_gate_deferred_normalization(results);
    test_mixed_fixed_gate_circuit(results);
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

pub fn test_fixed_phase_gates(results: &mut Vec<BenchmarkResult>) {
    print_section("Non-Clifford Gates: T");

    let builder = || {
        let mut circuit = Circuit::new(2);
        circuit.h(0, 0).t(0, 1).h(0, 2).t(1, 0);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("T gates (2 qubits)", builder));
    display(&builder());
}

pub fn test_sqrt_gates(results: &mut Vec<BenchmarkResult>) {
    print_section("Square-Root Gates: SqrtX, SqrtY");

    let builder = || {
        let mut circuit = Circuit::new(2);
        circuit.sqrt_x(0, 0).sqrt_y(1, 0);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("Sqrt gates (2 qubits)", builder));
    display(&builder());
}

// Scenario E: T-gate deferred normalization, run through the tester harness.
pub fn test_t_gate_deferred_normalization(results: &mut Vec<BenchmarkResult>) {
    print_section("T-Gate Deferred Normalization");

    let builder = || {
        let mut circuit = Circuit::new(1);
        circuit.h(0, 0).t(0, 1).h(0, 2);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("T-gate sandwich (1 qubit)", builder));
    display(&builder());
}

pub fn test_mixed_fixed_gate_circuit(results: &mut Vec<BenchmarkResult>) {
    print_section("Mixed Fixed-Gate Circuit");

    let builder = || {
        let mut circuit = Circuit::new(3);
        circuit
            .h(0, 0)
            .h(1, 0)
            .h(2, 0)
            .cx(0, 1, 1)
            .t(2, 1)
            .cz(1, 2, 2)
            .sqrt_x(0, 3);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("Mixed fixed-gate circuit (3 qubits)", builder));
    display(&builder());
}
