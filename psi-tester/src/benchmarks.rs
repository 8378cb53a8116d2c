use crate::common::{benchmark_circuit, print_circuit, print_section, BenchmarkResult};
use psi_core::Circuit;

pub fn run_all(results: &mut Vec<BenchmarkResult>) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                    BENCHMARK CIRCUITS");
    println!("═══════════════════════════════════════════════════════════════\n");

    test_8_qubit(results);
    test_10_qubit(results);
    test_12_qubit(results);
    test_14_qubit(results);
}

pub fn test_8_qubit(results: &mut Vec<BenchmarkResult>) {
    print_section("8-qubit Entangled Circuit");

    let builder = || {
        let mut circuit = Circuit::new(8);
        for i in 0..8 {
            circuit.h(i, 0);
        }
        for i in 0..7 {
            circuit.cx(i, i + 1, 1);
        }
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("8-qubit entangled", builder));
}

pub fn test_10_qubit(results: &mut Vec<BenchmarkResult>) {
    print_section("10-qubit Entangled Circuit");

    let builder = || {
        let mut circuit = Circuit::new(10);
        for i in 0..10 {
            circuit.h(i, 0);
        }
        for i in 0..9 {
            circuit.cx(i, i + 1, 1);
        }
        circuit.cz(0, 9, 2);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("10-qubit entangled", builder));
}

pub fn test_12_qubit(results: &mut Vec<BenchmarkResult>) {
    print_section("12-qubit Entangled Circuit");

    let builder = || {
        let mut circuit = Circuit::new(12);
        for i in 0..12 {
            circuit.h(i, 0);
        }
        for i in 0..11 {
            circuit.cx(i, i + 1, 1);
        }
        circuit.cz(0, 11, 2);
        // SWAP via three CXs instead of a native swap gate, which the
        // closed gate set does not offer.
        circuit.cx(5, 6, 3).cx(6, 5, 3).cx(5, 6, 3);
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("12-qubit entangled", builder));
}

pub fn test_14_qubit(results: &mut Vec<BenchmarkResult>) {
    print_section("14-qubit Entangled Circuit");

    let builder = || {
        let mut circuit = Circuit::new(14);
        for i in 0..14 {
            circuit.h(i, 0);
        }
        for i in 0..13 {
            circuit.cx(i, i + 1, 1);
        }
        circuit
    };

    print_circuit(&builder());
    results.push(benchmark_circuit("14-qubit entangled", builder));
}
