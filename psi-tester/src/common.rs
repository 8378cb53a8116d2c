use std::time::{Duration, Instant};

use psi_core::{Circuit, Complex, ExecutionBackend, StateVectorEngine};

pub struct BenchmarkResult {
    pub name: String,
    pub sequential_time: Duration,
    pub parallel_time: Duration,
    pub results_match: bool,
}

/// Runs `circuit_builder`'s circuit once per backend and checks the two
/// waves agree, the way the teacher's harness compared `BasicRT` against
/// `BasicRTMT`.
pub fn benchmark_circuit<F>(name: &str, circuit_builder: F) -> BenchmarkResult
where
    F: Fn() -> Circuit,
{
    let circuit_seq = circuit_builder();
    let circuit_par = circuit_builder();

    let start_seq = Instant::now();
    let mut engine_seq = StateVectorEngine::<f64>::for_circuit(&circuit_seq, ExecutionBackend::Sequential);
    engine_seq.initialise_zero_ket();
    engine_seq.run(&circuit_seq);
    let sequential_time = start_seq.elapsed();

    let start_par = Instant::now();
    let mut engine_par = StateVectorEngine::<f64>::for_circuit(&circuit_par, ExecutionBackend::Parallel);
    engine_par.initialise_zero_ket();
    engine_par.run(&circuit_par);
    let parallel_time = start_par.elapsed();

    let results_match = waves_equal(&engine_seq.wave, &engine_par.wave);

    BenchmarkResult {
        name: name.to_string(),
        sequential_time,
        parallel_time,
        results_match,
    }
}

pub fn waves_equal(a: &[Complex<f64>], b: &[Complex<f64>]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x.real - y.real).abs() <= 1e-10 && (x.imaginary - y.imaginary).abs() <= 1e-10)
}

pub fn format_duration(d: Duration) -> String {
    if d.as_secs() > 0 {
        format!("{:.3}s", d.as_secs_f64())
    } else if d.as_millis() > 0 {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.3}us", d.as_secs_f64() * 1_000_000.0)
    }
}

pub fn print_section(title: &str) {
    let width = 61;
    let padding = width - title.len() - 2;
    println!("┌{}┐", "─".repeat(width));
    println!("│ {}{} │", title, " ".repeat(padding));
    println!("└{}┘\n", "─".repeat(width));
}

/// Prints one line per gate. The teacher's `HorizontalRenderer`/
/// `VerticalRenderer` are out of scope here (formatted output is an
/// external collaborator per the spec), so this is a plain textual dump.
pub fn print_circuit(circuit: &Circuit) {
    println!("Circuit: {} qubits, {} gates", circuit.num_qubits, circuit.len());
    for (i, gate) in circuit.gates().iter().enumerate() {
        match gate.control {
            Some(control) => println!(
                "  [{i}] {} ctrl={control} tgt={} cycle={}",
                gate.kind.name(),
                gate.target,
                gate.cycle
            ),
            None => println!("  [{i}] {} tgt={} cycle={}", gate.kind.name(), gate.target, gate.cycle),
        }
    }
    println!();
}

pub fn print_benchmark_table(results: &[BenchmarkResult]) {
    const C1: usize = 30;
    const C2: usize = 12;
    const C3: usize = 12;
    const C4: usize = 10;
    const C5: usize = 5;

    let top = format!(
        "╔{}═{}═{}═{}═{}╗",
        "═".repeat(C1 + 2),
        "═".repeat(C2 + 2),
        "═".repeat(C3 + 2),
        "═".repeat(C4 + 2),
        "═".repeat(C5 + 2)
    );
    let title = format!(
        "╠{}╤{}╤{}╤{}╤{}╣",
        "═".repeat(C1 + 2),
        "═".repeat(C2 + 2),
        "═".repeat(C3 + 2),
        "═".repeat(C4 + 2),
        "═".repeat(C5 + 2)
    );
    let header = format!(
        "╠{}╪{}╪{}╪{}╪{}╣",
        "═".repeat(C1 + 2),
        "═".repeat(C2 + 2),
        "═".repeat(C3 + 2),
        "═".repeat(C4 + 2),
        "═".repeat(C5 + 2)
    );
    let bottom = format!(
        "╚{}╧{}╧{}╧{}╧{}╝",
        "═".repeat(C1 + 2),
        "═".repeat(C2 + 2),
        "═".repeat(C3 + 2),
        "═".repeat(C4 + 2),
        "═".repeat(C5 + 2)
    );

    let total_width = C1 + C2 + C3 + C4 + C5 + 14;

    println!("\n{}", top);
    println!("║{:^width$}║", "STATE-VECTOR ENGINE BENCHMARK RESULTS", width = total_width);
    println!("{}", title);
    println!(
        "║ {:<C1$} │ {:^C2$} │ {:^C3$} │ {:^C4$} │ {:^C5$} ║",
        "Circuit", "Sequential", "Parallel", "Speedup", "Match",
    );
    println!("{}", header);

    for r in results {
        let speedup = r.sequential_time.as_secs_f64() / r.parallel_time.as_secs_f64().max(1e-12);
        let speedup_str = format!("{:.2}x", speedup);
        let match_str = if r.results_match { "✓" } else { "✗" };

        println!(
            "║ {:<C1$} │ {:>C2$} │ {:>C3$} │ {:>C4$} │ {:^C5$} ║",
            r.name,
            format_duration(r.sequential_time),
            format_duration(r.parallel_time),
            speedup_str,
            match_str,
        );
    }

    println!("{}", bottom);
}

pub fn print_summary(results: &[BenchmarkResult]) {
    let all_match = results.iter().all(|r| r.results_match);
    println!("\n");
    if all_match {
        println!("✓ All circuits produced identical results on both backends!");
    } else {
        println!("✗ WARNING: some circuits produced different results across backends!");
    }

    let total_seq: Duration = results.iter().map(|r| r.sequential_time).sum();
    let total_par: Duration = results.iter().map(|r| r.parallel_time).sum();
    let overall_speedup = total_seq.as_secs_f64() / total_par.as_secs_f64().max(1e-12);

    println!(
        "\nTotal time - Sequential: {} | Parallel: {} | Overall speedup: {:.2}x",
        format_duration(total_seq),
        format_duration(total_par),
        overall_speedup
    );
}
