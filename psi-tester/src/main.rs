mod benchmarks;
mod clifford;
mod common;
mod feynman;
mod non_clifford;
mod sampler;

use common::{print_benchmark_table, print_summary, BenchmarkResult};
use std::env;

fn print_header() {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                    PSI Quantum Simulator");
    println!("═══════════════════════════════════════════════════════════════\n");
}

fn print_usage() {
    println!("Usage: tester [OPTIONS]");
    println!();
    println!("Options:");
    println!("  all          Run all tests (default)");
    println!("  clifford     Run Clifford gate tests only");
    println!("  non-clifford Run non-Clifford (fixed-angle) gate tests only");
    println!("  feynman      Run Feynman-engine tests only");
    println!("  sampler      Run rejection-sampler tests only");
    println!("  bench        Run benchmark tests only");
    println!("  help         Show this help message");
    println!();
    println!("Examples:");
    println!("  tester                   # Run all tests");
    println!("  tester clifford          # Run only Clifford gate tests");
    println!("  tester feynman sampler   # Run the Feynman engine and sampler tests");
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    print_header();

    let mut results: Vec<BenchmarkResult> = Vec::new();

    let run_all = args.is_empty() || args.iter().any(|a| a == "all");
    let run_clifford = run_all || args.iter().any(|a| a == "clifford");
    let run_non_clifford = run_all || args.iter().any(|a| a == "non-clifford");
    let run_feynman = run_all || args.iter().any(|a| a == "feynman");
    let run_sampler = run_all || args.iter().any(|a| a == "sampler");
    let run_bench = run_all || args.iter().any(|a| a == "bench");

    if run_clifford {
        clifford::run_all(&mut results);
    }

    if run_non_clifford {
        non_clifford::run_all(&mut results);
    }

    if run_feynman {
        feynman::run_all(&mut results);
    }

    if run_sampler {
        sampler::run_all(&mut results);
    }

    if run_bench {
        benchmarks::run_all(&mut results);
    }

    if !results.is_empty() {
        print_benchmark_table(&results);
        print_summary(&results);
    }
}
