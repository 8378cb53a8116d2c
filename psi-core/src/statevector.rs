use rayon::prelude::*;
use tracing::trace;

use crate::{kernels, Circuit, Complex, ExecutionBackend, Float, Gate, GateKind};

/// A dense `2^num_qubits`-entry amplitude array with its qubit count, exposed
/// once a caller has finished with an engine and wants the settled result.
#[derive(Debug, Clone)]
pub struct StateVector<T: Float> {
    pub num_qubits: usize,
    pub amplitudes: Vec<Complex<T>>,
}

/// Owns one amplitude array and applies gates to it via block/bitmask
/// indexing, deferring the `1/sqrt(2)` factors of H/T/SqrtX/SqrtY into an
/// integer counter rather than dividing on every gate.
///
/// Index `i` is the big-endian binary encoding of a computational basis
/// state: qubit 0 is the most significant bit of `i`.
#[derive(Debug, Clone)]
pub struct StateVectorEngine<T: Float> {
    pub wave: Vec<Complex<T>>,
    pub num_qubits: usize,
    pub sqrt_counter: u32,
    backend: ExecutionBackend,
}

impl<T: Float> StateVectorEngine<T> {
    pub fn new(num_qubits: usize, backend: ExecutionBackend) -> StateVectorEngine<T> {
        let n = 1usize << num_qubits;
        StateVectorEngine {
            wave: vec![Complex::new(T::zero(), T::zero()); n],
            num_qubits,
            sqrt_counter: 0,
            backend,
        }
    }

    pub fn for_circuit(circuit: &Circuit, backend: ExecutionBackend) -> StateVectorEngine<T> {
        StateVectorEngine::new(circuit.num_qubits, backend)
    }

    pub fn initialise_zero_ket(&mut self) {
        for a in self.wave.iter_mut() {
            *a = Complex::new(T::zero(), T::zero());
        }
        self.wave[0] = Complex::new(T::one(), T::zero());
        self.sqrt_counter = 0;
    }

    pub fn initialise_uniform_superposition(&mut self) {
        for a in self.wave.iter_mut() {
            *a = Complex::new(T::one(), T::zero());
        }
        self.sqrt_counter = self.num_qubits as u32;
    }

    fn check_target(&self, target: usize) {
        assert!(
            target < self.num_qubits,
            "gate target {target} out of range for a {}-qubit engine",
            self.num_qubits
        );
    }

    /// Applies a single-qubit gate other than T. `nblocks = 2^(n-1)` thread
    /// indices each own a disjoint pair `(block_idx, block_idx + offset)`,
    /// `offset = 2^(n-1-target)`, `block_idx = 2*i - (i mod offset)`.
    pub fn apply_single_qubit_gate(&mut self, kind: GateKind, target: usize) {
        self.check_target(target);
        assert!(!kind.is_two_qubit(), "{} is a two-qubit gate", kind.name());
        let n = self.num_qubits;
        let offset = 1usize << (n - 1 - target);
        let nblocks = 1usize << (n - 1);
        self.sqrt_counter += kind.sqrt_add();

        match self.backend {
            ExecutionBackend::Sequential => {
                for i in 0..nblocks {
                    let block_idx = 2 * i - (i % offset);
                    let (i0, i1) = (block_idx, block_idx + offset);
                    let (a0, a1) = (self.wave[i0], self.wave[i1]);
                    let (n0, n1) = kernels::apply_pair(kind, a0, a1);
                    self.wave[i0] = n0;
                    self.wave[i1] = n1;
                }
            }
            ExecutionBackend::Parallel => {
                let wave = &self.wave;
                let updates: Vec<(usize, usize, Complex<T>, Complex<T>)> = (0..nblocks)
                    .into_par_iter()
                    .map(|i| {
                        let block_idx = 2 * i - (i % offset);
                        let (i0, i1) = (block_idx, block_idx + offset);
                        let (n0, n1) = kernels::apply_pair(kind, wave[i0], wave[i1]);
                        (i0, i1, n0, n1)
                    })
                    .collect();
                for (i0, i1, n0, n1) in updates {
                    self.wave[i0] = n0;
                    self.wave[i1] = n1;
                }
            }
        }
        self.backend.fence();
    }

    /// Optimized T-gate application: only the half with `target` bit = 1 is
    /// touched, scaled by `(1+i)/sqrt(2)` directly. The `sqrt_counter` is left
    /// alone since the untouched half must not pick up any extra division at
    /// `normalize` time.
    pub fn apply_t_gate(&mut self, target: usize) {
        self.check_target(target);
        let n = self.num_qubits;
        let bit_pos = n - 1 - target;
        let scale = Complex::new(T::one(), T::one()) / T::sqrt(T::from_f64(2.0));

        let indices_with_bit_set = || (0..self.wave.len()).filter(move |i| (i >> bit_pos) & 1 == 1);

        match self.backend {
            ExecutionBackend::Sequential => {
                for i in indices_with_bit_set() {
                    self.wave[i] = self.wave[i] * scale;
                }
            }
            ExecutionBackend::Parallel => {
                let indices: Vec<usize> = indices_with_bit_set().collect();
                let updates: Vec<Complex<T>> = indices
                    .par_iter()
                    .map(|&i| self.wave[i] * scale)
                    .collect();
                for (i, v) in indices.into_iter().zip(updates) {
                    self.wave[i] = v;
                }
            }
        }
        self.backend.fence();
    }

    /// Inserts a zero bit at `pos` into `x`, shifting bits at `pos` and above
    /// up by one. Used to build indices that force specific bits to 1 while
    /// letting a thread index range freely over the remaining bits.
    fn inject_zero_bit(x: usize, pos: usize) -> usize {
        let low_mask = (1usize << pos) - 1;
        let low = x & low_mask;
        let high = (x & !low_mask) << 1;
        high | low
    }

    /// Multiplies by -1 every amplitude whose control and target bits are
    /// both 1. Parallelized over `2^(n-2)` thread indices, each injecting
    /// the two forced-1 bits around its own bits.
    pub fn apply_cz_gate(&mut self, control: usize, target: usize) {
        self.check_target(target);
        self.check_target(control);
        assert_ne!(control, target, "CZ control and target must differ");
        let n = self.num_qubits;
        let bit_control = n - 1 - control;
        let bit_target = n - 1 - target;
        let (pos_lo, pos_hi) = if bit_control < bit_target {
            (bit_control, bit_target)
        } else {
            (bit_target, bit_control)
        };
        let nthreads = 1usize << (n - 2);

        let flip_at = |i: usize| {
            let injected = Self::inject_zero_bit(Self::inject_zero_bit(i, pos_hi), pos_lo);
            injected | (1 << pos_lo) | (1 << pos_hi)
        };

        match self.backend {
            ExecutionBackend::Sequential => {
                for i in 0..nthreads {
                    let idx = flip_at(i);
                    self.wave[idx] = -self.wave[idx];
                }
            }
            ExecutionBackend::Parallel => {
                let indices: Vec<usize> = (0..nthreads).into_par_iter().map(flip_at).collect();
                for idx in indices {
                    self.wave[idx] = -self.wave[idx];
                }
            }
        }
        self.backend.fence();
    }

    /// For every index with the control bit set, swaps with the partner
    /// index obtained by flipping the target bit. Walked sequentially via
    /// bitmask increment, as in the reference Schrodinger kernel this is
    /// grounded on: each step jumps directly to the next index with the
    /// control bit set rather than scanning every index.
    pub fn apply_cx_gate(&mut self, control: usize, target: usize) {
        self.check_target(target);
        self.check_target(control);
        assert_ne!(control, target, "CX control and target must differ");
        let n = self.num_qubits;
        let control_mask = 1usize << (n - 1 - control);
        let target_mask = 1usize << (n - 1 - target);
        let cx_mask = control_mask | target_mask;
        let size = self.wave.len();

        let mut idx = cx_mask;
        while idx < size {
            self.wave.swap(idx, idx ^ target_mask);
            idx += 1;
            idx |= cx_mask;
        }
        self.backend.fence();
    }

    pub fn apply_gate(&mut self, gate: &Gate) {
        match gate.kind {
            GateKind::CZ => self.apply_cz_gate(gate.control.expect("CZ requires a control"), gate.target),
            GateKind::CX => self.apply_cx_gate(gate.control.expect("CX requires a control"), gate.target),
            GateKind::T => self.apply_t_gate(gate.target),
            _ => self.apply_single_qubit_gate(gate.kind, gate.target),
        }
    }

    /// Divides every amplitude by `sqrt(2)^sqrt_counter` and resets the
    /// counter. Applied exactly once, before exposing results.
    pub fn normalize(&mut self) {
        if self.sqrt_counter == 0 {
            return;
        }
        let sqrt_two = T::sqrt(T::from_f64(2.0));
        let scale = (0..self.sqrt_counter).fold(T::one(), |acc, _| acc * sqrt_two);
        for a in self.wave.iter_mut() {
            *a = *a / scale;
        }
        self.sqrt_counter = 0;
    }

    pub fn run(&mut self, circuit: &Circuit) {
        trace!(num_qubits = self.num_qubits, gates = circuit.len(), "running circuit");
        for gate in circuit.gates() {
            self.apply_gate(gate);
        }
        self.normalize();
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.wave.iter().map(|a| a.norm2().to_f64()).collect()
    }

    pub fn to_state_vector(&self) -> StateVector<T> {
        StateVector {
            num_qubits: self.num_qubits,
            amplitudes: self.wave.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Complex<f64>, re: f64, im: f64, tol: f64) {
        assert!((a.real - re).abs() < tol, "{a:?} real != {re}");
        assert!((a.imaginary - im).abs() < tol, "{a:?} imaginary != {im}");
    }

    // Scenario A: single H.
    #[test]
    fn single_hadamard_on_one_qubit() {
        for backend in [ExecutionBackend::Sequential, ExecutionBackend::Parallel] {
            let mut circuit = Circuit::new(1);
            circuit.h(0, 0);
            let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, backend);
            engine.initialise_zero_ket();
            engine.run(&circuit);
            let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
            approx(engine.wave[0], inv_sqrt2, 0.0, 1e-9);
            approx(engine.wave[1], inv_sqrt2, 0.0, 1e-9);
        }
    }

    // Scenario B: Bell state.
    #[test]
    fn bell_state() {
        for backend in [ExecutionBackend::Sequential, ExecutionBackend::Parallel] {
            let mut circuit = Circuit::new(2);
            circuit.h(0, 0).cx(0, 1, 1);
            let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, backend);
            engine.initialise_zero_ket();
            engine.run(&circuit);
            let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
            approx(engine.wave[0], inv_sqrt2, 0.0, 1e-9);
            approx(engine.wave[1], 0.0, 0.0, 1e-9);
            approx(engine.wave[2], 0.0, 0.0, 1e-9);
            approx(engine.wave[3], inv_sqrt2, 0.0, 1e-9);
        }
    }

    // Scenario C: CZ phase on uniform superposition.
    #[test]
    fn cz_phase_on_uniform_superposition() {
        let mut circuit = Circuit::new(2);
        circuit.cz(0, 1, 0);
        let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
        engine.initialise_uniform_superposition();
        engine.run(&circuit);
        approx(engine.wave[0], 0.5, 0.0, 1e-9);
        approx(engine.wave[1], 0.5, 0.0, 1e-9);
        approx(engine.wave[2], 0.5, 0.0, 1e-9);
        approx(engine.wave[3], -0.5, 0.0, 1e-9);
    }

    // Scenario E: T-gate deferred normalization.
    #[test]
    fn t_gate_deferred_normalization() {
        let mut circuit = Circuit::new(1);
        circuit.h(0, 0).t(0, 1).h(0, 2);
        let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
        engine.initialise_zero_ket();
        engine.run(&circuit);
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        approx(engine.wave[0], (1.0 + inv_sqrt2) / 2.0, inv_sqrt2 / 2.0, 1e-9);
        approx(engine.wave[1], (1.0 - inv_sqrt2) / 2.0, -inv_sqrt2 / 2.0, 1e-9);
    }

    // Invariant 2: every gate in the closed set is its own inverse, up to
    // normalization, except T (inverse after four applications) and
    // SqrtX/SqrtY (squared equals X/Y).
    #[test]
    fn self_inverse_gates_restore_a_random_looking_state() {
        for kind in [GateKind::X, GateKind::Y, GateKind::Z, GateKind::H] {
            let mut circuit = Circuit::new(1);
            circuit.push(crate::Gate::single(kind, 0, 0));
            circuit.push(crate::Gate::single(kind, 0, 1));
            let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
            engine.initialise_zero_ket();
            engine.wave[0] = Complex::new(0.6, 0.0);
            engine.wave[1] = Complex::new(0.8, 0.0);
            engine.run(&circuit);
            approx(engine.wave[0], 0.6, 0.0, 1e-9);
            approx(engine.wave[1], 0.8, 0.0, 1e-9);
        }
    }

    #[test]
    fn sqrt_x_squared_equals_x() {
        let mut circuit = Circuit::new(1);
        circuit.sqrt_x(0, 0).sqrt_x(0, 1);
        let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
        engine.initialise_zero_ket();
        engine.run(&circuit);
        // X|0> = |1>
        approx(engine.wave[0], 0.0, 0.0, 1e-9);
        approx(engine.wave[1], 1.0, 0.0, 1e-9);
    }

    // Invariant 3: probability conservation.
    #[test]
    fn probability_is_conserved_after_normalization() {
        let mut circuit = Circuit::new(3);
        circuit
            .h(0, 0)
            .h(1, 0)
            .h(2, 0)
            .cx(0, 1, 1)
            .t(2, 1)
            .cz(1, 2, 2);
        let mut engine = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
        engine.initialise_zero_ket();
        engine.run(&circuit);
        let total: f64 = engine.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sequential_and_parallel_backends_agree() {
        let mut circuit = Circuit::new(4);
        circuit
            .h(0, 0)
            .h(1, 0)
            .h(2, 0)
            .h(3, 0)
            .cx(0, 1, 1)
            .cz(1, 2, 2)
            .t(3, 2)
            .sqrt_y(2, 3);
        let mut seq = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
        let mut par = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Parallel);
        seq.initialise_zero_ket();
        par.initialise_zero_ket();
        seq.run(&circuit);
        par.run(&circuit);
        for (a, b) in seq.wave.iter().zip(par.wave.iter()) {
            approx(*a, b.real, b.imaginary, 1e-9);
        }
    }
}
