use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{Circuit, Complex, ExecutionBackend, Float, Gate, GateKind, PsiError, StateVectorEngine};

/// Divide-and-conquer qubit-cut simulator. Cuts the register into a left
/// half `[0, cut_idx)` and right half `[cut_idx, num_qubits)`, drives one
/// `StateVectorEngine` per half, and expands every CZ whose control and
/// target land on opposite sides into two sub-paths before accumulating
/// cross-cut amplitudes at caller-supplied bitstrings.
pub struct FeynmanEngine<T: Float> {
    circuit: Circuit,
    pub num_qubits: usize,
    pub cut_idx: usize,
    pub num_xcz: u32,
    pub num_paths: usize,
    pub fidelity: f64,
    backend: ExecutionBackend,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Float> FeynmanEngine<T> {
    /// `cut_at`: `None` triggers automatic cut selection against
    /// `max_memory` (bytes); `Some(idx)` uses `idx` verbatim, skipping the
    /// memory check beyond the allocations it implies.
    pub fn new(
        circuit: Circuit,
        fidelity: f64,
        max_memory: usize,
        cut_at: Option<usize>,
        backend: ExecutionBackend,
    ) -> Result<FeynmanEngine<T>, PsiError> {
        let num_qubits = circuit.num_qubits;
        let elem_size = std::mem::size_of::<Complex<T>>();

        let cut_idx = match cut_at {
            Some(idx) => idx,
            None => Self::find_optimal_cut(&circuit, num_qubits, max_memory, elem_size)?,
        };
        let num_xcz = Self::count_cross_cz(&circuit, cut_idx)?;

        Ok(FeynmanEngine {
            circuit,
            num_qubits,
            cut_idx,
            num_xcz,
            num_paths: 1usize << num_xcz,
            fidelity,
            backend,
            _marker: std::marker::PhantomData,
        })
    }

    fn count_cross_cz(circuit: &Circuit, cut_idx: usize) -> Result<u32, PsiError> {
        let mut count = 0u32;
        for gate in circuit.gates() {
            if let Some(control) = gate.control {
                let crosses = (control < cut_idx) != (gate.target < cut_idx);
                if crosses {
                    if gate.kind != GateKind::CZ {
                        return Err(PsiError::CrossCutGate {
                            gate: gate.kind.name(),
                            control,
                            target: gate.target,
                        });
                    }
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Chooses the feasible cut (`4 * (mem_L + mem_R) <= max_memory`) with
    /// the fewest cross-cut CZs, ties broken by the smallest `cut_idx`.
    fn find_optimal_cut(
        circuit: &Circuit,
        num_qubits: usize,
        max_memory: usize,
        elem_size: usize,
    ) -> Result<usize, PsiError> {
        let mut best: Option<(usize, u32)> = None;
        for cut in 1..num_qubits {
            let mem_l = (1usize << cut) * elem_size;
            let mem_r = (1usize << (num_qubits - cut)) * elem_size;
            if 4 * (mem_l + mem_r) > max_memory {
                continue;
            }
            let num_xcz = Self::count_cross_cz(circuit, cut)?;
            debug!(cut, num_xcz, mem_l, mem_r, "candidate cut fits within the memory budget");
            best = match best {
                Some((_, best_xcz)) if best_xcz <= num_xcz => best,
                _ => Some((cut, num_xcz)),
            };
        }
        best.map(|(cut, _)| cut).ok_or(PsiError::NoFeasibleCut {
            num_qubits,
            max_memory,
        })
    }

    fn split_bitstring(&self, b: usize) -> (usize, usize) {
        let shift = self.num_qubits - self.cut_idx;
        (b >> shift, b & ((1usize << shift) - 1))
    }

    fn fresh_sub_engines(&self) -> (StateVectorEngine<T>, StateVectorEngine<T>) {
        let mut left = StateVectorEngine::new(self.cut_idx, self.backend);
        let mut right = StateVectorEngine::new(self.num_qubits - self.cut_idx, self.backend);
        left.initialise_uniform_superposition();
        right.initialise_uniform_superposition();
        (left, right)
    }

    fn accumulate(
        &self,
        left: &StateVectorEngine<T>,
        right: &StateVectorEngine<T>,
        bitstrings: &[usize],
        result: &mut [Complex<T>],
    ) {
        let contributions: Vec<Complex<T>> = bitstrings
            .par_iter()
            .map(|&b| {
                let (bl, br) = self.split_bitstring(b);
                left.wave[bl] * right.wave[br]
            })
            .collect();
        for (acc, c) in result.iter_mut().zip(contributions) {
            *acc = *acc + c;
        }
    }

    fn keep_path(&self, rng: &mut impl Rng) -> bool {
        if self.fidelity >= 1.0 {
            return true;
        }
        let r: f64 = rng.random();
        r <= self.fidelity
    }

    /// Flat enumeration: for each of `num_paths` path indices, re-derive the
    /// cross-CZ branch from bit `xcz_idx` of `p`, run both sub-engines to
    /// completion, normalize, and accumulate into `result`.
    pub fn run_flat(&self, bitstrings: &[usize], rng: &mut impl Rng) -> Vec<Complex<T>> {
        let mut result = vec![Complex::new(T::zero(), T::zero()); bitstrings.len()];

        for p in 0..self.num_paths {
            if !self.keep_path(rng) {
                continue;
            }
            let (mut left, mut right) = self.fresh_sub_engines();
            let mut xcz_idx = 0usize;

            for gate in self.circuit.gates() {
                self.apply_classified(gate, p, &mut xcz_idx, &mut left, &mut right);
            }

            left.normalize();
            right.normalize();
            trace!(path = p, "finished Feynman path");
            self.accumulate(&left, &right, bitstrings, &mut result);
        }

        result
    }

    fn apply_classified(
        &self,
        gate: &Gate,
        path: usize,
        xcz_idx: &mut usize,
        left: &mut StateVectorEngine<T>,
        right: &mut StateVectorEngine<T>,
    ) {
        match gate.control {
            None => {
                if gate.target < self.cut_idx {
                    left.apply_gate(gate);
                } else {
                    right.apply_gate(&Gate::single(gate.kind, gate.target - self.cut_idx, gate.cycle));
                }
            }
            Some(control) => {
                let target_in_left = gate.target < self.cut_idx;
                let control_in_left = control < self.cut_idx;
                if target_in_left && control_in_left {
                    left.apply_gate(gate);
                } else if !target_in_left && !control_in_left {
                    right.apply_gate(&Gate::controlled(
                        gate.kind,
                        control - self.cut_idx,
                        gate.target - self.cut_idx,
                        gate.cycle,
                    ));
                } else {
                    let branch = (path >> *xcz_idx) & 1;
                    self.apply_cross_cz_branch(branch, control, control_in_left, gate, left, right);
                    *xcz_idx += 1;
                }
            }
        }
    }

    /// `CZ = P0 (x) I + P1 (x) Z` (control on the left) or `I (x) P0 + Z (x)
    /// P1` (control on the right); `branch == 0` applies the P0 half,
    /// `branch == 1` applies P1 on the control's side and Z on the target's.
    fn apply_cross_cz_branch(
        &self,
        branch: usize,
        control: usize,
        control_in_left: bool,
        gate: &Gate,
        left: &mut StateVectorEngine<T>,
        right: &mut StateVectorEngine<T>,
    ) {
        if branch == 0 {
            if control_in_left {
                left.apply_gate(&Gate::single(GateKind::P0, control, gate.cycle));
            } else {
                right.apply_gate(&Gate::single(GateKind::P0, control - self.cut_idx, gate.cycle));
            }
        } else if control_in_left {
            left.apply_gate(&Gate::single(GateKind::P1, control, gate.cycle));
            right.apply_gate(&Gate::single(GateKind::Z, gate.target - self.cut_idx, gate.cycle));
        } else {
            left.apply_gate(&Gate::single(GateKind::Z, gate.target, gate.cycle));
            right.apply_gate(&Gate::single(GateKind::P1, control - self.cut_idx, gate.cycle));
        }
    }

    /// Recursive exploration: walks the gate list eagerly until a cross-CZ
    /// forks it into two children, one per branch, each owning an
    /// independent sub-engine pair. Produces the same accumulation as
    /// `run_flat` for `fidelity == 1`.
    pub fn run_recursive(&self, bitstrings: &[usize], rng: &mut impl Rng) -> Vec<Complex<T>> {
        let (left, right) = self.fresh_sub_engines();
        let mut result = vec![Complex::new(T::zero(), T::zero()); bitstrings.len()];
        self.recursive_path(rng, left, right, 0, 0, bitstrings, &mut result);
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn recursive_path(
        &self,
        rng: &mut impl Rng,
        mut left: StateVectorEngine<T>,
        mut right: StateVectorEngine<T>,
        gate_idx: usize,
        level: u32,
        bitstrings: &[usize],
        result: &mut [Complex<T>],
    ) {
        if level == self.num_xcz && !self.keep_path(rng) {
            return;
        }

        let gates = self.circuit.gates();
        let mut diverge_idx = None;
        let mut i = gate_idx;
        while i < gates.len() {
            let gate = &gates[i];
            match gate.control {
                None => {
                    if gate.target < self.cut_idx {
                        left.apply_gate(gate);
                    } else {
                        right.apply_gate(&Gate::single(gate.kind, gate.target - self.cut_idx, gate.cycle));
                    }
                }
                Some(control) => {
                    let target_in_left = gate.target < self.cut_idx;
                    let control_in_left = control < self.cut_idx;
                    if target_in_left && control_in_left {
                        left.apply_gate(gate);
                    } else if !target_in_left && !control_in_left {
                        right.apply_gate(&Gate::controlled(
                            gate.kind,
                            control - self.cut_idx,
                            gate.target - self.cut_idx,
                            gate.cycle,
                        ));
                    } else {
                        diverge_idx = Some(i);
                        break;
                    }
                }
            }
            i += 1;
        }

        match diverge_idx {
            None => {
                left.normalize();
                right.normalize();
                self.accumulate(&left, &right, bitstrings, result);
            }
            Some(idx) => {
                let gate = gates[idx];
                let control = gate.control.expect("diverging gate must be controlled");
                let control_in_left = control < self.cut_idx;

                let mut left_copy = left.clone();
                let mut right_copy = right.clone();

                // Branch 0 (P0): mutate the live pair in place, recurse first.
                self.apply_cross_cz_branch(0, control, control_in_left, &gate, &mut left, &mut right);
                self.recursive_path(rng, left, right, idx + 1, level + 1, bitstrings, result);

                // Branch 1 (P1 (x) Z): apply to the saved copies, recurse second.
                self.apply_cross_cz_branch(1, control, control_in_left, &gate, &mut left_copy, &mut right_copy);
                self.recursive_path(rng, left_copy, right_copy, idx + 1, level + 1, bitstrings, result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx(a: Complex<f64>, re: f64, im: f64, tol: f64) {
        assert!((a.real - re).abs() < tol, "{a:?} real != {re}");
        assert!((a.imaginary - im).abs() < tol, "{a:?} imaginary != {im}");
    }

    // Scenario D: a single cross-CZ on 4 qubits, cut at 2.
    #[test]
    fn cross_cz_matches_the_schrodinger_reference() {
        let mut circuit = Circuit::new(4);
        circuit.cz(1, 2, 0);

        let mut reference = StateVectorEngine::<f64>::for_circuit(&circuit, ExecutionBackend::Sequential);
        reference.initialise_uniform_superposition();
        reference.run(&circuit);
        reference.normalize();

        let feynman = FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential)
            .expect("cut at 2 is feasible");
        assert_eq!(feynman.num_xcz, 1);
        assert_eq!(feynman.num_paths, 2);

        let mut rng = StdRng::seed_from_u64(0);
        let bitstrings: Vec<usize> = (0..16).collect();
        let amplitudes = feynman.run_flat(&bitstrings, &mut rng);

        for (b, amp) in bitstrings.iter().zip(amplitudes.iter()) {
            approx(*amp, reference.wave[*b].real, reference.wave[*b].imaginary, 1e-9);
        }
    }

    // Invariant 5: flat and recursive modes agree at fidelity = 1.
    #[test]
    fn flat_and_recursive_modes_agree() {
        let mut circuit = Circuit::new(4);
        circuit.h(0, 0).cz(0, 2, 1).cz(1, 3, 1).x(2, 2);

        let bitstrings: Vec<usize> = (0..16).collect();

        let flat_engine =
            FeynmanEngine::<f64>::new(circuit.clone(), 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential)
                .unwrap();
        let recursive_engine =
            FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential).unwrap();

        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(1);
        let flat = flat_engine.run_flat(&bitstrings, &mut rng_a);
        let recursive = recursive_engine.run_recursive(&bitstrings, &mut rng_b);

        for (f, r) in flat.iter().zip(recursive.iter()) {
            approx(*r, f.real, f.imaginary, 1e-9);
        }
    }

    // Invariant 4: shrinking max_memory never decreases the chosen cut's xCZ count.
    #[test]
    fn cut_selection_is_monotone_in_memory_budget() {
        let mut circuit = Circuit::new(6);
        circuit.cz(0, 5, 0).cz(1, 4, 0).cz(2, 3, 0);
        let elem_size = std::mem::size_of::<Complex<f64>>();

        let generous = FeynmanEngine::<f64>::new(circuit.clone(), 1.0, usize::MAX, None, ExecutionBackend::Sequential)
            .unwrap();
        let tight_budget = 4 * ((1usize << 1) + (1usize << 5)) * elem_size;
        let tight = FeynmanEngine::<f64>::new(circuit, 1.0, tight_budget, None, ExecutionBackend::Sequential)
            .unwrap();

        assert!(tight.num_xcz >= generous.num_xcz);
    }

    #[test]
    fn cross_cx_is_rejected() {
        let mut circuit = Circuit::new(4);
        circuit.cx(1, 2, 0);
        let result = FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential);
        assert!(matches!(result, Err(PsiError::CrossCutGate { .. })));
    }
}
