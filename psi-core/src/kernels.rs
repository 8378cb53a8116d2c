//! Pure per-amplitude-pair gate kernels. The `1/sqrt(2)` factor of H, T,
//! SqrtX and SqrtY is deferred: callers must add `kind.sqrt_add()` to the
//! engine's `sqrt_counter` themselves (see `statevector.rs`), exactly once
//! per application, rather than dividing here.

use crate::{Complex, Float, GateKind};

/// Transforms the amplitude pair `(a0, a1)` addressed by a single-qubit
/// gate. Panics for CX/CZ, which the state-vector engine applies as index
/// transforms rather than a per-pair kernel (see `statevector.rs`).
pub fn apply_pair<T: Float>(kind: GateKind, a0: Complex<T>, a1: Complex<T>) -> (Complex<T>, Complex<T>) {
    let i = Complex::new(T::zero(), T::one());
    match kind {
        GateKind::X => (a1, a0),
        GateKind::Y => (-(a1 * i), a0 * i),
        GateKind::Z => (a0, -a1),
        GateKind::H => (a0 + a1, a0 - a1),
        GateKind::T => {
            let two_sqrt = T::sqrt(T::from_f64(2.0));
            let one_plus_i = Complex::new(T::one(), T::one());
            (a0 * Complex::new(two_sqrt, T::zero()), a1 * one_plus_i)
        }
        GateKind::SqrtX => {
            let one_plus_i = Complex::new(T::one(), T::one());
            let one_minus_i = Complex::new(T::one(), -T::one());
            (a0 * one_plus_i + a1 * one_minus_i, a0 * one_minus_i + a1 * one_plus_i)
        }
        GateKind::SqrtY => {
            let one_plus_i = Complex::new(T::one(), T::one());
            (a0 * one_plus_i - a1 * one_plus_i, a0 * one_plus_i + a1 * one_plus_i)
        }
        GateKind::P0 => (a0, Complex::new(T::zero(), T::zero())),
        GateKind::P1 => (Complex::new(T::zero(), T::zero()), a1),
        GateKind::CX | GateKind::CZ => {
            panic!("{} has no per-pair kernel; applied directly by the state-vector engine", kind.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(re0: f64, im0: f64, re1: f64, im1: f64) -> (Complex<f64>, Complex<f64>) {
        (Complex::new(re0, im0), Complex::new(re1, im1))
    }

    #[test]
    fn x_swaps_the_pair() {
        let (a0, a1) = pair(1.0, 0.0, 0.0, 1.0);
        let (b0, b1) = apply_pair(GateKind::X, a0, a1);
        assert_eq!(b0, a1);
        assert_eq!(b1, a0);
    }

    #[test]
    fn z_negates_only_the_second_entry() {
        let (a0, a1) = pair(0.3, 0.1, -0.2, 0.4);
        let (b0, b1) = apply_pair(GateKind::Z, a0, a1);
        assert_eq!(b0, a0);
        assert_eq!(b1, -a1);
    }

    #[test]
    fn h_applied_twice_and_rescaled_is_the_identity() {
        let (a0, a1) = pair(0.6, -0.2, 0.1, 0.3);
        let (b0, b1) = apply_pair(GateKind::H, a0, a1);
        let (c0, c1) = apply_pair(GateKind::H, b0, b1);
        let scale = 2.0_f64;
        assert!((c0.real / scale - a0.real).abs() < 1e-12);
        assert!((c1.imaginary / scale - a1.imaginary).abs() < 1e-12);
    }

    #[test]
    fn p0_and_p1_are_complementary_projectors() {
        let (a0, a1) = pair(0.4, 0.1, -0.3, 0.7);
        let (p0_0, p0_1) = apply_pair(GateKind::P0, a0, a1);
        let (p1_0, p1_1) = apply_pair(GateKind::P1, a0, a1);
        assert_eq!(p0_0, a0);
        assert_eq!(p0_1, Complex::new(0.0, 0.0));
        assert_eq!(p1_0, Complex::new(0.0, 0.0));
        assert_eq!(p1_1, a1);
    }
}
