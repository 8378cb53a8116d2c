//! Quantum circuit simulation core: a Schrodinger state-vector engine and a
//! Feynman-path hybrid simulator sharing one gate set and one parallel
//! execution abstraction.
//!
//! Out of scope here, by design: circuit file parsing, a CLI driver,
//! formatted state-vector/array printing, and any gate family beyond the
//! fixed set in [`circuit::GateKind`].

mod backend;
mod circuit;
mod complex;
mod error;
mod feynman;
mod kernels;
mod numeric;
mod sampler;
mod statevector;

pub use backend::ExecutionBackend;
pub use circuit::{Circuit, Gate, GateKind};
pub use complex::Complex;
pub use error::PsiError;
pub use feynman::FeynmanEngine;
pub use numeric::Float;
pub use sampler::{RejectionSampler, SampleVector};
pub use statevector::{StateVector, StateVectorEngine};
