use core::fmt;

/// Fatal configuration errors, reported to the caller before any simulation
/// work begins. Invariant violations (bad qubit indices, P0/P1 reaching a
/// circuit) are panics instead — see `circuit.rs` and `statevector.rs`.
#[derive(Debug, Clone, PartialEq)]
pub enum PsiError {
    /// No qubit cut keeps both halves within `max_memory`.
    NoFeasibleCut { num_qubits: usize, max_memory: usize },
    /// A two-qubit gate other than CZ straddles the chosen cut.
    CrossCutGate {
        gate: &'static str,
        control: usize,
        target: usize,
    },
    /// `epsilon <= 0` was passed to the rejection sampler.
    InvalidEpsilon(f64),
    /// `L * M >= 2^n`; the caller should run a full simulation instead.
    OversizedSampleRequest { requested: usize, limit: usize },
}

impl fmt::Display for PsiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsiError::NoFeasibleCut {
                num_qubits,
                max_memory,
            } => write!(
                f,
                "no cut of a {num_qubits}-qubit circuit fits into {max_memory} bytes"
            ),
            PsiError::CrossCutGate {
                gate,
                control,
                target,
            } => write!(
                f,
                "{gate} gate (control {control}, target {target}) straddles the cut; only CZ may cross it"
            ),
            PsiError::InvalidEpsilon(eps) => {
                write!(f, "epsilon must be positive, got {eps}")
            }
            PsiError::OversizedSampleRequest { requested, limit } => write!(
                f,
                "requested {requested} samples exceeds the {limit} this sampler can draw; run a full simulation instead"
            ),
        }
    }
}

impl core::error::Error for PsiError {}
