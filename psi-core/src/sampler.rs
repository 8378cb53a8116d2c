use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::{Complex, Float, PsiError};
use crate::feynman::FeynmanEngine;

/// `L` accepted bitstrings and the (normalized) amplitude the Feynman engine
/// computed for each, in acceptance order.
pub struct SampleVector<T: Float> {
    pub bitstrings: Vec<usize>,
    pub amplitudes: Vec<Complex<T>>,
}

/// Frugal rejection sampling (Villalonga et al., arXiv:1807.10749): draws
/// candidate bitstrings uniformly, keeps each with probability
/// `min(1, |psi(b)|^2 * 2^n / M)`, and stops once `L` distinct bitstrings
/// have been accepted. `M` governs both the per-draw work (bounded
/// regardless of how peaked the distribution is) and the sampler's maximum
/// fidelity loss.
pub struct RejectionSampler<T: Float> {
    engine: FeynmanEngine<T>,
}

impl<T: Float> RejectionSampler<T> {
    pub fn new(engine: FeynmanEngine<T>) -> RejectionSampler<T> {
        RejectionSampler { engine }
    }

    /// Smallest `M` with `2 * exp(-M / (1 - exp(-M))) < epsilon`.
    pub fn compute_m(epsilon: f64) -> Result<u64, PsiError> {
        if epsilon <= 0.0 {
            return Err(PsiError::InvalidEpsilon(epsilon));
        }
        let mut m = 1u64;
        loop {
            let mf = m as f64;
            let denom = 1.0 - (-mf).exp();
            let bound = 2.0 * (-mf / denom).exp();
            if bound < epsilon {
                return Ok(m);
            }
            m += 1;
        }
    }

    /// Draws `count` distinct basis indices in `[0, limit)` uniformly
    /// without replacement.
    fn draw_unique_candidates(rng: &mut impl Rng, limit: usize, count: usize) -> Vec<usize> {
        let mut seen = HashSet::with_capacity(count);
        let mut candidates = Vec::with_capacity(count);
        while candidates.len() < count {
            let b = rng.random_range(0..limit);
            if seen.insert(b) {
                candidates.push(b);
            }
        }
        candidates
    }

    /// Draws `l` distinct bitstrings from the engine's output distribution.
    /// Fails up front if `l * M >= 2^n`, the regime where a full simulation
    /// is cheaper than rejection sampling.
    pub fn sample(&self, l: usize, epsilon: f64, rng: &mut impl Rng) -> Result<SampleVector<T>, PsiError> {
        let m = Self::compute_m(epsilon)?;
        let limit = 1usize << self.engine.num_qubits;
        let requested = l * m as usize;
        if requested >= limit {
            return Err(PsiError::OversizedSampleRequest { requested, limit });
        }

        let mut accepted_set: HashSet<usize> = HashSet::with_capacity(l);
        let mut bitstrings = Vec::with_capacity(l);
        let mut amplitudes = Vec::with_capacity(l);

        while bitstrings.len() < l {
            let remaining = l - bitstrings.len();
            let batch_size = remaining * m as usize;
            let candidates = Self::draw_unique_candidates(rng, limit, batch_size);
            let batch_amplitudes = self.engine.run_flat(&candidates, rng);
            debug!(remaining, batch_size, "drew a rejection-sampling batch");

            for (&b, &amp) in candidates.iter().zip(batch_amplitudes.iter()) {
                let p = amp.norm2().to_f64() * (limit as f64) / (m as f64);
                let accept = rng.random::<f64>() < p.min(1.0);
                if accept && accepted_set.insert(b) {
                    bitstrings.push(b);
                    amplitudes.push(amp);
                    if bitstrings.len() == l {
                        break;
                    }
                }
            }
        }

        Ok(SampleVector { bitstrings, amplitudes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circuit, ExecutionBackend};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_non_positive_epsilon() {
        assert!(matches!(
            RejectionSampler::<f64>::compute_m(0.0),
            Err(PsiError::InvalidEpsilon(_))
        ));
        assert!(matches!(
            RejectionSampler::<f64>::compute_m(-1.0),
            Err(PsiError::InvalidEpsilon(_))
        ));
    }

    #[test]
    fn rejects_an_oversized_sample_request() {
        let circuit = Circuit::new(2);
        let engine = FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(1), ExecutionBackend::Sequential)
            .unwrap();
        let sampler = RejectionSampler::new(engine);
        let mut rng = StdRng::seed_from_u64(0);
        // M is at least 1, so 4 requested samples against a 4-state register
        // (limit = 2^2 = 4) always saturates l * M >= limit.
        let result = sampler.sample(4, 0.5, &mut rng);
        assert!(matches!(result, Err(PsiError::OversizedSampleRequest { .. })));
    }

    // Scenario F: a uniform register yields distinct bitstrings each with
    // probability close to 2^-n.
    #[test]
    fn samples_distinct_bitstrings_from_a_uniform_register() {
        // The Feynman engine already initializes both halves to a uniform
        // superposition, so an empty circuit alone realizes a uniform register.
        let circuit = Circuit::new(4);
        let engine = FeynmanEngine::<f64>::new(circuit, 1.0, usize::MAX, Some(2), ExecutionBackend::Sequential)
            .unwrap();
        let sampler = RejectionSampler::new(engine);
        let mut rng = StdRng::seed_from_u64(42);

        let samples = sampler.sample(4, 0.2, &mut rng).expect("4 of 16 states is a modest request");
        assert_eq!(samples.bitstrings.len(), 4);

        let unique: HashSet<usize> = samples.bitstrings.iter().copied().collect();
        assert_eq!(unique.len(), 4, "accepted bitstrings must be distinct");

        for amp in &samples.amplitudes {
            assert!((amp.norm2() - 1.0 / 16.0).abs() < 1e-9);
        }
    }
}
