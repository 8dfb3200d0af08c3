//! Synthetic system-identification data.
//!
//! White Gaussian input is passed through an unknown FIR system and the
//! result is corrupted with Gaussian measurement noise. Per-sample filters
//! see the input as a tapped delay line; FBLMS sees it as blocks.

use ajuste_config::SignalConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};

/// One generated data set.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Input signal.
    pub input: Vec<f64>,
    /// System output plus noise.
    pub desired: Vec<f64>,
    /// Taps of the system that produced `desired`.
    pub system: Vec<f64>,
}

impl Dataset {
    /// Generate `signal.samples` samples. Without explicit taps the system
    /// has `n` Gaussian taps drawn from the same seed.
    pub fn generate(signal: &SignalConfig, n: usize) -> anyhow::Result<Self> {
        let mut rng = StdRng::seed_from_u64(signal.seed);

        let system = match &signal.system {
            Some(taps) => taps.clone(),
            None => (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect(),
        };
        let input: Vec<f64> = (0..signal.samples)
            .map(|_| rng.sample(StandardNormal))
            .collect();

        let noise = Normal::new(0.0, signal.noise)?;
        let desired = (0..input.len())
            .map(|i| {
                let clean: f64 = system
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k <= i)
                    .map(|(k, h)| h * input[i - k])
                    .sum();
                clean + noise.sample(&mut rng)
            })
            .collect();

        tracing::debug!(samples = input.len(), taps = system.len(), "generated data set");

        Ok(Self {
            input,
            desired,
            system,
        })
    }

    /// Tapped delay line rows `[u[i], u[i-1], ..., u[i-n+1]]`, zero before the start.
    pub fn rows(&self, n: usize) -> Vec<Vec<f64>> {
        (0..self.input.len())
            .map(|i| {
                (0..n)
                    .map(|k| if k <= i { self.input[i - k] } else { 0.0 })
                    .collect()
            })
            .collect()
    }

    /// Desired and input blocks of length `n`; a trailing partial block is dropped.
    pub fn blocks(&self, n: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let d = self.desired.chunks_exact(n).map(<[f64]>::to_vec).collect();
        let x = self.input.chunks_exact(n).map(<[f64]>::to_vec).collect();
        (d, x)
    }

    /// Euclidean distance between `weights` and the system, both zero-extended.
    pub fn misalignment(&self, weights: &[f64]) -> f64 {
        let len = weights.len().max(self.system.len());
        (0..len)
            .map(|k| {
                let w = weights.get(k).copied().unwrap_or(0.0);
                let h = self.system.get(k).copied().unwrap_or(0.0);
                (w - h) * (w - h)
            })
            .sum::<f64>()
            .sqrt()
    }
}
