#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};
use wavegen::{sine, wf};

/// Uniform noise in [-1, 1), reproducible per seed.
pub fn random_scope(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect()
}

/// A sine that completes exactly `cycles` periods over `len` samples.
pub fn sine_scope(len: usize, cycles: usize) -> Vec<f32> {
    let waveform = wf!(f32, len as f32, sine!(cycles as f32));
    waveform.iter().take(len).collect()
}

pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
        .0
}
