#![no_std]
extern crate alloc;

use microdsp::common::{apply_window_function, WindowFunctionType::Hann};

mod fht;
mod interpolate;

pub use fht::{Fht, MAX_EXPONENT, MIN_EXPONENT};
pub use interpolate::{interpolate, interpolated};

/// Apply a Hann window to a slice of f32 samples.
pub fn apply_hann_window(samples: &mut [f32]) {
    apply_window_function(Hann, samples);
}

/// Fill `buf` from `scope`, keeping the newest samples of a long scope and
/// zero padding a short one. Returns how many samples were copied.
pub fn load_scope(scope: &[f32], buf: &mut [f32]) -> usize {
    let need = buf.len().min(scope.len());
    let start = scope.len() - need;
    buf[..need].copy_from_slice(&scope[start..]);
    buf[need..].fill(0.0);
    need
}
