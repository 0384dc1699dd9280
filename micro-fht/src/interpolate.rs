use alloc::{vec, vec::Vec};

/// Linearly resamples `input` onto every slot of `output`.
///
/// Output slot `i` samples the input at `i * input.len() / output.len()`.
/// An empty input produces zeros; an empty output is left untouched.
pub fn interpolate(input: &[f32], output: &mut [f32]) {
    if output.is_empty() {
        return;
    }
    if input.is_empty() {
        output.fill(0.0);
        return;
    }

    let last = input.len() - 1;
    let step = input.len() as f64 / output.len() as f64;

    for (i, out) in output.iter_mut().enumerate() {
        let pos = i as f64 * step;
        let offset = pos as usize;
        let error = (pos - offset as f64) as f32;

        let left = offset.min(last);
        let right = (offset + 1).min(last);

        *out = input[left] * (1.0 - error) + input[right] * error;
    }
}

/// Allocating form of [`interpolate`].
pub fn interpolated(input: &[f32], len: usize) -> Vec<f32> {
    let mut output = vec![0.0; len];
    interpolate(input, &mut output);
    output
}
