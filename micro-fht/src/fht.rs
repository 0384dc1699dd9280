use alloc::{vec, vec::Vec};
use core::f32::consts::SQRT_2;

/// Smallest supported exponent, the closed-form 8-point butterfly.
pub const MIN_EXPONENT: u32 = 3;
/// Largest supported exponent (512 points).
pub const MAX_EXPONENT: u32 = 9;

/// Fast Hartley transform over buffers of `2^k` samples.
///
/// The engine owns its cas table and the scratch buffer used while
/// recursing. Both are rebuilt only when the exponent changes.
pub struct Fht {
    exponent: u32,
    size: usize,
    /// Interleaved cosine/sine coefficients, `2 * size` entries.
    table: Vec<f32>,
    scratch: Vec<f32>,
}

impl Fht {
    /// Creates an engine for `2^exponent` points. The exponent is clamped
    /// into `[MIN_EXPONENT, MAX_EXPONENT]`.
    pub fn new(exponent: u32) -> Self {
        let exponent = exponent.clamp(MIN_EXPONENT, MAX_EXPONENT);
        let size = 1usize << exponent;
        Self {
            exponent,
            size,
            table: cas_table(size),
            scratch: vec![0.0; size],
        }
    }

    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Number of points per transform.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of meaningful bins after `power` or `spectrum`.
    pub fn bins(&self) -> usize {
        self.size / 2
    }

    /// Switches to a new transform size. Returns `false` if the clamped
    /// exponent is unchanged and nothing was rebuilt.
    pub fn set_exponent(&mut self, exponent: u32) -> bool {
        let exponent = exponent.clamp(MIN_EXPONENT, MAX_EXPONENT);
        if exponent == self.exponent {
            return false;
        }
        *self = Self::new(exponent);
        true
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    /// In-place Hartley transform. Applying it twice returns the input
    /// scaled by `size`.
    pub fn transform(&mut self, buf: &mut [f32]) {
        debug_assert_eq!(buf.len(), self.size, "buffer length must match transform size");
        if self.size == 8 {
            transform8(buf);
        } else {
            transform_recursive(buf, &mut self.scratch, &self.table, self.size);
        }
    }

    /// Transforms `buf` and replaces its first half with the power spectrum.
    pub fn power(&mut self, buf: &mut [f32]) {
        self.transform(buf);
        let n = self.size;
        buf[0] = buf[0] * buf[0] * 2.0;
        for i in 1..n / 2 {
            buf[i] = buf[i] * buf[i] + buf[n - i] * buf[n - i];
        }
        for p in &mut buf[..n / 2] {
            *p *= 0.5;
        }
    }

    /// Magnitude spectrum: `power` followed by a square root of each bin.
    pub fn spectrum(&mut self, buf: &mut [f32]) {
        self.power(buf);
        for p in &mut buf[..self.size / 2] {
            *p = libm::sqrtf(*p);
        }
    }

    pub fn scale(&self, buf: &mut [f32], factor: f32) {
        for p in &mut buf[..self.size] {
            *p *= factor;
        }
    }

    pub fn copy(&self, dst: &mut [f32], src: &[f32]) {
        dst[..self.size].copy_from_slice(&src[..self.size]);
    }

    pub fn clear(&self, dst: &mut [f32]) {
        dst[..self.size].fill(0.0);
    }
}

/// Cas coefficients for `size` points: even slots hold
/// `cos(pi * m / (size / 2))`, odd slots the matching sine.
fn cas_table(size: usize) -> Vec<f32> {
    let half = (size / 2) as f64;
    let mut table = vec![0.0; size * 2];
    for m in 0..size {
        let d = core::f64::consts::PI * m as f64 / half;
        table[2 * m] = libm::cos(d) as f32;
        table[2 * m + 1] = libm::sin(d) as f32;
    }
    table
}

/// Closed-form 8-point Hartley butterfly.
fn transform8(p: &mut [f32]) {
    let (a, b, c, d) = (p[0], p[1], p[2], p[3]);
    let (e, f, g, h) = (p[4], p[5], p[6], p[7]);

    let b_f2 = (b - f) * SQRT_2;
    let d_h2 = (d - h) * SQRT_2;

    let a_c_eg = a - c - e + g;
    let a_ce_g = a - c + e - g;
    let ac_e_g = a + c - e - g;
    let aceg = a + c + e + g;

    let b_df_h = b - d + f - h;
    let bdfh = b + d + f + h;

    p[0] = aceg + bdfh;
    p[1] = ac_e_g + b_f2;
    p[2] = a_ce_g + b_df_h;
    p[3] = a_c_eg + d_h2;
    p[4] = aceg - bdfh;
    p[5] = ac_e_g - b_f2;
    p[6] = a_ce_g - b_df_h;
    p[7] = a_c_eg - d_h2;
}

/// Decimation in time. `num` is the full transform size, which fixes the
/// table stride at each level; `scratch` is borrowed for the whole descent.
fn transform_recursive(p: &mut [f32], scratch: &mut [f32], table: &[f32], num: usize) {
    let n = p.len();
    if n == 8 {
        transform8(p);
        return;
    }
    let half = n / 2;

    for i in 0..half {
        scratch[i] = p[2 * i];
        scratch[half + i] = p[2 * i + 1];
    }
    p.copy_from_slice(&scratch[..n]);

    {
        let (lo, hi) = p.split_at_mut(half);
        transform_recursive(lo, scratch, table, num);
        transform_recursive(hi, scratch, table, num);
    }

    let stride = num / half - 1;
    let mut t = 0;

    let mut a = table[t] * p[half];
    t += 1;
    a += table[t] * p[0];
    t += stride;
    scratch[0] = p[0] + a;
    scratch[half] = p[0] - a;

    for i in 1..half {
        let mut a = table[t] * p[half + i];
        t += 1;
        a += table[t] * p[n - i];
        t += stride;
        scratch[i] = p[i] + a;
        scratch[half + i] = p[i] - a;
    }
    p.copy_from_slice(&scratch[..n]);
}
