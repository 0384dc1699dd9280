use alloc::{vec, vec::Vec};

#[allow(unused_imports)]
use micromath::F32Ext;

/// Maps linear spectrum magnitudes onto a logarithmic stack of rows.
///
/// `thresholds[z]` is the magnitude needed to light everything from row `z`
/// down; it shrinks logarithmically so quiet bins still register, and the
/// sentinel `thresholds[rows]` is 0.
pub struct LogScale {
    rows: usize,
    thresholds: Vec<f32>,
}

impl LogScale {
    pub fn new(rows: usize) -> Self {
        let rows = rows.max(1);
        let mut thresholds = vec![0.0; rows + 1];

        // one row of slack on each end restricts the range somewhat
        let span = (rows as f32 + 2.0).log10();
        for (z, t) in thresholds.iter_mut().take(rows).enumerate() {
            *t = 1.0 - (1.0 + z as f32).log10() / span;
        }

        Self { rows, thresholds }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    /// Number of rows lit by `value`, `0..=rows`.
    pub fn lit_rows(&self, value: f32) -> usize {
        let blank = self
            .thresholds
            .iter()
            .position(|&t| value >= t)
            .unwrap_or(self.rows);
        self.rows - blank
    }

    /// `value` quantized to rows and expressed in `0..=max_height` units.
    pub fn height(&self, value: f32, max_height: f32) -> f32 {
        self.lit_rows(value) as f32 * max_height / self.rows as f32
    }
}

/// Rows a bar may fall per frame at a given frame interval. A full column
/// takes about `30 * rows` milliseconds to empty.
pub fn fall_step(rows: usize, interval_ms: u32) -> f32 {
    let rows = rows.max(1) as f32;
    let fall_time = 30.0 * rows;
    rows * interval_ms as f32 / fall_time
}
