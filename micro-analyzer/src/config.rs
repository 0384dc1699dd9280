#[allow(unused_imports)]
use micromath::F32Ext;

use crate::log_scale::fall_step;

// --- Surface geometry (block analyzer) ---
pub const BLOCK_WIDTH: u32 = 4; // pixels per column, plus 1 pixel gap
pub const BLOCK_HEIGHT: u32 = 2; // pixels per row, plus 1 pixel gap
pub const MIN_ROWS: usize = 3;
pub const MAX_ROWS: usize = 128;
pub const MAX_BAND_COUNT: usize = 256;

// --- Defaults ---
pub const DEFAULT_BAND_COUNT: usize = 32;
pub const DEFAULT_TRANSFORM_EXPONENT: u32 = 9; // 512 points
pub const DEFAULT_ROWS: usize = 16;
pub const DEFAULT_MAX_HEIGHT: f32 = 64.0;
pub const DEFAULT_MAX_UP_STEP: f32 = 24.0;
pub const DEFAULT_MAX_DOWN_STEP: f32 = 2.0;
pub const DEFAULT_ROOF_REDUCTION_FACTOR: f32 = 32.0;
pub const DEFAULT_ROOF_HOLD_THRESHOLD: u32 = 32; // frames
pub const DEFAULT_HISTORY_DEPTH: usize = 16;
pub const DEFAULT_FADE_DEPTH: u32 = 90; // frames
pub const DEFAULT_FRAME_INTERVAL_MS: u32 = 20;

pub const MAX_HISTORY_DEPTH: usize = 32;
pub const MAX_ROOF_HOLD_THRESHOLD: u32 = 1000; // frames
pub const MAX_FADE_DEPTH: u32 = 1000; // frames
pub const MAX_FRAME_INTERVAL_MS: u32 = 1000;

/// What the analyzer shows while the scope source has nothing to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleMode {
    /// Slowly evolving synthetic envelope.
    Demo,
    /// All-zero input, bars fall to rest.
    Silence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub band_count: usize,
    pub transform_size_exponent: u32,
    /// Vertical resolution of the log row scale.
    pub rows: usize,
    /// Height of a full bar in render units.
    pub max_height: f32,
    pub max_up_step: f32,
    /// Largest fall per frame. Only the magnitude counts, so -2.0 and 2.0
    /// both fall two units per frame.
    pub max_down_step: f32,
    pub roof_reduction_factor: f32,
    pub roof_hold_threshold: u32,
    pub history_depth: usize,
    pub fade_depth: u32,
    pub frame_interval_ms: u32,
    pub hann_window: bool,
    pub idle_mode: IdleMode,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            band_count: DEFAULT_BAND_COUNT,
            transform_size_exponent: DEFAULT_TRANSFORM_EXPONENT,
            rows: DEFAULT_ROWS,
            max_height: DEFAULT_MAX_HEIGHT,
            max_up_step: DEFAULT_MAX_UP_STEP,
            max_down_step: DEFAULT_MAX_DOWN_STEP,
            roof_reduction_factor: DEFAULT_ROOF_REDUCTION_FACTOR,
            roof_hold_threshold: DEFAULT_ROOF_HOLD_THRESHOLD,
            history_depth: DEFAULT_HISTORY_DEPTH,
            fade_depth: DEFAULT_FADE_DEPTH,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            hann_window: false,
            idle_mode: IdleMode::Demo,
        }
    }
}

impl AnalyzerConfig {
    /// Lays the analyzer out on a `width` x `height` pixel surface: one band
    /// per block column, one row per block row, and a fall rate that takes
    /// the frame interval into account.
    pub fn for_surface(width: u32, height: u32) -> Self {
        let mut config = Self::default();
        config.fit_surface(width, height);
        config
    }

    pub fn fit_surface(&mut self, width: u32, height: u32) {
        let columns = (width as usize + 1) / (BLOCK_WIDTH as usize + 1);
        let rows = (height as usize + 1) / (BLOCK_HEIGHT as usize + 1);

        self.band_count = columns.clamp(1, MAX_BAND_COUNT);
        self.rows = rows.clamp(MIN_ROWS, MAX_ROWS);
        self.max_height = (height as f32).max(1.0);
        self.max_down_step =
            fall_step(self.rows, self.frame_interval_ms.max(1)) * (BLOCK_HEIGHT + 1) as f32;
        self.max_up_step = self.max_height;
    }

    /// Returns a copy with every option pulled into its valid range.
    pub fn clamped(&self) -> Self {
        let max_height = positive_or(self.max_height, DEFAULT_MAX_HEIGHT);
        Self {
            band_count: self.band_count.clamp(1, MAX_BAND_COUNT),
            transform_size_exponent: self
                .transform_size_exponent
                .clamp(micro_fht::MIN_EXPONENT, micro_fht::MAX_EXPONENT),
            rows: self.rows.clamp(MIN_ROWS, MAX_ROWS),
            max_height,
            max_up_step: positive_or(self.max_up_step.abs(), max_height),
            max_down_step: positive_or(self.max_down_step.abs(), DEFAULT_MAX_DOWN_STEP),
            roof_reduction_factor: positive_or(self.roof_reduction_factor, 1.0).max(1.0),
            roof_hold_threshold: self.roof_hold_threshold.min(MAX_ROOF_HOLD_THRESHOLD),
            history_depth: self.history_depth.clamp(1, MAX_HISTORY_DEPTH),
            fade_depth: self.fade_depth.min(MAX_FADE_DEPTH),
            frame_interval_ms: self.frame_interval_ms.clamp(1, MAX_FRAME_INTERVAL_MS),
            hann_window: self.hann_window,
            idle_mode: self.idle_mode,
        }
    }
}

pub(crate) fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
