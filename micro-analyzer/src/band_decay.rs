use alloc::vec::Vec;

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::{
    positive_or, AnalyzerConfig, DEFAULT_MAX_DOWN_STEP, DEFAULT_MAX_HEIGHT, MAX_FADE_DEPTH,
    MAX_HISTORY_DEPTH, MAX_ROOF_HOLD_THRESHOLD,
};
use crate::types::BandView;

/// Roof velocity right after the roof catches a new peak.
pub const ROOF_VELOCITY_MIN: u32 = 1;

/// Motion limits shared by every band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayParams {
    pub max_height: f32,
    pub max_up_step: f32,
    pub max_down_step: f32,
    pub roof_reduction_factor: f32,
    pub roof_hold_threshold: u32,
    pub history_depth: usize,
    pub fade_depth: u32,
}

impl From<&AnalyzerConfig> for DecayParams {
    fn from(config: &AnalyzerConfig) -> Self {
        let config = config.clamped();
        Self {
            max_height: config.max_height,
            max_up_step: config.max_up_step,
            max_down_step: config.max_down_step,
            roof_reduction_factor: config.roof_reduction_factor,
            roof_hold_threshold: config.roof_hold_threshold,
            history_depth: config.history_depth,
            fade_depth: config.fade_depth,
        }
    }
}

impl DecayParams {
    /// Returns a copy with every limit pulled into its valid range. Step
    /// signs are dropped, only their magnitude is kept.
    pub fn clamped(&self) -> Self {
        let max_height = positive_or(self.max_height, DEFAULT_MAX_HEIGHT);
        Self {
            max_height,
            max_up_step: positive_or(self.max_up_step.abs(), max_height),
            max_down_step: positive_or(self.max_down_step.abs(), DEFAULT_MAX_DOWN_STEP),
            roof_reduction_factor: positive_or(self.roof_reduction_factor, 1.0).max(1.0),
            roof_hold_threshold: self.roof_hold_threshold.min(MAX_ROOF_HOLD_THRESHOLD),
            history_depth: self.history_depth.clamp(1, MAX_HISTORY_DEPTH),
            fade_depth: self.fade_depth.min(MAX_FADE_DEPTH),
        }
    }
}

impl Default for DecayParams {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

/// Animation state of a single display band.
#[derive(Debug, Clone)]
pub struct BandState {
    bar_height: f32,
    roof_height: f32,
    roof_velocity: u32,
    /// Recent roof heights, oldest first.
    history: Vec<f32>,
    fade_height: f32,
    fade_intensity: u32,
}

impl Default for BandState {
    fn default() -> Self {
        Self::new()
    }
}

impl BandState {
    pub const fn new() -> Self {
        Self {
            bar_height: 0.0,
            roof_height: 0.0,
            roof_velocity: ROOF_VELOCITY_MIN,
            history: Vec::new(),
            fade_height: 0.0,
            fade_intensity: 0,
        }
    }

    pub fn bar_height(&self) -> f32 {
        self.bar_height
    }

    pub fn roof_height(&self) -> f32 {
        self.roof_height
    }

    pub fn roof_velocity(&self) -> u32 {
        self.roof_velocity
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }

    pub fn fade_height(&self) -> f32 {
        self.fade_height
    }

    pub fn fade_intensity(&self) -> u32 {
        self.fade_intensity
    }

    /// Advances the band by one frame towards `target`.
    pub fn update(&mut self, target: f32, params: &DecayParams) {
        let target = if target.is_nan() {
            0.0
        } else {
            target.clamp(0.0, params.max_height)
        };

        let change = target - self.bar_height;
        let bar = if change > params.max_up_step {
            self.bar_height + params.max_up_step
        } else if change < -params.max_down_step {
            self.bar_height - params.max_down_step
        } else {
            target
        };
        self.bar_height = bar.clamp(0.0, params.max_height);

        self.update_roof(params);
        self.push_history(params.history_depth);
        self.update_fade(params.fade_depth);
    }

    fn update_roof(&mut self, params: &DecayParams) {
        if self.bar_height > self.roof_height {
            self.roof_height = self.bar_height;
            self.roof_velocity = ROOF_VELOCITY_MIN;
            return;
        }
        if self.roof_velocity == 0 {
            return;
        }

        if self.roof_velocity > params.roof_hold_threshold {
            self.roof_height -= self.roof_velocity as f32 / params.roof_reduction_factor;
        }
        if self.roof_height <= 0.0 {
            self.roof_height = 0.0;
            self.roof_velocity = 0;
        } else {
            self.roof_velocity = self.roof_velocity.saturating_add(1);
        }
    }

    fn push_history(&mut self, depth: usize) {
        let depth = depth.clamp(1, MAX_HISTORY_DEPTH);
        if self.history.len() >= depth {
            self.history.drain(..=self.history.len() - depth);
        }
        self.history.push(self.roof_height);
    }

    fn update_fade(&mut self, depth: u32) {
        if self.bar_height > 0.0 && self.bar_height >= self.fade_height {
            self.fade_height = self.bar_height;
            self.fade_intensity = depth;
        }
        if self.fade_intensity > 0 {
            self.fade_intensity -= 1;
        }
        if self.fade_intensity == 0 {
            self.fade_height = 0.0;
        }
    }
}

/// Owns one [`BandState`] per display band and advances them together.
pub struct BandDecayEngine {
    params: DecayParams,
    bands: Vec<BandState>,
}

impl BandDecayEngine {
    pub fn new(band_count: usize, params: DecayParams) -> Self {
        let mut bands = Vec::with_capacity(band_count);
        bands.resize(band_count, BandState::new());
        Self {
            params: params.clamped(),
            bands,
        }
    }

    pub fn params(&self) -> &DecayParams {
        &self.params
    }

    /// Replaces the motion limits without touching band state.
    pub fn set_params(&mut self, params: DecayParams) {
        self.params = params.clamped();
    }

    /// Recreates every band at rest.
    pub fn resize(&mut self, band_count: usize) {
        self.bands.clear();
        self.bands.resize(band_count, BandState::new());
    }

    pub fn reset(&mut self) {
        let count = self.bands.len();
        self.resize(count);
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn bands(&self) -> &[BandState] {
        &self.bands
    }

    pub fn band(&self, index: usize) -> Option<&BandState> {
        self.bands.get(index)
    }

    /// Advances every band by one frame. Bands without a target fall
    /// towards zero.
    pub fn update(&mut self, targets: &[f32]) {
        debug_assert!(targets.len() >= self.bands.len(), "missing band targets");
        for (i, band) in self.bands.iter_mut().enumerate() {
            let target = targets.get(i).copied().unwrap_or(0.0);
            band.update(target, &self.params);
        }
    }

    pub fn view(&self, index: usize) -> Option<BandView<'_>> {
        self.bands.get(index).map(|band| BandView {
            index,
            bar_height: band.bar_height,
            roof_height: band.roof_height,
            history: &band.history,
            fade_height: band.fade_height,
            fade_intensity: band.fade_intensity,
            fade_depth: self.params.fade_depth,
            max_height: self.params.max_height,
        })
    }

    pub fn views(&self) -> impl Iterator<Item = BandView<'_>> + '_ {
        (0..self.bands.len()).filter_map(move |i| self.view(i))
    }
}
