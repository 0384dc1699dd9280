#[allow(unused_imports)]
use micromath::F32Ext;

/// Read-only snapshot of one band handed to a render adapter.
#[derive(Debug, Clone, Copy)]
pub struct BandView<'a> {
    pub index: usize,        // band position, 0 is the lowest frequency
    pub bar_height: f32,     // 0.0..=max_height
    pub roof_height: f32,    // >= bar_height right after a new peak
    pub history: &'a [f32],  // past roof heights, oldest first
    pub fade_height: f32,    // peak the fade bar remembers, 0.0 when idle
    pub fade_intensity: u32, // frames left before the fade bar expires
    pub fade_depth: u32,
    pub max_height: f32,
}

impl BandView<'_> {
    /// Brightness of the fade bar in `0.0..=1.0`. The drop is logarithmic so
    /// the fade lingers near full brightness and vanishes quickly at the end.
    pub fn fade_level(&self) -> f32 {
        if self.fade_intensity == 0 || self.fade_depth <= 1 {
            return 0.0;
        }
        let elapsed = self.fade_depth.saturating_sub(self.fade_intensity).max(1) as f32;
        (1.0 - elapsed.log10() / (self.fade_depth as f32).log10()).clamp(0.0, 1.0)
    }

    /// Bar height as a fraction of the full column.
    pub fn fill(&self) -> f32 {
        if self.max_height > 0.0 {
            (self.bar_height / self.max_height).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
