use alloc::boxed::Box;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

/// What a strategy knows about the band it is coloring.
pub struct ColorContext {
    pub band_index: usize,
    pub band_count: usize,
    pub height: f32,
    pub max_height: f32,
}

pub trait ColorStrategy {
    fn bar_color(&mut self, context: &ColorContext) -> Rgb888;

    /// Roof line color, brighter than the bar by default.
    fn roof_color(&mut self, context: &ColorContext) -> Rgb888 {
        blend(self.bar_color(context), Rgb888::WHITE, 0.5)
    }

    /// Called once after every frame.
    fn advance(&mut self) {}
}

impl<C: ColorStrategy + ?Sized> ColorStrategy for Box<C> {
    fn bar_color(&mut self, context: &ColorContext) -> Rgb888 {
        (**self).bar_color(context)
    }

    fn roof_color(&mut self, context: &ColorContext) -> Rgb888 {
        (**self).roof_color(context)
    }

    fn advance(&mut self) {
        (**self).advance()
    }
}

fn map_position_to_rgb_on_wheel(pos: u8) -> Rgb888 {
    let pos = pos % 255;
    if pos < 85 {
        Rgb888::new(
            pos.saturating_mul(3),
            255u8.saturating_sub(pos.saturating_mul(3)),
            0,
        )
    } else if pos < 170 {
        let pos = pos.saturating_sub(85);
        Rgb888::new(
            255u8.saturating_sub(pos.saturating_mul(3)),
            0,
            pos.saturating_mul(3),
        )
    } else {
        let pos = pos.saturating_sub(170);
        Rgb888::new(
            0,
            pos.saturating_mul(3),
            255u8.saturating_sub(pos.saturating_mul(3)),
        )
    }
}

/// Linear mix of two colors, `amount` 0.0 keeps `from`.
pub fn blend(from: Rgb888, to: Rgb888, amount: f32) -> Rgb888 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount + 0.5) as u8;
    Rgb888::new(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}

/// Scales a color towards black, `level` 1.0 keeps it unchanged.
pub fn dim(color: Rgb888, level: f32) -> Rgb888 {
    blend(Rgb888::BLACK, color, level)
}

/// Fixed rainbow across the bands.
pub struct SpectrumColor;

impl ColorStrategy for SpectrumColor {
    fn bar_color(&mut self, context: &ColorContext) -> Rgb888 {
        let count = context.band_count.max(1) as u32;
        let color_position = ((context.band_index as u32 * 255 / count) % 255) as u8;
        map_position_to_rgb_on_wheel(color_position)
    }
}

/// Interpolates between two colors by bar height.
pub struct GradientColor {
    low: Rgb888,
    high: Rgb888,
}

impl GradientColor {
    pub const fn new(low: Rgb888, high: Rgb888) -> Self {
        Self { low, high }
    }
}

impl Default for GradientColor {
    fn default() -> Self {
        Self::new(Rgb888::new(0, 64, 255), Rgb888::new(255, 32, 0))
    }
}

impl ColorStrategy for GradientColor {
    fn bar_color(&mut self, context: &ColorContext) -> Rgb888 {
        if context.max_height <= 0.0 {
            return self.low;
        }
        blend(self.low, self.high, context.height / context.max_height)
    }
}

/// Rainbow that rotates one wheel step per frame.
pub struct ShiftingSpectrumColor {
    color_wheel_multiplier: u8,
    wheel_val: u8,
}

impl ShiftingSpectrumColor {
    pub fn new(band_count: usize) -> Self {
        Self {
            color_wheel_multiplier: (255 / band_count.clamp(1, 255)) as u8,
            wheel_val: 0,
        }
    }

    pub fn wheel_position(&self) -> u8 {
        self.wheel_val
    }
}

impl ColorStrategy for ShiftingSpectrumColor {
    fn bar_color(&mut self, context: &ColorContext) -> Rgb888 {
        map_position_to_rgb_on_wheel(
            (context.band_index as u8)
                .wrapping_mul(self.color_wheel_multiplier)
                .wrapping_add(self.wheel_val),
        )
    }

    fn advance(&mut self) {
        self.wheel_val = self.wheel_val.wrapping_add(1);
    }
}
