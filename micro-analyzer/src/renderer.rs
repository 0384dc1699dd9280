use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Point,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};

use crate::color_strategy::{blend, dim, ColorContext, ColorStrategy};
use crate::config::BLOCK_WIDTH;
use crate::types::BandView;

const BAR_SPACING: u32 = 1; // Space between bars
const FADE_BRIGHTNESS: f32 = 0.4;
const TRAIL_BRIGHTNESS: f32 = 0.5;

/// Receives the animated band state once per frame.
pub trait RenderAdapter {
    type Error;

    fn begin_frame(&mut self, _band_count: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_band(&mut self, band: &BandView<'_>) -> Result<(), Self::Error>;

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Draws bands as vertical bars on an `embedded-graphics` target, bottom up.
pub struct BarGraphRenderer<D, C> {
    target: D,
    colors: C,
    bar_width: u32,
    background: Rgb888,
    band_count: usize,
}

impl<D, C> BarGraphRenderer<D, C>
where
    D: DrawTarget<Color = Rgb888>,
    C: ColorStrategy,
{
    pub fn new(target: D, colors: C) -> Self {
        Self {
            target,
            colors,
            bar_width: BLOCK_WIDTH,
            background: Rgb888::BLACK,
            band_count: 0,
        }
    }

    pub fn with_bar_width(mut self, bar_width: u32) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }

    pub fn with_background(mut self, background: Rgb888) -> Self {
        self.background = background;
        self
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn colors(&self) -> &C {
        &self.colors
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    fn to_pixels(value: f32, max_height: f32, surface_height: u32) -> u32 {
        if max_height.is_nan() || value.is_nan() || max_height <= 0.0 || value <= 0.0 {
            return 0;
        }
        let px = (value / max_height).min(1.0) * surface_height as f32 + 0.5;
        (px as u32).min(surface_height)
    }

    fn fill_rows(&mut self, x: i32, top: u32, rows: u32, color: Rgb888) -> Result<(), D::Error> {
        if rows == 0 {
            return Ok(());
        }
        Rectangle::new(Point::new(x, top as i32), Size::new(self.bar_width, rows))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)
    }
}

impl<D, C> RenderAdapter for BarGraphRenderer<D, C>
where
    D: DrawTarget<Color = Rgb888>,
    C: ColorStrategy,
{
    type Error = D::Error;

    fn begin_frame(&mut self, band_count: usize) -> Result<(), Self::Error> {
        self.band_count = band_count;
        self.target.clear(self.background)
    }

    fn draw_band(&mut self, band: &BandView<'_>) -> Result<(), Self::Error> {
        let bounds = self.target.bounding_box();
        let height = bounds.size.height;
        let x = band.index as u32 * (self.bar_width + BAR_SPACING);
        if height == 0 || x + self.bar_width > bounds.size.width {
            return Ok(());
        }
        let x = bounds.top_left.x + x as i32;
        let y0 = bounds.top_left.y as u32;

        let context = ColorContext {
            band_index: band.index,
            band_count: self.band_count.max(band.index + 1),
            height: band.bar_height,
            max_height: band.max_height,
        };
        let bar_color = self.colors.bar_color(&context);
        let roof_color = self.colors.roof_color(&context);

        let bar_px = Self::to_pixels(band.bar_height, band.max_height, height);
        let fade_px = Self::to_pixels(band.fade_height, band.max_height, height);
        let roof_px = Self::to_pixels(band.roof_height, band.max_height, height);

        // fade bar fills the gap between the bar and the remembered peak
        let fade_level = band.fade_level();
        if fade_level > 0.0 && fade_px > bar_px {
            let color = blend(self.background, bar_color, fade_level * FADE_BRIGHTNESS);
            self.fill_rows(x, y0 + height - fade_px, fade_px - bar_px, color)?;
        }

        // older roof positions, dimmer with age; the newest is the roof itself
        let depth = band.history.len();
        for (age, &h) in band.history.iter().rev().enumerate().skip(1) {
            let px = Self::to_pixels(h, band.max_height, height);
            if px <= bar_px || px == roof_px {
                continue;
            }
            let level = (1.0 - age as f32 / depth as f32) * TRAIL_BRIGHTNESS;
            self.fill_rows(x, y0 + height - px, 1, dim(roof_color, level))?;
        }

        self.fill_rows(x, y0 + height - bar_px, bar_px, bar_color)?;

        if roof_px > 0 {
            self.fill_rows(x, y0 + height - roof_px, 1, roof_color)?;
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        self.colors.advance();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_strategy::{GradientColor, ShiftingSpectrumColor};
    use embedded_graphics::mock_display::MockDisplay;

    const RED: Rgb888 = Rgb888::RED;

    fn display() -> MockDisplay<Rgb888> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display
    }

    fn band<'a>(index: usize, bar: f32, roof: f32, history: &'a [f32]) -> BandView<'a> {
        BandView {
            index,
            bar_height: bar,
            roof_height: roof,
            history,
            fade_height: 0.0,
            fade_intensity: 0,
            fade_depth: 90,
            max_height: 64.0,
        }
    }

    #[test]
    fn draws_bar_and_roof_from_the_bottom() {
        let mut renderer = BarGraphRenderer::new(display(), GradientColor::new(RED, RED));
        let roof_color = blend(RED, Rgb888::WHITE, 0.5);

        renderer.begin_frame(1).unwrap();
        renderer.draw_band(&band(0, 32.0, 40.0, &[40.0])).unwrap();
        renderer.end_frame().unwrap();

        let display = renderer.target();
        assert_eq!(display.get_pixel(Point::new(0, 63)), Some(RED));
        assert_eq!(display.get_pixel(Point::new(3, 32)), Some(RED));
        assert_eq!(display.get_pixel(Point::new(0, 31)), Some(Rgb888::BLACK));
        assert_eq!(display.get_pixel(Point::new(0, 24)), Some(roof_color));
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(Rgb888::BLACK));
        // gap column between bars stays clear
        assert_eq!(display.get_pixel(Point::new(4, 63)), Some(Rgb888::BLACK));
    }

    #[test]
    fn history_trail_is_dimmer_than_roof() {
        let mut renderer = BarGraphRenderer::new(display(), GradientColor::new(RED, RED));
        renderer.begin_frame(2).unwrap();
        renderer
            .draw_band(&band(1, 8.0, 16.0, &[48.0, 32.0, 16.0]))
            .unwrap();

        let display = renderer.target();
        let trail = display.get_pixel(Point::new(5, 64 - 32)).unwrap();
        let older = display.get_pixel(Point::new(5, 64 - 48)).unwrap();
        assert_ne!(trail, Rgb888::BLACK);
        assert!(older.r() < trail.r());
    }

    #[test]
    fn fade_bar_sits_above_the_bar() {
        let mut renderer = BarGraphRenderer::new(display(), GradientColor::new(RED, RED));
        let view = BandView {
            fade_height: 48.0,
            fade_intensity: 80,
            ..band(0, 16.0, 16.0, &[])
        };
        renderer.begin_frame(1).unwrap();
        renderer.draw_band(&view).unwrap();

        let display = renderer.target();
        let fade = display.get_pixel(Point::new(0, 30)).unwrap();
        assert!(fade.r() > 0 && fade.r() < 255);
        assert_eq!(display.get_pixel(Point::new(0, 10)), Some(Rgb888::BLACK));
    }

    #[test]
    fn bands_past_the_edge_are_skipped() {
        let mut renderer = BarGraphRenderer::new(display(), GradientColor::new(RED, RED));
        renderer.begin_frame(20).unwrap();
        renderer.draw_band(&band(15, 64.0, 64.0, &[])).unwrap();
        assert_eq!(
            renderer.target().get_pixel(Point::new(63, 63)),
            Some(Rgb888::BLACK)
        );
    }

    #[test]
    fn degenerate_heights_map_to_no_pixels() {
        type R = BarGraphRenderer<MockDisplay<Rgb888>, GradientColor>;
        assert_eq!(R::to_pixels(f32::NAN, 64.0, 64), 0);
        assert_eq!(R::to_pixels(10.0, f32::NAN, 64), 0);
        assert_eq!(R::to_pixels(-1.0, 64.0, 64), 0);
        assert_eq!(R::to_pixels(10.0, 0.0, 64), 0);
        assert_eq!(R::to_pixels(32.0, 64.0, 64), 32);
        assert_eq!(R::to_pixels(500.0, 64.0, 64), 64);
    }

    #[test]
    fn end_frame_advances_colors() {
        let mut renderer = BarGraphRenderer::new(display(), ShiftingSpectrumColor::new(8));
        renderer.begin_frame(8).unwrap();
        renderer.end_frame().unwrap();
        renderer.end_frame().unwrap();
        assert_eq!(renderer.colors().wheel_position(), 2);
    }
}
