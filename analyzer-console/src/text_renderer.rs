use std::io::{self, Write};

use micro_analyzer::{BandView, RenderAdapter};

const HOME: &str = "\x1b[H";

#[derive(Clone, Copy, Default)]
struct Column {
    bar: f32,
    roof: f32,
    fade: f32,
}

/// Draws bands as rows of ASCII characters: `#` bar, `=` roof, `.` fade.
pub struct TextRenderer<W> {
    out: W,
    rows: usize,
    max_height: f32,
    ansi: bool,
    columns: Vec<Column>,
    line: String,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, rows: usize, ansi: bool) -> Self {
        Self {
            out,
            rows: rows.max(1),
            max_height: 1.0,
            ansi,
            columns: Vec::new(),
            line: String::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn glyph(&self, column: &Column, row: usize) -> char {
        let step = self.max_height / self.rows as f32;
        let floor = row as f32 * step;
        let level = floor + step / 2.0;
        if column.bar >= level {
            '#'
        } else if column.roof > floor && column.roof <= floor + step {
            '='
        } else if column.fade >= level {
            '.'
        } else {
            ' '
        }
    }
}

impl<W: Write> RenderAdapter for TextRenderer<W> {
    type Error = io::Error;

    fn begin_frame(&mut self, band_count: usize) -> io::Result<()> {
        self.columns.clear();
        self.columns.reserve(band_count);
        Ok(())
    }

    fn draw_band(&mut self, band: &BandView<'_>) -> io::Result<()> {
        self.max_height = band.max_height.max(f32::EPSILON);
        self.columns.push(Column {
            bar: band.bar_height,
            roof: band.roof_height,
            fade: if band.fade_level() > 0.0 { band.fade_height } else { 0.0 },
        });
        Ok(())
    }

    fn end_frame(&mut self) -> io::Result<()> {
        if self.ansi {
            self.out.write_all(HOME.as_bytes())?;
        }
        for row in (0..self.rows).rev() {
            self.line.clear();
            for column in &self.columns {
                let glyph = self.glyph(column, row);
                self.line.push(glyph);
            }
            writeln!(self.out, "{}", self.line)?;
        }
        writeln!(self.out, "{}", "-".repeat(self.columns.len()))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(index: usize, bar: f32, roof: f32) -> BandView<'static> {
        BandView {
            index,
            bar_height: bar,
            roof_height: roof,
            history: &[],
            fade_height: 0.0,
            fade_intensity: 0,
            fade_depth: 90,
            max_height: 4.0,
        }
    }

    #[test]
    fn renders_bars_and_roofs() {
        let mut renderer = TextRenderer::new(Vec::new(), 4, false);
        renderer.begin_frame(3).unwrap();
        renderer.draw_band(&view(0, 4.0, 4.0)).unwrap();
        renderer.draw_band(&view(1, 1.0, 3.0)).unwrap();
        renderer.draw_band(&view(2, 0.0, 0.0)).unwrap();
        renderer.end_frame().unwrap();

        let text = String::from_utf8(renderer.get_ref().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["#  ", "#= ", "#  ", "## ", "---"]);
    }

    #[test]
    fn ansi_output_homes_the_cursor() {
        let mut renderer = TextRenderer::new(Vec::new(), 2, true);
        renderer.begin_frame(1).unwrap();
        renderer.draw_band(&view(0, 0.0, 0.0)).unwrap();
        renderer.end_frame().unwrap();
        assert!(renderer.get_ref().starts_with(HOME.as_bytes()));
    }
}
