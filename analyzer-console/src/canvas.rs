use std::convert::Infallible;
use std::io::{self, Write};

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

/// In-memory `Rgb888` framebuffer printed to a truecolor terminal, two pixel
/// rows per text line.
pub struct AnsiCanvas {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl AnsiCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![Rgb888::BLACK; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x < self.size.width && y < self.size.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "\x1b[H")?;
        for y in (0..self.size.height).step_by(2) {
            for x in 0..self.size.width {
                let top = self.pixel(x, y).unwrap_or(Rgb888::BLACK);
                let bottom = self.pixel(x, y + 1).unwrap_or(Rgb888::BLACK);
                write!(
                    out,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top.r(),
                    top.g(),
                    top.b(),
                    bottom.r(),
                    bottom.g(),
                    bottom.b()
                )?;
            }
            writeln!(out, "\x1b[0m")?;
        }
        out.flush()
    }
}

impl OriginDimensions for AnsiCanvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for AnsiCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < self.size.width && y < self.size.height {
                let i = self.index(x, y);
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}
