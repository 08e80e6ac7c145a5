use super::{Circle, RenderSurface};
use crate::wave::geometry::{Point, WavePath};
use crate::wave::layout::Viewport;
use crate::wave::style::Color;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use itertools::Itertools;
use std::io::{self, Write};

const UPPER_HALF_BLOCK: char = '▀';
const LOWER_HALF_BLOCK: char = '▄';

/// A software surface that rasterizes onto a grid of terminal cells.
///
/// Every cell holds two vertically stacked pixels drawn with a half block glyph, which makes
/// pixels roughly square on common terminal fonts. Paths are expressed in the logical
/// coordinates of `area` and sampled at each pixel's center.
#[derive(Clone, Debug)]
pub struct CellCanvas {
    columns: u16,
    rows: u16,
    area: Viewport,
    pixels: Vec<Option<Color>>,
    clip: Option<Circle>,
}

impl CellCanvas {
    pub fn new(columns: u16, rows: u16, area: Viewport) -> Self {
        let pixels = vec![None; columns as usize * rows as usize * 2];
        Self { columns, rows, area, pixels, clip: None }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn area(&self) -> Viewport {
        self.area
    }

    fn pixel_height(&self) -> usize {
        self.rows as usize * 2
    }

    /// Erase every pixel. The clip is left untouched.
    pub fn clear(&mut self) {
        self.pixels.fill(None);
    }

    /// The color of the pixel at `(x, y)`, if anything was painted there.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.columns as usize || y >= self.pixel_height() {
            return None;
        }
        self.pixels[y * self.columns as usize + x]
    }

    /// The logical coordinates of a pixel's center.
    fn pixel_center(&self, x: usize, y: usize) -> Point {
        let scale_x = self.area.width as f32 / self.columns.max(1) as f32;
        let scale_y = self.area.height as f32 / self.pixel_height().max(1) as f32;
        Point::new(
            self.area.left as f32 + (x as f32 + 0.5) * scale_x,
            self.area.top as f32 + (y as f32 + 0.5) * scale_y,
        )
    }

    /// Write the canvas to `writer` with its top left cell at `(column, row)`.
    pub fn flush_to<W: Write>(&self, writer: &mut W, column: u16, row: u16) -> io::Result<()> {
        for cell_row in 0..self.rows {
            queue!(writer, MoveTo(column, row + cell_row))?;
            for cell_column in 0..self.columns as usize {
                let top = self.pixel(cell_column, cell_row as usize * 2);
                let bottom = self.pixel(cell_column, cell_row as usize * 2 + 1);
                match (top, bottom) {
                    (None, None) => queue!(writer, ResetColor, Print(' '))?,
                    (top, bottom) => {
                        let background = bottom.map(term_color).unwrap_or(TermColor::Reset);
                        let foreground = top.map(term_color).unwrap_or(TermColor::Reset);
                        if top.is_none() {
                            queue!(writer, ResetColor, SetForegroundColor(background), Print(LOWER_HALF_BLOCK))?;
                        } else {
                            queue!(
                                writer,
                                SetForegroundColor(foreground),
                                SetBackgroundColor(background),
                                Print(UPPER_HALF_BLOCK)
                            )?;
                        }
                    }
                }
            }
            queue!(writer, ResetColor)?;
        }
        Ok(())
    }
}

impl RenderSurface for CellCanvas {
    fn clip_to_circle(&mut self, circle: Circle) {
        self.clip = Some(circle);
    }

    fn fill_path(&mut self, path: &WavePath, color: Color) {
        let points = path.points();
        if points.len() < 3 {
            return;
        }
        let mut crossings = Vec::new();
        for y in 0..self.pixel_height() {
            let sample_y = self.pixel_center(0, y).y;
            crossings.clear();
            // Even-odd rule over the closed outline.
            for (a, b) in points.iter().circular_tuple_windows() {
                if (a.y <= sample_y) != (b.y <= sample_y) {
                    crossings.push(a.x + (sample_y - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for x in 0..self.columns as usize {
                let center = self.pixel_center(x, y);
                let inside = crossings.chunks_exact(2).any(|span| center.x >= span[0] && center.x < span[1]);
                let visible = self.clip.map_or(true, |clip| clip.contains(center));
                if inside && visible {
                    self.pixels[y * self.columns as usize + x] = Some(color);
                }
            }
        }
    }

    fn reset_clip(&mut self) {
        self.clip = None;
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb { r: color.r, g: color.g, b: color.b }
}
