/// Character-cell rasterizer for terminal output
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use painter3d_core::{Rasterizer, Vec3};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// A grid of character cells that triangles are painted into.
///
/// There is no depth buffer: later triangles overwrite earlier ones, so
/// callers submit far geometry first.
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Write the grid starting at the cursor. No newline follows the last
    /// row, so a canvas filling the screen below the cursor never scrolls.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for &c in row {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Rasterizer for Canvas {
    fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Vec3) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let character = shade(color);

        // Bounding box, clamped to the grid
        let min_x = a.0.min(b.0).min(c.0).floor().max(0.0) as usize;
        let max_x = a.0.max(b.0).max(c.0).ceil().min((self.width - 1) as f32) as usize;
        let min_y = a.1.min(b.1).min(c.1).floor().max(0.0) as usize;
        let max_y = a.1.max(b.1).max(c.1).ceil().min((self.height - 1) as f32) as usize;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if let Some((w0, w1, w2)) = barycentric(a, b, c, (x as f32, y as f32)) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.cells[y * self.width + x] = character;
                    }
                }
            }
        }
    }
}

/// Map the mean of an RGB color onto the luminosity ramp
fn shade(color: Vec3) -> char {
    let brightness = ((color.x + color.y + color.z) / 3.0).clamp(0.0, 1.0);
    let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_triangles_overdraw() {
        let mut canvas = Canvas::new(10, 10);
        let dim = Vec3::new(0.2, 0.2, 0.2);
        let bright = Vec3::new(1.0, 1.0, 1.0);
        canvas.fill_triangle((0.0, 0.0), (9.0, 0.0), (0.0, 9.0), dim);
        canvas.fill_triangle((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), bright);

        assert_eq!(canvas.cell(1, 1), Some('@'));
        assert_eq!(canvas.cell(6, 1), Some(shade(dim)));
        assert_eq!(canvas.cell(9, 9), Some(' '));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut canvas = Canvas::new(5, 5);
        canvas.fill_triangle((0.0, 0.0), (0.0, 4.0), (4.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(canvas.cell(1, 1), Some('@'));
    }

    #[test]
    fn test_offscreen_vertices_are_clamped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_triangle((-10.0, -10.0), (20.0, -10.0), (-10.0, 20.0), Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(canvas.cell(0, 0), Some(shade(Vec3::new(0.5, 0.5, 0.5))));
        assert_eq!(canvas.cell(4, 0), None);
    }

    #[test]
    fn test_draw_does_not_end_with_newline() {
        let canvas = Canvas::new(3, 4);
        let mut out = Vec::new();
        canvas.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 3);
        // The final row's cells follow the last line break
        let last_row = text.rsplit("\r\n").next().unwrap();
        assert_eq!(last_row.matches(' ').count(), 3);
    }

    #[test]
    fn test_shade_floor_is_visible() {
        assert_ne!(shade(Vec3::new(0.1, 0.1, 0.1)), ' ');
    }
}
