//! Persistent character surface the rain is drawn onto.
//!
//! Positions are given in surface pixels and snapped to terminal cells. The
//! surface keeps its contents between frames; [`Canvas::fade`] dims whatever
//! was drawn before so moving symbols leave trails.

use std::f32::consts::TAU;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use sonagi_core::{CellSize, Rgb};
use unicode_width::UnicodeWidthChar;

use crate::color::to_terminal;

/// Channel value under which a faded cell is cleared.
const FADE_FLOOR: f32 = 4.0;

/// Glyph scale from which a symbol is drawn bold.
const BOLD_SCALE: f32 = 1.5;

/// Outline samples allowed per cell of grid width plus height.
const MAX_RING_SAMPLES_PER_CELL: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Narrow,
    /// First column of a double-width glyph.
    WideHead,
    /// Column covered by the glyph to its left.
    WideTail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Rgb,
    bold: bool,
    kind: CellKind,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: Rgb::BLACK,
        bold: false,
        kind: CellKind::Narrow,
    };

    fn is_blank(&self) -> bool {
        self.glyph == ' ' && self.kind != CellKind::WideTail
    }
}

/// A grid of colored cells addressed in surface pixels.
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cell: CellSize,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Create a blank canvas of `cols` by `rows` cells.
    pub fn new(cols: u16, rows: u16, cell: CellSize) -> Self {
        Self {
            cols,
            rows,
            cell,
            cells: vec![Cell::BLANK; usize::from(cols) * usize::from(rows)],
        }
    }

    /// Change the grid size, clearing everything drawn so far.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::BLANK; usize::from(cols) * usize::from(rows)];
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    /// Surface width in pixels.
    pub fn width(&self) -> f32 {
        f32::from(self.cols) * self.cell.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> f32 {
        f32::from(self.rows) * self.cell.height
    }

    /// Cell containing the pixel `(x, y)`, if it is on the canvas.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.cell.width).floor();
        let row = (y / self.cell.height).floor();
        if col >= f32::from(self.cols) || row >= f32::from(self.rows) {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Pixel at the center of a cell.
    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (f32::from(col) + 0.5) * self.cell.width,
            (f32::from(row) + 0.5) * self.cell.height,
        )
    }

    /// Character shown at a cell. Covered halves of wide glyphs report `None`.
    pub fn glyph(&self, col: u16, row: u16) -> Option<char> {
        let cell = self.cells.get(self.index(col, row)?)?;
        match cell.kind {
            CellKind::WideTail => None,
            _ => Some(cell.glyph),
        }
    }

    /// Color of a cell.
    pub fn color(&self, col: u16, row: u16) -> Option<Rgb> {
        self.cells.get(self.index(col, row)?).map(|cell| cell.color)
    }

    /// Whether a cell is drawn bold.
    pub fn is_bold(&self, col: u16, row: u16) -> bool {
        self.index(col, row)
            .and_then(|i| self.cells.get(i))
            .is_some_and(|cell| cell.bold)
    }

    /// Lay a black wash of opacity `alpha` (0-255) over everything.
    pub fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - (alpha / 255.0).clamp(0.0, 1.0);
        for cell in &mut self.cells {
            if cell.is_blank() {
                continue;
            }
            cell.color = cell.color.scale(keep);
            if cell.color.max_channel() < FADE_FLOOR {
                *cell = Cell::BLANK;
            }
        }
    }

    /// Blend `glyph` over the cell under `(x, y)` with opacity `alpha` (0-255).
    ///
    /// Scaled-up glyphs are drawn bold. Off-canvas positions are ignored.
    pub fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, color: Rgb, alpha: f32, scale: f32) {
        if let Some((col, row)) = self.cell_at(x, y) {
            self.put(col, row, glyph, color, alpha, scale >= BOLD_SCALE);
        }
    }

    /// Blend a single dot character under `(x, y)`.
    pub fn draw_dot(&mut self, x: f32, y: f32, dot: char, color: Rgb, alpha: f32) {
        self.draw_glyph(x, y, dot, color, alpha, 1.0);
    }

    /// Outline a circle of `radius` pixels centered on `(cx, cy)`.
    ///
    /// Each covered cell is blended once.
    pub fn stroke_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        ring: char,
        color: Rgb,
        alpha: f32,
    ) {
        if radius < 0.0 || !radius.is_finite() || !self.ring_touches(cx, cy, radius) {
            return;
        }
        let samples = self.ring_samples(radius);

        let mut covered: Vec<(u16, u16)> = (0..samples)
            .filter_map(|i| {
                let angle = TAU * i as f32 / samples as f32;
                self.cell_at(cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect();
        covered.sort_unstable();
        covered.dedup();

        for (col, row) in covered {
            self.put(col, row, ring, color, alpha, false);
        }
    }

    /// Render the grid as styled lines, one per row.
    pub fn lines(&self) -> Vec<Line<'static>> {
        if self.cols == 0 {
            return vec![Line::default(); usize::from(self.rows)];
        }
        self.cells
            .chunks(usize::from(self.cols))
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .filter(|cell| cell.kind != CellKind::WideTail)
                    .map(|cell| {
                        if cell.glyph == ' ' {
                            return Span::raw(" ");
                        }
                        let mut style = Style::new().fg(to_terminal(cell.color));
                        if cell.bold {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        Span::styled(cell.glyph.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    /// Whether a circle outline crosses the canvas at all.
    fn ring_touches(&self, cx: f32, cy: f32, radius: f32) -> bool {
        let (w, h) = (self.width(), self.height());
        let near = (cx.clamp(0.0, w) - cx).hypot(cy.clamp(0.0, h) - cy);
        let far = cx.abs().max((cx - w).abs()).hypot(cy.abs().max((cy - h).abs()));
        near <= radius && radius <= far
    }

    /// Points sampled along an outline of `radius`, bounded by the grid size.
    fn ring_samples(&self, radius: f32) -> usize {
        let step = self.cell.width.min(self.cell.height) / 2.0;
        let limit = MAX_RING_SAMPLES_PER_CELL * (usize::from(self.cols) + usize::from(self.rows));
        ((TAU * radius / step).ceil() as usize).clamp(8, limit.max(8))
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.cols && row < self.rows)
            .then(|| usize::from(row) * usize::from(self.cols) + usize::from(col))
    }

    fn put(&mut self, col: u16, row: u16, glyph: char, color: Rgb, alpha: f32, bold: bool) {
        if alpha <= 0.0 {
            return;
        }
        let Some(index) = self.index(col, row) else {
            return;
        };
        let wide = glyph.width().unwrap_or(1) > 1;
        if wide && col + 1 >= self.cols {
            return;
        }

        let t = (alpha / 255.0).min(1.0);
        let blended = self.cells[index].color.lerp(color, t);

        self.release(col, row);
        if wide {
            self.release(col + 1, row);
        }

        self.cells[index] = Cell {
            glyph,
            color: blended,
            bold,
            kind: if wide {
                CellKind::WideHead
            } else {
                CellKind::Narrow
            },
        };
        if wide {
            self.cells[index + 1] = Cell {
                glyph: ' ',
                color: blended,
                bold,
                kind: CellKind::WideTail,
            };
        }
    }

    /// Clear the other half of a wide glyph about to be overwritten at a cell.
    fn release(&mut self, col: u16, row: u16) {
        let Some(index) = self.index(col, row) else {
            return;
        };
        match self.cells[index].kind {
            CellKind::Narrow => {}
            CellKind::WideHead => {
                if let Some(tail) = self.index(col + 1, row) {
                    self.cells[tail] = Cell::BLANK;
                }
                self.cells[index] = Cell::BLANK;
            }
            CellKind::WideTail => {
                if let Some(head) = col.checked_sub(1).and_then(|c| self.index(c, row)) {
                    self.cells[head] = Cell::BLANK;
                }
                self.cells[index] = Cell::BLANK;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(10, 4, CellSize::default())
    }

    fn row_text(canvas: &Canvas, row: usize) -> String {
        canvas.lines()[row]
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_cell_at_snaps_to_grid() {
        let canvas = canvas();
        assert_eq!(canvas.width(), 90.0);
        assert_eq!(canvas.height(), 72.0);
        assert_eq!(canvas.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(canvas.cell_at(8.9, 17.9), Some((0, 0)));
        assert_eq!(canvas.cell_at(9.0, 18.0), Some((1, 1)));
        assert_eq!(canvas.cell_at(89.9, 71.9), Some((9, 3)));
        assert_eq!(canvas.cell_at(90.0, 0.0), None);
        assert_eq!(canvas.cell_at(0.0, 72.0), None);
        assert_eq!(canvas.cell_at(-0.1, 5.0), None);
        assert_eq!(canvas.cell_at(f32::NAN, 5.0), None);
    }

    #[test]
    fn test_opaque_glyph_replaces_cell() {
        let mut canvas = canvas();
        let green = Rgb::new(0.0, 154.0, 30.0);
        canvas.draw_glyph(20.0, 20.0, 'A', green, 255.0, 1.0);
        assert_eq!(canvas.glyph(2, 1), Some('A'));
        assert_eq!(canvas.color(2, 1), Some(green));
        assert!(!canvas.is_bold(2, 1));
    }

    #[test]
    fn test_translucent_glyph_blends_with_previous_color() {
        let mut canvas = canvas();
        canvas.draw_glyph(0.0, 0.0, 'A', Rgb::WHITE, 255.0, 1.0);
        canvas.draw_glyph(0.0, 0.0, 'B', Rgb::BLACK, 127.5, 1.0);
        assert_eq!(canvas.glyph(0, 0), Some('B'));
        assert_eq!(canvas.color(0, 0), Some(Rgb::new(127.5, 127.5, 127.5)));
    }

    #[test]
    fn test_zero_alpha_draws_nothing() {
        let mut canvas = canvas();
        canvas.draw_glyph(0.0, 0.0, 'A', Rgb::WHITE, 0.0, 1.0);
        assert_eq!(canvas.glyph(0, 0), Some(' '));
    }

    #[test]
    fn test_large_glyph_is_bold() {
        let mut canvas = canvas();
        canvas.draw_glyph(0.0, 0.0, 'A', Rgb::WHITE, 255.0, 3.0);
        assert!(canvas.is_bold(0, 0));
        let line = &canvas.lines()[0];
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_fade_dims_then_clears() {
        let mut canvas = canvas();
        canvas.draw_glyph(0.0, 0.0, 'A', Rgb::new(200.0, 100.0, 0.0), 255.0, 1.0);
        canvas.fade(127.5);
        assert_eq!(canvas.color(0, 0), Some(Rgb::new(100.0, 50.0, 0.0)));
        for _ in 0..6 {
            canvas.fade(127.5);
        }
        assert_eq!(canvas.glyph(0, 0), Some(' '));
        assert_eq!(canvas.color(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn test_wide_glyph_covers_two_columns() {
        let mut canvas = canvas();
        canvas.draw_glyph(0.0, 0.0, 'ア', Rgb::WHITE, 255.0, 1.0);
        assert_eq!(canvas.glyph(0, 0), Some('ア'));
        assert_eq!(canvas.glyph(1, 0), None);
        assert_eq!(row_text(&canvas, 0), "ア        ");
    }

    #[test]
    fn test_overwriting_half_of_wide_glyph_clears_it() {
        let mut canvas = canvas();
        canvas.draw_glyph(0.0, 0.0, 'ア', Rgb::WHITE, 255.0, 1.0);
        canvas.draw_glyph(9.0, 0.0, 'x', Rgb::WHITE, 255.0, 1.0);
        assert_eq!(canvas.glyph(0, 0), Some(' '));
        assert_eq!(canvas.glyph(1, 0), Some('x'));
        assert_eq!(row_text(&canvas, 0), " x        ");

        canvas.draw_glyph(18.0, 0.0, 'イ', Rgb::WHITE, 255.0, 1.0);
        canvas.draw_glyph(9.0, 0.0, 'ウ', Rgb::WHITE, 255.0, 1.0);
        assert_eq!(row_text(&canvas, 0), " ウ       ");
    }

    #[test]
    fn test_wide_glyph_at_last_column_is_skipped() {
        let mut canvas = canvas();
        canvas.draw_glyph(81.0, 0.0, 'ア', Rgb::WHITE, 255.0, 1.0);
        assert_eq!(canvas.glyph(9, 0), Some(' '));
    }

    #[test]
    fn test_lines_match_grid_size() {
        let mut canvas = canvas();
        canvas.draw_glyph(40.0, 40.0, 'ネ', Rgb::WHITE, 200.0, 1.0);
        let lines = canvas.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.width() == 10));
    }

    #[test]
    fn test_circle_touches_each_cell_once() {
        let mut canvas = Canvas::new(40, 20, CellSize::default());
        let (cx, cy) = canvas.cell_center(20, 10);
        canvas.stroke_circle(cx, cy, 90.0, '·', Rgb::WHITE, 51.0);

        // One blend at 20% opacity from black
        let expected = Rgb::new(51.0, 51.0, 51.0);
        let mut touched = 0;
        for row in 0..20 {
            for col in 0..40 {
                if canvas.glyph(col, row) == Some('·') {
                    touched += 1;
                    assert_eq!(canvas.color(col, row), Some(expected));
                }
            }
        }
        assert!(touched > 8);
        assert_eq!(canvas.glyph(20, 10), Some(' '));
    }

    #[test]
    fn test_ring_sampling_is_bounded() {
        let canvas = Canvas::new(40, 20, CellSize::default());
        assert_eq!(canvas.ring_samples(0.0), 8);
        assert_eq!(canvas.ring_samples(1.0e9), 16 * 60);
        assert!(canvas.ring_samples(90.0) < 16 * 60);
    }

    #[test]
    fn test_ring_off_canvas_draws_nothing() {
        let mut canvas = Canvas::new(40, 20, CellSize::default());
        let (cx, cy) = canvas.cell_center(20, 10);
        // Encloses the whole canvas
        canvas.stroke_circle(cx, cy, 1.0e9, '·', Rgb::WHITE, 255.0);
        // Centered far away, never reaching it
        canvas.stroke_circle(1.0e6, 1.0e6, 10.0, '·', Rgb::WHITE, 255.0);
        assert!(canvas.lines().iter().all(|line| {
            line.spans.iter().all(|span| span.content.as_ref() == " ")
        }));
    }

    #[test]
    fn test_large_ring_still_reaches_the_canvas() {
        let mut canvas = Canvas::new(40, 20, CellSize::default());
        // Center just left of the canvas, edge sweeping through it
        canvas.stroke_circle(-5000.0, 180.0, 5100.0, '·', Rgb::WHITE, 255.0);
        let drawn = (0..20)
            .filter(|&row| (0..40).any(|col| canvas.glyph(col, row) == Some('·')))
            .count();
        assert!(drawn > 0);
    }

    #[test]
    fn test_resize_clears() {
        let mut canvas = canvas();
        canvas.draw_glyph(0.0, 0.0, 'A', Rgb::WHITE, 255.0, 1.0);
        canvas.resize(3, 2);
        assert_eq!(canvas.cols(), 3);
        assert_eq!(canvas.glyph(0, 0), Some(' '));
        assert_eq!(canvas.glyph(3, 0), None);
    }
}
