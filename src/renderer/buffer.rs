//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells that represents what should be displayed
//! on the terminal. All drawing operations work on this buffer.
//!
//! # Design Decisions
//!
//! - **Flat storage**: Uses `Vec<Cell>` with row-major indexing.
//! - **Clipping**: Drawing functions accept an optional clip `Rect`; nothing is
//!   ever written outside it or outside the buffer.
//! - **One cell per char**: Every character occupies exactly one cell.

use crate::types::{Attr, BorderStyle, Cell, Rect, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Get buffer width.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get buffer height.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the full buffer bounds as a Rect.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Convert (x, y) to flat index.
    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if coordinates are in bounds.
    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference (returns None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Get raw cells slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Read one row back as a string (test and debugging aid).
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.ch())
            .collect()
    }

    /// Clear the entire buffer to default cells.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// Returns true if the cell was set.
    pub fn set_cell(
        &mut self,
        x: u16,
        y: u16,
        char: u32,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }

        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return false;
            }
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        cell.char = char;
        cell.fg = fg;
        cell.bg = bg;
        cell.attrs = attrs;

        true
    }

    /// Draw a single character.
    pub fn draw_char(
        &mut self,
        x: u16,
        y: u16,
        char: char,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> bool {
        self.set_cell(x, y, char as u32, fg, bg, attrs, clip)
    }

    /// Draw text at a position.
    ///
    /// Returns the number of cells written. Stops at the buffer edge.
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> u16 {
        let mut col = x;
        let mut written = 0;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            if self.draw_char(col, y, ch, fg, bg, attrs, clip) {
                written += 1;
            }
            col += 1;
        }

        written
    }

    /// Fill a rectangle with blanks in the given colors.
    pub fn fill_rect(&mut self, rect: Rect, fg: Rgba, bg: Rgba, clip: Option<&Rect>) {
        let area = match clip {
            Some(clip) => rect.intersect(clip),
            None => Some(rect),
        };
        let Some(area) = area.and_then(|a| a.intersect(&self.bounds())) else {
            return;
        };

        for row in area.y..area.bottom() {
            let row_start = self.index(area.x, row);
            let row_end = self.index(area.right(), row);
            for cell in &mut self.cells[row_start..row_end] {
                cell.char = b' ' as u32;
                cell.fg = fg;
                cell.bg = bg;
                cell.attrs = Attr::NONE;
            }
        }
    }

    /// Draw a border around a rectangle.
    pub fn draw_border(
        &mut self,
        rect: Rect,
        style: BorderStyle,
        fg: Rgba,
        bg: Rgba,
        clip: Option<&Rect>,
    ) {
        if rect.width < 2 || rect.height < 2 || style == BorderStyle::None {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let (x, y) = (rect.x, rect.y);
        let x2 = rect.right() - 1;
        let y2 = rect.bottom() - 1;

        self.draw_char(x, y, tl, fg, bg, Attr::NONE, clip);
        self.draw_char(x2, y, tr, fg, bg, Attr::NONE, clip);
        self.draw_char(x2, y2, br, fg, bg, Attr::NONE, clip);
        self.draw_char(x, y2, bl, fg, bg, Attr::NONE, clip);

        for col in (x + 1)..x2 {
            self.draw_char(col, y, horiz, fg, bg, Attr::NONE, clip);
            self.draw_char(col, y2, horiz, fg, bg, Attr::NONE, clip);
        }

        for row in (y + 1)..y2 {
            self.draw_char(x, row, vert, fg, bg, Attr::NONE, clip);
            self.draw_char(x2, row, vert, fg, bg, Attr::NONE, clip);
        }
    }

    /// Copy the cells of `rect` from another buffer of the same size.
    ///
    /// Cells outside either buffer are skipped.
    pub fn copy_rect_from(&mut self, other: &FrameBuffer, rect: Rect) {
        let Some(area) = rect
            .intersect(&self.bounds())
            .and_then(|a| a.intersect(&other.bounds()))
        else {
            return;
        };

        for row in area.y..area.bottom() {
            for col in area.x..area.right() {
                if let (Some(src), Some(dst)) = (other.get(col, row).copied(), self.get_mut(col, row)) {
                    *dst = src;
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
