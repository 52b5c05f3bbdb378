//! Differential renderer.
//!
//! The DiffRenderer compares the current frame to the previous frame and only
//! outputs cells that have changed.
//!
//! # Algorithm
//!
//! 1. Open a synchronized update
//! 2. For each cell in the new frame:
//!    - If previous frame exists and cell is unchanged: skip
//!    - Otherwise: move there (unless already there), update whatever SGR
//!      state differs from the last cell written, print the character
//! 3. Place (or hide) the hardware cursor
//! 4. Close the update and hand the whole frame to the writer in one write
//! 5. Store current frame as previous for next comparison
//!
//! All escape sequences come from crossterm commands queued into a byte
//! buffer.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};

use super::buffer::FrameBuffer;
use crate::types::{Attr, Cell, Rgba};

const ATTRIBUTES: [(Attr, Attribute); 8] = [
    (Attr::BOLD, Attribute::Bold),
    (Attr::DIM, Attribute::Dim),
    (Attr::ITALIC, Attribute::Italic),
    (Attr::UNDERLINE, Attribute::Underlined),
    (Attr::BLINK, Attribute::SlowBlink),
    (Attr::INVERSE, Attribute::Reverse),
    (Attr::HIDDEN, Attribute::Hidden),
    (Attr::STRIKETHROUGH, Attribute::CrossedOut),
];

fn color(rgba: Rgba) -> Color {
    if rgba.is_terminal_default() {
        Color::Reset
    } else if rgba.is_ansi() {
        Color::AnsiValue(rgba.ansi_index())
    } else {
        Color::Rgb {
            r: rgba.r as u8,
            g: rgba.g as u8,
            b: rgba.b as u8,
        }
    }
}

// =============================================================================
// Pen
// =============================================================================

/// Terminal state as of the last cell written within one frame.
///
/// `None` means unknown, so the next cell sends it unconditionally.
#[derive(Default)]
struct Pen {
    at: Option<(u16, u16)>,
    attrs: Option<Attr>,
    fg: Option<Rgba>,
    bg: Option<Rgba>,
}

impl Pen {
    fn write_cell<W: Write>(&mut self, out: &mut W, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.at != Some((x, y)) {
            queue!(out, MoveTo(x, y))?;
        }

        if self.attrs != Some(cell.attrs) {
            // Reset drops colors as well, so both are re-sent below.
            queue!(out, SetAttribute(Attribute::Reset))?;
            for (flag, attribute) in ATTRIBUTES {
                if cell.attrs.contains(flag) {
                    queue!(out, SetAttribute(attribute))?;
                }
            }
            self.attrs = Some(cell.attrs);
            self.fg = None;
            self.bg = None;
        }
        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(color(cell.fg)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(color(cell.bg)))?;
            self.bg = Some(cell.bg);
        }

        queue!(out, Print(cell.ch()))?;
        self.at = Some((x.saturating_add(1), y));
        Ok(())
    }
}

// =============================================================================
// DiffRenderer
// =============================================================================

/// Differential renderer.
///
/// Keeps track of the previous frame to enable diff-based rendering.
#[derive(Default)]
pub struct DiffRenderer {
    scratch: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a frame to `writer`, outputting only changed cells.
    ///
    /// `cursor` is the hardware cursor position, or None to hide it.
    /// Returns true if any cells were changed.
    pub fn render<W: Write>(
        &mut self,
        writer: &mut W,
        buffer: &FrameBuffer,
        cursor: Option<(u16, u16)>,
    ) -> io::Result<bool> {
        let (width, height) = (buffer.width(), buffer.height());
        // A resize invalidates the comparison.
        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        let out = &mut self.scratch;
        out.clear();
        queue!(out, BeginSynchronizedUpdate)?;

        let mut pen = Pen::default();
        let mut has_changes = false;
        for y in 0..height {
            for x in 0..width {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if previous.and_then(|prev| prev.get(x, y)) == Some(cell) {
                    continue;
                }
                has_changes = true;
                pen.write_cell(out, x, y, cell)?;
            }
        }

        if has_changes {
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
        match cursor {
            Some((x, y)) => queue!(out, MoveTo(x, y), Show)?,
            None => queue!(out, Hide)?,
        }
        queue!(out, EndSynchronizedUpdate)?;

        writer.write_all(out)?;
        self.previous = Some(buffer.clone());

        Ok(has_changes)
    }

    /// Invalidate the previous frame. Next render will be a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check if we have a previous frame to diff against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================
