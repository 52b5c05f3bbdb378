//! Scroll State & Scrollbar Geometry
//!
//! Shared by every widget whose content can overflow its region:
//! - Per-widget scroll offsets (user state)
//! - Content extents, recomputed before every repaint (never cached across
//!   a content change)
//! - Thumb geometry derived from the two, never stored
//!
//! The vertical bar takes the rightmost column, the horizontal bar the bottom
//! row. Content is drawn in the remaining area only.

use crate::types::Attr;
use crate::widget::Widget;

// =============================================================================
// SCROLL CONSTANTS
// =============================================================================

/// Scroll amount for one mouse wheel notch (lines).
pub const WHEEL_SCROLL: usize = 1;

const VERTICAL_TRACK: char = '|';
const HORIZONTAL_TRACK: char = '-';
const THUMB: char = '#';
const CORNER: char = '+';

// =============================================================================
// SCROLL STATE
// =============================================================================

/// Scroll offsets plus the content extents they are measured against.
///
/// `vertical_max`/`horizontal_max` are the content length along each axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub vertical_offset: usize,
    pub horizontal_offset: usize,
    pub vertical_max: usize,
    pub horizontal_max: usize,
}

impl ScrollState {
    /// Record the current content extents.
    pub fn recompute(&mut self, content_cols: usize, content_rows: usize) {
        self.horizontal_max = content_cols;
        self.vertical_max = content_rows;
    }

    /// Scroll vertically by `delta`, clamped to `[0, vertical_max - viewport_rows]`.
    ///
    /// Scrolling down never moves the offset up, even when it already sits
    /// past the limit. Returns `true` if the offset changed.
    pub fn scroll_vertical(&mut self, delta: isize, viewport_rows: usize) -> bool {
        let limit = self.vertical_max.saturating_sub(viewport_rows);
        if delta > 0 && self.vertical_offset >= limit {
            return false;
        }
        let target = self.vertical_offset.saturating_add_signed(delta).min(limit);
        if target == self.vertical_offset {
            return false;
        }
        self.vertical_offset = target;
        true
    }
}

// =============================================================================
// THUMB GEOMETRY
// =============================================================================

/// Position and length of a scrollbar thumb along its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumb {
    pub offset: usize,
    pub size: usize,
}

/// Compute thumb geometry.
///
/// `size = max(1, track * viewport / content)` and
/// `offset = track * position / content`, both clamped to the track. Empty
/// content means nothing to scroll: the thumb fills the track.
pub fn thumb(track: usize, viewport: usize, content: usize, position: usize) -> Thumb {
    if track == 0 {
        return Thumb { offset: 0, size: 0 };
    }
    if content == 0 {
        return Thumb { offset: 0, size: track };
    }

    let size = (track * viewport / content).clamp(1, track);
    let offset = (track * position / content).min(track - size);
    Thumb { offset, size }
}

// =============================================================================
// SCROLLABLE CAPABILITY
// =============================================================================

/// A widget with scroll state and optional scrollbars.
pub trait Scrollable: Widget {
    fn scroll_state(&self) -> &ScrollState;

    /// Which scrollbars are enabled: (vertical, horizontal).
    fn scrollbars(&self) -> (bool, bool);

    /// Size of the content area as (cols, rows), scrollbars excluded.
    fn viewport(&self) -> (usize, usize) {
        let rect = self.rect();
        let (vertical, horizontal) = self.scrollbars();
        let cols = (rect.width as usize).saturating_sub(vertical as usize);
        let rows = (rect.height as usize).saturating_sub(horizontal as usize);
        (cols, rows)
    }

    fn vertical_thumb(&self) -> Thumb {
        let state = self.scroll_state();
        let (_, rows) = self.viewport();
        thumb(rows, rows, state.vertical_max, state.vertical_offset)
    }

    fn horizontal_thumb(&self) -> Thumb {
        let state = self.scroll_state();
        let (cols, _) = self.viewport();
        thumb(cols, cols, state.horizontal_max, state.horizontal_offset)
    }

    /// Paint the enabled scrollbars along the region's right and bottom edges.
    fn draw_scrollbars(&self) {
        let (vertical, horizontal) = self.scrollbars();
        let (cols, rows) = self.viewport();
        let region = self.base().region();

        if vertical && region.width() > 0 {
            let col = region.width() - 1;
            let t = self.vertical_thumb();
            for row in 0..rows {
                let ch = if (t.offset..t.offset + t.size).contains(&row) { THUMB } else { VERTICAL_TRACK };
                region.write_char(row as u16, col, ch, Attr::NONE);
            }
        }

        if horizontal && region.height() > 0 {
            let row = region.height() - 1;
            let t = self.horizontal_thumb();
            for col in 0..cols {
                let ch = if (t.offset..t.offset + t.size).contains(&col) { THUMB } else { HORIZONTAL_TRACK };
                region.write_char(row, col as u16, ch, Attr::NONE);
            }
        }

        if vertical && horizontal && region.width() > 0 && region.height() > 0 {
            region.write_char(region.height() - 1, region.width() - 1, CORNER, Attr::NONE);
        }
    }
}
