//! Render surface - the parent screen and the per-widget regions carved out of it.
//!
//! A [`Screen`] holds two frame buffers:
//!
//! - **pending** - where every draw lands
//! - **visible** - what has been published with [`Region::flush`]
//!
//! Widgets never touch the screen directly. Each owns exactly one [`Region`],
//! acquired with [`Screen::create_region`] and released when dropped. All
//! region writes use region-relative coordinates and are clipped to the
//! region's rect, so a widget cannot paint outside its own area.
//!
//! # Example
//!
//! ```
//! use spark_widgets::{Rect, Screen};
//!
//! let screen = Screen::new(20, 5);
//! let region = screen.create_region(Rect::new(2, 1, 6, 2));
//! region.write_text(0, 0, "hello world");
//! assert_eq!(screen.visible().row_text(1).trim(), "");
//! region.flush();
//! assert_eq!(screen.visible().row_text(1).trim_end(), "  hello");
//! ```

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::renderer::FrameBuffer;
use crate::types::{Attr, BorderStyle, ColorPair, Rect, Rgba};

// =============================================================================
// Screen
// =============================================================================

struct ScreenState {
    pending: FrameBuffer,
    visible: FrameBuffer,
    /// Color pairs registered by index (the widget paint-order tag).
    pairs: HashMap<u8, ColorPair>,
    /// Live regions by id.
    regions: HashMap<u32, Rect>,
    next_region: u32,
    cursor: (u16, u16),
    cursor_visible: bool,
    /// Set by a widget, cleared when the runtime presents.
    bell: bool,
}

/// The parent surface every widget region is carved out of.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Screen {
    state: Rc<RefCell<ScreenState>>,
}

impl Screen {
    /// Create a blank screen of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScreenState {
                pending: FrameBuffer::new(width, height),
                visible: FrameBuffer::new(width, height),
                pairs: HashMap::new(),
                regions: HashMap::new(),
                next_region: 0,
                cursor: (0, 0),
                cursor_visible: false,
                bell: false,
            })),
        }
    }

    /// Screen size as (width, height).
    pub fn size(&self) -> (u16, u16) {
        let state = self.state.borrow();
        (state.visible.width(), state.visible.height())
    }

    /// Allocate a region for `rect`.
    ///
    /// The rect is clipped to the screen; a rect entirely off-screen yields an
    /// empty region that swallows every write.
    pub fn create_region(&self, rect: Rect) -> Region {
        let mut state = self.state.borrow_mut();
        let clipped = rect
            .intersect(&state.pending.bounds())
            .unwrap_or(Rect::new(rect.x, rect.y, 0, 0));

        let id = state.next_region;
        state.next_region += 1;
        state.regions.insert(id, clipped);
        tracing::trace!(id, ?clipped, "region created");

        Region {
            id,
            rect: clipped,
            colors: ColorPair::default(),
            screen: self.clone(),
        }
    }

    /// Number of live regions.
    pub fn region_count(&self) -> usize {
        self.state.borrow().regions.len()
    }

    /// Color pair registered under `index`, if any.
    pub fn color_pair(&self, index: u8) -> Option<ColorPair> {
        self.state.borrow().pairs.get(&index).copied()
    }

    /// What has been flushed so far.
    pub fn visible(&self) -> Ref<'_, FrameBuffer> {
        Ref::map(self.state.borrow(), |s| &s.visible)
    }

    /// What has been drawn, flushed or not.
    pub fn pending(&self) -> Ref<'_, FrameBuffer> {
        Ref::map(self.state.borrow(), |s| &s.pending)
    }

    /// Hardware cursor position in screen coordinates, or None when hidden.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        let state = self.state.borrow();
        state.cursor_visible.then_some(state.cursor)
    }

    /// Show or hide the hardware cursor.
    pub fn set_cursor_visible(&self, visible: bool) {
        self.state.borrow_mut().cursor_visible = visible;
    }

    /// Ask for the terminal bell on the next present.
    pub fn ring_bell(&self) {
        self.state.borrow_mut().bell = true;
    }

    /// Was the bell requested since the last call?
    pub fn take_bell(&self) -> bool {
        std::mem::take(&mut self.state.borrow_mut().bell)
    }

    fn destroy_region(&self, id: u32) {
        self.state.borrow_mut().regions.remove(&id);
        tracing::trace!(id, "region destroyed");
    }
}

// =============================================================================
// Region
// =============================================================================

/// A rectangular area of the screen exclusively owned by one widget.
///
/// Coordinates passed to region methods are `(row, col)` relative to the
/// region's top-left corner.
pub struct Region {
    id: u32,
    rect: Rect,
    colors: ColorPair,
    screen: Screen,
}

impl Region {
    /// The region's rect in screen coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.rect.height
    }

    /// Current drawing colors.
    #[inline]
    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    /// Does the region enclose the screen coordinate (x, y)?
    #[inline]
    pub fn encloses(&self, x: u16, y: u16) -> bool {
        self.rect.contains(x, y)
    }

    /// Register `fg`/`bg` as color pair `index` and draw with it from now on.
    pub fn set_colors(&mut self, index: u8, fg: Rgba, bg: Rgba) {
        let pair = ColorPair::new(fg, bg);
        self.screen.state.borrow_mut().pairs.insert(index, pair);
        self.colors = pair;
    }

    /// Write text at (row, col) in the current colors.
    pub fn write_text(&self, row: u16, col: u16, text: &str) {
        self.write_text_attr(row, col, text, Attr::NONE);
    }

    /// Write text at (row, col) with attributes.
    pub fn write_text_attr(&self, row: u16, col: u16, text: &str, attrs: Attr) {
        if row >= self.rect.height || col >= self.rect.width {
            return;
        }
        let mut state = self.screen.state.borrow_mut();
        state.pending.draw_text(
            self.rect.x + col,
            self.rect.y + row,
            text,
            self.colors.fg,
            self.colors.bg,
            attrs,
            Some(&self.rect),
        );
    }

    /// Write a single character at (row, col).
    pub fn write_char(&self, row: u16, col: u16, ch: char, attrs: Attr) {
        if row >= self.rect.height || col >= self.rect.width {
            return;
        }
        let mut state = self.screen.state.borrow_mut();
        state.pending.draw_char(
            self.rect.x + col,
            self.rect.y + row,
            ch,
            self.colors.fg,
            self.colors.bg,
            attrs,
            Some(&self.rect),
        );
    }

    /// Add attributes to the cell at (row, col) without changing its character.
    pub fn add_attrs(&self, row: u16, col: u16, attrs: Attr) {
        if row >= self.rect.height || col >= self.rect.width {
            return;
        }
        let mut state = self.screen.state.borrow_mut();
        if let Some(cell) = state.pending.get_mut(self.rect.x + col, self.rect.y + row) {
            cell.attrs |= attrs;
        }
    }

    /// Blank the whole region in the current colors.
    pub fn clear(&self) {
        let mut state = self.screen.state.borrow_mut();
        state
            .pending
            .fill_rect(self.rect, self.colors.fg, self.colors.bg, Some(&self.rect));
    }

    /// Draw a border along the region's edge.
    pub fn draw_box(&self, style: BorderStyle) {
        let mut state = self.screen.state.borrow_mut();
        state
            .pending
            .draw_border(self.rect, style, self.colors.fg, self.colors.bg, Some(&self.rect));
    }

    /// Show or hide the hardware cursor.
    pub fn set_cursor_visible(&self, visible: bool) {
        self.screen.set_cursor_visible(visible);
    }

    /// Move the hardware cursor to (row, col) inside this region.
    ///
    /// Positions outside the region are ignored.
    pub fn move_cursor(&self, row: u16, col: u16) {
        if row >= self.rect.height || col >= self.rect.width {
            return;
        }
        self.screen.state.borrow_mut().cursor = (self.rect.x + col, self.rect.y + row);
    }

    pub fn ring_bell(&self) {
        self.screen.ring_bell();
    }

    /// Publish this region's pending cells to the visible buffer.
    pub fn flush(&self) {
        let mut state = self.screen.state.borrow_mut();
        let ScreenState { pending, visible, .. } = &mut *state;
        visible.copy_rect_from(pending, self.rect);
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        self.screen.destroy_region(self.id);
    }
}

// =============================================================================
// Tests
// =============================================================================
