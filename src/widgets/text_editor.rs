//! Multi-line text editor widget.
//!
//! A line buffer with a cursor and a scrolling viewport.
//!
//! # Invariants
//!
//! - `lines` is never empty
//! - `cursor.row < lines.len()` and `cursor.col <= len(lines[cursor.row])`
//! - After any edit or cursor move the cursor lies inside the viewport; the
//!   viewport follows the cursor, the cursor is never clamped to the viewport
//!
//! Wheel scrolling moves the viewport on its own and may leave the cursor
//! off-screen until the next edit or cursor move brings it back.
//!
//! Columns are character indices; every character occupies one cell.

use crate::input::{InputEvent, Key, PointerPhase};
use crate::scroll::{ScrollState, Scrollable, WHEEL_SCROLL};
use crate::surface::Screen;
use crate::types::{Attr, Rect};
use crate::widget::{Widget, WidgetBase, WidgetKind};

// =============================================================================
// CURSOR
// =============================================================================

/// Cursor position in the line buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPos {
    pub row: usize,
    pub col: usize,
}

impl CursorPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

// =============================================================================
// TEXT HELPERS
// =============================================================================

#[inline]
fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Byte offset of character `col`, or the end of the line.
#[inline]
fn byte_at(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map(|(i, _)| i).unwrap_or(line.len())
}

/// Hard-wrap `text` into lines of at most `width` characters.
///
/// Newlines always break. A width of 0 only breaks on newlines. A trailing
/// empty line is not produced.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if ch == '\n' {
            lines.push(std::mem::take(&mut current));
            count = 0;
            continue;
        }
        current.push(ch);
        count += 1;
        if width > 0 && count >= width {
            lines.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// TEXT EDITOR
// =============================================================================

/// Multi-line text editor with optional scrollbars.
pub struct TextEditor {
    base: WidgetBase,
    lines: Vec<String>,
    cursor: CursorPos,
    /// vertical/horizontal offsets are the viewport origin into `lines`.
    scroll: ScrollState,
    vertical_scrollbar: bool,
    horizontal_scrollbar: bool,
    password: bool,
    multiline: bool,
}

impl TextEditor {
    /// Create an editor over `rect` holding `text` (split on newlines).
    pub fn new(screen: &Screen, rect: Rect, text: &str) -> Self {
        let mut editor = Self {
            base: WidgetBase::new(screen, rect),
            lines: vec![String::new()],
            cursor: CursorPos::default(),
            scroll: ScrollState::default(),
            vertical_scrollbar: false,
            horizontal_scrollbar: false,
            password: false,
            multiline: true,
        };
        editor.replace_lines(text.split('\n').map(str::to_string).collect());
        editor.draw();
        editor
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The buffer joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn cursor(&self) -> CursorPos {
        self.cursor
    }

    /// Viewport origin as (offset_x, offset_y).
    pub fn viewport_origin(&self) -> (usize, usize) {
        (self.scroll.horizontal_offset, self.scroll.vertical_offset)
    }

    /// Replace the buffer. The cursor is clamped into the new content.
    pub fn set_text<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replace_lines(lines.into_iter().map(Into::into).collect());
        self.draw();
    }

    /// Replace the buffer from newline-separated text.
    pub fn set_content(&mut self, text: &str) {
        self.set_text(text.split('\n'));
    }

    /// Render every character as `*`.
    pub fn set_password_mode(&mut self, enabled: bool) {
        self.password = enabled;
        self.draw();
    }

    /// In single-line mode Enter does nothing.
    pub fn set_multiline(&mut self, enabled: bool) {
        self.multiline = enabled;
    }

    /// Enable or disable the vertical and horizontal scrollbars.
    pub fn set_scrollbars(&mut self, vertical: bool, horizontal: bool) {
        self.vertical_scrollbar = vertical;
        self.horizontal_scrollbar = horizontal;
        self.ensure_cursor_visible();
        self.draw();
    }

    fn replace_lines(&mut self, mut lines: Vec<String>) {
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.lines = lines;
        self.cursor.row = self.cursor.row.min(self.lines.len() - 1);
        self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.row));
        self.ensure_cursor_visible();
    }

    #[inline]
    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| char_len(l))
    }

    #[inline]
    fn last_row(&self) -> usize {
        self.lines.len() - 1
    }

    fn longest_line(&self) -> usize {
        self.lines.iter().map(|l| char_len(l)).max().unwrap_or(0)
    }

    /// Does the cursor satisfy the buffer invariant?
    pub fn cursor_in_bounds(&self) -> bool {
        self.cursor.row < self.lines.len() && self.cursor.col <= self.line_len(self.cursor.row)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.line_len(self.cursor.row);
        }
        self.after_edit();
    }

    pub fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.row) {
            self.cursor.col += 1;
        } else if self.cursor.row < self.last_row() {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
        self.after_edit();
    }

    pub fn move_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.row));
        }
        self.after_edit();
    }

    pub fn move_down(&mut self) {
        if self.cursor.row < self.last_row() {
            self.cursor.row += 1;
            self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.row));
        }
        self.after_edit();
    }

    pub fn move_home(&mut self) {
        self.cursor.col = 0;
        self.after_edit();
    }

    pub fn move_end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.row);
        self.after_edit();
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Insert `ch` at the cursor and advance past it.
    pub fn insert_char(&mut self, ch: char) {
        let CursorPos { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_at(line, col);
        line.insert(at, ch);
        self.cursor.col += 1;
        self.after_edit();
    }

    /// Delete before the cursor, merging into the previous line at column 0.
    pub fn backspace(&mut self) {
        let CursorPos { row, col } = self.cursor;
        if col > 0 {
            let line = &mut self.lines[row];
            let at = byte_at(line, col - 1);
            line.remove(at);
            self.cursor.col -= 1;
        } else if row > 0 {
            let current = self.lines.remove(row);
            let previous = &mut self.lines[row - 1];
            self.cursor.col = char_len(previous);
            previous.push_str(&current);
            self.cursor.row -= 1;
            self.base.region().ring_bell();
        }
        self.after_edit();
    }

    /// Delete at the cursor, pulling the next line up at end of line.
    pub fn delete(&mut self) {
        let CursorPos { row, col } = self.cursor;
        if col < self.line_len(row) {
            let line = &mut self.lines[row];
            let at = byte_at(line, col);
            line.remove(at);
        } else if row < self.last_row() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        }
        self.after_edit();
    }

    /// Split the current line at the cursor.
    pub fn newline(&mut self) {
        if !self.multiline {
            return;
        }
        let CursorPos { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_at(line, col);
        let tail = line.split_off(at);
        self.lines.insert(row + 1, tail);

        self.cursor = CursorPos::new(row + 1, 0);
        self.scroll.horizontal_offset = 0;
        self.after_edit();
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// Scroll the viewport by whole lines without moving the cursor.
    ///
    /// Returns `true` if the viewport moved.
    pub fn scroll_lines(&mut self, delta: isize) -> bool {
        self.refresh_extents();
        let (_, rows) = self.viewport();
        self.scroll.scroll_vertical(delta, rows)
    }

    fn refresh_extents(&mut self) {
        let cols = self.longest_line();
        let rows = self.lines.len();
        self.scroll.recompute(cols, rows);
    }

    /// Move the viewport the minimum needed to show the cursor.
    fn ensure_cursor_visible(&mut self) {
        let (cols, rows) = self.viewport();
        let (cols, rows) = (cols.max(1), rows.max(1));
        let CursorPos { row, col } = self.cursor;

        let oy = &mut self.scroll.vertical_offset;
        if row < *oy {
            *oy = row;
        } else if row >= *oy + rows {
            *oy = row + 1 - rows;
        }
        // No blank rows past the end once the buffer shrinks. The cursor row
        // is below `lines.len()`, so it stays in view.
        *oy = (*oy).min(self.lines.len().saturating_sub(rows));

        let ox = &mut self.scroll.horizontal_offset;
        if col < *ox {
            *ox = col;
        } else if col >= *ox + cols {
            *ox = col + 1 - cols;
        }
    }

    fn after_edit(&mut self) {
        debug_assert!(self.cursor_in_bounds(), "cursor {:?} escaped the buffer", self.cursor);
        self.ensure_cursor_visible();
    }

    /// Cursor position relative to the viewport, if it is on screen.
    fn cursor_on_screen(&self) -> Option<(u16, u16)> {
        let (cols, rows) = self.viewport();
        let (ox, oy) = self.viewport_origin();
        let CursorPos { row, col } = self.cursor;
        if row >= oy && row < oy + rows && col >= ox && col < ox + cols {
            Some(((row - oy) as u16, (col - ox) as u16))
        } else {
            None
        }
    }
}

impl Widget for TextEditor {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::TextEditor
    }

    fn draw(&mut self) {
        self.refresh_extents();

        let (cols, rows) = self.viewport();
        let (ox, oy) = self.viewport_origin();
        let region = self.base.region();
        region.clear();

        for i in 0..rows {
            let mut visible: String = match self.lines.get(oy + i) {
                Some(line) if self.password => line.chars().skip(ox).take(cols).map(|_| '*').collect(),
                Some(line) => line.chars().skip(ox).take(cols).collect(),
                None => String::new(),
            };
            // Pad so a shorter line erases whatever was painted here before.
            let used = char_len(&visible);
            visible.extend(std::iter::repeat_n(' ', cols - used));
            region.write_text(i as u16, 0, &visible);
        }

        self.draw_scrollbars();

        if self.base.is_focused() {
            let region = self.base.region();
            match self.cursor_on_screen() {
                Some((row, col)) => {
                    region.add_attrs(row, col, Attr::INVERSE);
                    region.move_cursor(row, col);
                    region.set_cursor_visible(true);
                }
                None => region.set_cursor_visible(false),
            }
        }
    }

    fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key(key) => match key {
                Key::Left => self.move_left(),
                Key::Right => self.move_right(),
                Key::Up => self.move_up(),
                Key::Down => self.move_down(),
                Key::Home => self.move_home(),
                Key::End => self.move_end(),
                Key::Backspace => self.backspace(),
                Key::Delete => self.delete(),
                Key::Enter => self.newline(),
                Key::Char(c) if !c.is_control() => self.insert_char(*c),
                _ => return,
            },
            InputEvent::Pointer(pointer) => {
                let step = WHEEL_SCROLL as isize;
                let moved = match pointer.phase {
                    PointerPhase::WheelUp => self.scroll_lines(-step),
                    PointerPhase::WheelDown => self.scroll_lines(step),
                    _ => false,
                };
                if !moved {
                    return;
                }
            }
        }
        self.draw();
    }

    fn on_focus(&mut self) {
        self.base.set_focused(true);
        self.draw();
    }

    fn on_focus_lost(&mut self) {
        self.base.set_focused(false);
        self.base.region().set_cursor_visible(false);
        self.draw();
    }
}

impl Scrollable for TextEditor {
    fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    fn scrollbars(&self) -> (bool, bool) {
        (self.vertical_scrollbar, self.horizontal_scrollbar)
    }
}

// =============================================================================
// TESTS
// =============================================================================
