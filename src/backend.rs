//! Presentation backends.
//!
//! A [`Backend`] puts the screen's visible buffer in front of the user.
//!
//! - [`TerminalBackend`] - the real terminal, through crossterm and the
//!   differential renderer
//! - [`HeadlessBackend`] - keeps the last frame in memory, for tests

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::renderer::{DiffRenderer, FrameBuffer};

pub trait Backend {
    /// Show `frame`, with the hardware cursor at `cursor` or hidden.
    fn present(&mut self, frame: &FrameBuffer, cursor: Option<(u16, u16)>) -> Result<()>;

    /// Ring the terminal bell.
    fn bell(&mut self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// HEADLESS
// =============================================================================

/// Records presented frames instead of drawing them.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    frames: usize,
    last: Option<FrameBuffer>,
    cursor: Option<(u16, u16)>,
    bells: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameBuffer> {
        self.last.as_ref()
    }

    /// Cursor of the last frame.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn bells(&self) -> usize {
        self.bells
    }
}

impl Backend for HeadlessBackend {
    fn present(&mut self, frame: &FrameBuffer, cursor: Option<(u16, u16)>) -> Result<()> {
        self.frames += 1;
        self.last = Some(frame.clone());
        self.cursor = cursor;
        Ok(())
    }

    fn bell(&mut self) -> Result<()> {
        self.bells += 1;
        Ok(())
    }
}

// =============================================================================
// TERMINAL
// =============================================================================

/// Fullscreen terminal session.
///
/// Entering switches to raw mode and the alternate screen; dropping restores
/// the terminal even if the run loop bailed out with an error.
pub struct TerminalBackend {
    out: Stdout,
    renderer: DiffRenderer,
    is_raw: bool,
    is_fullscreen: bool,
    mouse_enabled: bool,
}

impl TerminalBackend {
    /// Take over the terminal.
    pub fn enter(config: &RuntimeConfig) -> Result<Self> {
        let mut backend = Self {
            out: io::stdout(),
            renderer: DiffRenderer::new(),
            is_raw: false,
            is_fullscreen: false,
            mouse_enabled: false,
        };

        enable_raw_mode()?;
        backend.is_raw = true;

        execute!(backend.out, EnterAlternateScreen, Hide)?;
        backend.is_fullscreen = true;

        if config.mouse_capture {
            execute!(backend.out, EnableMouseCapture)?;
            backend.mouse_enabled = true;
        }

        if let Some(title) = &config.title {
            backend.set_title(title)?;
        }

        tracing::debug!(mouse = backend.mouse_enabled, "terminal session started");
        Ok(backend)
    }

    /// Terminal size as (columns, rows).
    pub fn size() -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }

    /// Force the next frame to repaint every cell.
    pub fn invalidate(&mut self) {
        self.renderer.invalidate();
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if self.mouse_enabled {
            execute!(self.out, DisableMouseCapture)?;
            self.mouse_enabled = false;
        }
        if self.is_fullscreen {
            execute!(self.out, Show, LeaveAlternateScreen)?;
            self.is_fullscreen = false;
        }
        if self.is_raw {
            disable_raw_mode()?;
            self.is_raw = false;
        }
        tracing::debug!("terminal session restored");
        Ok(())
    }
}

impl Backend for TerminalBackend {
    fn present(&mut self, frame: &FrameBuffer, cursor: Option<(u16, u16)>) -> Result<()> {
        let changed = self.renderer.render(&mut self.out, frame, cursor)?;
        self.out.flush()?;
        tracing::trace!(changed, "frame presented");
        Ok(())
    }

    fn bell(&mut self) -> Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn test_headless_keeps_last_frame() {
        let mut backend = HeadlessBackend::new();
        let mut frame = FrameBuffer::new(4, 1);
        backend.present(&frame, None).unwrap();

        frame.draw_text(0, 0, "ok", Rgba::WHITE, Rgba::BLACK, Default::default(), None);
        backend.present(&frame, Some((2, 0))).unwrap();

        assert_eq!(backend.frames(), 2);
        assert_eq!(backend.last_frame().map(|f| f.row_text(0)), Some("ok  ".to_string()));
        assert_eq!(backend.cursor(), Some((2, 0)));
    }
}
