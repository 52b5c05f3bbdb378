//! crossterm-backed event source.
//!
//! Bridges crossterm's event system with our [`InputEvent`]. Anything we have
//! no use for (resize, focus reports, paste, mouse motion, key releases) is
//! dropped, and read errors are logged and reported as an empty tick.

use std::time::Duration;

use crossterm::event::{
    self as ct, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use super::{EventSource, InputEvent, Key, PointerEvent, PointerPhase};

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert a crossterm event, or None if it has no meaning for widgets.
pub fn convert_event(event: CrosstermEvent) -> Option<InputEvent> {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key).map(InputEvent::Key),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse).map(InputEvent::Pointer),
        _ => None,
    }
}

fn convert_key_event(event: CrosstermKeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        KeyCode::Char(_) if event.modifiers.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<PointerEvent> {
    let phase = match event.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerPhase::Press,
        MouseEventKind::Up(MouseButton::Left) => PointerPhase::Release,
        MouseEventKind::ScrollUp => PointerPhase::WheelUp,
        MouseEventKind::ScrollDown => PointerPhase::WheelDown,
        _ => return None,
    };
    Some(PointerEvent::new(event.column, event.row, phase))
}

// =============================================================================
// SOURCE
// =============================================================================

/// Reads events from the controlling terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermSource {
    decode_failures: u64,
}

impl CrosstermSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many reads failed so far.
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures
    }
}

impl EventSource for CrosstermSource {
    fn poll(&mut self, timeout: Duration) -> Option<InputEvent> {
        let ready = match ct::poll(timeout) {
            Ok(ready) => ready,
            Err(err) => {
                self.decode_failures += 1;
                tracing::warn!(%err, "input poll failed");
                return None;
            }
        };
        if !ready {
            return None;
        }

        match ct::read() {
            Ok(event) => {
                let converted = convert_event(event);
                tracing::trace!(?converted, "input event");
                converted
            }
            Err(err) => {
                self.decode_failures += 1;
                tracing::warn!(%err, "input read failed");
                None
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
        CrosstermEvent::Key(CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermEvent {
        CrosstermEvent::Mouse(CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_convert_plain_and_ctrl_chars() {
        assert_eq!(
            convert_event(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(InputEvent::Key(Key::Char('a')))
        );
        assert_eq!(
            convert_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(InputEvent::Key(Key::Char('A')))
        );
        assert_eq!(
            convert_event(key(KeyCode::Char('Q'), KeyModifiers::CONTROL)),
            Some(InputEvent::Key(Key::Ctrl('q')))
        );
        assert_eq!(convert_event(key(KeyCode::Char('x'), KeyModifiers::ALT)), None);
    }

    #[test]
    fn test_convert_named_keys() {
        assert_eq!(
            convert_event(key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(InputEvent::Key(Key::Backspace))
        );
        assert_eq!(
            convert_event(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(InputEvent::Key(Key::Escape))
        );
        assert_eq!(convert_event(key(KeyCode::CapsLock, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_key_release_dropped() {
        let event = CrosstermEvent::Key(CrosstermKeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(convert_event(event), None);
    }

    #[test]
    fn test_convert_mouse_phases() {
        assert_eq!(
            convert_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(InputEvent::Pointer(PointerEvent::press(3, 4)))
        );
        assert_eq!(
            convert_event(mouse(MouseEventKind::Up(MouseButton::Left), 3, 4)),
            Some(InputEvent::Pointer(PointerEvent::release(3, 4)))
        );
        assert_eq!(
            convert_event(mouse(MouseEventKind::ScrollDown, 0, 0)),
            Some(InputEvent::Pointer(PointerEvent::new(0, 0, PointerPhase::WheelDown)))
        );
        assert_eq!(convert_event(mouse(MouseEventKind::Moved, 1, 1)), None);
        assert_eq!(convert_event(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1)), None);
    }

    #[test]
    fn test_resize_is_not_an_input_event() {
        assert_eq!(convert_event(CrosstermEvent::Resize(80, 24)), None);
    }
}
