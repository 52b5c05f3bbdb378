//! Input events and event sources.
//!
//! The runtime consumes a stream of already-decoded events. Each tick it polls
//! an [`EventSource`] once and gets either one [`InputEvent`] or nothing.
//!
//! ```text
//! crossterm / script → EventSource::poll → InputEvent
//!                                              │
//!                                   ┌──────────┴──────────┐
//!                                  Key                 Pointer
//!                             (focused widget)      (hit-tested widget)
//! ```

mod terminal;

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

pub use terminal::{convert_event, CrosstermSource};

// =============================================================================
// Types
// =============================================================================

/// Key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    /// A character typed with Ctrl held.
    Ctrl(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Ctrl(c) => write!(f, "ctrl+{c}"),
            Key::Enter => f.write_str("enter"),
            Key::Tab => f.write_str("tab"),
            Key::Backspace => f.write_str("backspace"),
            Key::Delete => f.write_str("delete"),
            Key::Escape => f.write_str("esc"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::PageUp => f.write_str("pageup"),
            Key::PageDown => f.write_str("pagedown"),
            Key::F(n) => write!(f, "f{n}"),
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse key names as written in config files: `ctrl+q`, `esc`, `f10`, `x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidKey(s.to_string());
        let lower = s.trim().to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("ctrl+") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Key::Ctrl(c)),
                _ => Err(invalid()),
            };
        }

        let key = match lower.as_str() {
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "esc" | "escape" => Key::Escape,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            other => {
                if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    Key::F(n)
                } else {
                    // Single characters keep their original case.
                    let mut chars = s.trim().chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Key::Char(c),
                        _ => return Err(invalid()),
                    }
                }
            }
        };
        Ok(key)
    }
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Release,
    WheelUp,
    WheelDown,
}

impl PointerPhase {
    #[inline]
    pub fn is_wheel(&self) -> bool {
        matches!(self, PointerPhase::WheelUp | PointerPhase::WheelDown)
    }
}

/// A pointer event in screen coordinates (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: u16,
    pub y: u16,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub const fn new(x: u16, y: u16, phase: PointerPhase) -> Self {
        Self { x, y, phase }
    }

    pub const fn press(x: u16, y: u16) -> Self {
        Self::new(x, y, PointerPhase::Press)
    }

    pub const fn release(x: u16, y: u16) -> Self {
        Self::new(x, y, PointerPhase::Release)
    }
}

/// One decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Pointer(PointerEvent),
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        InputEvent::Key(key)
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(pointer: PointerEvent) -> Self {
        InputEvent::Pointer(pointer)
    }
}

// =============================================================================
// Event Sources
// =============================================================================

/// Something the runtime can poll for input.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    ///
    /// Returns None when nothing arrived or the event could not be decoded;
    /// both are an empty tick for the runtime.
    fn poll(&mut self, timeout: Duration) -> Option<InputEvent>;

    /// True once the source can never produce another event.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Replays a fixed queue of events. Used by tests and scripted demos.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    events: VecDeque<Option<InputEvent>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event.
    pub fn push(&mut self, event: impl Into<InputEvent>) -> &mut Self {
        self.events.push_back(Some(event.into()));
        self
    }

    /// Queue an empty tick.
    pub fn push_idle(&mut self) -> &mut Self {
        self.events.push_back(None);
        self
    }

    /// Events (and idle ticks) not yet delivered.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<InputEvent> for ScriptedSource {
    fn from_iter<T: IntoIterator<Item = InputEvent>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().map(Some).collect(),
        }
    }
}

impl EventSource for ScriptedSource {
    fn poll(&mut self, _timeout: Duration) -> Option<InputEvent> {
        self.events.pop_front().flatten()
    }

    fn is_finished(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!("ctrl+q".parse::<Key>().unwrap(), Key::Ctrl('q'));
        assert_eq!("Ctrl+Q".parse::<Key>().unwrap(), Key::Ctrl('q'));
        assert_eq!("esc".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("F10".parse::<Key>().unwrap(), Key::F(10));
        assert_eq!("Q".parse::<Key>().unwrap(), Key::Char('Q'));
        assert_eq!("f".parse::<Key>().unwrap(), Key::Char('f'));
    }

    #[test]
    fn test_parse_invalid_key() {
        assert!(matches!("ctrl+".parse::<Key>(), Err(Error::InvalidKey(_))));
        assert!(matches!("hyper+x".parse::<Key>(), Err(Error::InvalidKey(_))));
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_display_parses_back() {
        for key in [Key::Ctrl('x'), Key::Escape, Key::F(2), Key::PageDown, Key::Char('z')] {
            assert_eq!(key.to_string().parse::<Key>().unwrap(), key);
        }
    }

    #[test]
    fn test_scripted_source_replays_in_order() {
        let mut source = ScriptedSource::new();
        source.push(Key::Char('a')).push_idle().push(PointerEvent::press(1, 2));
        assert_eq!(source.remaining(), 3);

        let t = Duration::ZERO;
        assert_eq!(source.poll(t), Some(InputEvent::Key(Key::Char('a'))));
        assert_eq!(source.poll(t), None);
        assert_eq!(
            source.poll(t),
            Some(InputEvent::Pointer(PointerEvent::new(1, 2, PointerPhase::Press)))
        );
        assert!(source.is_empty());
        assert_eq!(source.poll(t), None);
    }
}
