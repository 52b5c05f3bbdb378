//! # spark-widgets
//!
//! Focus-driven terminal widget runtime for Rust.
//!
//! ## Architecture
//!
//! Widgets each own one region of a shared [`Screen`]. A [`DispatchEngine`]
//! owns the widgets, tracks which one has focus and routes every input event:
//! keys to the focused widget, pointer events to the widget under the
//! pointer. The [`Runtime`] loop polls an [`EventSource`] once per tick and
//! hands finished frames to a [`Backend`].
//!
//! ```text
//! EventSource → Runtime → DispatchEngine → Widget::handle_input → Region
//!                  │                                                │
//!                  └──────── Backend::present ← Screen (visible) ←──┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Attr, Cell, Rect)
//! - [`renderer`] - Frame buffer and ANSI diff rendering
//! - [`surface`] - Screen and per-widget regions
//! - [`widget`] - The widget contract
//! - [`scroll`] - Scroll state and scrollbar geometry
//! - [`widgets`] - Label, Button, CheckboxList, SelectionList, TextEditor
//! - [`dispatch`] - Focus and event routing
//! - [`input`] - Input events and sources
//! - [`runtime`] - The event loop
//!
//! ## Example
//!
//! ```
//! use spark_widgets::widgets::TextEditor;
//! use spark_widgets::{DispatchEngine, InputEvent, Key, PointerEvent, Rect, Screen};
//!
//! let screen = Screen::new(40, 10);
//! let mut engine = DispatchEngine::new();
//! engine.add(TextEditor::new(&screen, Rect::new(0, 0, 20, 5), ""));
//!
//! engine.handle_event(&InputEvent::from(PointerEvent::press(1, 1)));
//! for c in "hello".chars() {
//!     engine.handle_event(&InputEvent::from(Key::Char(c)));
//! }
//! assert!(screen.visible().row_text(0).starts_with("hello"));
//! ```

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod renderer;
pub mod runtime;
pub mod scroll;
pub mod surface;
pub mod types;
pub mod widget;
pub mod widgets;

// Re-export commonly used items
pub use types::*;

pub use backend::{Backend, HeadlessBackend, TerminalBackend};
pub use config::{ColorConfig, RuntimeConfig};
pub use dispatch::{DispatchEngine, WidgetId};
pub use error::{Error, Result};
pub use input::{
    CrosstermSource, EventSource, InputEvent, Key, PointerEvent, PointerPhase, ScriptedSource,
};
pub use renderer::{DiffRenderer, FrameBuffer};
pub use runtime::{Runtime, ShutdownSignal, Tick};
pub use scroll::{ScrollState, Scrollable, Thumb};
pub use surface::{Region, Screen};
pub use widget::{Widget, WidgetBase, WidgetKind};
