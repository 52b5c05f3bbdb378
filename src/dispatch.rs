//! Dispatch Engine - focus tracking, hit-testing and event routing.
//!
//! The engine owns every widget and remembers which one (if any) has focus,
//! by index into its collection. One call to [`DispatchEngine::handle_event`]
//! processes one input event:
//!
//! - **Key** - forwarded to the focused widget, which is then refreshed.
//!   Dropped when nothing has focus.
//! - **Pointer press** - hit-tested in insertion order, first match wins.
//!   A hit moves focus to that widget (`on_focus_lost` on the old one,
//!   `on_focus` on the new one, nothing if it already had focus) and forwards
//!   the event if the widget is click-aware. A miss clears focus and redraws
//!   every widget.
//! - **Pointer release / wheel** - hit-tested the same way and forwarded to
//!   widgets that accept that phase. Focus never changes.
//!
//! Every event ends with a refresh pass over all widgets in insertion order.

use std::fmt;

use crate::input::{InputEvent, PointerEvent, PointerPhase};
use crate::types::ColorPair;
use crate::widget::Widget;

// =============================================================================
// IDS
// =============================================================================

/// Handle to a widget owned by a [`DispatchEngine`]: its insertion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(usize);

impl WidgetId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// ENGINE
// =============================================================================

#[derive(Default)]
pub struct DispatchEngine {
    widgets: Vec<Box<dyn Widget>>,
    focused: Option<usize>,
    default_colors: ColorPair,
}

impl DispatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that paints every added widget in `colors`.
    pub fn with_colors(colors: ColorPair) -> Self {
        Self {
            default_colors: colors,
            ..Self::default()
        }
    }

    /// Take ownership of `widget`.
    ///
    /// The widget's paint order becomes its position plus one and the
    /// default colors are registered under that order.
    pub fn add<W: Widget + 'static>(&mut self, widget: W) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        let mut widget: Box<dyn Widget> = Box::new(widget);

        let order = u8::try_from(id.0 + 1).unwrap_or(u8::MAX);
        widget.base_mut().set_order(order);
        widget.set_colors(self.default_colors.fg, self.default_colors.bg);

        tracing::debug!(%id, kind = ?widget.kind(), rect = ?widget.rect(), "widget added");
        self.widgets.push(widget);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused.map(WidgetId)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets.get(id.0).map(|w| w.as_ref())
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(id.0).map(|w| w.as_mut())
    }

    /// First widget, in insertion order, whose region encloses (x, y).
    pub fn hit_test(&self, x: u16, y: u16) -> Option<WidgetId> {
        self.widgets.iter().position(|w| w.encloses(x, y)).map(WidgetId)
    }

    // =========================================================================
    // Event handling
    // =========================================================================

    /// Route one event, then refresh every widget.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key(key) => match self.focused {
                Some(index) => {
                    let widget = &mut self.widgets[index];
                    widget.handle_input(event);
                    widget.refresh();
                }
                None => tracing::trace!(%key, "key dropped, nothing focused"),
            },
            InputEvent::Pointer(pointer) => match pointer.phase {
                PointerPhase::Press => self.handle_press(pointer, event),
                _ => self.forward_pointer(pointer, event),
            },
        }
        self.refresh_all();
    }

    fn handle_press(&mut self, pointer: &PointerEvent, event: &InputEvent) {
        match self.hit_test(pointer.x, pointer.y) {
            Some(id) => {
                self.widgets[id.0].base().region().ring_bell();
                self.set_focus(Some(id.0));
                self.forward_pointer_to(id.0, pointer.phase, event);
            }
            None => {
                tracing::debug!(x = pointer.x, y = pointer.y, "press missed every widget");
                self.set_focus(None);
                self.draw_all();
            }
        }
    }

    fn forward_pointer(&mut self, pointer: &PointerEvent, event: &InputEvent) {
        if let Some(id) = self.hit_test(pointer.x, pointer.y) {
            self.forward_pointer_to(id.0, pointer.phase, event);
        }
    }

    fn forward_pointer_to(&mut self, index: usize, phase: PointerPhase, event: &InputEvent) {
        let widget = &mut self.widgets[index];
        if widget.kind().accepts_pointer(phase) {
            tracing::trace!(index, ?phase, "pointer forwarded");
            widget.handle_input(event);
        }
    }

    /// Move focus, calling each transition hook once.
    fn set_focus(&mut self, target: Option<usize>) {
        if self.focused == target {
            return;
        }
        let previous = std::mem::replace(&mut self.focused, target);
        tracing::debug!(?previous, ?target, "focus changed");

        if let Some(old) = previous {
            self.widgets[old].on_focus_lost();
        }
        if let Some(new) = target {
            self.widgets[new].on_focus();
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Repaint every widget.
    pub fn draw_all(&mut self) {
        for widget in &mut self.widgets {
            widget.draw();
        }
    }

    /// Publish every widget's region, in insertion order.
    pub fn refresh_all(&self) {
        for widget in &self.widgets {
            widget.refresh();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::surface::Screen;
    use crate::types::{Rect, Rgba};
    use crate::widget::{WidgetBase, WidgetKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every contract call as "<name>:<call>".
    struct Recorder {
        base: WidgetBase,
        name: &'static str,
        kind: WidgetKind,
        log: Log,
    }

    impl Recorder {
        fn new(screen: &Screen, rect: Rect, name: &'static str, kind: WidgetKind, log: &Log) -> Self {
            Self {
                base: WidgetBase::new(screen, rect),
                name,
                kind,
                log: Rc::clone(log),
            }
        }

        fn record(&self, call: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, call));
        }
    }

    impl Widget for Recorder {
        fn base(&self) -> &WidgetBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }

        fn kind(&self) -> WidgetKind {
            self.kind
        }

        fn draw(&mut self) {
            self.record("draw");
        }

        fn handle_input(&mut self, event: &InputEvent) {
            let call = match event {
                InputEvent::Key(key) => format!("key {key}"),
                InputEvent::Pointer(p) => format!("pointer {:?}", p.phase),
            };
            self.record(&call);
        }

        fn on_focus(&mut self) {
            self.base.set_focused(true);
            self.record("focus");
        }

        fn on_focus_lost(&mut self) {
            self.base.set_focused(false);
            self.record("focus_lost");
        }

        fn refresh(&self) {
            self.record("refresh");
        }
    }

    struct Fixture {
        engine: DispatchEngine,
        log: Log,
        _screen: Screen,
    }

    impl Fixture {
        /// Two overlapping widgets: "a" at (0,0,10,5) then "b" at (5,0,10,5).
        fn new(kind_a: WidgetKind, kind_b: WidgetKind) -> Self {
            let screen = Screen::new(40, 20);
            let log: Log = Rc::default();
            let mut engine = DispatchEngine::new();
            engine.add(Recorder::new(&screen, Rect::new(0, 0, 10, 5), "a", kind_a, &log));
            engine.add(Recorder::new(&screen, Rect::new(5, 0, 10, 5), "b", kind_b, &log));
            log.borrow_mut().clear();
            Self { engine, log, _screen: screen }
        }

        fn send(&mut self, event: impl Into<InputEvent>) -> Vec<String> {
            self.log.borrow_mut().clear();
            self.engine.handle_event(&event.into());
            self.log.borrow().clone()
        }
    }

    #[test]
    fn test_add_assigns_paint_order_and_colors() {
        let screen = Screen::new(20, 5);
        let log: Log = Rc::default();
        let mut engine = DispatchEngine::with_colors(ColorPair::new(Rgba::BLACK, Rgba::WHITE));
        let a = engine.add(Recorder::new(&screen, Rect::new(0, 0, 2, 2), "a", WidgetKind::Label, &log));
        let b = engine.add(Recorder::new(&screen, Rect::new(2, 0, 2, 2), "b", WidgetKind::Label, &log));

        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(engine.widget(a).map(|w| w.base().order()), Some(1));
        assert_eq!(engine.widget(b).map(|w| w.base().order()), Some(2));
        assert_eq!(screen.color_pair(2), Some(ColorPair::new(Rgba::BLACK, Rgba::WHITE)));
        // set_colors repaints
        assert_eq!(*log.borrow(), ["a:draw", "b:draw"]);
    }

    #[test]
    fn test_overlap_resolves_to_first_inserted() {
        let fx = Fixture::new(WidgetKind::Label, WidgetKind::Label);
        assert_eq!(fx.engine.hit_test(7, 2).map(WidgetId::index), Some(0));
        assert_eq!(fx.engine.hit_test(12, 2).map(WidgetId::index), Some(1));
        assert_eq!(fx.engine.hit_test(30, 2), None);
    }

    #[test]
    fn test_press_focuses_and_forwards_to_clickable() {
        let mut fx = Fixture::new(WidgetKind::Button, WidgetKind::Label);
        let calls = fx.send(PointerEvent::press(7, 2));
        assert_eq!(calls, ["a:focus", "a:pointer Press", "a:refresh", "b:refresh"]);
        assert_eq!(fx.engine.focused().map(WidgetId::index), Some(0));
    }

    #[test]
    fn test_press_does_not_forward_to_non_clickable() {
        let mut fx = Fixture::new(WidgetKind::Button, WidgetKind::TextEditor);
        let calls = fx.send(PointerEvent::press(12, 2));
        assert_eq!(calls, ["b:focus", "a:refresh", "b:refresh"]);
    }

    #[test]
    fn test_focus_transfer_calls_hooks_once() {
        let mut fx = Fixture::new(WidgetKind::Label, WidgetKind::Label);
        fx.send(PointerEvent::press(1, 1));
        let calls = fx.send(PointerEvent::press(12, 1));
        assert_eq!(calls, ["a:focus_lost", "b:focus", "a:refresh", "b:refresh"]);

        // Clicking the focused widget again is not a transition.
        let calls = fx.send(PointerEvent::press(13, 1));
        assert_eq!(calls, ["a:refresh", "b:refresh"]);
    }

    #[test]
    fn test_press_outside_clears_focus_and_repaints_all() {
        let mut fx = Fixture::new(WidgetKind::Label, WidgetKind::Label);
        fx.send(PointerEvent::press(1, 1));
        let calls = fx.send(PointerEvent::press(30, 10));
        assert_eq!(
            calls,
            ["a:focus_lost", "a:draw", "b:draw", "a:refresh", "b:refresh"]
        );
        assert_eq!(fx.engine.focused(), None);

        // With nothing focused a miss still repaints, without hooks.
        let calls = fx.send(PointerEvent::press(30, 10));
        assert_eq!(calls, ["a:draw", "b:draw", "a:refresh", "b:refresh"]);
    }

    #[test]
    fn test_keys_go_to_focused_widget_only() {
        let mut fx = Fixture::new(WidgetKind::TextEditor, WidgetKind::Label);
        let calls = fx.send(Key::Char('x'));
        assert_eq!(calls, ["a:refresh", "b:refresh"]);

        fx.send(PointerEvent::press(12, 1));
        let calls = fx.send(Key::Char('x'));
        assert_eq!(calls, ["b:key x", "b:refresh", "a:refresh", "b:refresh"]);
    }

    #[test]
    fn test_release_forwarded_without_focus_change() {
        let mut fx = Fixture::new(WidgetKind::Button, WidgetKind::Label);
        let calls = fx.send(PointerEvent::release(2, 2));
        assert_eq!(calls, ["a:pointer Release", "a:refresh", "b:refresh"]);
        assert_eq!(fx.engine.focused(), None);
    }

    #[test]
    fn test_wheel_goes_to_scrollable_under_pointer() {
        let mut fx = Fixture::new(WidgetKind::Button, WidgetKind::TextEditor);
        fx.send(PointerEvent::press(1, 1));

        let calls = fx.send(PointerEvent::new(12, 1, PointerPhase::WheelDown));
        assert_eq!(calls, ["b:pointer WheelDown", "a:refresh", "b:refresh"]);
        assert_eq!(fx.engine.focused().map(WidgetId::index), Some(0));

        // Buttons ignore the wheel.
        let calls = fx.send(PointerEvent::new(1, 1, PointerPhase::WheelUp));
        assert_eq!(calls, ["a:refresh", "b:refresh"]);
    }
}
