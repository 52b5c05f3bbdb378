//! Button - a boxed caption that reports pointer press and release.
//!
//! Callbacks are plain closures invoked synchronously from `handle_input`.
//! The caption lives in a shared cell so a callback can change what the
//! button shows; the button repaints after every callback.

use std::cell::RefCell;
use std::rc::Rc;

use crate::input::{InputEvent, PointerPhase};
use crate::surface::Screen;
use crate::types::{Attr, BorderStyle, Rect};
use crate::widget::{Widget, WidgetBase, WidgetKind};
use crate::widgets::clip;

type Callback = Box<dyn FnMut()>;

pub struct Button {
    base: WidgetBase,
    caption: Rc<RefCell<String>>,
    on_press: Option<Callback>,
    on_release: Option<Callback>,
}

impl Button {
    pub fn new(screen: &Screen, rect: Rect, caption: impl Into<String>) -> Self {
        let mut button = Self {
            base: WidgetBase::new(screen, rect),
            caption: Rc::new(RefCell::new(caption.into())),
            on_press: None,
            on_release: None,
        };
        button.draw();
        button
    }

    /// Run `f` when the pointer is pressed over the button.
    pub fn on_press(&mut self, f: impl FnMut() + 'static) {
        self.on_press = Some(Box::new(f));
    }

    /// Run `f` when the pointer is released over the button.
    pub fn on_release(&mut self, f: impl FnMut() + 'static) {
        self.on_release = Some(Box::new(f));
    }

    pub fn caption(&self) -> String {
        self.caption.borrow().clone()
    }

    /// Shared handle to the caption, for use inside callbacks.
    pub fn caption_handle(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.caption)
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        *self.caption.borrow_mut() = caption.into();
        self.draw();
    }
}

impl Widget for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn draw(&mut self) {
        let region = self.base.region();
        region.clear();
        region.draw_box(BorderStyle::Single);

        let inner = region.width().saturating_sub(2);
        let caption = self.caption.borrow();
        let caption = clip(&caption, inner);
        let len = caption.chars().count() as u16;
        let col = 1 + (inner - len) / 2;
        let attrs = if self.base.is_focused() { Attr::BOLD } else { Attr::NONE };
        region.write_text_attr(1, col, caption, attrs);
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let InputEvent::Pointer(pointer) = event else {
            return;
        };
        let callback = match pointer.phase {
            PointerPhase::Press => self.on_press.as_mut(),
            PointerPhase::Release => self.on_release.as_mut(),
            _ => None,
        };
        if let Some(callback) = callback {
            callback();
            self.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, PointerEvent};
    use std::cell::Cell;

    #[test]
    fn test_caption_centered_in_box() {
        let screen = Screen::new(20, 4);
        let button = Button::new(&screen, Rect::new(0, 0, 20, 4), "Click Me!");
        button.refresh();
        let visible = screen.visible();
        assert_eq!(visible.get(0, 0).unwrap().ch(), '┌');
        assert_eq!(visible.row_text(1), "│    Click Me!     │");
    }

    #[test]
    fn test_press_and_release_invoke_callbacks() {
        let screen = Screen::new(20, 4);
        let mut button = Button::new(&screen, Rect::new(0, 0, 20, 4), "Go");
        let pressed = Rc::new(Cell::new(0));
        let released = Rc::new(Cell::new(0));
        let (p, r) = (Rc::clone(&pressed), Rc::clone(&released));
        button.on_press(move || p.set(p.get() + 1));
        button.on_release(move || r.set(r.get() + 1));

        button.handle_input(&InputEvent::Pointer(PointerEvent::press(1, 1)));
        assert_eq!((pressed.get(), released.get()), (1, 0));
        button.handle_input(&InputEvent::Pointer(PointerEvent::release(1, 1)));
        assert_eq!((pressed.get(), released.get()), (1, 1));

        button.handle_input(&InputEvent::Key(Key::Enter));
        assert_eq!((pressed.get(), released.get()), (1, 1));
    }

    #[test]
    fn test_callback_can_change_caption() {
        let screen = Screen::new(20, 4);
        let mut button = Button::new(&screen, Rect::new(0, 0, 20, 4), "Click Me!");
        let caption = button.caption_handle();
        button.on_press(move || *caption.borrow_mut() = "Button pressed!".to_string());

        button.handle_input(&InputEvent::Pointer(PointerEvent::press(2, 1)));
        button.refresh();
        assert_eq!(button.caption(), "Button pressed!");
        assert!(screen.visible().row_text(1).contains("Button pressed!"));
    }

    #[test]
    fn test_long_caption_stays_inside_border() {
        let screen = Screen::new(10, 3);
        let button = Button::new(&screen, Rect::new(0, 0, 8, 3), "Much too long");
        button.refresh();
        let row = screen.visible().row_text(1);
        assert!(row.starts_with("│Much t│"), "{row:?}");
    }

    #[test]
    fn test_missing_callback_is_noop() {
        let screen = Screen::new(10, 3);
        let mut button = Button::new(&screen, Rect::new(0, 0, 10, 3), "x");
        button.handle_input(&InputEvent::Pointer(PointerEvent::press(0, 0)));
        assert_eq!(button.caption(), "x");
    }
}
