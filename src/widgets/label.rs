//! Label - a line of static text.

use crate::input::InputEvent;
use crate::surface::Screen;
use crate::types::Rect;
use crate::widget::{Widget, WidgetBase, WidgetKind};

/// Display-only text. Ignores all input.
pub struct Label {
    base: WidgetBase,
    text: String,
}

impl Label {
    pub fn new(screen: &Screen, rect: Rect, text: impl Into<String>) -> Self {
        let mut label = Self {
            base: WidgetBase::new(screen, rect),
            text: text.into(),
        };
        label.draw();
        label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.draw();
    }
}

impl Widget for Label {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn draw(&mut self) {
        let region = self.base.region();
        region.clear();
        region.write_text(0, 0, &self.text);
    }

    fn handle_input(&mut self, _event: &InputEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn test_label_draws_and_clips() {
        let screen = Screen::new(20, 2);
        let label = Label::new(&screen, Rect::new(2, 1, 6, 1), "Label testing!");
        label.refresh();
        assert_eq!(screen.visible().row_text(1).trim_end(), "  Label");
    }

    #[test]
    fn test_set_text_erases_previous() {
        let screen = Screen::new(10, 1);
        let mut label = Label::new(&screen, Rect::new(0, 0, 10, 1), "longer text");
        label.set_text("hi");
        label.refresh();
        assert_eq!(screen.visible().row_text(0), "hi        ");
    }

    #[test]
    fn test_label_ignores_input() {
        let screen = Screen::new(10, 1);
        let mut label = Label::new(&screen, Rect::new(0, 0, 10, 1), "x");
        label.handle_input(&InputEvent::Key(Key::Char('y')));
        assert_eq!(label.text(), "x");
    }
}
