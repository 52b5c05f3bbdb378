//! CheckboxList - a boxed, titled list of independently toggled items.
//!
//! Layout inside the border: title on row 1, items from row 2, one per row.
//! A pointer press on an item row toggles that item.

use crate::input::{InputEvent, PointerPhase};
use crate::surface::Screen;
use crate::types::{Attr, BorderStyle, Rect};
use crate::widget::{Widget, WidgetBase, WidgetKind};
use crate::widgets::clip;

/// Row (region-relative) of the first item.
const FIRST_ITEM_ROW: u16 = 2;
/// Column of the `[X]` marker.
const MARKER_COL: u16 = 2;
const TEXT_COL: u16 = 6;

pub struct CheckboxList {
    base: WidgetBase,
    title: String,
    items: Vec<String>,
    checked: Vec<bool>,
}

impl CheckboxList {
    pub fn new<I, S>(screen: &Screen, rect: Rect, title: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let mut list = Self {
            base: WidgetBase::new(screen, rect),
            title: title.into(),
            checked: vec![false; items.len()],
            items,
        };
        list.draw();
        list
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Checked state per item, in item order.
    pub fn selected(&self) -> &[bool] {
        &self.checked
    }

    /// Flip item `index`. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        let Some(checked) = self.checked.get_mut(index) else {
            tracing::trace!(index, len = self.items.len(), "toggle out of range");
            return;
        };
        *checked = !*checked;
        self.draw();
    }

    /// Item under screen row `y`, if any.
    fn item_at(&self, y: u16) -> Option<usize> {
        let rect = self.base.rect();
        let local = y.checked_sub(rect.y)?;
        if local + 1 >= rect.height {
            return None;
        }
        let index = local.checked_sub(FIRST_ITEM_ROW)? as usize;
        (index < self.items.len()).then_some(index)
    }
}

impl Widget for CheckboxList {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::CheckboxList
    }

    fn draw(&mut self) {
        let region = self.base.region();
        region.clear();
        region.draw_box(BorderStyle::Single);

        // Everything stops short of the right and bottom border.
        let right = region.width().saturating_sub(1);
        let title_attrs = if self.base.is_focused() { Attr::BOLD } else { Attr::NONE };
        region.write_text_attr(1, MARKER_COL, clip(&self.title, right.saturating_sub(MARKER_COL)), title_attrs);

        let last_row = region.height().saturating_sub(1);
        for (row, (item, &checked)) in (FIRST_ITEM_ROW..last_row).zip(self.items.iter().zip(&self.checked)) {
            let marker = if checked { "[X]" } else { "[ ]" };
            region.write_text(row, MARKER_COL, clip(marker, right.saturating_sub(MARKER_COL)));
            region.write_text(row, TEXT_COL, clip(item, right.saturating_sub(TEXT_COL)));
        }
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let InputEvent::Pointer(pointer) = event else {
            return;
        };
        if pointer.phase != PointerPhase::Press || !self.encloses(pointer.x, pointer.y) {
            return;
        }
        if let Some(index) = self.item_at(pointer.y) {
            self.toggle(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEvent;

    fn options(screen: &Screen) -> CheckboxList {
        CheckboxList::new(screen, Rect::new(30, 2, 20, 8), "options", ["Option 1", "Option 2", "Option 3"])
    }

    fn click(list: &mut CheckboxList, x: u16, y: u16) {
        list.handle_input(&InputEvent::Pointer(PointerEvent::press(x, y)));
    }

    #[test]
    fn test_click_toggles_hit_row() {
        let screen = Screen::new(60, 12);
        let mut list = options(&screen);
        // rect.y = 2, so item 1 sits on screen row 2 + 2 + 1
        click(&mut list, 35, 5);
        assert_eq!(list.selected(), &[false, true, false]);
        click(&mut list, 35, 5);
        assert_eq!(list.selected(), &[false, false, false]);
    }

    #[test]
    fn test_click_outside_items_is_noop() {
        let screen = Screen::new(60, 12);
        let mut list = options(&screen);
        click(&mut list, 35, 3); // title row
        click(&mut list, 35, 8); // below the last item
        click(&mut list, 0, 0); // outside the widget
        assert_eq!(list.selected(), &[false, false, false]);
    }

    #[test]
    fn test_release_does_not_toggle() {
        let screen = Screen::new(60, 12);
        let mut list = options(&screen);
        list.handle_input(&InputEvent::Pointer(PointerEvent::release(35, 4)));
        assert_eq!(list.selected(), &[false, false, false]);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let screen = Screen::new(60, 12);
        let mut list = options(&screen);
        list.toggle(3);
        list.toggle(usize::MAX);
        assert_eq!(list.selected(), &[false, false, false]);
    }

    #[test]
    fn test_long_item_stays_inside_border() {
        let screen = Screen::new(20, 6);
        let list = CheckboxList::new(&screen, Rect::new(0, 0, 12, 5), "a long title", ["a rather long item"]);
        list.refresh();
        let visible = screen.visible();
        assert_eq!(visible.get(11, 1).unwrap().ch(), '│');
        assert_eq!(visible.get(11, 2).unwrap().ch(), '│');
        assert!(visible.row_text(2).starts_with("│ [ ] a rat│"));
    }

    #[test]
    fn test_draw_marks_checked_items() {
        let screen = Screen::new(60, 12);
        let mut list = options(&screen);
        list.toggle(0);
        list.refresh();
        let visible = screen.visible();
        assert!(visible.row_text(3).contains("│ options"));
        assert!(visible.row_text(4).contains("[X] Option 1"));
        assert!(visible.row_text(5).contains("[ ] Option 2"));
    }
}
