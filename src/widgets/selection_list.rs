//! SelectionList - a boxed, titled list with exactly one selected item.
//!
//! Up and Down move the selection and wrap at both ends. The visible window
//! follows the selection; the mouse wheel scrolls the window on its own.

use crate::input::{InputEvent, Key, PointerPhase};
use crate::scroll::{ScrollState, WHEEL_SCROLL};
use crate::surface::Screen;
use crate::types::{Attr, BorderStyle, Rect};
use crate::widget::{Widget, WidgetBase, WidgetKind};
use crate::widgets::clip;

const FIRST_ITEM_ROW: u16 = 2;
const ITEM_COL: u16 = 2;

pub struct SelectionList {
    base: WidgetBase,
    title: String,
    items: Vec<String>,
    selected: usize,
    /// Only the vertical axis is used.
    scroll: ScrollState,
}

impl SelectionList {
    pub fn new<I, S>(screen: &Screen, rect: Rect, title: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self {
            base: WidgetBase::new(screen, rect),
            title: title.into(),
            items: items.into_iter().map(Into::into).collect(),
            selected: 0,
            scroll: ScrollState::default(),
        };
        list.draw();
        list
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected item, or None for an empty list.
    pub fn selected_item(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    /// Index of the first visible item.
    pub fn first_visible(&self) -> usize {
        self.scroll.vertical_offset
    }

    /// Item rows between the title and the bottom border.
    pub fn visible_rows(&self) -> usize {
        (self.base.rect().height as usize).saturating_sub(3)
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = self.selected.checked_sub(1).unwrap_or(self.items.len() - 1);
        self.follow_selection();
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
        self.follow_selection();
    }

    fn follow_selection(&mut self) {
        let rows = self.visible_rows().max(1);
        let offset = &mut self.scroll.vertical_offset;
        if self.selected < *offset {
            *offset = self.selected;
        } else if self.selected >= *offset + rows {
            *offset = self.selected + 1 - rows;
        }
    }
}

impl Widget for SelectionList {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::SelectionList
    }

    fn draw(&mut self) {
        self.scroll.recompute(0, self.items.len());

        let region = self.base.region();
        region.clear();
        region.draw_box(BorderStyle::Single);

        let inner = region.width().saturating_sub(ITEM_COL + 1);
        let title_attrs = if self.base.is_focused() { Attr::BOLD } else { Attr::NONE };
        region.write_text_attr(1, ITEM_COL, clip(&self.title, inner), title_attrs);

        let first = self.scroll.vertical_offset;
        let visible = self.items.iter().enumerate().skip(first).take(self.visible_rows());
        for (row, (index, item)) in (FIRST_ITEM_ROW..).zip(visible) {
            let attrs = if index == self.selected { Attr::INVERSE } else { Attr::NONE };
            region.write_text_attr(row, ITEM_COL, clip(item, inner), attrs);
        }
    }

    fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key(Key::Up) => self.select_previous(),
            InputEvent::Key(Key::Down) => self.select_next(),
            InputEvent::Pointer(pointer) if pointer.phase.is_wheel() => {
                self.scroll.recompute(0, self.items.len());
                let step = WHEEL_SCROLL as isize;
                let delta = if pointer.phase == PointerPhase::WheelUp { -step } else { step };
                if !self.scroll.scroll_vertical(delta, self.visible_rows()) {
                    return;
                }
            }
            _ => return,
        }
        self.draw();
    }
}
