//! Widget contract.
//!
//! Every widget owns one [`Region`] of the screen and implements the same
//! five operations: `draw`, `handle_input`, `on_focus`, `on_focus_lost` and
//! `refresh`. The engine drives widgets only through this trait; the small
//! [`WidgetKind`] enum answers the one question it needs beyond that (which
//! widgets want pointer events).

use crate::input::{InputEvent, PointerPhase};
use crate::surface::{Region, Screen};
use crate::types::{Rect, Rgba};

// =============================================================================
// KIND
// =============================================================================

/// The closed set of widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Label,
    Button,
    CheckboxList,
    SelectionList,
    TextEditor,
    /// Application-defined widgets. Never receive pointer events.
    Custom,
}

impl WidgetKind {
    /// Should a hit-tested pointer event of this phase be forwarded?
    ///
    /// Press and release go to the clickable kinds; wheel events go to the
    /// kinds that scroll.
    pub fn accepts_pointer(self, phase: PointerPhase) -> bool {
        match phase {
            PointerPhase::Press | PointerPhase::Release => {
                matches!(self, WidgetKind::Button | WidgetKind::CheckboxList)
            }
            PointerPhase::WheelUp | PointerPhase::WheelDown => {
                matches!(self, WidgetKind::TextEditor | WidgetKind::SelectionList)
            }
        }
    }
}

// =============================================================================
// BASE
// =============================================================================

/// State shared by every widget: its region, paint-order tag and focus flag.
pub struct WidgetBase {
    region: Region,
    order: u8,
    focused: bool,
}

impl WidgetBase {
    /// Acquire a region of `screen` for `rect`.
    pub fn new(screen: &Screen, rect: Rect) -> Self {
        Self {
            region: screen.create_region(rect),
            order: 1,
            focused: false,
        }
    }

    #[inline]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[inline]
    pub fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.region.rect()
    }

    /// Paint-order tag, used as the color-pair index.
    #[inline]
    pub fn order(&self) -> u8 {
        self.order
    }

    #[inline]
    pub fn set_order(&mut self, order: u8) {
        self.order = order;
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[inline]
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// A visual element living in its own region of the screen.
pub trait Widget {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    fn kind(&self) -> WidgetKind;

    /// Repaint the whole region from current state.
    ///
    /// Must be idempotent and must not write outside the widget's region.
    fn draw(&mut self);

    /// Consume one event, redrawing before returning if anything visible
    /// changed. Events the widget does not understand are ignored.
    fn handle_input(&mut self, event: &InputEvent);

    /// Called once when the widget gains focus.
    fn on_focus(&mut self) {
        self.base_mut().set_focused(true);
        self.draw();
    }

    /// Called once when the widget loses focus.
    fn on_focus_lost(&mut self) {
        self.base_mut().set_focused(false);
        self.draw();
    }

    /// Publish the region to the visible screen. Does not repaint.
    fn refresh(&self) {
        self.base().region().flush();
    }

    fn rect(&self) -> Rect {
        self.base().rect()
    }

    /// Does the widget's region enclose the screen coordinate (x, y)?
    fn encloses(&self, x: u16, y: u16) -> bool {
        self.base().region().encloses(x, y)
    }

    /// Register the widget's color pair (indexed by its paint order) and repaint.
    fn set_colors(&mut self, fg: Rgba, bg: Rgba) {
        let order = self.base().order();
        self.base_mut().region_mut().set_colors(order, fg, bg);
        self.draw();
    }
}
