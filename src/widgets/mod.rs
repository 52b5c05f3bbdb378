//! Concrete widgets.
//!
//! Each constructor takes the parent [`Screen`](crate::surface::Screen), the
//! widget's rect and its type-specific content, and returns a widget that has
//! already drawn itself into its region.

mod button;
mod checkbox_list;
mod label;
mod selection_list;
mod text_editor;

pub use button::Button;
pub use checkbox_list::CheckboxList;
pub use label::Label;
pub use selection_list::SelectionList;
pub use text_editor::{wrap_lines, CursorPos, TextEditor};

/// The first `width` characters of `text`.
pub(crate) fn clip(text: &str, width: u16) -> &str {
    match text.char_indices().nth(width as usize) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_counts_characters() {
        assert_eq!(clip("Option 1", 3), "Opt");
        assert_eq!(clip("äöü", 2), "äö");
        assert_eq!(clip("ab", 10), "ab");
        assert_eq!(clip("ab", 0), "");
    }
}
