//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. It doesn't understand widgets or
//! focus. It takes a filled FrameBuffer and emits the crossterm commands
//! that bring the terminal up to date.

pub mod buffer;
pub mod diff;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
