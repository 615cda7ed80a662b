//! Utility modules

pub mod text;

pub use text::{locate_word, visual_width, WordSpan};
