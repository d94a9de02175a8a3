//! Core text classification and mode types shared by the editor crates.

/// Line terminator kinds and detection.
pub mod eol;
/// Grapheme classification: newlines, display widths and columns.
pub mod graphemes;
/// Editor mode definitions.
pub mod mode;

pub use eol::Eol;
pub use mode::{Mode, ModeStack};
