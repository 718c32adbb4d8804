//! Generator for the Almoji workflow icon.
//!
//! The icon is a radial gradient disc with a white border, an emoji (or a
//! hand-drawn smiley when no font can render it) and a small magnifying glass.

pub mod glyph;
pub mod icon_gen;
pub mod shapes;
