//! Procedural icon set for the browser extension: a vertical gradient with a
//! question-mark glyph, rendered at every requested edge length.

pub mod config;
pub mod error;
pub mod glyph;
pub mod icon_gen;
pub mod manifest;
pub mod raster;
pub mod text;

pub use config::{Config, GlyphStyle, Palette, SmallStyle};
pub use error::IconError;
pub use icon_gen::{generate_all_icons, GenerationReport, IconEncoder, IconRenderer, PngFileEncoder};
