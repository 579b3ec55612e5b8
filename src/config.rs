//! Generation settings.
//!
//! A [`Config`] is built once (from the command line or [`Config::default`])
//! and only ever borrowed afterwards, so every icon of a run sees the same
//! palette.

use anyhow::{Context, Result};
use image::Rgba;
use std::{path::PathBuf, str::FromStr};

/// Sizes required by the extension store listing.
pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];

/// Largest edge length accepted.
pub const MAX_ICON_SIZE: u32 = 4096;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "icons";

/// The three colours shared by all icons of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Gradient colour of the top row
    pub bg_start: Rgba<u8>,
    /// Gradient colour the bottom row approaches
    pub bg_end: Rgba<u8>,
    /// Glyph colour
    pub foreground: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg_start: Rgba([102, 126, 234, 255]),
            bg_end: Rgba([118, 75, 162, 255]),
            foreground: Rgba([255, 255, 255, 255]),
        }
    }
}

impl Palette {
    /// Build a palette from CSS colour strings (`#667eea`, `rgb(...)`, `white`, ...).
    pub fn from_css(bg_start: &str, bg_end: &str, foreground: &str) -> Result<Self> {
        Ok(Self {
            bg_start: parse_color(bg_start).context("Invalid gradient start colour")?,
            bg_end: parse_color(bg_end).context("Invalid gradient end colour")?,
            foreground: parse_color(foreground).context("Invalid foreground colour")?,
        })
    }
}

/// How the question mark is painted for sizes of 32 pixels and up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GlyphStyle {
    /// Circle, arc, stem and dot primitives
    #[default]
    Shapes,
    /// A literal "?" rendered with a TrueType font, with drop shadow
    Text,
}

/// Variant used below 32 pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SmallStyle {
    /// Filled circle
    #[default]
    Dot,
    /// Filled circle with the centre repainted in the background colour
    Ring,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub output: PathBuf,
    pub sizes: Vec<u32>,
    pub palette: Palette,
    pub glyph: GlyphStyle,
    pub small_style: SmallStyle,
    /// Font for [`GlyphStyle::Text`]; system fonts are searched when unset
    pub font: Option<PathBuf>,
    /// Also write the `icons` manifest fragment
    pub manifest: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sizes: DEFAULT_SIZES.to_vec(),
            palette: Palette::default(),
            glyph: GlyphStyle::default(),
            small_style: SmallStyle::default(),
            font: None,
            manifest: false,
        }
    }
}

/// Parse a CSS colour into an opaque pixel. Alpha in the input is ignored.
pub fn parse_color(color: &str) -> Result<Rgba<u8>> {
    let srgb = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow::anyhow!("Can't parse colour '{}'", color))?;

    Ok(Rgba([
        unit_to_channel(srgb.red),
        unit_to_channel(srgb.green),
        unit_to_channel(srgb.blue),
        255,
    ]))
}

fn unit_to_channel(value: f32) -> u8 {
    (value * 255.).round().clamp(0., 255.) as u8
}

/// Format a pixel as `#rrggbb`.
pub fn to_hex(color: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}
