//! Font-rendered "?" with a drop shadow.
//!
//! The font is looked up once when the glyph is built. Without a font the
//! glyph keeps the same layout using placeholder proportions and draws a
//! primitive question mark inside that box instead.

use crate::config::{Palette, SmallStyle};
use crate::error::IconError;
use crate::glyph::{draw_boxed_question_mark, draw_small, SIMPLIFIED_MIN_SIZE};
use crate::raster::blend_pixel;
use image::{Rgba, RgbaImage};
use log::{debug, warn};
use rusttype::{point, Font, PositionedGlyph, Rect, Scale};
use std::path::{Path, PathBuf};

const GLYPH_TEXT: &str = "?";

/// Semi-transparent black drawn under the glyph.
pub const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 100]);
/// Shadow displacement to the lower right, in pixels.
pub const SHADOW_OFFSET: i32 = 2;

/// Places where common desktop systems keep a sans-serif TrueType font.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load `path`, or the first readable system font when `path` is `None`.
pub fn load_font(path: Option<&Path>) -> Result<Font<'static>, IconError> {
    let candidates: Vec<PathBuf> = match path {
        Some(path) => vec![path.to_path_buf()],
        None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
    };

    for candidate in &candidates {
        let Ok(bytes) = std::fs::read(candidate) else {
            continue;
        };
        match Font::try_from_vec(bytes) {
            Some(font) => {
                debug!("Loaded font {}", candidate.display());
                return Ok(font);
            }
            None => warn!("{} is not a usable TrueType font", candidate.display()),
        }
    }

    Err(IconError::FontUnavailable(match path {
        Some(path) => format!("can't load {}", path.display()),
        None => "no system font found".to_string(),
    }))
}

pub struct TextGlyph {
    font: Option<Font<'static>>,
    fallback_reason: Option<String>,
    small_style: SmallStyle,
}

impl TextGlyph {
    /// Try to load the font once; a failure switches to placeholder layout.
    pub fn new(font_path: Option<&Path>) -> Self {
        match load_font(font_path) {
            Ok(font) => Self::with_font(font),
            Err(err) => {
                warn!("{}, using placeholder glyph dimensions", err);
                Self::placeholder(err.to_string())
            }
        }
    }

    pub fn with_font(font: Font<'static>) -> Self {
        Self {
            font: Some(font),
            fallback_reason: None,
            small_style: SmallStyle::default(),
        }
    }

    pub fn placeholder(reason: String) -> Self {
        Self {
            font: None,
            fallback_reason: Some(reason),
            small_style: SmallStyle::default(),
        }
    }

    /// Variant drawn below 32 pixels, where no "?" fits.
    pub fn with_small_style(mut self, small_style: SmallStyle) -> Self {
        self.small_style = small_style;
        self
    }

    /// Why no font is in use, if the placeholder layout is active.
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    /// Width and height of the "?" at edge length `size`.
    pub fn measure(&self, size: u32) -> (u32, u32) {
        self.layout(size)
            .map(|(_, bb)| ((bb.max.x - bb.min.x) as u32, (bb.max.y - bb.min.y) as u32))
            .unwrap_or_else(|| placeholder_extent(size))
    }

    /// Draw the glyph; sizes below 32 get the small disc or ring instead.
    pub fn draw(&self, img: &mut RgbaImage, palette: &Palette) {
        let size = img.width();
        if size < SIMPLIFIED_MIN_SIZE {
            draw_small(img, size, palette, self.small_style);
            return;
        }

        let (w, h) = self.measure(size);
        let x = (size as i32 - w as i32) / 2;
        let y = (size as i32 - h as i32) / 2 - 2;

        let mask = self.coverage_mask(size, (x, y), (w, h));
        composite_mask(img, &mask, (SHADOW_OFFSET, SHADOW_OFFSET), SHADOW_COLOR);
        composite_mask(img, &mask, (0, 0), palette.foreground);
    }

    fn layout(&self, size: u32) -> Option<(Vec<PositionedGlyph<'_>>, Rect<i32>)> {
        let font = self.font.as_ref()?;
        let scale = Scale::uniform((size / 2).max(16) as f32);
        let ascent = font.v_metrics(scale).ascent;
        let glyphs: Vec<_> = font.layout(GLYPH_TEXT, scale, point(0.0, ascent)).collect();

        let bounds = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .reduce(|a, b| Rect {
                min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
                max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
            })?;
        Some((glyphs, bounds))
    }

    /// Glyph coverage as the alpha channel of a transparent `size × size` image,
    /// with the glyph's top-left corner at `origin`.
    fn coverage_mask(&self, size: u32, origin: (i32, i32), extent: (u32, u32)) -> RgbaImage {
        let mut mask = RgbaImage::new(size, size);

        match self.layout(size) {
            Some((glyphs, bounds)) => {
                for glyph in &glyphs {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, v| {
                        let px = origin.0 + bb.min.x - bounds.min.x + gx as i32;
                        let py = origin.1 + bb.min.y - bounds.min.y + gy as i32;
                        if px < 0 || py < 0 || px as u32 >= size || py as u32 >= size {
                            return;
                        }
                        let alpha = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                        let pixel = mask.get_pixel_mut(px as u32, py as u32);
                        pixel[3] = pixel[3].max(alpha);
                    });
                }
            }
            None => draw_boxed_question_mark(&mut mask, origin, extent, Rgba([255, 255, 255, 255])),
        }

        mask
    }
}

/// Proportional stand-in for the text box when no font is loaded.
pub fn placeholder_extent(size: u32) -> (u32, u32) {
    (size / 3, size / 2)
}

fn composite_mask(img: &mut RgbaImage, mask: &RgbaImage, offset: (i32, i32), color: Rgba<u8>) {
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        let coverage = f32::from(pixel[3]) / 255.0;
        blend_pixel(img, x as i32 + offset.0, y as i32 + offset.1, color, coverage);
    }
}
