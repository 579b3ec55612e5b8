//! Size banding and geometry of the primitive-shape question mark.

use crate::config::{Palette, SmallStyle};
use crate::raster::{draw_line, fill_ellipse, stroke_arc, stroke_ellipse, Ellipse};
use image::{Rgba, RgbaImage};

/// Smallest edge length that gets the simplified question mark.
pub const SIMPLIFIED_MIN_SIZE: u32 = 32;
/// Smallest edge length that gets the detailed question mark.
pub const DETAILED_MIN_SIZE: u32 = 48;

/// Glyph family used for an edge length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphBand {
    /// Filled circle (or ring) in the centre
    Small,
    /// Top arc, short line and a one pixel dot
    Simplified,
    /// Open circle, stem and dot
    Detailed,
}

impl GlyphBand {
    pub fn for_size(size: u32) -> Self {
        if size >= DETAILED_MIN_SIZE {
            GlyphBand::Detailed
        } else if size >= SIMPLIFIED_MIN_SIZE {
            GlyphBand::Simplified
        } else {
            GlyphBand::Small
        }
    }
}

/// Geometry of the large question mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailedGeometry {
    pub circle: Ellipse,
    pub stroke: u32,
    pub stem_start: (f32, f32),
    pub stem_end: (f32, f32),
    pub dot: Ellipse,
    pub dot_radius: i32,
}

impl DetailedGeometry {
    pub fn new(size: u32) -> Self {
        let n = size as i32;
        let (cx, cy) = (n / 2, n / 2);
        let margin = n / 6;
        let circle = n / 3;
        let stroke = (size / 32).max(2);

        let stem_start = margin as f32 + circle as f32 * 0.7;
        let stem_end = cy + circle / 4;
        let dot_radius = (n / 16).max(2);
        let dot_y = stem_end + dot_radius * 2;

        Self {
            circle: Ellipse::from_bbox(cx - circle / 2, margin, cx + circle / 2, margin + circle),
            stroke,
            stem_start: (cx as f32, stem_start),
            stem_end: (cx as f32, stem_end as f32),
            dot: Ellipse::circle(cx, dot_y, dot_radius),
            dot_radius,
        }
    }
}

/// Geometry of the medium question mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifiedGeometry {
    pub arc: Ellipse,
    pub line_from: (f32, f32),
    pub line_to: (f32, f32),
    pub dot: Ellipse,
}

impl SimplifiedGeometry {
    pub const STROKE: u32 = 2;

    pub fn new(size: u32) -> Self {
        let n = size as i32;
        let (cx, cy) = (n / 2, n / 2);
        let margin = n / 4;

        Self {
            arc: Ellipse::from_bbox(margin, margin, n - margin, cy + margin / 2),
            line_from: (cx as f32, cy as f32),
            line_to: (cx as f32, (cy + margin) as f32),
            dot: Ellipse::circle(cx, n - margin, 1),
        }
    }
}

/// Geometry of the small icon: outer disc and the inset used by the ring variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallGeometry {
    pub outer: Ellipse,
    pub inner: Ellipse,
}

impl SmallGeometry {
    pub fn new(size: u32) -> Self {
        let n = size as i32;
        let margin = n / 3;
        let inner_margin = margin + (n / 8).max(1);

        Self {
            outer: Ellipse::from_bbox(margin, margin, n - margin, n - margin),
            inner: Ellipse::from_bbox(inner_margin, inner_margin, n - inner_margin, n - inner_margin),
        }
    }
}

/// Draw the size-banded primitive glyph onto an already filled background.
pub fn draw_shapes(img: &mut RgbaImage, palette: &Palette, small_style: SmallStyle) {
    let size = img.width();
    match GlyphBand::for_size(size) {
        GlyphBand::Detailed => draw_detailed(img, size, palette.foreground),
        GlyphBand::Simplified => draw_simplified(img, size, palette.foreground),
        GlyphBand::Small => draw_small(img, size, palette, small_style),
    }
}

fn draw_detailed(img: &mut RgbaImage, size: u32, color: Rgba<u8>) {
    let geometry = DetailedGeometry::new(size);
    stroke_ellipse(img, geometry.circle, geometry.stroke, color);
    draw_line(img, geometry.stem_start, geometry.stem_end, geometry.stroke, color);
    fill_ellipse(img, geometry.dot, color);
}

fn draw_simplified(img: &mut RgbaImage, size: u32, color: Rgba<u8>) {
    let geometry = SimplifiedGeometry::new(size);
    stroke_arc(img, geometry.arc, 180.0, 360.0, SimplifiedGeometry::STROKE, color);
    draw_line(
        img,
        geometry.line_from,
        geometry.line_to,
        SimplifiedGeometry::STROKE,
        color,
    );
    fill_ellipse(img, geometry.dot, color);
}

/// Small icons get a centred disc; the ring variant punches the centre back
/// out with the gradient start colour.
pub fn draw_small(img: &mut RgbaImage, size: u32, palette: &Palette, style: SmallStyle) {
    let geometry = SmallGeometry::new(size);
    fill_ellipse(img, geometry.outer, palette.foreground);
    if style == SmallStyle::Ring {
        fill_ellipse(img, geometry.inner, palette.bg_start);
    }
}

/// Question mark drawn from primitives inside the box at `(x, y)` sized `w × h`.
///
/// Used by the text glyph when no font could be loaded.
pub fn draw_boxed_question_mark(
    img: &mut RgbaImage,
    origin: (i32, i32),
    extent: (u32, u32),
    color: Rgba<u8>,
) {
    let (x, y) = origin;
    let (w, h) = (extent.0.max(2) as i32, extent.1.max(4) as i32);
    let stroke = (w as u32 / 6).max(1);
    let mid_x = x + w / 2;

    // hook: upper half plus the right lower quarter of the bowl
    let bowl = Ellipse::from_bbox(x, y, x + w - 1, y + h / 2);
    stroke_arc(img, bowl, 180.0, 450.0, stroke, color);

    let stem_top = y + h / 2;
    let stem_bottom = y + h * 3 / 4 - stroke as i32;
    draw_line(
        img,
        (mid_x as f32, stem_top as f32),
        (mid_x as f32, stem_bottom.max(stem_top) as f32),
        stroke,
        color,
    );

    let dot_radius = (stroke as i32 / 2).max(1);
    fill_ellipse(
        img,
        Ellipse::circle(mid_x, y + h - 1 - dot_radius, dot_radius),
        color,
    );
}
