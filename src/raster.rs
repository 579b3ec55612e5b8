//! Drawing primitives on RGBA buffers.
//!
//! Coordinates address pixel centres: pixel `(x, y)` sits at `(x as f32, y as f32)`.
//! Shapes are rasterised by testing each pixel centre, without anti-aliasing,
//! so the same input always produces the same pixels.

use image::{Rgba, RgbaImage};

/// Linear interpolation of one colour channel, rounded to the nearest value.
pub fn lerp_channel(start: u8, end: u8, t: f64) -> u8 {
    let value = f64::from(start) * (1.0 - t) + f64::from(end) * t;
    value.round().clamp(0.0, 255.0) as u8
}

/// Colour of gradient row `row` in an image `size` rows tall.
///
/// Row 0 is exactly `start`; `t = row / size` never reaches 1, so the last row
/// only approaches `end`.
pub fn gradient_row_color(start: Rgba<u8>, end: Rgba<u8>, row: u32, size: u32) -> Rgba<u8> {
    let t = f64::from(row) / f64::from(size.max(1));
    Rgba([
        lerp_channel(start[0], end[0], t),
        lerp_channel(start[1], end[1], t),
        lerp_channel(start[2], end[2], t),
        255,
    ])
}

/// Fill every row of `img` with the opaque top-to-bottom gradient.
pub fn fill_vertical_gradient(img: &mut RgbaImage, start: Rgba<u8>, end: Rgba<u8>) {
    let height = img.height();
    for y in 0..height {
        let color = gradient_row_color(start, end, y, height);
        for x in 0..img.width() {
            img.put_pixel(x, y, color);
        }
    }
}

/// Axis-aligned ellipse described by its centre and radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
}

impl Ellipse {
    /// Ellipse inscribed in the inclusive pixel box `[x0, y0, x1, y1]`.
    pub fn from_bbox(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (x0, x1) = (x0.min(x1) as f32, x0.max(x1) as f32);
        let (y0, y1) = (y0.min(y1) as f32, y0.max(y1) as f32);
        Self {
            cx: (x0 + x1) / 2.0,
            cy: (y0 + y1) / 2.0,
            rx: (x1 - x0) / 2.0 + 0.5,
            ry: (y1 - y0) / 2.0 + 0.5,
        }
    }

    /// Circle of radius `r` pixels around pixel `(cx, cy)`, covering the box `[cx - r, cx + r]`.
    pub fn circle(cx: i32, cy: i32, r: i32) -> Self {
        Self::from_bbox(cx - r, cy - r, cx + r, cy + r)
    }

    /// Same centre, both radii reduced by `by`.
    pub fn shrink(&self, by: f32) -> Self {
        Self {
            rx: self.rx - by,
            ry: self.ry - by,
            ..*self
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let dx = (x - self.cx) / self.rx;
        let dy = (y - self.cy) / self.ry;
        dx * dx + dy * dy <= 1.0
    }

    /// Angle of `(x, y)` around the centre in degrees, clockwise from 3 o'clock.
    fn angle_of(&self, x: f32, y: f32) -> f32 {
        let dx = (x - self.cx) / self.rx.max(f32::EPSILON);
        let dy = (y - self.cy) / self.ry.max(f32::EPSILON);
        dy.atan2(dx).to_degrees().rem_euclid(360.0)
    }

    /// Pixel range covered by the bounding box, clipped to the image.
    fn pixel_span(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        clip_span(
            self.cx - self.rx,
            self.cy - self.ry,
            self.cx + self.rx,
            self.cy + self.ry,
            width,
            height,
        )
    }
}

fn clip_span(
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(width - 1);
    let y1 = (max_y.ceil().max(0.0) as u32).min(height - 1);
    if x0 > x1 || y0 > y1 {
        return None;
    }
    Some((x0, y0, x1, y1))
}

/// Paint every pixel whose centre lies inside `ellipse`.
pub fn fill_ellipse(img: &mut RgbaImage, ellipse: Ellipse, color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = ellipse.pixel_span(img.width(), img.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if ellipse.contains(x as f32, y as f32) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Paint the outline of `ellipse`, `width` pixels thick, growing inwards.
/// The interior is left untouched.
pub fn stroke_ellipse(img: &mut RgbaImage, ellipse: Ellipse, width: u32, color: Rgba<u8>) {
    stroke_arc(img, ellipse, 0.0, 360.0, width, color);
}

/// Paint the part of the outline between `start` and `end` degrees
/// (clockwise from 3 o'clock, as in screen coordinates).
pub fn stroke_arc(
    img: &mut RgbaImage,
    ellipse: Ellipse,
    start: f32,
    end: f32,
    width: u32,
    color: Rgba<u8>,
) {
    let inner = ellipse.shrink(width.max(1) as f32);
    let full_turn = end - start >= 360.0;
    let Some((x0, y0, x1, y1)) = ellipse.pixel_span(img.width(), img.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f32, y as f32);
            if !ellipse.contains(px, py) || inner.contains(px, py) {
                continue;
            }
            if full_turn || angle_in_range(ellipse.angle_of(px, py), start, end) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

fn angle_in_range(angle: f32, start: f32, end: f32) -> bool {
    let span = end - start;
    if span < 0.0 {
        return false;
    }
    (angle - start).rem_euclid(360.0) <= span
}

/// Paint a line segment `width` pixels thick with round caps.
pub fn draw_line(
    img: &mut RgbaImage,
    from: (f32, f32),
    to: (f32, f32),
    width: u32,
    color: Rgba<u8>,
) {
    let half = width.max(1) as f32 / 2.0;
    let Some((x0, y0, x1, y1)) = clip_span(
        from.0.min(to.0) - half,
        from.1.min(to.1) - half,
        from.0.max(to.0) + half,
        from.1.max(to.1) + half,
        img.width(),
        img.height(),
    ) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if distance_to_segment((x as f32, y as f32), from, to) <= half {
                img.put_pixel(x, y, color);
            }
        }
    }
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let (qx, qy) = (a.0 + t * abx, a.1 + t * aby);
    ((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
}

/// Composite `color` over the pixel at `(x, y)` with extra `coverage` in `[0, 1]`.
///
/// Out-of-bounds coordinates are ignored. An opaque destination stays opaque.
pub fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    let src_a = f32::from(color[3]) / 255.0 * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    for c in 0..3 {
        let blended = (f32::from(color[c]) * src_a + f32::from(dst[c]) * dst_a * (1.0 - src_a))
            / out_a;
        dst[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
