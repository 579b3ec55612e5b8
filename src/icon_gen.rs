use crate::config::{to_hex, Config, GlyphStyle, Palette, SmallStyle, MAX_ICON_SIZE};
use crate::error::IconError;
use crate::glyph::draw_shapes;
use crate::manifest::{write_manifest, IconManifest};
use crate::raster::fill_vertical_gradient;
use crate::text::TextGlyph;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use log::{debug, warn};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// How the foreground is painted, chosen once per run.
enum GlyphPainter {
    Shapes(SmallStyle),
    Text(TextGlyph),
}

/// Draws one icon per requested edge length from a fixed palette.
pub struct IconRenderer {
    palette: Palette,
    painter: GlyphPainter,
}

impl IconRenderer {
    /// Pick the glyph strategy for the whole run. The text strategy loads its
    /// font here and never retries.
    pub fn new(config: &Config) -> Self {
        let painter = match config.glyph {
            GlyphStyle::Shapes => GlyphPainter::Shapes(config.small_style),
            GlyphStyle::Text => GlyphPainter::Text(
                TextGlyph::new(config.font.as_deref()).with_small_style(config.small_style),
            ),
        };

        Self {
            palette: config.palette,
            painter,
        }
    }

    pub fn with_text_glyph(palette: Palette, glyph: TextGlyph) -> Self {
        Self {
            palette,
            painter: GlyphPainter::Text(glyph),
        }
    }

    /// Set when the text strategy is active but had to fall back to placeholder layout.
    pub fn font_fallback(&self) -> Option<&str> {
        match &self.painter {
            GlyphPainter::Text(glyph) => glyph.fallback_reason(),
            GlyphPainter::Shapes(_) => None,
        }
    }

    /// Render a `size × size` icon: gradient background, then the glyph.
    ///
    /// Sizes outside `1..=MAX_ICON_SIZE` are rejected before anything is allocated.
    pub fn render(&self, size: u32) -> Result<RgbaImage, IconError> {
        if size == 0 || size > MAX_ICON_SIZE {
            return Err(IconError::InvalidSize(size));
        }

        let mut img = RgbaImage::from_pixel(size, size, self.palette.bg_start);
        fill_vertical_gradient(&mut img, self.palette.bg_start, self.palette.bg_end);

        match &self.painter {
            GlyphPainter::Shapes(small_style) => draw_shapes(&mut img, &self.palette, *small_style),
            GlyphPainter::Text(glyph) => glyph.draw(&mut img, &self.palette),
        }

        Ok(img)
    }
}

/// Seam to the image encoding backend.
pub trait IconEncoder {
    /// Short format name used in messages, e.g. "PNG"
    fn format(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Check the backend can encode at all; called once before any output is written.
    fn probe(&self) -> Result<()>;

    /// Encode `image` into a new file at `path`.
    fn write_file(&self, image: &RgbaImage, path: &Path) -> Result<()>;
}

/// PNG encoder with best compression and adaptive filtering.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngFileEncoder;

impl PngFileEncoder {
    pub fn encode<W: Write>(&self, image: &RgbaImage, w: W) -> Result<()> {
        let encoder =
            PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
        encoder.write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)?;
        Ok(())
    }
}

impl IconEncoder for PngFileEncoder {
    fn format(&self) -> &'static str {
        "PNG"
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn probe(&self) -> Result<()> {
        let probe = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let mut buf = Vec::new();
        self.encode(&probe, &mut buf)
            .context("PNG encoder failed on a 1x1 probe image")
    }

    fn write_file(&self, image: &RgbaImage, path: &Path) -> Result<()> {
        let mut out_file =
            BufWriter::new(File::create(path).context("Failed to create PNG file")?);
        self.encode(image, &mut out_file)
            .context("Failed to write PNG")?;
        out_file.flush()?;
        Ok(())
    }
}

/// Result of one requested size.
#[derive(Debug)]
pub struct IconOutcome {
    pub size: u32,
    /// Path of the written file, or why this size failed
    pub result: Result<PathBuf>,
}

#[derive(Debug, Default)]
pub struct GenerationReport {
    /// One entry per requested size, in request order
    pub outcomes: Vec<IconOutcome>,
    /// Set when the text glyph ran without a font
    pub font_fallback: Option<String>,
    /// Manifest fragment path or why it couldn't be written; `None` when not requested
    pub manifest: Option<Result<PathBuf>>,
}

impl GenerationReport {
    pub fn created(&self) -> impl Iterator<Item = (u32, &Path)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|p| (o.size, p.as_path())))
    }

    pub fn failed(&self) -> impl Iterator<Item = (u32, &anyhow::Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.size, e)))
    }

    pub fn success_count(&self) -> usize {
        self.created().count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed().next().is_none() && self.manifest_error().is_none()
    }

    pub fn manifest_error(&self) -> Option<&anyhow::Error> {
        self.manifest.as_ref().and_then(|result| result.as_ref().err())
    }
}

/// File name of the icon for `size`, e.g. `icon48.png`.
pub fn icon_file_name(size: u32, extension: &str) -> String {
    format!("icon{size}.{extension}")
}

/// Render and write every configured size.
///
/// Run-level problems (no encoder, no output directory) are returned as
/// errors before any icon is written. Problems with a single size are kept in
/// the report and the remaining sizes are still attempted.
pub fn generate_all_icons<E: IconEncoder>(
    config: &Config,
    encoder: &E,
) -> Result<GenerationReport, IconError> {
    encoder
        .probe()
        .map_err(|err| IconError::MissingDependency {
            format: encoder.format(),
            reason: format!("{err:#}"),
        })?;

    create_dir_all(&config.output).map_err(|source| IconError::OutputDir {
        path: config.output.clone(),
        source,
    })?;

    let renderer = IconRenderer::new(config);
    let mut report = GenerationReport {
        font_fallback: renderer.font_fallback().map(str::to_string),
        ..Default::default()
    };

    for &size in &config.sizes {
        let result = generate_icon(&renderer, encoder, size, &config.output);
        match &result {
            Ok(path) => debug!("Wrote {}", path.display()),
            Err(err) => warn!("Icon size {} failed: {:#}", size, err),
        }
        report.outcomes.push(IconOutcome { size, result });
    }

    if config.manifest {
        let mut manifest = IconManifest::new(&config.output);
        for (size, path) in report.created() {
            manifest.add_icon(size, path);
        }
        let result = write_manifest(&config.output, &manifest);
        if let Err(err) = &result {
            warn!("Can't write icon manifest: {:#}", err);
        }
        report.manifest = Some(result);
    }

    Ok(report)
}

fn generate_icon<E: IconEncoder>(
    renderer: &IconRenderer,
    encoder: &E,
    size: u32,
    out_dir: &Path,
) -> Result<PathBuf> {
    let image = renderer
        .render(size)
        .with_context(|| format!("Can't render {size}x{size} icon"))?;
    let path = out_dir.join(icon_file_name(size, encoder.extension()));
    encoder
        .write_file(&image, &path)
        .with_context(|| format!("Can't save {}", path.display()))?;
    Ok(path)
}

/// Steps for drawing the icons by hand when no encoder is available.
pub fn manual_instructions(config: &Config) -> String {
    let palette = &config.palette;
    let sizes = config
        .sizes
        .iter()
        .map(|s| format!("{s}x{s}"))
        .collect::<Vec<_>>()
        .join(", ");
    let files = config
        .sizes
        .iter()
        .map(|&s| icon_file_name(s, "png"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Create the icons manually instead:\n\
         - Use any image editor (GIMP, Krita, Photoshop, an online icon maker)\n\
         - Create {sizes} PNG files\n\
         - Fill with a top-to-bottom gradient from {} to {}\n\
         - Draw a {} '?' symbol in the centre (a plain dot for sizes under 32px)\n\
         - Save as {files} in {}/",
        to_hex(palette.bg_start),
        to_hex(palette.bg_end),
        to_hex(palette.foreground),
        config.output.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_zero_size() {
        let renderer = IconRenderer::new(&Config::default());
        assert!(matches!(renderer.render(0), Err(IconError::InvalidSize(0))));
    }

    #[test]
    fn test_render_rejects_oversized_edge() {
        let renderer = IconRenderer::new(&Config::default());
        assert!(matches!(
            renderer.render(MAX_ICON_SIZE + 1),
            Err(IconError::InvalidSize(_))
        ));
        assert!(matches!(
            renderer.render(u32::MAX),
            Err(IconError::InvalidSize(u32::MAX))
        ));
    }

    #[test]
    fn test_text_strategy_honours_ring_style() {
        let config = Config {
            glyph: GlyphStyle::Text,
            small_style: SmallStyle::Ring,
            font: Some(PathBuf::from("/missing/font.ttf")),
            ..Config::default()
        };
        let palette = Palette::default();
        let img = IconRenderer::new(&config).render(16).unwrap();
        assert_eq!(*img.get_pixel(8, 8), palette.bg_start);
        assert_eq!(*img.get_pixel(8, 5), palette.foreground);
    }

    #[test]
    fn test_render_one_pixel() {
        let renderer = IconRenderer::new(&Config::default());
        let img = renderer.render(1).unwrap();
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_icon_file_name() {
        assert_eq!(icon_file_name(16, "png"), "icon16.png");
        assert_eq!(icon_file_name(128, "png"), "icon128.png");
    }

    #[test]
    fn test_png_probe_and_encode() {
        let encoder = PngFileEncoder;
        assert!(encoder.probe().is_ok());

        let img = IconRenderer::new(&Config::default()).render(48).unwrap();
        let mut buf = Vec::new();
        encoder.encode(&img, &mut buf).unwrap();
        let decoded = image::load_from_memory(&buf).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_manual_instructions_mention_palette_and_files() {
        let text = manual_instructions(&Config::default());
        assert!(text.contains("#667eea"));
        assert!(text.contains("#764ba2"));
        assert!(text.contains("icon16.png, icon48.png, icon128.png"));
        assert!(text.contains("16x16, 48x48, 128x128"));
    }

    #[test]
    fn test_text_strategy_reports_fallback() {
        let config = Config {
            glyph: GlyphStyle::Text,
            font: Some(PathBuf::from("/missing/font.ttf")),
            ..Config::default()
        };
        let renderer = IconRenderer::new(&config);
        assert!(renderer.font_fallback().is_some());
        assert_eq!(renderer.render(48).unwrap().dimensions(), (48, 48));

        let shapes = IconRenderer::new(&Config::default());
        assert!(shapes.font_fallback().is_none());
    }

    #[test]
    fn test_manifest_written_for_created_icons() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            output: temp_dir.path().join("icons"),
            manifest: true,
            ..Config::default()
        };

        let report = generate_all_icons(&config, &PngFileEncoder).unwrap();
        assert!(report.all_succeeded());

        let manifest_path = report
            .manifest
            .expect("manifest should be requested")
            .expect("manifest should be written");
        let content = std::fs::read_to_string(manifest_path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["icons"]["16"], "icons/icon16.png");
        assert_eq!(json["icons"]["128"], "icons/icon128.png");
    }

    #[test]
    fn test_manifest_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            output: temp_dir.path().join("icons"),
            manifest: true,
            ..Config::default()
        };
        // a directory in the way of icons.json
        std::fs::create_dir_all(config.output.join("icons.json")).unwrap();

        let report = generate_all_icons(&config, &PngFileEncoder).unwrap();
        assert_eq!(report.success_count(), 3);
        assert!(report.manifest_error().is_some());
        assert!(!report.all_succeeded());
    }
}
