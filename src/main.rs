use anyhow::Result;
use clap::Parser;
use ext_icon_gen::{
    config::{Config, GlyphStyle, Palette, SmallStyle, DEFAULT_OUTPUT_DIR, DEFAULT_SIZES},
    icon_gen::{generate_all_icons, manual_instructions, PngFileEncoder},
    IconError,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "ext-icon-gen",
    about = "Draw the gradient question-mark icons for the browser extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Icon edge lengths to generate.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        default_values_t = DEFAULT_SIZES
    )]
    sizes: Vec<u32>,

    /// Gradient colour at the top (CSS color format)
    #[clap(long, default_value = "#667eea")]
    bg_start: String,

    /// Gradient colour at the bottom (CSS color format)
    #[clap(long, default_value = "#764ba2")]
    bg_end: String,

    /// Glyph colour (CSS color format)
    #[clap(long, default_value = "#ffffff")]
    foreground: String,

    /// How the question mark is drawn
    #[clap(long, value_enum, default_value_t = GlyphStyle::Shapes)]
    glyph: GlyphStyle,

    /// Glyph used for icons smaller than 32px
    #[clap(long, value_enum, default_value_t = SmallStyle::Dot)]
    small_style: SmallStyle,

    /// TrueType font for `--glyph text` (system fonts are searched otherwise)
    #[clap(long, value_name = "FONT")]
    font: Option<PathBuf>,

    /// Also write icons.json with the manifest "icons" entries
    #[clap(long)]
    manifest: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        Ok(Config {
            palette: Palette::from_css(&self.bg_start, &self.bg_end, &self.foreground)?,
            output: self.output,
            sizes: self.sizes,
            glyph: self.glyph,
            small_style: self.small_style,
            font: self.font,
            manifest: self.manifest,
        })
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config()?;

    println!("Creating extension icons...");
    let report = match generate_all_icons(&config, &PngFileEncoder) {
        Ok(report) => report,
        Err(err @ IconError::MissingDependency { .. }) => {
            println!("✗ {err}");
            println!();
            println!("{}", manual_instructions(&config));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(reason) = &report.font_fallback {
        println!("  ! {reason}, drawing '?' with placeholder proportions");
    }

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(path) => println!(
                "  ✓ Created {} ({}x{})",
                path.display(),
                outcome.size,
                outcome.size
            ),
            Err(err) => eprintln!("  ✗ Failed to create icon{}.png: {:#}", outcome.size, err),
        }
    }

    match &report.manifest {
        Some(Ok(path)) => println!("  ✓ Generated {}", path.display()),
        Some(Err(err)) => eprintln!("  ✗ Can't write icons.json: {:#}", err),
        None => {}
    }

    println!(
        "Created {} of {} icons in {}",
        report.success_count(),
        report.outcomes.len(),
        config.output.display()
    );

    if !report.all_succeeded() {
        anyhow::bail!("Some icons could not be created");
    }

    Ok(())
}
