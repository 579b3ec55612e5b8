use ext_icon_gen::{config::DEFAULT_OUTPUT_DIR, glyph::GlyphBand};
use image::io::Reader as ImageReader;
use std::path::PathBuf;

fn main() {
    let dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
    );

    let mut paths: Vec<PathBuf> = match std::fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("icon") && name.ends_with(".png"))
            })
            .collect(),
        Err(err) => {
            eprintln!("Can't read {}: {}", dir.display(), err);
            std::process::exit(1);
        }
    };
    paths.sort();

    println!("Checking icons in: {}", dir.display());
    let mut problems = 0;

    for path in &paths {
        let img = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => match reader.decode() {
                Ok(img) => img.to_rgba8(),
                Err(err) => {
                    println!("✗ {}: can't decode ({})", path.display(), err);
                    problems += 1;
                    continue;
                }
            },
            Err(err) => {
                println!("✗ {}: can't open ({})", path.display(), err);
                problems += 1;
                continue;
            }
        };

        let (width, height) = img.dimensions();
        let square = width == height;
        let opaque = img.pixels().all(|p| p[3] == 255);
        let top = img.get_pixel(0, 0);

        println!("\n{}", path.display());
        println!("  Dimensions: {}x{}", width, height);
        println!("  Top-left RGBA: [{}, {}, {}, {}]", top[0], top[1], top[2], top[3]);
        println!("  Glyph band: {:?}", GlyphBand::for_size(width));

        let expected_size = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.trim_start_matches("icon").parse::<u32>().ok());

        if !square {
            println!("  ⚠ not square");
            problems += 1;
        }
        if !opaque {
            println!("  ⚠ has transparent pixels");
            problems += 1;
        }
        if let Some(expected) = expected_size {
            if expected != width {
                println!("  ⚠ file name says {} but image is {} wide", expected, width);
                problems += 1;
            }
        }
    }

    if paths.is_empty() {
        println!("⚠ No icon*.png files found");
    } else if problems == 0 {
        println!("\n✓ {} icons look good", paths.len());
    } else {
        println!("\n⚠ {} problem(s) found", problems);
        std::process::exit(1);
    }
}
