use image::Rgba;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs `ext-icon-gen -o <temp>/icons` with default settings and asserts that
/// exactly icon16.png, icon48.png and icon128.png are written, square, with
/// the gradient start colour on the top row.
#[test]
fn test_default_run_creates_extension_icons() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");

    let output = run_icon_gen(&["-o", path_arg(&output_dir)]);
    assert_success(&output);

    let mut files: Vec<String> = std::fs::read_dir(&output_dir)
        .expect("Output directory should exist")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["icon128.png", "icon16.png", "icon48.png"]);

    for size in [16u32, 48, 128] {
        let icon_path = output_dir.join(format!("icon{}.png", size));
        let icon = image::open(&icon_path)
            .unwrap_or_else(|_| panic!("Failed to load {}", icon_path.display()))
            .to_rgba8();

        assert_eq!(icon.width(), size, "icon{} width", size);
        assert_eq!(icon.height(), size, "icon{} height", size);
        for x in 0..size {
            assert_eq!(*icon.get_pixel(x, 0), Rgba([102, 126, 234, 255]));
        }
        assert!(icon.pixels().all(|p| p[3] == 255), "icon{} should be opaque", size);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("✓ Created").count(), 3);
    assert!(stdout.contains("Created 3 of 3 icons"));
}

/// Custom sizes, colours and the manifest fragment.
#[test]
fn test_custom_sizes_and_manifest() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("assets");

    let output = run_icon_gen(&[
        "-o",
        path_arg(&output_dir),
        "--sizes",
        "32,64",
        "--bg-start",
        "#000000",
        "--bg-end",
        "#ffffff",
        "--manifest",
    ]);
    assert_success(&output);

    for size in [32u32, 64] {
        let icon = image::open(output_dir.join(format!("icon{}.png", size)))
            .expect("Failed to load icon")
            .to_rgba8();
        assert_eq!(icon.dimensions(), (size, size));
        assert_eq!(*icon.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }
    assert!(!output_dir.join("icon16.png").exists());

    let manifest = std::fs::read_to_string(output_dir.join("icons.json"))
        .expect("icons.json should be written");
    let parsed: serde_json::Value =
        serde_json::from_str(&manifest).expect("icons.json should be valid JSON");
    assert_eq!(parsed["icons"]["32"], "assets/icon32.png");
    assert_eq!(parsed["icons"]["64"], "assets/icon64.png");
}

/// A zero size is reported, the other sizes are still written and the exit
/// status signals the failure.
#[test]
fn test_failed_size_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");

    let output = run_icon_gen(&["-o", path_arg(&output_dir), "--sizes", "16,0,48"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to create icon0.png"), "stderr: {}", stderr);
    assert!(output_dir.join("icon16.png").exists());
    assert!(output_dir.join("icon48.png").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created 2 of 3 icons"));
}

#[test]
fn test_invalid_colour_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");

    let output = run_icon_gen(&["-o", path_arg(&output_dir), "--bg-start", "purple-ish"]);
    assert!(!output.status.success());
    assert!(!output_dir.exists());
}

/// Text glyph with a font path that doesn't exist falls back to placeholder
/// proportions and still writes every icon.
#[test]
fn test_text_glyph_without_font() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");
    let font = temp_dir.path().join("missing.ttf");

    let output = run_icon_gen(&[
        "-o",
        path_arg(&output_dir),
        "--glyph",
        "text",
        "--font",
        path_arg(&font),
    ]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("placeholder"));
    assert!(output_dir.join("icon128.png").exists());
}

/// Text glyph rendered with the font shipped under tests/fonts.
#[test]
fn test_text_glyph_with_bundled_font() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");
    let font = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fonts/DejaVuSansMono-Bold.ttf");

    let output = run_icon_gen(&[
        "-o",
        path_arg(&output_dir),
        "--glyph",
        "text",
        "--font",
        path_arg(&font),
    ]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("placeholder"), "stdout: {}", stdout);

    let img = image::open(output_dir.join("icon128.png"))
        .expect("Failed to open icon128.png")
        .to_rgba8();
    assert!(img.pixels().all(|p| p[3] == 255));
    assert!(img.pixels().any(|p| p.0 == [255, 255, 255, 255]));
}

/// A manifest that can't be written is reported and fails the run, but the
/// icons themselves are kept.
#[test]
fn test_manifest_write_failure_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");
    std::fs::create_dir_all(output_dir.join("icons.json")).expect("Failed to create blocker");

    let output = run_icon_gen(&["-o", path_arg(&output_dir), "--manifest"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Can't write icons.json"), "stderr: {}", stderr);
    for size in [16, 48, 128] {
        assert!(output_dir.join(format!("icon{}.png", size)).exists());
    }
}

fn run_icon_gen(args: &[&str]) -> Output {
    Command::new(icon_gen_binary())
        .args(args)
        .output()
        .expect("Failed to run ext-icon-gen command")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("ext-icon-gen command failed");
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are valid UTF-8")
}

/// Path of the binary cargo built for this test run
fn icon_gen_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ext-icon-gen"))
}
