//! `icons` fragment of a browser-extension manifest
//!
//! Extension manifests reference their icons through an `"icons"` object that
//! maps the edge length to a path relative to the extension root:
//!
//! ```json
//! { "icons": { "16": "icons/icon16.png", "48": "icons/icon48.png" } }
//! ```
//!
//! The generator writes this fragment next to the icons so it can be pasted
//! into `manifest.json`.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// File name of the written fragment.
pub const MANIFEST_FILE_NAME: &str = "icons.json";

/// Root structure of the manifest fragment
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IconManifest {
    /// Edge length to icon path, ordered by edge length
    pub icons: BTreeMap<u32, String>,

    /// Directory prefix used for every path, relative to the extension root
    #[serde(skip)]
    prefix: Option<String>,
}

impl IconManifest {
    /// Creates an empty manifest for icons stored in `output_dir`
    ///
    /// # Arguments
    /// * `output_dir` - The directory the icons are written to. Its last
    ///   component becomes the path prefix (`icons/icon16.png`), as the
    ///   extension root is assumed to be its parent.
    pub fn new(output_dir: &Path) -> Self {
        let prefix = output_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        Self {
            icons: BTreeMap::new(),
            prefix,
        }
    }

    /// Adds an icon entry
    ///
    /// # Arguments
    /// * `size` - The edge length in pixels
    /// * `path` - Path of the written icon; only its file name is kept
    pub fn add_icon(&mut self, size: u32, path: &Path) {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let entry = match &self.prefix {
            Some(prefix) => format!("{prefix}/{file_name}"),
            None => file_name,
        };
        self.icons.insert(size, entry);
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Writes the manifest fragment into `dir`
///
/// # Returns
/// * `Result<PathBuf>` - The path of the written file
///
/// # Errors
/// Returns an error if serialization or writing the file fails
pub fn write_manifest(dir: &Path, manifest: &IconManifest) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let json =
        serde_json::to_string_pretty(manifest).context("Failed to serialize icon manifest")?;

    std::fs::write(&path, json).context("Failed to write icon manifest")?;
    debug!("Wrote {}", path.display());
    Ok(path)
}
