use std::path::PathBuf;

/// Errors that abort a whole generation run or a renderer setup step.
///
/// Failures that only concern a single icon size are not represented here;
/// they are collected as `anyhow::Error` in the generation report.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// The imaging backend cannot encode the output format
    #[error("{format} encoder unavailable: {reason}")]
    MissingDependency { format: &'static str, reason: String },

    /// No usable font could be loaded for the text glyph
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// Requested edge length cannot produce an image
    #[error("invalid icon size {0}, edge length must be between 1 and {max}", max = crate::config::MAX_ICON_SIZE)]
    InvalidSize(u32),

    /// The output directory could not be created
    #[error("can't create output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
