//! Saving conversion results.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// File name offered in the save dialog.
pub const DEFAULT_FILENAME: &str = "vectorized-image.svg";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    NoResult,
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Make sure a chosen path ends in `.svg`.
pub fn with_svg_extension(path: &Path) -> PathBuf {
    let has_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if has_svg {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".svg");
        PathBuf::from(name)
    }
}

/// Write the SVG markup to `path`, adding `.svg` when missing.
///
/// Returns the path actually written.
pub fn write_svg(path: &Path, svg: Option<&str>) -> Result<PathBuf, ExportError> {
    let svg = svg.ok_or(ExportError::NoResult)?;
    let path = with_svg_extension(path);
    std::fs::write(&path, svg).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), bytes = svg.len(), "Saved SVG");
    Ok(path)
}
