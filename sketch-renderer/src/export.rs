//! PNG export of a rendered pixmap.

use std::path::Path;

use tiny_skia::Pixmap;
use tracing::info;

use crate::error::{RenderError, RenderResult};

/// Encode `pixmap` as PNG bytes.
///
/// # Errors
///
/// Returns [`RenderError::Export`] if encoding fails.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
}

/// Encode `pixmap` and write it to `path`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save_png(pixmap: &Pixmap, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let bytes = encode_png(pixmap)?;
    std::fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "PNG written");
    Ok(())
}
