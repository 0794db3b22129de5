//! Product image storage.
//!
//! A thin file-I/O wrapper: bytes in, filename out. Images are stored as
//! `<product id>.<ext>` under the configured directory and served by the
//! static file service. No resizing or thumbnailing happens here.

use std::path::Path;

use sundry_core::ProductId;
use thiserror::Error;

use crate::models::product::NO_IMAGE;

/// File extensions accepted for product images.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Errors from image file handling.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The upload's extension is not in the allowlist.
    #[error("unsupported file type (expected .png or .jpg)")]
    UnsupportedFile,

    /// Filesystem failure.
    #[error("image i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Derive the stored filename for an upload, validating its extension.
///
/// # Errors
///
/// Returns `MediaError::UnsupportedFile` for anything but `.png`/`.jpg`.
pub fn image_filename(product_id: ProductId, original_name: &str) -> Result<String, MediaError> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(MediaError::UnsupportedFile)?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(MediaError::UnsupportedFile);
    }

    Ok(format!("{product_id}.{ext}"))
}

/// Write an uploaded image, creating the directory on first use.
///
/// # Errors
///
/// Returns `MediaError::Io` if the directory or file cannot be written.
pub async fn save_image(dir: &Path, filename: &str, bytes: &[u8]) -> Result<(), MediaError> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(filename), bytes).await?;
    Ok(())
}

/// Remove a product's image file, if it ever had one.
///
/// The no-image sentinel is skipped; a missing file for a recorded filename
/// is an error, which blocks product deletion at the HTTP layer.
///
/// # Errors
///
/// Returns `MediaError::Io` if the file exists in the record but cannot be
/// removed.
pub async fn remove_image(dir: &Path, filename: &str) -> Result<(), MediaError> {
    if filename == NO_IMAGE {
        return Ok(());
    }
    tokio::fs::remove_file(dir.join(filename)).await?;
    Ok(())
}

/// Remove an old image when a new upload replaces it.
///
/// Unlike [`remove_image`], a file that is already gone is fine here.
///
/// # Errors
///
/// Returns `MediaError::Io` for any failure other than the file being
/// missing.
pub async fn remove_image_if_exists(dir: &Path, filename: &str) -> Result<(), MediaError> {
    match remove_image(dir, filename).await {
        Err(MediaError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_filename_allows_png_and_jpg() {
        let id = ProductId::new(7);
        assert_eq!(image_filename(id, "photo.PNG").unwrap(), "7.png");
        assert_eq!(image_filename(id, "shelf.jpg").unwrap(), "7.jpg");
    }

    #[test]
    fn test_image_filename_rejects_everything_else() {
        let id = ProductId::new(7);
        assert!(image_filename(id, "animation.gif").is_err());
        assert!(image_filename(id, "no-extension").is_err());
    }
}
