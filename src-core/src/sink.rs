//! Image sink abstraction and the file-backed implementation.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::error::{Result, SpectrogramError};

/// Destination for the rendered pixel buffer.
///
/// `pixels` is a flat row-major RGB buffer (`width * height * 3` bytes,
/// top row first). Encoding is the sink's concern; the pipeline only hands
/// over bytes and dimensions.
pub trait ImageSink {
    fn write_rgb(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<()>;
}

/// [`ImageSink`] that encodes to an image file, with the format chosen from
/// the output extension (PNG, JPEG, ...).
///
/// The encoder writes to a temporary sibling path and renames it into place
/// on success, so a failed write never leaves a partial file visible.
pub struct ImageFileSink {
    path: PathBuf,
}

impl ImageFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ImageSink for ImageFileSink {
    fn write_rgb(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<()> {
        let format = ImageFormat::from_path(&self.path)?;
        let image = RgbImage::from_raw(width, height, pixels.to_vec()).ok_or(
            SpectrogramError::SinkWriteFailure(
                "pixel buffer does not match image dimensions".into(),
            ),
        )?;

        let temp = self.temp_path();
        if let Err(err) = image.save_with_format(&temp, format) {
            fs::remove_file(&temp).ok();
            return Err(err.into());
        }
        fs::rename(&temp, &self.path)
            .map_err(|e| SpectrogramError::SinkWriteFailure(e.to_string()))?;
        debug!("wrote {}x{} image to {}", width, height, self.path.display());
        Ok(())
    }
}

impl AsRef<Path> for ImageFileSink {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_png_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spectral-core-sink-{}-{}.png", std::process::id(), name))
    }

    #[test]
    fn writes_png_and_removes_temp() {
        let path = temp_png_path("ok");
        let mut sink = ImageFileSink::new(&path);
        let pixels = vec![255u8; 2 * 2 * 3];
        sink.write_rgb(2, 2, &pixels).unwrap();

        assert!(path.exists());
        assert!(!sink.temp_path().exists());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn mismatched_buffer_is_sink_failure() {
        let path = temp_png_path("mismatch");
        let mut sink = ImageFileSink::new(&path);
        let err = sink.write_rgb(4, 4, &[0u8; 3]).unwrap_err();
        assert!(matches!(err, SpectrogramError::SinkWriteFailure(_)));
        assert!(!path.exists());
    }

    #[test]
    fn unknown_extension_is_sink_failure() {
        let mut sink = ImageFileSink::new(std::env::temp_dir().join("spectral-core.unknown-ext"));
        let err = sink.write_rgb(1, 1, &[0u8; 3]).unwrap_err();
        assert!(matches!(err, SpectrogramError::SinkWriteFailure(_)));
    }
}
