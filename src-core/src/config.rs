//! Rendering configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectrogramError};

/// Default FFT block size in samples.
pub const DEFAULT_FFT_BLOCK_SIZE: usize = 1024;
/// Default lower bound of the rendered frequency band in Hz.
pub const DEFAULT_MIN_FREQUENCY: f64 = 20.0;
/// Default upper bound of the rendered frequency band in Hz. Higher
/// frequencies rarely carry visible detail.
pub const DEFAULT_MAX_FREQUENCY: f64 = 8000.0;
/// Default dynamic range below peak, in dB, kept before clipping to silence.
pub const DEFAULT_DYNAMIC_RANGE_DB: f64 = 110.0;
/// Default image height in pixels (one pixel per frequency bin).
pub const DEFAULT_IMAGE_HEIGHT: usize = 500;

/// One entry of the duration-dependent pixel density table.
///
/// Sounds with a duration in `(min_seconds, max_seconds]` get
/// `pixels_per_second` horizontal pixels for each second of audio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthBucket {
    /// Horizontal pixels per second of audio.
    pub pixels_per_second: u32,
    /// Exclusive lower duration bound in seconds.
    pub min_seconds: f64,
    /// Inclusive upper duration bound in seconds.
    pub max_seconds: f64,
}

impl WidthBucket {
    pub const fn new(pixels_per_second: u32, min_seconds: f64, max_seconds: f64) -> Self {
        Self {
            pixels_per_second,
            min_seconds,
            max_seconds,
        }
    }
}

/// Default pixel density table. Gives more horizontal real estate to
/// shorter sound files. The last bucket's upper bound is arbitrary; longer
/// sounds still fall back to its density.
pub fn default_width_table() -> Vec<WidthBucket> {
    vec![
        WidthBucket::new(240, 0.0, 20.0),
        WidthBucket::new(120, 20.0, 30.0),
        WidthBucket::new(60, 30.0, 60.0),
        WidthBucket::new(30, 60.0, 120.0),
        WidthBucket::new(15, 120.0, 240.0),
        WidthBucket::new(6, 240.0, 100_000.0),
    ]
}

/// Parameters controlling spectrogram rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// FFT window length in samples.
    pub fft_block_size: usize,
    /// Number of samples shared between consecutive windows.
    pub fft_overlap: usize,
    /// Lowest frequency kept in the rendered band, in Hz.
    pub min_frequency: f64,
    /// Highest frequency kept in the rendered band, in Hz.
    pub max_frequency: f64,
    /// Span below peak amplitude, in dB, retained before clipping.
    pub dynamic_range_db: f64,
    /// Output image height in pixels; spectra are resized to this many bins.
    pub image_height: usize,
    /// Duration-dependent pixel density table, checked in order.
    pub width_table: Vec<WidthBucket>,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            fft_block_size: DEFAULT_FFT_BLOCK_SIZE,
            fft_overlap: 0,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            dynamic_range_db: DEFAULT_DYNAMIC_RANGE_DB,
            image_height: DEFAULT_IMAGE_HEIGHT,
            width_table: default_width_table(),
        }
    }
}

impl SpectrogramConfig {
    /// Check parameter consistency before rendering starts.
    pub fn validate(&self) -> Result<()> {
        if self.fft_block_size == 0 {
            return Err(SpectrogramError::InvalidConfig("fft_block_size must be non-zero"));
        }
        if self.fft_overlap >= self.fft_block_size {
            return Err(SpectrogramError::InvalidConfig(
                "fft_overlap must be smaller than fft_block_size",
            ));
        }
        if self.min_frequency < 0.0 || self.max_frequency <= self.min_frequency {
            return Err(SpectrogramError::InvalidConfig(
                "frequency band must satisfy 0 <= min < max",
            ));
        }
        if self.dynamic_range_db <= 0.0 {
            return Err(SpectrogramError::InvalidConfig("dynamic_range_db must be positive"));
        }
        if self.image_height == 0 {
            return Err(SpectrogramError::InvalidConfig("image_height must be non-zero"));
        }
        if self.width_table.is_empty() {
            return Err(SpectrogramError::InvalidConfig("width_table must not be empty"));
        }
        Ok(())
    }
}
