//! Spectrogram rendering core.
//!
//! Converts a decoded audio stream into an RGB spectrogram image: the
//! horizontal axis is time, the vertical axis is frequency and pixel color
//! encodes log-scaled amplitude. Audio comes in through the
//! [`AudioSource`] abstraction (WAV files via [`WavFileSource`]), the
//! rendered pixels leave through an [`ImageSink`] ([`ImageFileSink`] encodes
//! PNG/JPEG), and fractional progress is reported through an optional
//! callback.
//!
//! ```no_run
//! use spectral_core::{render_spectrogram, ImageFileSink, SpectrogramConfig, WavFileSource};
//!
//! # fn main() -> spectral_core::Result<()> {
//! let source = WavFileSource::open("input.wav")?;
//! let mut sink = ImageFileSink::new("spectrogram.png");
//! let size = render_spectrogram(source, &mut sink, &SpectrogramConfig::default(), None)?;
//! println!("rendered {}x{}", size.width, size.height);
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline is single-threaded and synchronous; one call runs to
//! completion. Computed per-window spectra are held in memory until the
//! global peak is known, so memory scales with audio duration rather than
//! block size. Callers needing cancellation can observe state from inside
//! the progress callback.

pub mod accumulate;
pub mod blocks;
pub mod colormap;
pub mod config;
pub mod error;
pub mod normalize;
pub mod progress;
pub mod render;
pub mod sink;
pub mod source;

pub use blocks::BlockReader;
pub use colormap::SpectrogramColorMap;
pub use config::{SpectrogramConfig, WidthBucket};
pub use error::{Result, SpectrogramError};
pub use progress::ProgressFn;
pub use render::{render_spectrogram, RenderedSize};
pub use sink::{ImageFileSink, ImageSink};
pub use source::{AudioSource, WavFileSource};
