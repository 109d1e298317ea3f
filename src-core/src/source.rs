//! Audio source abstraction and the WAV file implementation.
//!
//! The pipeline consumes audio through [`AudioSource`], a frame-addressable
//! view of a decoded stream: interleaved samples, a fixed sample rate and a
//! known total frame count. Decoding itself lives behind this trait; the
//! built-in implementation reads WAV files through `hound`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, SpectrogramError};

/// A decoded, frame-addressable audio stream.
///
/// One frame holds one sample per channel, interleaved. Implementations are
/// owned exclusively by the pipeline for its duration and released on drop,
/// on every exit path.
pub trait AudioSource {
    /// Number of interleaved channels.
    fn channels(&self) -> usize;

    /// Sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Total number of frames in the stream.
    fn total_frames(&self) -> u64;

    /// Seek to an absolute frame offset.
    fn seek(&mut self, frame: u64) -> Result<()>;

    /// Read interleaved samples into `buf` (its length is a multiple of the
    /// channel count) and return the number of whole frames read. Zero
    /// frames signals end of stream.
    fn read_frames(&mut self, buf: &mut [f64]) -> Result<usize>;

    /// Total playback length in seconds.
    fn duration_seconds(&self) -> f64 {
        self.total_frames() as f64 / self.sample_rate() as f64
    }
}

/// [`AudioSource`] over a WAV file.
///
/// Integer samples (8/16/24/32-bit) are normalized to `[-1, 1]`; float
/// samples pass through unchanged.
pub struct WavFileSource {
    reader: hound::WavReader<BufReader<File>>,
    channels: usize,
    sample_rate: u32,
    total_frames: u64,
    /// Scale applied to integer samples; 1.0 for float input.
    scale: f64,
    float_samples: bool,
}

impl std::fmt::Debug for WavFileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavFileSource")
            .field("channels", &self.channels)
            .field("sample_rate", &self.sample_rate)
            .field("total_frames", &self.total_frames)
            .field("scale", &self.scale)
            .field("float_samples", &self.float_samples)
            .finish_non_exhaustive()
    }
}

impl WavFileSource {
    /// Open a WAV file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let reader = hound::WavReader::open(path.as_ref())
            .map_err(|e| SpectrogramError::SourceUnreadable(e.to_string()))?;
        let spec = reader.spec();
        let total_frames = u64::from(reader.duration());
        let float_samples = spec.sample_format == hound::SampleFormat::Float;
        let scale = if float_samples {
            1.0
        } else {
            1.0 / f64::from(1u32 << (spec.bits_per_sample - 1))
        };
        Ok(Self {
            reader,
            channels: usize::from(spec.channels),
            sample_rate: spec.sample_rate,
            total_frames,
            scale,
            float_samples,
        })
    }
}

impl AudioSource for WavFileSource {
    fn channels(&self) -> usize {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn seek(&mut self, frame: u64) -> Result<()> {
        self.reader
            .seek(frame as u32)
            .map_err(|e| SpectrogramError::SourceUnreadable(e.to_string()))
    }

    fn read_frames(&mut self, buf: &mut [f64]) -> Result<usize> {
        let mut filled = 0;
        if self.float_samples {
            for sample in self.reader.samples::<f32>().take(buf.len()) {
                buf[filled] = f64::from(sample?);
                filled += 1;
            }
        } else {
            for sample in self.reader.samples::<i32>().take(buf.len()) {
                buf[filled] = f64::from(sample?) * self.scale;
                filled += 1;
            }
        }
        Ok(filled / self.channels)
    }
}

/// In-memory [`AudioSource`] used by unit tests across the crate.
#[cfg(test)]
pub(crate) mod testing {
    use super::AudioSource;
    use crate::error::Result;

    pub(crate) struct MemorySource {
        /// Interleaved samples.
        samples: Vec<f64>,
        channels: usize,
        sample_rate: u32,
        /// Read position in frames.
        pos: usize,
    }

    impl MemorySource {
        pub(crate) fn new(samples: Vec<f64>, channels: usize, sample_rate: u32) -> Self {
            assert_eq!(samples.len() % channels, 0);
            Self {
                samples,
                channels,
                sample_rate,
                pos: 0,
            }
        }

        /// Mono sine wave at `freq` Hz lasting `seconds`.
        pub(crate) fn sine(freq: f64, seconds: f64, sample_rate: u32) -> Self {
            let total = (seconds * sample_rate as f64) as usize;
            let samples = (0..total)
                .map(|i| {
                    (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin()
                })
                .collect();
            Self::new(samples, 1, sample_rate)
        }

        /// Mono silence lasting `seconds`.
        pub(crate) fn silence(seconds: f64, sample_rate: u32) -> Self {
            let total = (seconds * sample_rate as f64) as usize;
            Self::new(vec![0.0; total], 1, sample_rate)
        }
    }

    impl AudioSource for MemorySource {
        fn channels(&self) -> usize {
            self.channels
        }

        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn total_frames(&self) -> u64 {
            (self.samples.len() / self.channels) as u64
        }

        fn seek(&mut self, frame: u64) -> Result<()> {
            self.pos = frame as usize;
            Ok(())
        }

        fn read_frames(&mut self, buf: &mut [f64]) -> Result<usize> {
            let start = self.pos * self.channels;
            let available = self.samples.len().saturating_sub(start);
            let count = buf.len().min(available);
            buf[..count].copy_from_slice(&self.samples[start..start + count]);
            let frames = count / self.channels;
            self.pos += frames;
            Ok(frames)
        }
    }
}
