//! Streaming FFT over fixed-size windows of an audio source.
//!
//! [`BlockReader`] walks the source in consecutive (optionally overlapping)
//! windows, mixes all channels down to mono, applies a Hann window and
//! computes the amplitude spectrum of each block restricted to the
//! configured frequency band. Spectra are produced one at a time; raw
//! samples are never retained after their FFT.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{Result, SpectrogramError};
use crate::source::AudioSource;

/// Amplitude spectrum of one window, paired with the playback-time offset
/// (in seconds) of the position just past that window.
pub type TimedSpectrum = (Vec<f64>, f64);

/// Streams band-filtered amplitude spectra from an audio source.
///
/// The sequence is single-pass: one full iteration per explicit [`reset`]
/// call, which seeks the source back to frame 0. The running peak amplitude
/// accumulates across all windows seen so far and survives resets.
///
/// [`reset`]: BlockReader::reset
pub struct BlockReader<S: AudioSource> {
    source: S,
    block_size: usize,
    overlap: usize,
    min_freq: f64,
    max_freq: f64,
    /// Target bin count; `None` keeps the filtered bin count.
    num_bins: Option<usize>,
    /// Precomputed Hann window coefficients.
    window: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
    /// Mono mix of the current window.
    mono: Vec<f64>,
    /// Frames consumed from the source so far.
    pos: u64,
    /// Whether the first window of the current pass has been read.
    primed: bool,
    /// Peak amplitude over the filtered (pre-resize) spectrum of every
    /// window emitted so far. Monotonically non-decreasing.
    peak: f64,
}

impl<S: AudioSource> std::fmt::Debug for BlockReader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockReader")
            .field("block_size", &self.block_size)
            .field("overlap", &self.overlap)
            .field("min_freq", &self.min_freq)
            .field("max_freq", &self.max_freq)
            .field("num_bins", &self.num_bins)
            .field("pos", &self.pos)
            .field("primed", &self.primed)
            .field("peak", &self.peak)
            .finish_non_exhaustive()
    }
}

impl<S: AudioSource> BlockReader<S> {
    /// Create a reader over `source`.
    ///
    /// Rejects sources with zero frames up front, before any division by
    /// duration can happen downstream.
    pub fn new(
        source: S,
        block_size: usize,
        overlap: usize,
        min_freq: f64,
        max_freq: f64,
        num_bins: Option<usize>,
    ) -> Result<Self> {
        if source.total_frames() == 0 {
            return Err(SpectrogramError::DegenerateInput(
                "audio source contains no frames",
            ));
        }
        let fft = FftPlanner::new().plan_fft_forward(block_size);
        Ok(Self {
            source,
            block_size,
            overlap,
            min_freq,
            max_freq,
            num_bins,
            window: hann_window(block_size),
            fft,
            mono: vec![0.0; block_size],
            pos: 0,
            primed: false,
            peak: 0.0,
        })
    }

    /// Total playback length of the source in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.source.duration_seconds()
    }

    /// Peak amplitude of the filtered spectrum across all windows seen so
    /// far. Final once iteration completes.
    pub fn peak_amplitude(&self) -> f64 {
        self.peak
    }

    /// Seek the source back to frame 0 and start a new pass. Does not
    /// reset the running peak amplitude.
    pub fn reset(&mut self) -> Result<()> {
        self.source.seek(0)?;
        self.pos = 0;
        self.primed = false;
        Ok(())
    }

    /// Compute the spectrum of the next window, or `None` when the source
    /// is exhausted. The final window is zero-padded to the block size.
    pub fn next_spectrum(&mut self) -> Result<Option<TimedSpectrum>> {
        let step = self.block_size - self.overlap;
        let channels = self.source.channels();

        let (dst_start, frames_wanted) = if self.primed {
            // Carry the overlapping tail of the previous window forward.
            if self.overlap > 0 {
                self.mono.copy_within(step.., 0);
            }
            (self.overlap, step)
        } else {
            (0, self.block_size)
        };

        let mut interleaved = vec![0.0; frames_wanted * channels];
        let frames_read = self.source.read_frames(&mut interleaved)?;
        if frames_read == 0 {
            return Ok(None);
        }
        self.pos += frames_read as u64;
        self.primed = true;

        // Mix down to mono by summing channels; amplitude is intentionally
        // additive across channels. Pad a short final window with zeros.
        for i in 0..frames_wanted {
            self.mono[dst_start + i] = if i < frames_read {
                interleaved[i * channels..(i + 1) * channels].iter().sum()
            } else {
                0.0
            };
        }

        let mut buf: Vec<Complex<f64>> = self
            .mono
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        self.fft.process(&mut buf);

        // Real input: only the first N/2 + 1 bins are distinct.
        let half = self.block_size / 2 + 1;
        let amplitude: Vec<f64> = buf[..half].iter().map(|c| c.norm()).collect();

        let mut amplitude = self.filter_freq_range(amplitude);
        let block_max = amplitude.iter().copied().fold(0.0, f64::max);
        if block_max > self.peak {
            self.peak = block_max;
        }

        if let Some(bins) = self.num_bins {
            amplitude = resize_amplitudes(&amplitude, bins);
        }

        let timestamp = self.pos as f64 / f64::from(self.source.sample_rate());
        Ok(Some((amplitude, timestamp)))
    }

    /// Keep only bins between `min_freq` and `max_freq`.
    ///
    /// The order matters: pad or truncate the high end first, then slice
    /// off the low end. Swapping the two changes the edge-bin count.
    fn filter_freq_range(&self, mut amplitude: Vec<f64>) -> Vec<f64> {
        let nyquist = self.source.sample_rate() / 2;
        let num_bins = amplitude.len();
        let bin_width = f64::from(nyquist) / num_bins as f64;
        let start = (self.min_freq / bin_width) as usize;
        let end = (self.max_freq / bin_width) as usize;
        if end >= num_bins {
            amplitude.resize(end + 1, 0.0);
        } else {
            amplitude.truncate(end + 1);
        }
        amplitude.split_off(start.min(amplitude.len()))
    }
}

/// Hann window coefficients for a block of `size` samples.
pub fn hann_window(size: usize) -> Vec<f64> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|n| {
            0.5 - 0.5 * (2.0 * std::f64::consts::PI * n as f64 / (size - 1) as f64).cos()
        })
        .collect()
}

/// Resize an amplitude array to exactly `new_size` values.
///
/// Growing uses nearest-neighbor upsampling; shrinking partitions the input
/// into `new_size` contiguous slices (the first `len % new_size` of them one
/// element longer) and keeps the max of each, so no peak is lost. Equal
/// lengths pass through unchanged.
pub fn resize_amplitudes(values: &[f64], new_size: usize) -> Vec<f64> {
    let len = values.len();
    if len == new_size {
        return values.to_vec();
    }
    if new_size > len {
        return (0..new_size).map(|i| values[(i * len) / new_size]).collect();
    }
    let base = len / new_size;
    let extra = len % new_size;
    let mut result = Vec::with_capacity(new_size);
    let mut offset = 0;
    for i in 0..new_size {
        let slice_len = if i < extra { base + 1 } else { base };
        let slice = &values[offset..offset + slice_len];
        result.push(slice.iter().copied().fold(f64::MIN, f64::max));
        offset += slice_len;
    }
    result
}
