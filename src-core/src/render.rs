//! The rendering pipeline orchestrator.
//!
//! Drives the stages in a fixed sequence: read windows and compute spectra,
//! normalize against the global peak, fold time windows into pixel columns,
//! map columns to colors, hand the pixel buffer to the sink. Any stage
//! failure aborts the whole render; no partial image is produced.

use tracing::debug;

use crate::accumulate::{accumulate_columns, target_width};
use crate::blocks::BlockReader;
use crate::colormap::SpectrogramColorMap;
use crate::config::SpectrogramConfig;
use crate::error::{Result, SpectrogramError};
use crate::normalize::normalize_in_place;
use crate::progress::{ProgressFn, ProgressThrottle, PROGRESS_GRANULARITY};
use crate::sink::ImageSink;
use crate::source::AudioSource;

/// Fraction of total work attributed to each stage, in percent. The
/// remaining 5% is reserved for the final encode.
const STEP_PERCENTAGE_FFT: f64 = 40.0;
const STEP_PERCENTAGE_NORMALIZE: f64 = 5.0;
const STEP_PERCENTAGE_ACCUMULATE: f64 = 10.0;
const STEP_PERCENTAGE_DRAW: f64 = 40.0;

/// Dimensions of a successfully rendered image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedSize {
    pub width: u32,
    pub height: u32,
}

/// Render a spectrogram of `source` into `sink`.
///
/// The pipeline runs synchronously to completion in this call. `source` is
/// owned by the pipeline and dropped on every exit path; `sink` is borrowed
/// exclusively for the duration. `progress`, when present, receives
/// monotonically non-decreasing integer percentages, throttled to every
/// couple of points, with a final call of exactly 100 once the sink write
/// has succeeded.
pub fn render_spectrogram<S, K>(
    source: S,
    sink: &mut K,
    config: &SpectrogramConfig,
    progress: Option<ProgressFn<'_>>,
) -> Result<RenderedSize>
where
    S: AudioSource,
    K: ImageSink,
{
    config.validate()?;
    let mut throttle = ProgressThrottle::new(progress, PROGRESS_GRANULARITY);

    // Stage: reading windows and computing spectra.
    let mut reader = BlockReader::new(
        source,
        config.fft_block_size,
        config.fft_overlap,
        config.min_frequency,
        config.max_frequency,
        Some(config.image_height),
    )?;
    let total_seconds = reader.total_seconds();
    debug!("reading spectra: {:.2}s of audio", total_seconds);

    reader.reset()?;
    let mut spectra = Vec::new();
    while let Some((spectrum, position_seconds)) = reader.next_spectrum()? {
        spectra.push(spectrum);
        throttle.report(STEP_PERCENTAGE_FFT * (position_seconds / total_seconds));
    }
    if spectra.is_empty() {
        return Err(SpectrogramError::DegenerateInput(
            "audio source produced no windows",
        ));
    }
    let peak = reader.peak_amplitude();
    let mut total_progress = STEP_PERCENTAGE_FFT;

    // Stage: peak-relative log normalization. The peak is only final now
    // that every window has been observed.
    debug!("normalizing {} spectra against peak {:.6}", spectra.len(), peak);
    let spectra_count = spectra.len();
    for (i, spectrum) in spectra.iter_mut().enumerate() {
        normalize_in_place(spectrum, peak, config.dynamic_range_db);
        throttle.report(
            total_progress + STEP_PERCENTAGE_NORMALIZE * (i as f64 / spectra_count as f64),
        );
    }
    total_progress += STEP_PERCENTAGE_NORMALIZE;

    // Stage: folding windows into pixel columns.
    let width = target_width(total_seconds, &config.width_table);
    debug!("accumulating {} spectra into <= {} columns", spectra_count, width);
    let columns = accumulate_columns(&spectra, width, |fraction| {
        throttle.report(total_progress + STEP_PERCENTAGE_ACCUMULATE * fraction);
    });
    drop(spectra);
    total_progress += STEP_PERCENTAGE_ACCUMULATE;

    // Stage: drawing. The realized column count is the image width from
    // here on.
    let map = SpectrogramColorMap::new(columns);
    let size = RenderedSize {
        width: map.width() as u32,
        height: map.height() as u32,
    };
    debug!("drawing {}x{} pixels", size.width, size.height);
    let base = total_progress;
    let pixels = map.color_data(|percent| {
        throttle.report(base + STEP_PERCENTAGE_DRAW * (percent / 100.0));
    });

    // Stage: encoding.
    sink.write_rgb(size.width, size.height, &pixels)?;
    throttle.finish();
    Ok(size)
}
