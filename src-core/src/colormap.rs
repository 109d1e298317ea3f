//! Quantized color palette and pixel buffer generation.

/// Control colors spanning low to high intensity, darkest first. The first
/// two entries carry fractional channels (they are quarter- and half-scaled
/// versions of brighter colors) which participate in interpolation before
/// rounding.
const CONTROL_COLORS: [[f64; 3]; 6] = [
    [14.5, 17.0, 16.25],
    [40.0, 50.0, 76.5],
    [90.0, 180.0, 100.0],
    [224.0, 224.0, 44.0],
    [255.0, 60.0, 30.0],
    [255.0, 255.0, 255.0],
];

/// Interpolation steps generated between each adjacent control-color pair.
const STEPS_PER_SEGMENT: usize = 200;

/// Interpolate between two colors in the energy (squared) domain.
///
/// Quadratic interpolation biases toward brighter midtones compared to
/// linear RGB blending; the rendered output depends on this exact formula.
fn color_between(begin: [f64; 3], end: [f64; 3], t: f64) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (channel, value) in out.iter_mut().enumerate() {
        let mixed = ((1.0 - t) * begin[channel] * begin[channel]
            + t * end[channel] * end[channel])
            .sqrt()
            .round();
        *value = mixed.min(255.0) as u8;
    }
    out
}

/// Build the full palette: 200 steps for each adjacent control-color pair,
/// `t` ranging over `[0, 1)` in equal steps. With 6 control colors the
/// palette holds exactly 1000 entries. Built once per render, immutable
/// afterward.
pub fn build_palette() -> Vec<[u8; 3]> {
    let mut colors = Vec::with_capacity((CONTROL_COLORS.len() - 1) * STEPS_PER_SEGMENT);
    for pair in CONTROL_COLORS.windows(2) {
        for step in 0..STEPS_PER_SEGMENT {
            let t = step as f64 / STEPS_PER_SEGMENT as f64;
            colors.push(color_between(pair[0], pair[1], t));
        }
    }
    colors
}

/// Maps normalized spectrogram columns to a flat RGB pixel buffer.
pub struct SpectrogramColorMap {
    /// Normalized columns; row 0 of each column is the lowest frequency.
    columns: Vec<Vec<f64>>,
    width: usize,
    height: usize,
    palette: Vec<[u8; 3]>,
}

impl SpectrogramColorMap {
    /// Takes ownership of the accumulated columns. Every column must have
    /// the same length.
    pub fn new(columns: Vec<Vec<f64>>) -> Self {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        Self {
            columns,
            width,
            height,
            palette: build_palette(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Render the columns into a row-major RGB buffer, top row first.
    ///
    /// Row 0 of each column (the lowest frequency) lands on the bottom
    /// pixel row. Every pixel is a discrete palette entry; no interpolation
    /// happens at mapping time. `progress` receives the percentage of
    /// columns completed so far.
    pub fn color_data(&self, mut progress: impl FnMut(f64)) -> Vec<u8> {
        let palette_len = self.palette.len();
        let mut pixels = vec![0u8; self.width * self.height * 3];
        for (x, column) in self.columns.iter().enumerate() {
            for y in 0..self.height {
                let value = column[self.height - y - 1];
                let index = ((palette_len as f64 * value).round() as usize)
                    .min(palette_len - 1);
                let color = self.palette[index];
                let offset = (x + self.width * y) * 3;
                pixels[offset..offset + 3].copy_from_slice(&color);
            }
            progress(100.0 * x as f64 / self.width as f64);
        }
        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_holds_five_segments_of_200() {
        assert_eq!(build_palette().len(), 1000);
    }

    #[test]
    fn palette_starts_at_first_control_color() {
        let palette = build_palette();
        // Rounded fractional control channels: (14.5, 17.0, 16.25).
        assert_eq!(palette[0], [15, 17, 16]);
    }

    #[test]
    fn segment_boundaries_land_on_control_colors() {
        let palette = build_palette();
        assert_eq!(palette[2 * 200], [90, 180, 100]);
        assert_eq!(palette[3 * 200], [224, 224, 44]);
        assert_eq!(palette[4 * 200], [255, 60, 30]);
    }

    #[test]
    fn interpolation_is_energy_domain() {
        // Midway between black-ish and white, quadratic mixing sits well
        // above the linear midpoint.
        let mid = color_between([0.0, 0.0, 0.0], [255.0, 255.0, 255.0], 0.5);
        let expected = (0.5f64 * 255.0 * 255.0).sqrt().round() as u8;
        assert_eq!(mid, [expected; 3]);
        assert!(mid[0] > 128);
    }

    #[test]
    fn channels_clamp_at_255() {
        let c = color_between([255.0, 255.0, 255.0], [255.0, 255.0, 255.0], 0.5);
        assert_eq!(c, [255, 255, 255]);
    }

    #[test]
    fn mapped_pixels_come_from_the_palette() {
        let columns = vec![vec![0.0, 0.25, 0.5, 0.75, 1.0]; 3];
        let map = SpectrogramColorMap::new(columns);
        let palette = build_palette();
        let pixels = map.color_data(|_| {});
        for pixel in pixels.chunks(3) {
            let rgb = [pixel[0], pixel[1], pixel[2]];
            assert!(palette.contains(&rgb));
        }
    }

    #[test]
    fn extreme_values_hit_palette_ends() {
        let columns = vec![vec![0.0, 1.0]];
        let map = SpectrogramColorMap::new(columns);
        let palette = build_palette();
        let pixels = map.color_data(|_| {});
        // Row 1 (value 1.0) is the top pixel row, row 0 the bottom.
        assert_eq!(&pixels[0..3], &palette[999]);
        assert_eq!(&pixels[3..6], &palette[0]);
    }

    #[test]
    fn low_frequencies_render_at_the_bottom() {
        // One column: bottom row bright, top row dark.
        let columns = vec![vec![1.0, 0.0]];
        let map = SpectrogramColorMap::new(columns);
        let pixels = map.color_data(|_| {});
        let palette = build_palette();
        let top = &pixels[0..3];
        let bottom = &pixels[3..6];
        assert_eq!(top, &palette[0]);
        assert_eq!(bottom, &palette[999]);
    }

    #[test]
    fn progress_reports_per_column() {
        let columns = vec![vec![0.0]; 4];
        let map = SpectrogramColorMap::new(columns);
        let mut reports = Vec::new();
        map.color_data(|p| reports.push(p));
        assert_eq!(reports, vec![0.0, 25.0, 50.0, 75.0]);
    }
}
