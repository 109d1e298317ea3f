//! Throttled progress reporting.

/// Report progress only every this many whole percentage points, so the
/// external callback is not flooded.
pub const PROGRESS_GRANULARITY: u8 = 2;

/// Callback receiving integer render progress, 0 to 100.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u8);

/// Throttles raw fractional progress down to occasional integer reports.
///
/// Holds the next threshold that must be crossed before the callback fires
/// again, so reported percentages are monotonically non-decreasing.
/// [`finish`](ProgressThrottle::finish) always reports exactly 100.
pub struct ProgressThrottle<'a> {
    callback: Option<ProgressFn<'a>>,
    granularity: u8,
    next_threshold: u8,
}

impl<'a> ProgressThrottle<'a> {
    pub fn new(callback: Option<ProgressFn<'a>>, granularity: u8) -> Self {
        Self {
            callback,
            granularity: granularity.max(1),
            next_threshold: granularity.max(1),
        }
    }

    /// Report raw progress as a percentage in `[0, 100]`. Fires the
    /// callback only when the truncated integer percentage reaches the
    /// current threshold.
    pub fn report(&mut self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0) as u8;
        if percent >= self.next_threshold {
            if let Some(callback) = self.callback.as_mut() {
                callback(percent);
            }
            self.next_threshold = (1 + percent / self.granularity) * self.granularity;
        }
    }

    /// Unconditionally report completion.
    pub fn finish(&mut self) {
        if let Some(callback) = self.callback.as_mut() {
            callback(100);
        }
    }
}
