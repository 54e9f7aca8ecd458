/// Stand-in for negative infinity dB in the listener contract.
pub const SILENT_DB: f64 = -999.0;

/// Full scale. Readings at or above this are clipping.
pub const CLIP_DB: f64 = 0.0;

/// A single dBFS reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Level {
    /// Digital zero.
    Silent,
    Db(f64),
}

impl Level {
    pub fn db(self) -> f64 {
        match self {
            Level::Silent => SILENT_DB,
            Level::Db(db) => db,
        }
    }

    pub fn is_clipping(self) -> bool {
        matches!(self, Level::Db(db) if db >= CLIP_DB)
    }
}

/// Largest absolute sample in the block, 0 for an empty block.
pub fn block_peak(samples: &[i32]) -> u32 {
    samples
        .iter()
        .copied()
        .map(i32::unsigned_abs)
        .fold(0, u32::max)
}

/// Converts a peak magnitude to dB relative to `reference`.
///
/// `reference` must be non-zero; [`crate::PeakMeter`] guarantees this by
/// refusing to process before a bit depth is set.
pub fn calculate_peak(peak: u32, reference: f64) -> Level {
    if peak > 0 {
        Level::Db(20.0 * (f64::from(peak) / reference).log10())
    } else {
        Level::Silent
    }
}
