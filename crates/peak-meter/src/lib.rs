//! Decibel peak level meter for integer audio sample blocks.
//!
//! [`PeakMeter`] turns each block into a dBFS reading relative to the
//! configured bit depth, applies peak-hold and return-time ballistics, and
//! reports the result to a [`PeakMeterListener`].

mod error;
mod level;
mod listener;
mod meter;
mod settings;

pub use error::MeterError;
pub use level::{CLIP_DB, Level, SILENT_DB, block_peak, calculate_peak};
pub use listener::{ChannelListener, PeakMeterListener, Reading, RecordingListener};
pub use meter::{INITIAL_LEVEL_DB, PEAK_HOLD_FLOOR_DB, PeakMeter};
pub use settings::MeterSettings;
