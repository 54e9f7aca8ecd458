use tracing::{debug, trace, warn};

use crate::{
    CLIP_DB, Level, MeterError, MeterSettings, PeakMeterListener, SILENT_DB, block_peak,
    calculate_peak,
};

/// Meter level before the first block arrives.
pub const INITIAL_LEVEL_DB: f64 = -60.0;

/// New peaks quieter than this raise the meter but not the hold marker.
pub const PEAK_HOLD_FLOOR_DB: f64 = -60.0;

/// Peak meter with instant rise, linear (in dB) fall and clip latching.
///
/// Call [`PeakMeter::update_bitdepth`] before [`PeakMeter::process_block`].
/// The meter is not internally synchronised; drive it from one thread.
#[derive(Debug)]
pub struct PeakMeter {
    listener: Option<Box<dyn PeakMeterListener>>,
    actual_value: f64,
    return_time_value: f64,
    bit_depth: Option<u32>,
    reference_value: f64,
    maximum_dynamic_range: f64,
}

impl PeakMeter {
    pub fn new(listener: Option<Box<dyn PeakMeterListener>>) -> Self {
        Self {
            listener,
            actual_value: INITIAL_LEVEL_DB,
            return_time_value: 0.0,
            bit_depth: None,
            reference_value: 0.0,
            maximum_dynamic_range: 0.0,
        }
    }

    pub fn with_settings(
        listener: Option<Box<dyn PeakMeterListener>>,
        settings: &MeterSettings,
    ) -> Result<Self, MeterError> {
        let mut meter = Self::new(listener);
        meter.apply_settings(settings)?;
        Ok(meter)
    }

    pub fn apply_settings(&mut self, settings: &MeterSettings) -> Result<(), MeterError> {
        self.update_bitdepth(settings.bit_depth)?;
        self.set_return_time_value(settings.return_time);
        Ok(())
    }

    /// Recomputes the 0 dBFS reference and the usable dynamic range.
    ///
    /// Leaves the previous configuration in place if `bit_depth` is not in
    /// `1..=32`.
    pub fn update_bitdepth(&mut self, bit_depth: u32) -> Result<(), MeterError> {
        if !(1..=32).contains(&bit_depth) {
            warn!("PeakMeter: rejecting bit depth {bit_depth}");
            return Err(MeterError::InvalidBitDepth(bit_depth));
        }

        let full_scale = 2f64.powi(bit_depth as i32);
        self.reference_value = full_scale / 2.0;
        self.maximum_dynamic_range = 20.0 * (full_scale / 2.0).log10();
        self.bit_depth = Some(bit_depth);

        debug!(
            "PeakMeter: bit depth {}, reference {}, dynamic range {:.2} dB",
            bit_depth, self.reference_value, self.maximum_dynamic_range
        );
        Ok(())
    }

    /// Sets how many dB the meter falls per block once the signal drops.
    pub fn set_return_time_value(&mut self, value: f64) {
        debug!("PeakMeter: return time {value} dB per block");
        self.return_time_value = value;
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn PeakMeterListener>>) {
        self.listener = listener;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Feeds one buffer of samples through the meter.
    ///
    /// Without a listener this does nothing. With one, it fails only if no
    /// bit depth has been configured, in which case the state is untouched.
    pub fn process_block(&mut self, samples: &[i32]) -> Result<(), MeterError> {
        if self.listener.is_none() {
            return Ok(());
        }

        if self.bit_depth.is_none() {
            warn!("PeakMeter: call update_bitdepth before processing");
            return Err(MeterError::BitDepthNotSet);
        }

        let peak = calculate_peak(block_peak(samples), self.reference_value);
        self.emit_peak_value(peak);
        Ok(())
    }

    fn emit_peak_value(&mut self, level: Level) {
        let Some(listener) = self.listener.as_deref_mut() else {
            return;
        };
        let peak = level.db();

        if peak > self.actual_value {
            self.actual_value = peak;
            if peak >= PEAK_HOLD_FLOOR_DB {
                trace!("PeakMeter: new peak hold {peak:.2} dB");
                listener.receive_peak_holder_value(self.actual_value);
            }
        } else if level.is_clipping() {
            // Still clipping; hold the meter at full scale.
            self.actual_value = CLIP_DB;
        }

        listener.receive_peak_meter_value(self.actual_value);

        if peak < self.actual_value {
            if self.actual_value > -self.maximum_dynamic_range {
                self.actual_value -= self.return_time_value;
            } else {
                trace!("PeakMeter: reached floor");
                self.actual_value = SILENT_DB;
            }
        }
    }

    /// Puts the needle back to its starting position. Configuration is kept.
    pub fn reset(&mut self) {
        self.actual_value = INITIAL_LEVEL_DB;
    }

    pub fn actual_value(&self) -> f64 {
        self.actual_value
    }

    pub fn return_time_value(&self) -> f64 {
        self.return_time_value
    }

    pub fn bit_depth(&self) -> Option<u32> {
        self.bit_depth
    }

    pub fn reference_value(&self) -> f64 {
        self.reference_value
    }

    pub fn maximum_dynamic_range(&self) -> f64 {
        self.maximum_dynamic_range
    }
}
