use std::{
    fmt::Debug,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

use crossbeam::channel::{self, Receiver, Sender, TrySendError};

/// Receives the values produced by [`crate::PeakMeter`].
///
/// Both methods are called synchronously from whichever thread drives the
/// meter, usually the audio thread, so implementations must not block.
/// Values are in dB: 0 is full scale, [`crate::SILENT_DB`] is silence.
pub trait PeakMeterListener: Send + Debug {
    fn receive_peak_holder_value(&mut self, value: f64);
    fn receive_peak_meter_value(&mut self, value: f64);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
    PeakHold(f64),
    Meter(f64),
}

/// Forwards readings over a bounded channel, dropping them when it is full.
///
/// Clones share the drop counter, so keep one clone to read [`Self::dropped`]
/// after handing the other to the meter.
#[derive(Clone, Debug)]
pub struct ChannelListener {
    sender: Sender<Reading>,
    dropped: Arc<AtomicUsize>,
}

impl ChannelListener {
    pub fn new(capacity: usize) -> (Self, Receiver<Reading>) {
        let (sender, receiver) = channel::bounded(capacity);
        (
            Self {
                sender,
                dropped: Arc::default(),
            },
            receiver,
        )
    }

    /// Number of readings discarded because the receiver fell behind.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    fn send(&self, reading: Reading) {
        match self.sender.try_send(reading) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            // Nobody is watching the meter any more.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

impl PeakMeterListener for ChannelListener {
    fn receive_peak_holder_value(&mut self, value: f64) {
        self.send(Reading::PeakHold(value));
    }

    fn receive_peak_meter_value(&mut self, value: f64) {
        self.send(Reading::Meter(value));
    }
}

/// Keeps every reading in memory. Clones share the same log, so one clone
/// can be handed to the meter while another is inspected.
///
/// Recording takes a write lock, which can block while another clone is
/// reading. Use it in tests or when polling from a non-realtime thread, not
/// on an audio callback; [`ChannelListener`] is the non-blocking choice.
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    log: Arc<RwLock<Vec<Reading>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.read().clone()
    }

    pub fn peak_hold_values(&self) -> Vec<f64> {
        self.read()
            .iter()
            .filter_map(|r| match r {
                Reading::PeakHold(v) => Some(*v),
                Reading::Meter(_) => None,
            })
            .collect()
    }

    pub fn meter_values(&self) -> Vec<f64> {
        self.read()
            .iter()
            .filter_map(|r| match r {
                Reading::Meter(v) => Some(*v),
                Reading::PeakHold(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Reading>> {
        self.log.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, reading: Reading) {
        self.log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reading);
    }
}

impl PeakMeterListener for RecordingListener {
    fn receive_peak_holder_value(&mut self, value: f64) {
        self.push(Reading::PeakHold(value));
    }

    fn receive_peak_meter_value(&mut self, value: f64) {
        self.push(Reading::Meter(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_listener_forwards_in_order() {
        let (mut listener, receiver) = ChannelListener::new(4);
        listener.receive_peak_holder_value(-3.0);
        listener.receive_peak_meter_value(-3.0);

        assert_eq!(Ok(Reading::PeakHold(-3.0)), receiver.try_recv());
        assert_eq!(Ok(Reading::Meter(-3.0)), receiver.try_recv());
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn channel_listener_drops_when_full() {
        let (mut listener, receiver) = ChannelListener::new(1);
        listener.receive_peak_meter_value(-1.0);
        listener.receive_peak_meter_value(-2.0);
        listener.receive_peak_meter_value(-3.0);

        assert_eq!(2, listener.dropped());
        assert_eq!(Ok(Reading::Meter(-1.0)), receiver.try_recv());
    }

    #[test]
    fn channel_listener_clones_share_drop_count() {
        let (listener, _receiver) = ChannelListener::new(1);
        let mut handle = listener.clone();
        handle.receive_peak_meter_value(-1.0);
        handle.receive_peak_meter_value(-2.0);

        assert_eq!(1, listener.dropped());
    }

    #[test]
    fn channel_listener_survives_disconnected_receiver() {
        let (mut listener, receiver) = ChannelListener::new(1);
        drop(receiver);
        listener.receive_peak_meter_value(-1.0);
        assert_eq!(0, listener.dropped());
    }

    #[test]
    fn recording_listener_clones_share_log() {
        let recorder = RecordingListener::new();
        let mut handle = recorder.clone();
        handle.receive_peak_holder_value(-6.0);
        handle.receive_peak_meter_value(-6.0);
        handle.receive_peak_meter_value(-7.0);

        assert_eq!(vec![-6.0], recorder.peak_hold_values());
        assert_eq!(vec![-6.0, -7.0], recorder.meter_values());

        recorder.clear();
        assert!(recorder.readings().is_empty());
    }
}
