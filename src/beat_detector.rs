/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Module for [`BeatDetector`].

use crate::config::{validate_fixed_threshold, ConfigurationError, DetectionMode, DetectorConfig};
use crate::listeners::{BeatListeners, ListenerId};
use crate::sample::{EnergySample, InvalidSampleError};
use crate::sample_window::SampleWindow;

/// Lower bound of the adaptive threshold factor.
pub const MIN_ADAPTIVE_THRESHOLD: f32 = 1.0;
/// Upper bound of the adaptive threshold factor.
pub const MAX_ADAPTIVE_THRESHOLD: f32 = 2.0;

/// Notification about a detected beat. Delivered to all listeners within the
/// tick it fired in and returned from [`BeatDetector::tick`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeatEvent {
    /// Number of the tick (starting at 1) that fired.
    pub tick: u64,
    /// The sample that triggered the beat.
    pub sample: f32,
    /// Threshold factor that was in effect.
    pub threshold: f32,
    /// Deviation ratio that was in effect. Always `0.0` in manual mode.
    pub deviation_ratio: f32,
}

/// Refractory state of the adaptive detection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefractoryState {
    /// A beat may fire.
    #[default]
    Armed,
    /// A beat fired and the energy has not decayed towards the baseline yet.
    Locked,
}

/// Values computed in the most recent tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DetectorState {
    pub current_sample: f32,
    pub running_average: f32,
    /// Mean absolute deviation from [`Self::running_average`].
    pub average_deviation: f32,
    /// `1 - (avg - deviation) / avg`, clamped to `[0, 1]`.
    pub deviation_ratio: f32,
    /// Threshold factor relative to the running average. In adaptive mode
    /// in `[1, 2]`; in manual mode the fixed threshold.
    pub threshold: f32,
    pub refractory: RefractoryState,
    /// Sample of the last beat. Only tracked in adaptive mode.
    pub last_beat_sample: f32,
    /// Deviation ratio at the last beat. Only tracked in adaptive mode.
    pub last_deviation_ratio: f32,
}

impl Default for DetectorState {
    fn default() -> Self {
        Self {
            current_sample: 0.0,
            running_average: 0.0,
            average_deviation: 0.0,
            deviation_ratio: 0.0,
            threshold: MIN_ADAPTIVE_THRESHOLD,
            refractory: RefractoryState::Armed,
            last_beat_sample: 0.0,
            last_deviation_ratio: 0.0,
        }
    }
}

impl DetectorState {
    /// The energy the current sample has to exceed for a beat.
    #[must_use]
    pub fn effective_threshold(&self) -> f32 {
        self.threshold * self.running_average
    }
}

/// Online beat detector over a per-tick energy signal.
///
/// Each [`BeatDetector::tick`] pushes the latest sample into a sliding window
/// and compares it against the window's running average:
///
/// - In [`DetectionMode::Adaptive`], the threshold factor grows with the
///   variance in the window (`1 + deviation ratio`, in `[1, 2]`), so loud
///   and noisy passages need a bigger spike. After a beat, the detector is
///   locked until the energy falls below `(2 - threshold) * average`.
/// - In [`DetectionMode::Manual`], every tick above
///   `fixed_threshold * average` is a beat.
///
/// ## Example
/// ```rust
/// use audio_reactor::{BeatDetector, DetectorConfig};
/// let mut detector = BeatDetector::new(DetectorConfig::default().with_window_capacity(4))?;
/// detector.subscribe(|beat| println!("beat at tick {}", beat.tick));
/// detector.prime(1.0)?;
///
/// // TODO regularly call this with the latest energy of the band.
/// let beat = detector.tick(10.0)?;
/// assert!(beat.is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct BeatDetector {
    // read-only fields
    config: DetectorConfig,
    // mutable fields
    window: SampleWindow,
    state: DetectorState,
    listeners: BeatListeners,
    ticks: u64,
}

impl BeatDetector {
    /// Creates a new detector with a silent window. Fails if the
    /// configuration is invalid.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let window = SampleWindow::new(config.window_capacity)?;
        let mut state = DetectorState::default();
        if let DetectionMode::Manual { fixed_threshold } = config.mode {
            state.threshold = fixed_threshold;
        }

        Ok(Self {
            config,
            window,
            state,
            listeners: BeatListeners::new(),
            ticks: 0,
        })
    }

    /// Consumes the sample of the current tick and reports whether it is a
    /// beat. Supposed to be called once per fixed time step. A beat is
    /// delivered to all listeners before this returns.
    ///
    /// Invalid samples (NaN, infinite, negative) are rejected and leave the
    /// detector untouched.
    pub fn tick(&mut self, current_sample: f32) -> Result<Option<BeatEvent>, InvalidSampleError> {
        let sample = EnergySample::new(current_sample)?;
        self.ticks += 1;
        self.window.push(sample);
        self.state.current_sample = sample.raw();
        self.state.running_average = self.window.mean();

        let is_beat = match self.config.mode {
            DetectionMode::Adaptive => self.detect_adaptive(),
            DetectionMode::Manual { fixed_threshold } => self.detect_manual(fixed_threshold),
        };

        if self.config.debug_trace {
            log::debug!(
                "sample: {} threshold: {}",
                self.state.current_sample,
                self.state.effective_threshold()
            );
        }

        if !is_beat {
            return Ok(None);
        }

        let event = BeatEvent {
            tick: self.ticks,
            sample: self.state.current_sample,
            threshold: self.state.threshold,
            deviation_ratio: self.state.deviation_ratio,
        };
        if self.config.debug_trace {
            log::debug!("beat detected: {:?}", event);
        }
        self.listeners.notify(&event);
        Ok(Some(event))
    }

    fn detect_adaptive(&mut self) -> bool {
        let state = &mut self.state;
        let avg = state.running_average;

        // Nothing in the window; the ratio would divide by zero. Energy is as
        // low as it gets, so this also ends a refractory period.
        if avg <= 0.0 {
            state.average_deviation = 0.0;
            state.deviation_ratio = 0.0;
            state.threshold = MIN_ADAPTIVE_THRESHOLD;
            state.refractory = RefractoryState::Armed;
            return false;
        }

        state.average_deviation = self.window.average_deviation(avg);
        let ratio = 1.0 - (avg - state.average_deviation) / avg;
        if ratio > 1.0 {
            log::trace!("clamping deviation ratio {ratio} to 1.0");
        }
        state.deviation_ratio = ratio.clamp(0.0, 1.0);
        state.threshold = MIN_ADAPTIVE_THRESHOLD + state.deviation_ratio;

        let sample = state.current_sample;
        if state.refractory == RefractoryState::Locked
            && sample < (MAX_ADAPTIVE_THRESHOLD - state.threshold) * avg
        {
            state.refractory = RefractoryState::Armed;
        }

        if state.refractory == RefractoryState::Armed && sample > state.threshold * avg {
            state.refractory = RefractoryState::Locked;
            state.last_beat_sample = sample;
            state.last_deviation_ratio = state.deviation_ratio;
            return true;
        }

        false
    }

    fn detect_manual(&mut self, fixed_threshold: f32) -> bool {
        let state = &mut self.state;
        state.threshold = fixed_threshold;
        state.running_average > 0.0
            && state.current_sample > fixed_threshold * state.running_average
    }

    /// Returns the current sample relative to the loudest sample in the
    /// window, in `[0, 1]`. Returns `0.0` for a silent window.
    #[must_use]
    pub fn normalized_peak(&self) -> f32 {
        let max = self.window.max();
        if max > 0.0 {
            self.state.current_sample / max
        } else {
            0.0
        }
    }

    /// Changes the threshold factor in manual mode.
    pub fn set_fixed_threshold(&mut self, threshold: f32) -> Result<(), ConfigurationError> {
        validate_fixed_threshold(threshold)?;
        match &mut self.config.mode {
            DetectionMode::Manual { fixed_threshold } => {
                *fixed_threshold = threshold;
                self.state.threshold = threshold;
                Ok(())
            }
            DetectionMode::Adaptive => Err(ConfigurationError::NotInManualMode),
        }
    }

    /// Fills the whole window with `level` and re-arms the detector, as if
    /// the signal had been steady at that level for a full window.
    pub fn prime(&mut self, level: f32) -> Result<(), InvalidSampleError> {
        let level = EnergySample::new(level)?;
        self.window.fill(level);
        self.state.current_sample = level.raw();
        self.state.running_average = level.raw();
        self.state.average_deviation = 0.0;
        self.state.deviation_ratio = 0.0;
        self.state.threshold = match self.config.mode {
            DetectionMode::Adaptive => MIN_ADAPTIVE_THRESHOLD,
            DetectionMode::Manual { fixed_threshold } => fixed_threshold,
        };
        self.state.refractory = RefractoryState::Armed;
        Ok(())
    }

    /// Back to a silent window and a fresh state. Listeners stay registered.
    pub fn reset(&mut self) {
        self.window.clear();
        let mut state = DetectorState::default();
        if let DetectionMode::Manual { fixed_threshold } = self.config.mode {
            state.threshold = fixed_threshold;
        }
        self.state = state;
        self.ticks = 0;
    }

    /// Registers a beat listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&BeatEvent) + Send + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Removes a beat listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    #[must_use]
    pub const fn state(&self) -> &DetectorState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    #[must_use]
    pub const fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// Amount of ticks since creation or the last [`Self::reset`].
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}
