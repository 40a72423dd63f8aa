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

//! Configuration of a [`BeatDetector`].
//!
//! [`BeatDetector`]: crate::BeatDetector

use thiserror::Error;

/// Default capacity of the sample window. At a 50 Hz update rate this is a
/// history of 800 ms.
pub const DEFAULT_WINDOW_CAPACITY: usize = 40;

/// Default threshold factor for [`DetectionMode::Manual`].
pub const DEFAULT_FIXED_THRESHOLD: f32 = 1.3;

/// Invalid configuration, reported eagerly at construction time.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    /// The sample window needs room for at least one sample.
    #[error("the sample window capacity must be greater than zero")]
    ZeroWindowCapacity,
    /// The fixed threshold factor must be a finite, non-negative number.
    #[error("invalid fixed threshold: {0}")]
    InvalidFixedThreshold(f32),
    /// The fixed threshold can only be tuned in [`DetectionMode::Manual`].
    #[error("the fixed threshold can only be changed in manual mode")]
    NotInManualMode,
}

/// How the beat threshold is determined.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectionMode {
    /// The threshold follows the variance of the sample window and a
    /// refractory lock prevents multiple triggers per beat.
    #[default]
    Adaptive,
    /// A beat is reported on every tick where the current sample exceeds
    /// `fixed_threshold * average`. Meant for hand-tuned tracks; there is no
    /// debouncing.
    Manual {
        /// Threshold factor relative to the running average.
        fixed_threshold: f32,
    },
}

impl DetectionMode {
    /// Manual mode with [`DEFAULT_FIXED_THRESHOLD`].
    #[must_use]
    pub const fn manual() -> Self {
        Self::Manual {
            fixed_threshold: DEFAULT_FIXED_THRESHOLD,
        }
    }
}

/// Named frequency channel that is sampled independently.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BandSelector {
    /// Overall level of the signal.
    #[default]
    Decibel,
    SubBass,
    Bass,
    LowMidrange,
    Midrange,
    UpperMidrange,
    High,
    VeryHigh,
}

impl BandSelector {
    /// Nominal frequency range in Hz (inclusive lower bound, exclusive upper
    /// bound). [`BandSelector::Decibel`] covers the whole signal and has no
    /// range.
    ///
    /// This is metadata for sampler implementations; this crate doesn't do
    /// any band splitting.
    #[must_use]
    pub const fn frequency_range_hz(self) -> Option<(f32, f32)> {
        match self {
            Self::Decibel => None,
            Self::SubBass => Some((20.0, 60.0)),
            Self::Bass => Some((60.0, 250.0)),
            Self::LowMidrange => Some((250.0, 500.0)),
            Self::Midrange => Some((500.0, 2000.0)),
            Self::UpperMidrange => Some((2000.0, 4000.0)),
            Self::High => Some((4000.0, 6000.0)),
            Self::VeryHigh => Some((6000.0, 20000.0)),
        }
    }
}

/// Configuration for a [`BeatDetector`].
///
/// ```rust
/// use audio_reactor::{BandSelector, DetectionMode, DetectorConfig};
/// let config = DetectorConfig::default()
///     .with_band(BandSelector::Bass)
///     .with_mode(DetectionMode::manual())
///     .with_window_capacity(64);
/// assert!(config.validate().is_ok());
/// ```
///
/// [`BeatDetector`]: crate::BeatDetector
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Adaptive or manual threshold.
    pub mode: DetectionMode,
    /// Band the detector listens to.
    pub band: BandSelector,
    /// Amount of samples in the sliding window.
    pub window_capacity: usize,
    /// Log sample and threshold on every tick (`debug` level).
    pub debug_trace: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            mode: DetectionMode::default(),
            band: BandSelector::default(),
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            debug_trace: false,
        }
    }
}

impl DetectorConfig {
    #[must_use]
    pub const fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_band(mut self, band: BandSelector) -> Self {
        self.band = band;
        self
    }

    #[must_use]
    pub const fn with_window_capacity(mut self, window_capacity: usize) -> Self {
        self.window_capacity = window_capacity;
        self
    }

    #[must_use]
    pub const fn with_debug_trace(mut self, debug_trace: bool) -> Self {
        self.debug_trace = debug_trace;
        self
    }

    /// Checks all properties.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.window_capacity == 0 {
            return Err(ConfigurationError::ZeroWindowCapacity);
        }
        if let DetectionMode::Manual { fixed_threshold } = self.mode {
            validate_fixed_threshold(fixed_threshold)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_fixed_threshold(threshold: f32) -> Result<(), ConfigurationError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidFixedThreshold(threshold))
    }
}
