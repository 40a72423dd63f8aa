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

//! Module for sampling the level of an audio input device.

use crate::{AudioSampler, BandSelector};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, StreamConfig};
use std::string::ToString;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors when starting to record.
#[derive(Debug, Error)]
pub enum StartRecordingError {
    /// There was no audio device provided and no default device can be found.
    #[error("no input device given and no default input device available")]
    NoDefaultAudioDevice,
    /// There was a problem detecting the input stream config.
    #[error("failed to query the input stream config")]
    InputConfigError(#[source] cpal::DefaultStreamConfigError),
    /// Failed to build an input stream.
    #[error("failed to build the input stream")]
    FailedBuildingInputStream(#[source] cpal::BuildStreamError),
    /// The stream can't be started.
    #[error("failed to start the input stream")]
    InputError(#[source] cpal::PlayStreamError),
}

/// A query that an [`InputLevelSampler`] can't answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SampleLevelError {
    /// The sampler only knows a single source, the input device, with index 0.
    #[error("unknown audio source {0}")]
    UnknownSource(usize),
    /// Only [`BandSelector::Decibel`] is available without band splitting.
    #[error("band {0:?} is not supported")]
    UnsupportedBand(BandSelector),
}

/// [`AudioSampler`] over an audio input device. The audio thread stores the
/// RMS of every input buffer; [`AudioSampler::sample`] returns the most
/// recent one as the [`BandSelector::Decibel`] level of source `0`.
///
/// Recording stops when this is dropped.
pub struct InputLevelSampler {
    level: Arc<AtomicU32>,
    _stream: cpal::Stream,
}

impl InputLevelSampler {
    /// Opens a mono input stream on the given device, or the default input
    /// device, and starts recording.
    pub fn start(preferred_input_dev: Option<cpal::Device>) -> Result<Self, StartRecordingError> {
        let input_dev = preferred_input_dev.map(Ok).unwrap_or_else(|| {
            let host = cpal::default_host();
            log::debug!("Using '{:?}' as input framework", host.id());
            host.default_input_device()
                .ok_or(StartRecordingError::NoDefaultAudioDevice)
        })?;

        log::debug!(
            "Using '{}' as input device",
            input_dev.name().unwrap_or_else(|_| "<unknown>".to_string())
        );

        let supported_input_config = input_dev
            .default_input_config()
            .map_err(StartRecordingError::InputConfigError)?;

        log::trace!(
            "Supported input configurations: {:#?}",
            supported_input_config
        );

        let input_config = StreamConfig {
            channels: 1,
            sample_rate: supported_input_config.sample_rate(),
            buffer_size: BufferSize::Default,
        };

        log::debug!("Input configuration: {:#?}", input_config);

        let level = Arc::new(AtomicU32::new(0.0_f32.to_bits()));
        let level_cpy = level.clone();

        // Under the hood, this spawns a thread.
        let stream = input_dev
            .build_input_stream(
                &input_config,
                move |data: &[f32], _info| {
                    let rms = rms(data);
                    log::trace!("audio input callback: {} samples, rms = {rms}", data.len());
                    level_cpy.store(rms.to_bits(), Ordering::Relaxed);
                },
                |e| {
                    log::error!("Input error: {e:#?}");
                },
                // Timeout: worst case max blocking time
                Some(Duration::from_secs(1)),
            )
            .map_err(StartRecordingError::FailedBuildingInputStream)?;

        stream
            .play()
            .map_err(StartRecordingError::InputError)?;

        Ok(Self {
            level,
            _stream: stream,
        })
    }

    /// The most recent level.
    #[must_use]
    pub fn level(&self) -> f32 {
        f32::from_bits(self.level.load(Ordering::Relaxed))
    }
}

impl core::fmt::Debug for InputLevelSampler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InputLevelSampler")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl AudioSampler for InputLevelSampler {
    type Error = SampleLevelError;

    fn sample(&mut self, source_index: usize, band: BandSelector) -> Result<f32, Self::Error> {
        if source_index != 0 {
            return Err(SampleLevelError::UnknownSource(source_index));
        }
        match band {
            BandSelector::Decibel => Ok(self.level()),
            band => Err(SampleLevelError::UnsupportedBand(band)),
        }
    }
}

/// Root mean square of the samples. `0.0` for no samples.
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum = samples
        .iter()
        .map(|sample| sample * sample)
        .sum::<f32>();
    let rms = libm::sqrtf(sum / samples.len() as f32);
    // A broken driver must not poison the detector.
    if rms.is_finite() {
        rms
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use float_cmp::approx_eq;

    #[test]
    fn rms_of_known_signals() {
        check!(rms(&[]) == 0.0);
        check!(rms(&[0.0; 64]) == 0.0);
        check!(rms(&[0.5, -0.5, 0.5, -0.5]) == 0.5);
        check!(approx_eq!(
            f32,
            rms(&[1.0, 0.0]),
            core::f32::consts::FRAC_1_SQRT_2,
            epsilon = 1e-6
        ));
        check!(rms(&[f32::NAN]) == 0.0);
    }
}
