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

//! Module for [`AudioEventListener`], the per-tick entry point that ties a
//! sampler, a [`BeatDetector`] and a [`FrequencyMapper`] together.

use crate::beat_detector::{BeatDetector, BeatEvent};
use crate::config::{ConfigurationError, DetectorConfig};
use crate::frequency_mapper::{FrequencyMapper, MapperConfig};
use crate::sampler::{AudioSampler, TickError};

/// Listens to one band of one audio source.
///
/// On each [`AudioEventListener::tick`], the sampler is queried exactly once.
/// The sample goes into the detector; afterwards, the detector's
/// [`normalized_peak`] is mapped by the mapper, if one is attached.
///
/// ## Example
/// ```rust
/// use audio_reactor::{AudioEventListener, BandSelector, DetectorConfig, MapperConfig};
/// use core::convert::Infallible;
///
/// let mut listener = AudioEventListener::new(0, DetectorConfig::default())?
///     .with_mapper(MapperConfig::new(0.0, 255.0));
/// listener.detector_mut().subscribe(|_beat| println!("beat!"));
///
/// // A host would query its audio engine here.
/// let mut sampler = |_source: usize, _band: BandSelector| Ok::<_, Infallible>(0.3);
///
/// // TODO call this from the fixed-rate update loop.
/// let beat = listener.tick(&mut sampler)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// [`normalized_peak`]: BeatDetector::normalized_peak
#[derive(Debug)]
pub struct AudioEventListener {
    source_index: usize,
    detector: BeatDetector,
    mapper: Option<FrequencyMapper>,
}

impl AudioEventListener {
    /// Creates a listener for the audio source with index `source_index`.
    pub fn new(source_index: usize, config: DetectorConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            source_index,
            detector: BeatDetector::new(config)?,
            mapper: None,
        })
    }

    /// Attaches a mapper with the given output range.
    #[must_use]
    pub fn with_mapper(mut self, config: MapperConfig) -> Self {
        self.mapper.replace(FrequencyMapper::new(config));
        self
    }

    /// Performs one tick: sample, detect, map.
    ///
    /// A failing sampler fails the tick; detector and mapper stay untouched.
    pub fn tick<S: AudioSampler>(
        &mut self,
        sampler: &mut S,
    ) -> Result<Option<BeatEvent>, TickError<S::Error>> {
        let band = self.detector.config().band;
        let sample = sampler
            .sample(self.source_index, band)
            .map_err(TickError::Sampler)?;

        let beat = self.detector.tick(sample)?;

        if let Some(mapper) = self.mapper.as_mut() {
            mapper.update(self.detector.normalized_peak());
        }

        Ok(beat)
    }

    #[must_use]
    pub const fn source_index(&self) -> usize {
        self.source_index
    }

    #[must_use]
    pub const fn detector(&self) -> &BeatDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut BeatDetector {
        &mut self.detector
    }

    #[must_use]
    pub const fn mapper(&self) -> Option<&FrequencyMapper> {
        self.mapper.as_ref()
    }

    pub fn mapper_mut(&mut self) -> Option<&mut FrequencyMapper> {
        self.mapper.as_mut()
    }
}
