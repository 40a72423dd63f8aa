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

//! The capability that delivers energy samples, see [`AudioSampler`].

use crate::config::BandSelector;
use crate::sample::InvalidSampleError;
use thiserror::Error;

/// Source of per-tick energy samples, such as an audio engine that measures
/// the level of its playing sources.
///
/// A sample must be stable within a tick and non-negative. It may change
/// arbitrarily between ticks.
///
/// Closures of the form `FnMut(usize, BandSelector) -> Result<f32, E>` are
/// samplers as well.
pub trait AudioSampler {
    /// Error of a failed sampling attempt.
    type Error;

    /// Returns the energy of `band` of the audio source with index
    /// `source_index` for the current tick.
    fn sample(&mut self, source_index: usize, band: BandSelector) -> Result<f32, Self::Error>;
}

impl<F, E> AudioSampler for F
where
    F: FnMut(usize, BandSelector) -> Result<f32, E>,
{
    type Error = E;

    fn sample(&mut self, source_index: usize, band: BandSelector) -> Result<f32, Self::Error> {
        self(source_index, band)
    }
}

/// A failed tick. Nothing is retried; the tick has no effect on the
/// detector.
#[derive(Debug, Error)]
pub enum TickError<E> {
    /// The sampler failed.
    #[error("sampling the audio source failed")]
    Sampler(#[source] E),
    /// The sampler delivered an unusable value.
    #[error("the sampler delivered an invalid sample")]
    InvalidSample(#[from] InvalidSampleError),
}
