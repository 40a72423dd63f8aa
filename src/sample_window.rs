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

//! Helpers for the sliding window of recent energy samples.
//!
//! The window always holds exactly `capacity` samples. It is pre-filled with
//! silence and every new sample replaces the oldest one. All statistics are
//! therefore computed over the full capacity, also during warm-up.
//!
//! See [`SampleWindow`].

use crate::config::ConfigurationError;
use crate::sample::EnergySample;
use ringbuffer::{AllocRingBuffer, RingBuffer};

/// Fixed-capacity ring buffer of [`EnergySample`]s with the statistics the
/// beat detection needs.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    buffer: AllocRingBuffer<f32>,
}

impl SampleWindow {
    /// Creates a new window filled with silence.
    pub fn new(capacity: usize) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroWindowCapacity);
        }

        let mut buffer = AllocRingBuffer::new(capacity);
        for _ in 0..capacity {
            buffer.push(0.0);
        }
        debug_assert!(buffer.is_full());

        Ok(Self { buffer })
    }

    /// Replaces the oldest sample with the given one.
    #[inline]
    pub fn push(&mut self, sample: EnergySample) {
        self.buffer.push(sample.raw());
    }

    /// Overwrites every slot with `level`.
    pub fn fill(&mut self, level: EnergySample) {
        for _ in 0..self.capacity() {
            self.buffer.push(level.raw());
        }
    }

    /// Overwrites every slot with silence.
    pub fn clear(&mut self) {
        self.fill(EnergySample::ZERO);
    }

    /// Capacity of the window. This is also its length.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Iterates the samples from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.buffer.iter().copied()
    }

    /// The most recent sample.
    #[must_use]
    pub fn latest(&self) -> f32 {
        self.buffer.back().copied().unwrap_or_default()
    }

    /// Arithmetic mean of all samples in the window.
    #[must_use]
    pub fn mean(&self) -> f32 {
        self.average_of(|sample| sample)
    }

    /// Mean of the absolute differences between each sample and `mean`.
    #[must_use]
    pub fn average_deviation(&self, mean: f32) -> f32 {
        self.average_of(|sample| libm::fabsf(sample - mean))
    }

    /// Average of `f` over the window. Stays finite for finite values: if
    /// the plain sum overflows, every term is scaled down before summing.
    fn average_of(&self, f: impl Fn(f32) -> f32) -> f32 {
        let len = self.capacity() as f32;
        let sum = self.iter().map(&f).sum::<f32>();
        if sum.is_finite() {
            sum / len
        } else {
            self.iter().map(|sample| f(sample) / len).sum()
        }
    }

    /// The loudest sample in the window. As samples are non-negative, this
    /// is `0.0` for a silent window.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.iter().fold(0.0, f32::max)
    }
}
