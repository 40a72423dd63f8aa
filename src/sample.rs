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

//! Validated energy samples as delivered by an [`AudioSampler`].
//!
//! [`AudioSampler`]: crate::AudioSampler

use core::fmt::{Display, Formatter};
use thiserror::Error;

/// A sample that can't be fed into a [`SampleWindow`].
///
/// [`SampleWindow`]: crate::SampleWindow
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum InvalidSampleError {
    /// The sample is NaN or infinite.
    #[error("sample {0} is not a finite number")]
    NotFinite(f32),
    /// Energy can't be negative.
    #[error("sample {0} is negative")]
    Negative(f32),
}

/// Lightweight wrapper around a `f32` that is guaranteed to be finite and
/// non-negative. This is what the running average and deviation
/// calculations rely on; a single NaN would otherwise poison the whole
/// window until it is rotated out.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct EnergySample(f32);

impl EnergySample {
    /// The silent sample.
    pub const ZERO: Self = Self(0.0);

    /// Constructs a new sample.
    pub fn new(value: f32) -> Result<Self, InvalidSampleError> {
        if !value.is_finite() {
            Err(InvalidSampleError::NotFinite(value))
        } else if value < 0.0 {
            Err(InvalidSampleError::Negative(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Returns the inner value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for EnergySample {
    type Error = InvalidSampleError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EnergySample> for f32 {
    fn from(value: EnergySample) -> Self {
        value.0
    }
}

impl PartialEq<f32> for EnergySample {
    fn eq(&self, other: &f32) -> bool {
        self.0.eq(other)
    }
}

impl Display for EnergySample {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn accepts_finite_non_negative_values() {
        check!(EnergySample::new(0.0).map(EnergySample::raw) == Ok(0.0));
        check!(EnergySample::new(0.25).map(EnergySample::raw) == Ok(0.25));
        check!(EnergySample::new(1e6).map(EnergySample::raw) == Ok(1e6));
        // -0.0 compares equal to 0.0 and is no negative energy
        check!(EnergySample::new(-0.0).is_ok());
    }

    #[test]
    fn rejects_invalid_values() {
        check!(EnergySample::new(-0.1) == Err(InvalidSampleError::Negative(-0.1)));
        check!(
            EnergySample::new(f32::INFINITY) == Err(InvalidSampleError::NotFinite(f32::INFINITY))
        );
        check!(matches!(
            EnergySample::new(f32::NAN),
            Err(InvalidSampleError::NotFinite(_))
        ));
    }
}
