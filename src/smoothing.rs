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

//! Helpers for consumers that turn raw per-tick values into smooth visual
//! transitions: [`Smoother`] and [`ColorRamp`].

/// Linear interpolation.
pub trait Lerp: Copy {
    /// Interpolates between `self` (`t = 0`) and `other` (`t = 1`).
    #[must_use]
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

/// RGBA color with components in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Lerp for Rgba {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r.lerp(other.r, t),
            g: self.g.lerp(other.g, t),
            b: self.b.lerp(other.b, t),
            a: self.a.lerp(other.a, t),
        }
    }
}

/// Two-stop color gradient, from `low` for quiet audio to `high` for loud
/// audio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorRamp {
    pub low: Rgba,
    pub high: Rgba,
}

impl ColorRamp {
    #[must_use]
    pub const fn new(low: Rgba, high: Rgba) -> Self {
        Self { low, high }
    }

    /// Color at `level`, clamped to `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, level: f32) -> Rgba {
        let level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
        self.low.lerp(self.high, level)
    }

    /// Like [`Self::evaluate`], but scales `level` by `sensitivity` before
    /// clamping. Raw RMS levels are usually small, so a gain above `1.0`
    /// spreads them over the whole ramp.
    #[must_use]
    pub fn evaluate_with_gain(&self, level: f32, sensitivity: f32) -> Rgba {
        self.evaluate(level * sensitivity)
    }
}

/// Exponential approach towards a moving target.
///
/// Each step covers `rate * dt` of the remaining distance (at most all of
/// it), so a higher rate follows the audio more tightly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Smoother<T: Lerp> {
    current: T,
    /// Fraction of the distance per second.
    rate: f32,
}

impl<T: Lerp> Smoother<T> {
    #[must_use]
    pub const fn new(initial: T, rate: f32) -> Self {
        Self {
            current: initial,
            rate,
        }
    }

    /// Moves towards `target` for a step of `dt` seconds and returns the new
    /// value.
    pub fn approach(&mut self, target: T, dt: f32) -> T {
        let t = (self.rate * dt).clamp(0.0, 1.0);
        self.current = self.current.lerp(target, t);
        self.current
    }

    /// Jumps to `value`.
    pub fn set(&mut self, value: T) {
        self.current = value;
    }

    #[must_use]
    pub const fn current(&self) -> T {
        self.current
    }

    #[must_use]
    pub const fn rate(&self) -> f32 {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use float_cmp::approx_eq;

    #[test]
    fn smoother_converges() {
        let mut smoother = Smoother::new(0.0_f32, 10.0);
        // 10/s * 0.05s = half of the distance per step
        check!(smoother.approach(1.0, 0.05) == 0.5);
        check!(smoother.approach(1.0, 0.05) == 0.75);

        for _ in 0..50 {
            smoother.approach(1.0, 0.05);
        }
        check!(approx_eq!(f32, smoother.current(), 1.0, epsilon = 1e-6));
    }

    #[test]
    fn smoother_never_overshoots() {
        let mut smoother = Smoother::new(0.0_f32, 10.0);
        // a long frame must not fling the value past the target
        check!(smoother.approach(4.0, 1.0) == 4.0);
        check!(smoother.approach(2.0, -1.0) == 4.0);
    }

    #[test]
    fn color_ramp_clamps_level() {
        let ramp = ColorRamp::new(Rgba::new(0.0, 0.0, 1.0, 0.5), Rgba::new(1.0, 0.0, 0.0, 1.0));
        check!(ramp.evaluate(-1.0) == ramp.low);
        check!(ramp.evaluate(f32::NAN) == ramp.low);
        check!(ramp.evaluate(2.0) == ramp.high);
        check!(ramp.evaluate(0.5) == Rgba::new(0.5, 0.0, 0.5, 0.75));
    }

    #[test]
    fn color_ramp_applies_gain_before_clamping() {
        let ramp = ColorRamp::new(Rgba::BLACK, Rgba::WHITE);
        check!(ramp.evaluate_with_gain(0.125, 4.0) == Rgba::new(0.5, 0.5, 0.5, 1.0));
        check!(ramp.evaluate_with_gain(0.5, 10.0) == Rgba::WHITE);
        check!(ramp.evaluate_with_gain(0.5, 1.0) == ramp.evaluate(0.5));
    }

    #[test]
    fn color_smoother() {
        let mut smoother = Smoother::new(Rgba::BLACK, 5.0);
        let color = smoother.approach(Rgba::WHITE, 0.1);
        check!(color == Rgba::new(0.5, 0.5, 0.5, 1.0));
    }
}
