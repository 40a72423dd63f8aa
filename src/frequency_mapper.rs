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

//! Maps a normalized value onto an output range, see [`FrequencyMapper`].

use alloc::boxed::Box;
use core::fmt::{Debug, Formatter};

/// Output range of a [`FrequencyMapper`]. `output_min > output_max` is
/// allowed and inverts the mapping.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapperConfig {
    pub output_min: f32,
    pub output_max: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl MapperConfig {
    #[must_use]
    pub const fn new(output_min: f32, output_max: f32) -> Self {
        Self {
            output_min,
            output_max,
        }
    }

    /// Shortcut for [`map`].
    #[inline]
    #[must_use]
    pub fn map(&self, normalized_value: f32) -> f32 {
        map(normalized_value, self)
    }
}

/// Maps `normalized_value` linearly onto `[output_min, output_max]`.
///
/// Values outside of `[0, 1]` are extrapolated, not clamped.
#[inline]
#[must_use]
pub fn map(normalized_value: f32, config: &MapperConfig) -> f32 {
    let delta = config.output_max - config.output_min;
    config.output_min + delta * normalized_value
}

type Callback = Box<dyn FnMut(f32) + Send>;

/// Maps a value once per tick and hands it to the bound parameter, if any.
///
/// The raw mapped value is delivered. Consumers that want a smooth visual
/// transition interpolate themselves, for example with a
/// [`Smoother`](crate::Smoother).
pub struct FrequencyMapper {
    config: MapperConfig,
    on_change: Option<Callback>,
}

impl FrequencyMapper {
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            on_change: None,
        }
    }

    /// Binds the downstream parameter. Replaces a previously bound one.
    pub fn bind(&mut self, on_change: impl FnMut(f32) + Send + 'static) {
        self.on_change.replace(Box::new(on_change));
    }

    /// Unbinds the downstream parameter. Returns whether one was bound.
    pub fn unbind(&mut self) -> bool {
        self.on_change.take().is_some()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.on_change.is_some()
    }

    /// Maps the value of this tick and delivers it.
    pub fn update(&mut self, normalized_value: f32) -> f32 {
        let value = self.config.map(normalized_value);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(value);
        }
        value
    }

    #[must_use]
    pub const fn config(&self) -> &MapperConfig {
        &self.config
    }
}

impl Debug for FrequencyMapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrequencyMapper")
            .field("config", &self.config)
            .field("is_bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    #[test]
    fn is_send() {
        fn accept<I: Send>() {}

        accept::<FrequencyMapper>();
    }

    #[test]
    fn maps_linearly() {
        let config = MapperConfig::new(0.0, 10.0);
        check!(map(0.0, &config) == 0.0);
        check!(map(0.5, &config) == 5.0);
        check!(map(1.0, &config) == 10.0);
    }

    #[test]
    fn extrapolates_without_clamping() {
        let config = MapperConfig::new(0.0, 10.0);
        check!(map(1.5, &config) == 15.0);
        check!(map(-0.5, &config) == -5.0);
    }

    #[test]
    fn inverted_range() {
        let config = MapperConfig::new(10.0, 0.0);
        check!(config.map(0.25) == 7.5);
        check!(config.map(1.0) == 0.0);
    }

    #[test]
    fn mapping_is_pure() {
        let config = MapperConfig::new(-3.7, 12.9);
        for value in [0.0, 0.1, 0.333, 0.9, 1.7] {
            check!(map(value, &config).to_bits() == map(value, &config).to_bits());
        }
    }

    #[test]
    fn update_delivers_once_per_call() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let mut mapper = FrequencyMapper::new(MapperConfig::new(2.0, 4.0));

        // nothing bound: still maps
        check!(mapper.update(0.5) == 3.0);

        let received_cpy = received.clone();
        mapper.bind(move |value| received_cpy.lock().unwrap().push(value));
        check!(mapper.update(0.0) == 2.0);
        check!(mapper.update(1.0) == 4.0);
        check!(*received.lock().unwrap() == [2.0, 4.0]);

        check!(mapper.unbind());
        check!(!mapper.unbind());
        mapper.update(0.5);
        check!(received.lock().unwrap().len() == 2);
    }
}
