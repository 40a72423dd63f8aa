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

//! audio-reactor detects beats in a per-frame audio energy signal and maps
//! the signal level onto output ranges, to drive visual effects (colors,
//! blend factors, particle toggles) from live or streamed audio.
//!
//! The crate is `no_std`-compatible but needs `alloc`.
//!
//! # How it works
//!
//! The host calls [`AudioEventListener::tick`] from its fixed-rate update
//! loop. Each tick, the listener pulls one sample from an [`AudioSampler`]
//! (for example, the level of the bass band of a playing track) and:
//!
//! 1. feeds it into a [`BeatDetector`]. The detector keeps a sliding
//!    [`SampleWindow`] of recent samples and reports a beat when the sample
//!    exceeds `threshold * running average`. In the default
//!    [`DetectionMode::Adaptive`], the threshold factor is
//!    `1 + deviation ratio` and lies in `[1, 2]`: the more the signal varies,
//!    the bigger a spike has to be. After a beat, the detector stays locked
//!    until the energy falls back below `(2 - threshold) * average`, so a
//!    single kick doesn't trigger multiple beats.
//!    [`DetectionMode::Manual`] uses a fixed factor instead and fires on
//!    every tick above it.
//! 2. maps the sample, relative to the loudest sample in the window, onto
//!    the output range of a [`FrequencyMapper`] and hands the result to the
//!    bound callback.
//!
//! Beats are delivered synchronously to the listeners registered on the
//! detector instance. There is no global state; any number of listeners,
//! e.g., one per source and band, can run side by side.
//!
//! # Example
//! ```rust
//! use audio_reactor::{AudioEventListener, BandSelector, DetectorConfig, MapperConfig};
//! use core::convert::Infallible;
//!
//! let config = DetectorConfig::default().with_band(BandSelector::Bass);
//! let mut listener = AudioEventListener::new(0, config)?.with_mapper(MapperConfig::new(0.2, 1.0));
//! listener.detector_mut().subscribe(|beat| println!("beat: {beat:?}"));
//! listener.mapper_mut().unwrap().bind(|brightness| println!("brightness: {brightness}"));
//!
//! let mut level = 0.0;
//! let mut sampler = |_source: usize, _band: BandSelector| {
//!     level = (level + 0.37) % 1.0;
//!     Ok::<_, Infallible>(level)
//! };
//! for _ in 0..100 {
//!     listener.tick(&mut sampler)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Crate features
//! - `recording`: [`stdlib::recording::InputLevelSampler`], a sampler over an
//!   audio input device, using `cpal`. Needs `std`.
//! - `serde`: `Serialize` and `Deserialize` for the configuration types.
//! - `std`: marker for `std` functionality.

#![no_std]
#![deny(clippy::all, missing_debug_implementations)]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod audio_listener;
mod beat_detector;
mod config;
mod frequency_mapper;
mod listeners;
mod sample;
mod sample_window;
mod sampler;
mod smoothing;

#[cfg(feature = "std")]
pub mod stdlib;

#[cfg(test)]
mod test_utils;

pub use audio_listener::AudioEventListener;
pub use beat_detector::{
    BeatDetector, BeatEvent, DetectorState, RefractoryState, MAX_ADAPTIVE_THRESHOLD,
    MIN_ADAPTIVE_THRESHOLD,
};
pub use config::{
    BandSelector, ConfigurationError, DetectionMode, DetectorConfig, DEFAULT_FIXED_THRESHOLD,
    DEFAULT_WINDOW_CAPACITY,
};
pub use frequency_mapper::{map, FrequencyMapper, MapperConfig};
pub use listeners::{BeatListeners, ListenerId};
pub use sample::{EnergySample, InvalidSampleError};
pub use sample_window::SampleWindow;
pub use sampler::{AudioSampler, TickError};
pub use smoothing::{ColorRamp, Lerp, Rgba, Smoother};
