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

//! Synthetic signals and a scripted [`AudioSampler`] for the tests.

use crate::config::BandSelector;
use crate::sampler::AudioSampler;
use std::vec::Vec;
use thiserror::Error;

/// Generators for per-tick energy signals.
pub mod signals {
    use super::*;

    /// `len` ticks of the same level.
    pub fn constant(level: f32, len: usize) -> Vec<f32> {
        [level].repeat(len)
    }

    /// `count` kicks, one every `period` ticks. Each kick decays over three
    /// ticks, dips below the baseline for two ticks (release), and then
    /// stays at the baseline.
    pub fn kick_pattern(baseline: f32, peak: f32, period: usize, count: usize) -> Vec<f32> {
        let envelope = [peak, peak * 0.8, peak * 0.3, baseline * 0.25, baseline * 0.25];
        assert!(period >= envelope.len());

        (0..period * count)
            .map(|tick| envelope.get(tick % period).copied().unwrap_or(baseline))
            .collect()
    }
}

/// Captures the log output of the current test thread.
pub mod capture_logs {
    use core::cell::RefCell;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::format;
    use std::string::String;
    use std::sync::Once;
    use std::vec::Vec;

    std::thread_local! {
        static CAPTURED: RefCell<Option<Vec<(Level, String)>>> = const { RefCell::new(None) };
    }

    /// Records messages only on threads that are inside [`debug_lines`].
    struct ThreadLocalLogger;

    impl Log for ThreadLocalLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            CAPTURED.with_borrow_mut(|captured| {
                if let Some(captured) = captured {
                    captured.push((record.level(), format!("{}", record.args())));
                }
            });
        }

        fn flush(&self) {}
    }

    static LOGGER: ThreadLocalLogger = ThreadLocalLogger;
    static INSTALL: Once = Once::new();

    /// Runs `f` and returns its result together with all `debug` messages it
    /// logged on this thread.
    pub fn debug_lines<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        INSTALL.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });

        CAPTURED.with_borrow_mut(|captured| *captured = Some(Vec::new()));
        let result = f();
        let records = CAPTURED
            .with_borrow_mut(Option::take)
            .unwrap_or_default();

        let lines = records
            .into_iter()
            .filter(|(level, _)| *level == Level::Debug)
            .map(|(_, line)| line)
            .collect();
        (result, lines)
    }
}

/// The script of a [`ScriptedSampler`] ran out of samples.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("the sampler script is exhausted")]
pub struct ScriptExhausted;

/// Sampler that replays a fixed list of samples and records every query.
#[derive(Debug, Default)]
pub struct ScriptedSampler {
    script: Vec<f32>,
    position: usize,
    pub queries: Vec<(usize, BandSelector)>,
}

impl ScriptedSampler {
    pub fn new(script: impl Into<Vec<f32>>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }
}

impl AudioSampler for ScriptedSampler {
    type Error = ScriptExhausted;

    fn sample(&mut self, source_index: usize, band: BandSelector) -> Result<f32, Self::Error> {
        self.queries.push((source_index, band));
        let sample = self.script.get(self.position).copied().ok_or(ScriptExhausted)?;
        self.position += 1;
        Ok(sample)
    }
}

#[test]
fn kick_pattern_has_the_expected_shape() {
    let samples = signals::kick_pattern(0.2, 1.0, 8, 2);
    assert_eq!(samples.len(), 16);
    assert_eq!(&samples[..8], &[1.0, 0.8, 0.3, 0.05, 0.05, 0.2, 0.2, 0.2]);
    assert_eq!(&samples[..8], &samples[8..]);
}
