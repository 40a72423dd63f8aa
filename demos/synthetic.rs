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
//! Drives an [`AudioEventListener`] with a synthetic kick pattern at a fixed
//! tick rate and prints beats and the mapped brightness. Needs no audio
//! device.

use audio_reactor::{
    AudioEventListener, BandSelector, ColorRamp, DetectorConfig, MapperConfig, Rgba, Smoother,
};
use core::convert::Infallible;
use log::LevelFilter;
use rand::Rng;
use simple_logger::SimpleLogger;
use std::sync::{Arc, Mutex};

/// 50 Hz.
const TICK_SECONDS: f32 = 0.02;
/// 120 BPM at 50 Hz.
const TICKS_PER_BEAT: usize = 25;

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    let config = DetectorConfig::default().with_band(BandSelector::Bass);
    let mut listener = AudioEventListener::new(0, config)
        .unwrap()
        .with_mapper(MapperConfig::new(0.0, 1.0));

    listener.detector_mut().subscribe(|beat| {
        log::info!(
            "beat at tick {:>3}: sample = {:.2}, threshold factor = {:.2}",
            beat.tick,
            beat.sample,
            beat.threshold
        );
    });

    let brightness = Arc::new(Mutex::new(0.0_f32));
    let brightness_cpy = brightness.clone();
    listener
        .mapper_mut()
        .unwrap()
        .bind(move |value| *brightness_cpy.lock().unwrap() = value);

    let ramp = ColorRamp::new(Rgba::new(0.0, 0.0, 0.4, 0.5), Rgba::new(1.0, 0.6, 0.0, 1.0));
    let mut color = Smoother::new(ramp.low, 10.0);

    let mut rng = rand::rng();
    let mut tick = 0_usize;
    let mut sampler = |_source: usize, _band: BandSelector| {
        let phase = tick % TICKS_PER_BEAT;
        tick += 1;
        let envelope = match phase {
            0 => 1.0,
            1 => 0.7,
            2 => 0.3,
            3 | 4 => 0.02,
            _ => 0.15,
        };
        Ok::<_, Infallible>(envelope + rng.random_range(0.0..0.05_f32))
    };

    for _ in 0..TICKS_PER_BEAT * 8 {
        listener.tick(&mut sampler).unwrap();
        let level = *brightness.lock().unwrap();
        let color = color.approach(ramp.evaluate(level), TICK_SECONDS);
        log::debug!("level = {level:.2}, color = {color:?}");
    }
}
