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
//! Detects beats in the level of the default audio input device, e.g., a
//! microphone, at a 50 Hz tick rate. Stops on Ctrl+C.

use audio_reactor::stdlib::recording::InputLevelSampler;
use audio_reactor::{AudioEventListener, DetectorConfig, MapperConfig};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(20);

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .init()
        .unwrap();

    let recording = Arc::new(AtomicBool::new(true));
    let recording_cpy = recording.clone();
    ctrlc::set_handler(move || {
        eprintln!("Stopping recording");
        recording_cpy.store(false, Ordering::SeqCst);
    })
    .unwrap();

    let mut sampler = InputLevelSampler::start(None).unwrap();
    let mut listener = AudioEventListener::new(0, DetectorConfig::default())
        .unwrap()
        .with_mapper(MapperConfig::new(0.0, 40.0));
    listener.detector_mut().subscribe(|beat| {
        println!("Found beat at tick {} (level {:.3})", beat.tick, beat.sample);
    });
    listener.mapper_mut().unwrap().bind(|bar_len| {
        let bar_len = bar_len as usize;
        print!("\r[{:<40}]", "#".repeat(bar_len));
    });

    while recording.load(Ordering::SeqCst) {
        listener.tick(&mut sampler).unwrap();
        std::thread::sleep(TICK);
    }
}
