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

//! Per-detector registry of beat listeners.

use crate::beat_detector::BeatEvent;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

/// Handle of a registered listener. Use it to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&BeatEvent) + Send>;

/// Fan-out of [`BeatEvent`]s to zero or more listeners. Listeners are
/// invoked synchronously in the order they were registered.
#[derive(Default)]
pub struct BeatListeners {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl BeatListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&BeatEvent) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != len_before
    }

    /// Delivers the event to every listener.
    pub fn notify(&mut self, event: &BeatEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Debug for BeatListeners {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BeatListeners")
            .field("len", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::sync::{Arc, Mutex};
    use std::vec;

    fn event(tick: u64) -> BeatEvent {
        BeatEvent {
            tick,
            sample: 1.0,
            threshold: 1.5,
            deviation_ratio: 0.5,
        }
    }

    #[test]
    fn is_send() {
        fn accept<I: Send>() {}

        accept::<BeatListeners>();
    }

    #[test]
    fn notifies_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = BeatListeners::new();

        for name in ["a", "b", "c"] {
            let log = log.clone();
            listeners.subscribe(move |event| log.lock().unwrap().push((name, event.tick)));
        }
        listeners.notify(&event(7));

        check!(*log.lock().unwrap() == vec![("a", 7), ("b", 7), ("c", 7)]);
    }

    #[test]
    fn unsubscribe_removes_only_the_given_listener() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = BeatListeners::new();

        let log_a = log.clone();
        let a = listeners.subscribe(move |_| log_a.lock().unwrap().push("a"));
        let log_b = log.clone();
        let _b = listeners.subscribe(move |_| log_b.lock().unwrap().push("b"));

        check!(listeners.unsubscribe(a));
        check!(!listeners.unsubscribe(a));
        check!(listeners.len() == 1);

        listeners.notify(&event(0));
        check!(*log.lock().unwrap() == vec!["b"]);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut listeners = BeatListeners::new();
        let a = listeners.subscribe(|_| {});
        listeners.unsubscribe(a);
        let b = listeners.subscribe(|_| {});
        check!(a != b);
    }
}
