// SPDX-License-Identifier: MIT OR Apache-2.0
//! User input delivered to the controller.
//!
//! Input producers (window events, UI buttons) hold an [`InputSender`] and
//! may push at any time. The controller drains the queue once at the start
//! of each tick, so it stays the only writer of mode and timeline state.

use std::sync::mpsc;

/// Discrete and continuous user input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Switch to the cinematic sequence
    RequestCinematic,
    /// Switch to user-controlled orbit
    RequestInteractive,
    /// Switch to whichever mode is not current
    ToggleMode,
    /// Pointer drag in pixels; only honoured in interactive mode
    OrbitDrag {
        /// Horizontal delta
        dx: f32,
        /// Vertical delta
        dy: f32,
    },
    /// Scroll zoom; only honoured in interactive mode
    OrbitZoom {
        /// Zoom amount (positive moves closer)
        delta: f32,
    },
    /// Jump the cinematic timeline to a time; only honoured in cinematic mode
    SeekCinematic {
        /// Target time in seconds
        time: f32,
    },
}

/// Producer half of the input queue
#[derive(Debug, Clone)]
pub struct InputSender {
    sender: mpsc::Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event. Returns `false` if the controller is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Consumer half of the input queue, owned by the controller
#[derive(Debug)]
pub struct InputQueue {
    receiver: mpsc::Receiver<InputEvent>,
}

impl InputQueue {
    /// Create a new queue and return `(sender, queue)`
    pub fn new() -> (InputSender, Self) {
        let (sender, receiver) = mpsc::channel();
        (InputSender { sender }, Self { receiver })
    }

    /// Take every event queued so far, oldest first
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }
}
