//! Input delivery for a [`Field`](crate::Field).
//!
//! Input sources run at their own cadence, often on another thread. They push
//! [`InputEvent`]s through an [`InputSender`]; the field drains the queue once
//! at the start of every tick, applying events in the order they were sent.
//!
//! # Usage
//!
//! ```ignore
//! let sender = field.input_sender();
//! std::thread::spawn(move || {
//!     sender.send(InputEvent::PointerMoved { x: 120.0, y: 80.0 });
//! });
//! ```
//!
//! With the `window` feature, [`InputTranslator`] turns winit window events
//! into input events.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use crate::time::Clock;

/// Something the user did to the pointer or the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse moved, in surface pixels.
    PointerMoved { x: f32, y: f32 },
    /// Mouse entered the surface.
    PointerEntered,
    /// First finger touched down.
    TouchStarted { x: f32, y: f32 },
    /// First finger moved.
    TouchMoved { x: f32, y: f32 },
    /// Viewport changed size.
    Resized { width: f32, height: f32 },
}

/// An input event stamped with the time it was sent.
pub type TimedInput = (Instant, InputEvent);

/// Cloneable, thread-safe handle for pushing input into a field.
#[derive(Clone)]
pub struct InputSender {
    tx: Sender<TimedInput>,
    clock: Arc<dyn Clock>,
}

impl InputSender {
    /// Queue an event. Returns `false` if the field is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send((self.clock.now(), event)).is_ok()
    }
}

impl std::fmt::Debug for InputSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSender").finish_non_exhaustive()
    }
}

/// Receiving end held by the field.
#[derive(Debug)]
pub(crate) struct InputQueue {
    tx: Sender<TimedInput>,
    rx: Receiver<TimedInput>,
}

impl InputQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self, clock: Arc<dyn Clock>) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
            clock,
        }
    }

    /// Everything queued so far, oldest first.
    pub(crate) fn drain(&self) -> Vec<TimedInput> {
        self.rx.try_iter().collect()
    }
}

#[cfg(feature = "window")]
pub use translate::InputTranslator;

#[cfg(feature = "window")]
mod translate {
    use winit::event::{TouchPhase, WindowEvent};

    use super::InputEvent;

    /// Maps winit window events to [`InputEvent`]s.
    ///
    /// Only the first finger down is followed; other touches are ignored until
    /// it lifts.
    #[derive(Debug, Default)]
    pub struct InputTranslator {
        primary_touch: Option<u64>,
    }

    impl InputTranslator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
            match event {
                WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                }),
                WindowEvent::CursorEntered { .. } => Some(InputEvent::PointerEntered),
                WindowEvent::Resized(size) => Some(InputEvent::Resized {
                    width: size.width as f32,
                    height: size.height as f32,
                }),
                WindowEvent::Touch(touch) => {
                    let x = touch.location.x as f32;
                    let y = touch.location.y as f32;
                    match touch.phase {
                        TouchPhase::Started => {
                            if self.primary_touch.is_some() {
                                return None;
                            }
                            self.primary_touch = Some(touch.id);
                            Some(InputEvent::TouchStarted { x, y })
                        }
                        TouchPhase::Moved if self.primary_touch == Some(touch.id) => {
                            Some(InputEvent::TouchMoved { x, y })
                        }
                        TouchPhase::Ended | TouchPhase::Cancelled => {
                            if self.primary_touch == Some(touch.id) {
                                self.primary_touch = None;
                            }
                            None
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        }

        /// Id of the finger currently followed, if any.
        pub fn primary_touch(&self) -> Option<u64> {
            self.primary_touch
        }
    }
}
