//! Platform-neutral events and the event loop contract

use std::time::Instant;

use quill_core::{Key, Modifiers, MouseButtons};

use crate::error::Result;
use crate::window::Window;

/// Input from the user, in window pixel coordinates
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    MouseMoved { x: i32, y: i32 },
    /// `clicks` is 1 for a single click, 2 for a double click, and so on
    MouseDown { button: MouseButtons, clicks: u32 },
    MouseUp { button: MouseButtons, clicks: u32 },
    /// Wheel steps; positive y scrolls towards the top
    Scroll { x: i32, y: i32 },
    Key(Key),
    Text(String),
    Modifiers(Modifiers),
    CursorEntered,
    CursorLeft,
}

/// Everything the event loop reports to the application
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The window exists and can be drawn to
    Resumed,
    Suspended,
    Input(InputEvent),
    Resized { width: u32, height: u32 },
    /// Text cursor blink phase from the blink timer
    Blink(bool),
    /// Another thread queued work for the UI thread
    Wake,
    CloseRequested,
    /// Time to produce a frame
    Frame,
}

/// What the event loop should do after an event was handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Sleep until the next event
    #[default]
    Wait,
    /// Produce another frame at the given time even without new events
    RedrawAt(Instant),
    Exit,
}

/// A native event loop driving one window
pub trait EventLoop {
    type Window: Window;

    /// Run until the handler returns [`ControlFlow::Exit`]
    fn run<F>(self, handler: F) -> Result<()>
    where
        F: FnMut(PlatformEvent, &Self::Window) -> ControlFlow + 'static;
}
