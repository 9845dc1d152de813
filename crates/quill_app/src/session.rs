//! One window's worth of Quill: input state, component tree and frame loop
//!
//! The session turns [`PlatformEvent`]s into input state, runs frames
//! through the [`FrameDriver`] and draws them with a [`Renderer`]. It holds
//! no window or GPU objects, so it runs the same against a real surface and
//! against the recording backend in tests.

use std::mem;
use std::rc::Rc;
use std::time::Instant;

use quill_core::{
    handle_keyboard_shortcuts, BackendState, Component, Cursor, FrameConfig, FrameDriver,
    FrameHooks, FrameReport, UiHandle, Waker,
};
use quill_gpu::{RenderBackend, Renderer};
use quill_paint::{Buffer, FontLookup};
use quill_platform::{ClipboardBackend, ClipboardSync, ControlFlow, InputRouter, PlatformEvent};

struct Clipboard {
    backend: Box<dyn ClipboardBackend>,
    sync: ClipboardSync,
}

/// What the window has to change after a frame
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    pub report: FrameReport,
    /// New cursor, if it changed
    pub cursor: Option<Cursor>,
    /// New window title, if it changed
    pub title: Option<String>,
    pub flow: ControlFlow,
}

pub struct Session {
    state: BackendState,
    driver: FrameDriver,
    buffer: Buffer,
    router: InputRouter,
    root: Box<dyn Component>,
    fonts: Rc<dyn FontLookup>,
    size: (u32, u32),
    close_requested: bool,
    clipboard: Option<Clipboard>,
    cursor: Cursor,
    title: String,
}

impl Session {
    /// Create a session for `root`
    ///
    /// The default keyboard shortcuts run after the `update` hook, so the
    /// application sees the key presses first.
    pub fn new(
        root: Box<dyn Component>,
        fonts: Rc<dyn FontLookup>,
        config: FrameConfig,
        mut hooks: FrameHooks,
        title: &str,
    ) -> Self {
        let mut user_update = hooks.update.take();
        hooks.update = Some(Box::new(move |state| {
            if let Some(update) = user_update.as_mut() {
                update(state);
            }
            handle_keyboard_shortcuts(state);
        }));

        let mut state = BackendState::new();
        state.set_window_title(title);
        Self {
            state,
            driver: FrameDriver::new(config).with_hooks(hooks),
            buffer: Buffer::new(Rc::clone(&fonts)),
            router: InputRouter::new(),
            root,
            fonts,
            size: (0, 0),
            close_requested: false,
            clipboard: None,
            cursor: Cursor::Normal,
            title: title.to_string(),
        }
    }

    /// Mirror the state's clipboard to `backend` after every frame
    pub fn with_clipboard(mut self, mut backend: Box<dyn ClipboardBackend>) -> Self {
        let sync = ClipboardSync::new(backend.as_mut(), self.state.state_mut());
        self.clipboard = Some(Clipboard { backend, sync });
        self
    }

    /// Size the root component would like to have
    pub fn preferred_size(&self) -> (i32, i32) {
        self.root.preferred_size(self.fonts.as_ref())
    }

    pub fn state(&self) -> &BackendState {
        &self.state
    }

    pub fn root(&self) -> &dyn Component {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> &mut dyn Component {
        self.root.as_mut()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// A handle other threads can use to run code before the next frame
    pub fn ui_handle(&self, waker: Waker) -> UiHandle {
        self.driver.callbacks().handle(waker)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.state.set_window_size(width as i32, height as i32);
    }

    /// Feed an event into the input state; returns whether a frame is needed
    ///
    /// [`PlatformEvent::Frame`] is not handled here, see [`Session::frame`].
    pub fn handle(&mut self, event: PlatformEvent) -> bool {
        match event {
            PlatformEvent::Input(input) => self.router.apply(&mut self.state, input),
            PlatformEvent::Resized { width, height } => self.resize(width, height),
            PlatformEvent::Blink(on) => self.state.set_blink(on),
            PlatformEvent::Wake => {
                let ran = self.driver.callbacks().drain(self.state.state_mut());
                tracing::trace!("Ran {} queued callback(s) on wake", ran);
            }
            PlatformEvent::CloseRequested => self.close_requested = true,
            PlatformEvent::Frame | PlatformEvent::Resumed | PlatformEvent::Suspended => {
                return false
            }
        }
        true
    }

    /// Run one frame and draw it
    ///
    /// Afterwards the clipboard is synced and the next input cycle begins.
    pub fn frame<B: RenderBackend>(
        &mut self,
        renderer: &mut Renderer<B>,
        now: Instant,
    ) -> FrameOutput {
        let (width, height) = self.size;
        let report = self.driver.frame(
            &mut self.state,
            &mut self.buffer,
            self.root.as_mut(),
            (width as i32, height as i32),
            mem::take(&mut self.close_requested),
            now,
        );
        if report.deferred {
            tracing::debug!("Frame re-ran {} times, deferring", report.reruns);
        }
        renderer.draw(width, height, self.buffer.finish());

        let cursor = (self.state.cursor() != self.cursor).then(|| {
            self.cursor = self.state.cursor();
            self.cursor
        });
        let title = (self.state.window_title() != self.title).then(|| {
            self.title = self.state.window_title().to_string();
            self.title.clone()
        });
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard
                .sync
                .sync(clipboard.backend.as_mut(), self.state.state_mut());
        }

        let flow = if self.state.quit_requested() {
            ControlFlow::Exit
        } else if self.state.animation_requested() {
            ControlFlow::RedrawAt(now + self.driver.config().animation_interval())
        } else {
            ControlFlow::Wait
        };
        self.driver.begin_cycle(&mut self.state);

        FrameOutput {
            report,
            cursor,
            title,
            flow,
        }
    }
}
