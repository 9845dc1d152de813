//! Desktop event loop implementation using winit

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use quill_core::Waker;
use quill_platform::{
    ClickCounter, ControlFlow, EventLoop, InputEvent, PlatformError, PlatformEvent, WindowConfig,
};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, StartCause, WindowEvent as WinitWindowEvent};
use winit::event_loop::{
    ActiveEventLoop, ControlFlow as WinitControlFlow, EventLoop as WinitEventLoop, EventLoopProxy,
};
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::window::WindowId;

use crate::input::{self, ScrollAccumulator};
use crate::window::DesktopWindow;

/// Default text cursor blink half-period
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Events sent to the loop from other threads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesktopEvent {
    Blink(bool),
    Wake,
}

/// Proxy for waking up the event loop from another thread
#[derive(Clone)]
pub struct WakeProxy {
    proxy: EventLoopProxy<DesktopEvent>,
}

impl WakeProxy {
    /// Wake up the event loop, delivering [`PlatformEvent::Wake`]
    pub fn wake(&self) {
        // the loop may already have exited
        let _ = self.proxy.send_event(DesktopEvent::Wake);
    }

    /// This proxy as a waker for `quill_core::UiHandle`
    pub fn waker(&self) -> Waker {
        let proxy = Mutex::new(self.clone());
        Arc::new(move || {
            if let Ok(proxy) = proxy.lock() {
                proxy.wake();
            }
        })
    }
}

/// Desktop event loop wrapping winit's event loop
pub struct DesktopEventLoop {
    event_loop: WinitEventLoop<DesktopEvent>,
    window_config: WindowConfig,
    preferred_size: (i32, i32),
    blink_interval: Duration,
}

impl DesktopEventLoop {
    /// Create a new desktop event loop
    pub fn new(config: WindowConfig) -> Result<Self, PlatformError> {
        let event_loop = WinitEventLoop::<DesktopEvent>::with_user_event()
            .build()
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        Ok(Self {
            event_loop,
            window_config: config,
            preferred_size: (0, 0),
            blink_interval: DEFAULT_BLINK_INTERVAL,
        })
    }

    /// Size of the root component, used where the config leaves the size at 0
    pub fn with_preferred_size(mut self, size: (i32, i32)) -> Self {
        self.preferred_size = size;
        self
    }

    pub fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }

    /// Get a wake proxy that can be used to wake up the event loop from another thread
    pub fn wake_proxy(&self) -> WakeProxy {
        WakeProxy {
            proxy: self.event_loop.create_proxy(),
        }
    }

    fn spawn_blink_timer(&self) {
        let proxy = self.event_loop.create_proxy();
        let interval = self.blink_interval;
        let spawned = thread::Builder::new()
            .name("quill-blink".into())
            .spawn(move || loop {
                thread::sleep(interval);
                if proxy.send_event(DesktopEvent::Blink(true)).is_err() {
                    break;
                }
                thread::sleep(interval);
                if proxy.send_event(DesktopEvent::Blink(false)).is_err() {
                    break;
                }
            });
        if let Err(e) = spawned {
            tracing::warn!("Failed to start blink timer: {}", e);
        }
    }
}

impl EventLoop for DesktopEventLoop {
    type Window = DesktopWindow;

    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(PlatformEvent, &Self::Window) -> ControlFlow + 'static,
    {
        self.spawn_blink_timer();
        let mut app = DesktopApp::new(self.window_config, self.preferred_size, handler);
        self.event_loop
            .run_app(&mut app)
            .map_err(|e| PlatformError::EventLoop(e.to_string()))
    }
}

/// Internal winit application handler
struct DesktopApp<F>
where
    F: FnMut(PlatformEvent, &DesktopWindow) -> ControlFlow,
{
    window_config: WindowConfig,
    preferred_size: (i32, i32),
    window: Option<DesktopWindow>,
    handler: F,
    modifiers: ModifiersState,
    mouse_position: (i32, i32),
    clicks: ClickCounter,
    scroll: ScrollAccumulator,
    should_exit: bool,
}

impl<F> DesktopApp<F>
where
    F: FnMut(PlatformEvent, &DesktopWindow) -> ControlFlow,
{
    fn new(window_config: WindowConfig, preferred_size: (i32, i32), handler: F) -> Self {
        Self {
            window_config,
            preferred_size,
            window: None,
            handler,
            modifiers: ModifiersState::empty(),
            mouse_position: (0, 0),
            clicks: ClickCounter::new(),
            scroll: ScrollAccumulator::default(),
            should_exit: false,
        }
    }

    /// Pass `event` to the handler; the control flow only counts for frames
    fn handle_event(&mut self, event_loop: &ActiveEventLoop, event: PlatformEvent) {
        let Some(ref window) = self.window else {
            return;
        };
        let frame = event == PlatformEvent::Frame;
        match (self.handler)(event, window) {
            ControlFlow::Exit => self.should_exit = true,
            ControlFlow::RedrawAt(at) if frame => {
                event_loop.set_control_flow(WinitControlFlow::WaitUntil(at));
            }
            ControlFlow::Wait if frame => event_loop.set_control_flow(WinitControlFlow::Wait),
            _ => {}
        }
        if self.should_exit {
            event_loop.exit();
        }
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        self.handle_event(event_loop, PlatformEvent::Input(event));
    }
}

impl<F> ApplicationHandler<DesktopEvent> for DesktopApp<F>
where
    F: FnMut(PlatformEvent, &DesktopWindow) -> ControlFlow,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match DesktopWindow::new(event_loop, &self.window_config, self.preferred_size) {
                Ok(window) => {
                    self.window = Some(window);
                    self.handle_event(event_loop, PlatformEvent::Resumed);
                }
                Err(e) => {
                    tracing::error!("Failed to create window: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        self.handle_event(event_loop, PlatformEvent::Suspended);
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // animation frame due
        if matches!(cause, StartCause::ResumeTimeReached { .. }) {
            if let Some(ref window) = self.window {
                window.winit_window().request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        match event {
            WinitWindowEvent::CloseRequested => {
                self.handle_event(event_loop, PlatformEvent::CloseRequested);
            }

            WinitWindowEvent::Resized(size) => {
                self.handle_event(
                    event_loop,
                    PlatformEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                );
            }

            WinitWindowEvent::RedrawRequested => {
                self.handle_event(event_loop, PlatformEvent::Frame);
            }

            WinitWindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
                let modifiers = input::convert_modifiers(self.modifiers);
                self.handle_input(event_loop, InputEvent::Modifiers(modifiers));
            }

            WinitWindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = input::convert_key(code);
                    if key != quill_core::Key::UNKNOWN {
                        self.handle_input(event_loop, InputEvent::Key(key));
                    }
                }
                if let Some(text) = input::typed_text(event.text.as_deref(), self.modifiers) {
                    self.handle_input(event_loop, InputEvent::Text(text));
                }
            }

            WinitWindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as i32, position.y as i32);
                let (x, y) = self.mouse_position;
                self.handle_input(event_loop, InputEvent::MouseMoved { x, y });
            }

            WinitWindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = input::convert_button(button) else {
                    return;
                };
                let event = match state {
                    ElementState::Pressed => InputEvent::MouseDown {
                        button,
                        clicks: self.clicks.press(button, self.mouse_position, Instant::now()),
                    },
                    ElementState::Released => InputEvent::MouseUp {
                        button,
                        clicks: self.clicks.release(),
                    },
                };
                self.handle_input(event_loop, event);
            }

            WinitWindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = self.scroll.add(delta);
                if (x, y) != (0, 0) {
                    self.handle_input(event_loop, InputEvent::Scroll { x, y });
                }
            }

            WinitWindowEvent::CursorEntered { .. } => {
                self.handle_input(event_loop, InputEvent::CursorEntered);
            }

            WinitWindowEvent::CursorLeft { .. } => {
                self.handle_input(event_loop, InputEvent::CursorLeft);
            }

            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: DesktopEvent) {
        let event = match event {
            DesktopEvent::Blink(on) => PlatformEvent::Blink(on),
            DesktopEvent::Wake => PlatformEvent::Wake,
        };
        self.handle_event(event_loop, event);
    }
}
