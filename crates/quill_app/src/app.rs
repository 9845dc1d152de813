//! Application builder and the desktop runner

use std::rc::Rc;
use std::sync::Arc;

use quill_core::{Component, FrameHooks, State, UiHandle};
use quill_paint::{FontLookup, IconLookup};
use quill_text::FontLibrary;
use quill_theme::Theme;

use crate::config::AppConfig;
use crate::error::Result;
use crate::session::Session;

type HandleCallback = Box<dyn FnOnce(UiHandle)>;

/// A Quill application: one window showing one root component
///
/// ```ignore
/// use quill_app::App;
/// use quill_widgets::{Label, Root};
///
/// App::new(Root::new(Label::new("Hello")))
///     .with_title("Hello")
///     .run()?;
/// ```
pub struct App {
    config: AppConfig,
    root: Box<dyn Component>,
    hooks: FrameHooks,
    fonts: Option<Rc<FontLibrary>>,
    icons: Option<Rc<dyn IconLookup>>,
    on_handle: Option<HandleCallback>,
}

impl App {
    pub fn new(root: impl Component + 'static) -> Self {
        Self {
            config: AppConfig::default(),
            root: Box::new(root),
            hooks: FrameHooks::default(),
            fonts: None,
            icons: None,
            on_handle: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window.title = title.into();
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Use `fonts` instead of discovering the system fonts
    pub fn with_fonts(mut self, fonts: Rc<FontLibrary>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Use `icons` instead of the built-in icon set
    pub fn with_icons(mut self, icons: Rc<dyn IconLookup>) -> Self {
        self.icons = Some(icons);
        self
    }

    /// Run `f` once, after the first frame has attached the root
    ///
    /// This is the place to open a dialog at startup.
    pub fn on_init(mut self, f: impl FnOnce(&mut State) + 'static) -> Self {
        self.hooks.init = Some(Box::new(f));
        self
    }

    /// Run `f` before every frame, ahead of the default keyboard shortcuts
    pub fn on_update(mut self, f: impl FnMut(&mut State) + 'static) -> Self {
        self.hooks.update = Some(Box::new(f));
        self
    }

    /// Run `f` instead of quitting when the window is asked to close
    pub fn on_close(mut self, f: impl FnMut(&mut State) + 'static) -> Self {
        self.hooks.close = Some(Box::new(f));
        self
    }

    /// Receive a [`UiHandle`] for other threads before the event loop starts
    pub fn on_handle(mut self, f: impl FnOnce(UiHandle) + 'static) -> Self {
        self.on_handle = Some(Box::new(f));
        self
    }

    /// Resolve the theme, load the fonts and build the session, without a window
    pub fn prepare(self) -> Result<Prepared> {
        let App {
            config,
            mut root,
            hooks,
            fonts,
            icons,
            on_handle,
        } = self;
        let theme = config.resolve_theme()?;
        root.set_theme(&theme);
        let fonts = fonts.unwrap_or_else(|| Rc::new(FontLibrary::system()));
        let lookup: Rc<dyn FontLookup> = fonts.clone();
        let session = Session::new(
            root,
            lookup,
            config.frame.clone(),
            hooks,
            &config.window.title,
        );
        Ok(Prepared {
            session,
            fonts,
            theme,
            config,
            icons,
            on_handle,
        })
    }
}

/// An [`App`] ready to be attached to a window
pub struct Prepared {
    pub session: Session,
    pub fonts: Rc<FontLibrary>,
    pub theme: Arc<Theme>,
    pub config: AppConfig,
    pub icons: Option<Rc<dyn IconLookup>>,
    on_handle: Option<HandleCallback>,
}

impl Prepared {
    /// Pass `handle` to the [`App::on_handle`] callback, if any
    pub fn deliver_handle(&mut self, handle: UiHandle) {
        if let Some(f) = self.on_handle.take() {
            f(handle);
        }
    }
}

#[cfg(feature = "windowed")]
mod windowed {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use quill_gpu::{BuiltinIcons, Renderer, RendererError, WgpuBackend};
    use quill_paint::IconLookup;
    use quill_platform::{ControlFlow, EventLoop, PlatformEvent, SystemClipboard, Window};
    use quill_platform_desktop::DesktopEventLoop;
    use quill_theme::ColorToken;
    use quill_text::GlyphProvider;

    use super::{App, Prepared};
    use crate::error::Result;

    impl App {
        /// Open the window and run until the application quits
        pub fn run(self) -> Result<()> {
            let Prepared {
                mut session,
                fonts,
                theme,
                config,
                icons,
                on_handle,
            } = self.prepare()?;
            match SystemClipboard::new() {
                Ok(clipboard) => session = session.with_clipboard(Box::new(clipboard)),
                Err(e) => tracing::warn!("Running without the system clipboard: {}", e),
            }

            let event_loop = DesktopEventLoop::new(config.window.clone())?
                .with_preferred_size(session.preferred_size())
                .with_blink_interval(config.blink_interval());
            if let Some(f) = on_handle {
                f(session.ui_handle(event_loop.wake_proxy().waker()));
            }

            let glyphs: Rc<dyn GlyphProvider> = fonts;
            let icons: Rc<dyn IconLookup> = icons.unwrap_or_else(|| Rc::new(BuiltinIcons::new()));
            let renderer_config = config.renderer;
            let clear_color = theme.color(ColorToken::Background);

            let failure: Rc<RefCell<Option<RendererError>>> = Rc::new(RefCell::new(None));
            let failed = Rc::clone(&failure);
            let mut renderer: Option<Renderer<WgpuBackend>> = None;

            event_loop.run(move |event, window| match event {
                PlatformEvent::Resumed => {
                    let (width, height) = window.size();
                    if renderer.is_none() {
                        let backend = WgpuBackend::with_surface_blocking(
                            window.winit_window_arc(),
                            (width, height),
                        );
                        match backend {
                            Ok(mut backend) => {
                                backend.set_clear_color(clear_color);
                                renderer = Some(Renderer::new(
                                    backend,
                                    Rc::clone(&glyphs),
                                    Rc::clone(&icons),
                                    renderer_config.clone(),
                                ));
                            }
                            Err(e) => {
                                tracing::error!("Failed to create renderer: {}", e);
                                *failed.borrow_mut() = Some(e);
                                return ControlFlow::Exit;
                            }
                        }
                    }
                    session.resize(width, height);
                    window.request_redraw();
                    ControlFlow::Wait
                }
                PlatformEvent::Frame => {
                    let Some(renderer) = renderer.as_mut() else {
                        return ControlFlow::Wait;
                    };
                    let output = session.frame(renderer, Instant::now());
                    if let Some(cursor) = output.cursor {
                        window.set_cursor(cursor);
                    }
                    if let Some(title) = output.title.as_deref() {
                        window.set_title(title);
                    }
                    output.flow
                }
                PlatformEvent::Resized { width, height } => {
                    if let Some(renderer) = renderer.as_mut() {
                        renderer.backend_mut().resize(width, height);
                    }
                    session.handle(event);
                    window.request_redraw();
                    ControlFlow::Wait
                }
                other => {
                    if session.handle(other) {
                        window.request_redraw();
                    }
                    ControlFlow::Wait
                }
            })?;

            let taken = failure.borrow_mut().take();
            match taken {
                Some(e) => Err(e.into()),
                None => Ok(()),
            }
        }
    }
}
