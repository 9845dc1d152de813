//! Desktop window implementation using winit

use std::sync::Arc;

use quill_core::Cursor;
use quill_platform::{PlatformError, Window, WindowConfig};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorIcon, Window as WinitWindow, WindowAttributes};

/// Desktop window wrapping a winit window
pub struct DesktopWindow {
    window: Arc<WinitWindow>,
}

impl DesktopWindow {
    /// Create a window for a root component preferring `preferred` pixels
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
        preferred: (i32, i32),
    ) -> Result<Self, PlatformError> {
        let monitor = event_loop
            .primary_monitor()
            .map(|m| (m.size().width, m.size().height));
        let (width, height) = config.initial_size(preferred, monitor);

        let attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
        tracing::info!("Window created ({}x{})", width, height);

        Ok(Self {
            window: Arc::new(window),
        })
    }

    /// Get the underlying winit window
    pub fn winit_window(&self) -> &WinitWindow {
        &self.window
    }

    /// Get an Arc to the winit window, e.g. for creating a GPU surface
    pub fn winit_window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }
}

pub(crate) fn cursor_icon(cursor: Cursor) -> CursorIcon {
    match cursor {
        Cursor::Normal => CursorIcon::Default,
        Cursor::Text => CursorIcon::Text,
        Cursor::Hand => CursorIcon::Pointer,
        Cursor::Crosshair => CursorIcon::Crosshair,
        Cursor::Disabled => CursorIcon::NotAllowed,
        Cursor::Wait => CursorIcon::Wait,
        Cursor::WaitBackground => CursorIcon::Progress,
        Cursor::Move => CursorIcon::Move,
        Cursor::ResizeHorizontal => CursorIcon::EwResize,
        Cursor::ResizeVertical => CursorIcon::NsResize,
        Cursor::ResizeDiagonal => CursorIcon::NwseResize,
        Cursor::ResizeDiagonal2 => CursorIcon::NeswResize,
    }
}

impl Window for DesktopWindow {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.window.set_cursor(cursor_icon(cursor));
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_icons() {
        assert_eq!(cursor_icon(Cursor::Normal), CursorIcon::Default);
        assert_eq!(cursor_icon(Cursor::Text), CursorIcon::Text);
        assert_eq!(cursor_icon(Cursor::Hand), CursorIcon::Pointer);
        assert_eq!(cursor_icon(Cursor::ResizeDiagonal2), CursorIcon::NeswResize);
    }
}
