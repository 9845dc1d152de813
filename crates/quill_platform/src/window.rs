//! Window configuration and the window handle seen by applications

use quill_core::Cursor;
use serde::{Deserialize, Serialize};

/// Settings for the application window
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in pixels; 0 uses the root component's preferred width
    pub width: u32,
    /// Inner height in pixels; 0 uses the root component's preferred height
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Quill".to_string(),
            width: 0,
            height: 0,
            resizable: true,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Initial inner size for a root preferring `preferred` on a `monitor`-sized display
    ///
    /// Configured sizes win over the preferred size. A size that is still 0
    /// becomes half the monitor, one that is larger than the monitor shrinks
    /// to 7/8 of it.
    pub fn initial_size(&self, preferred: (i32, i32), monitor: Option<(u32, u32)>) -> (u32, u32) {
        let pick = |configured: u32, preferred: i32| {
            if configured != 0 {
                configured
            } else {
                preferred.max(0) as u32
            }
        };
        let mut w = pick(self.width, preferred.0);
        let mut h = pick(self.height, preferred.1);
        if let Some((mw, mh)) = monitor {
            w = fit(w, mw);
            h = fit(h, mh);
        }
        (w.max(1), h.max(1))
    }
}

fn fit(size: u32, monitor: u32) -> u32 {
    if size == 0 {
        monitor / 2
    } else if size > monitor {
        monitor / 8 * 7
    } else {
        size
    }
}

/// A native window, as seen from the application's event handler
pub trait Window {
    /// Inner size in physical pixels
    fn size(&self) -> (u32, u32);

    fn scale_factor(&self) -> f64;

    fn set_title(&self, title: &str);

    fn set_cursor(&self, cursor: Cursor);

    /// Schedule a [`PlatformEvent::Frame`](crate::PlatformEvent::Frame)
    fn request_redraw(&self);
}
