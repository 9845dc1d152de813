//! System clipboard access and its sync with [`State`]

use quill_core::State;

use crate::error::{PlatformError, Result};

/// Text clipboard provided by the platform
pub trait ClipboardBackend {
    fn get_text(&mut self) -> Result<String>;

    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard through arboard
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| PlatformError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn get_text(&mut self) -> Result<String> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(PlatformError::Clipboard(e.to_string())),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .map_err(|e| PlatformError::Clipboard(e.to_string()))
    }
}

/// Keeps the clipboard text in [`State`] and the platform clipboard equal
///
/// After every frame, text the application put into the state is written
/// out. Otherwise the platform clipboard is read back in, so the next frame
/// sees what other programs copied.
#[derive(Debug, Default)]
pub struct ClipboardSync {
    last: String,
}

impl ClipboardSync {
    /// Start from the current platform clipboard
    pub fn new(backend: &mut dyn ClipboardBackend, state: &mut State) -> Self {
        let last = backend.get_text().unwrap_or_else(|e| {
            tracing::warn!("Could not read clipboard: {}", e);
            String::new()
        });
        state.set_clipboard(last.clone());
        Self { last }
    }

    pub fn sync(&mut self, backend: &mut dyn ClipboardBackend, state: &mut State) {
        if state.clipboard() != self.last {
            self.last = state.clipboard().to_owned();
            if let Err(e) = backend.set_text(&self.last) {
                tracing::warn!("Could not write clipboard: {}", e);
            }
        } else {
            match backend.get_text() {
                Ok(text) => {
                    if text != self.last {
                        state.set_clipboard(text.clone());
                        self.last = text;
                    }
                }
                Err(e) => tracing::debug!("Could not read clipboard: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Memory {
        text: String,
        writes: usize,
    }

    impl ClipboardBackend for Memory {
        fn get_text(&mut self) -> Result<String> {
            Ok(self.text.clone())
        }

        fn set_text(&mut self, text: &str) -> Result<()> {
            self.text = text.to_owned();
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_state_starts_with_system_text() {
        let mut memory = Memory {
            text: "outside".into(),
            ..Default::default()
        };
        let mut state = State::new();
        ClipboardSync::new(&mut memory, &mut state);
        assert_eq!(state.clipboard(), "outside");
    }

    #[test]
    fn test_application_copy_is_written_out() {
        let mut memory = Memory::default();
        let mut state = State::new();
        let mut sync = ClipboardSync::new(&mut memory, &mut state);

        state.set_clipboard("copied");
        sync.sync(&mut memory, &mut state);
        assert_eq!(memory.text, "copied");
        assert_eq!(memory.writes, 1);

        sync.sync(&mut memory, &mut state);
        assert_eq!(memory.writes, 1, "unchanged text is not written again");
    }

    #[test]
    fn test_outside_copy_is_read_back() {
        let mut memory = Memory::default();
        let mut state = State::new();
        let mut sync = ClipboardSync::new(&mut memory, &mut state);

        memory.text = "from another program".into();
        sync.sync(&mut memory, &mut state);
        assert_eq!(state.clipboard(), "from another program");
        assert_eq!(memory.writes, 0);
    }
}
