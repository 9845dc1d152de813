//! Dialogs, popups and drag payloads

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use quill_paint::Rect;

use crate::component::Component;

/// Shared closed flag of an open popup
///
/// The handle returned by [`crate::State::open_popup`] and the copy held by
/// the root refer to the same flag.
#[derive(Clone, Debug, Default)]
pub struct PopupHandle {
    closed: Rc<Cell<bool>>,
}

impl PopupHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn closed() -> Self {
        let handle = Self::default();
        handle.close();
        handle
    }

    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Check whether two handles refer to the same popup
    pub fn same_popup(&self, other: &PopupHandle) -> bool {
        Rc::ptr_eq(&self.closed, &other.closed)
    }
}

/// Overlay change recorded during traversal and applied by the root
pub enum OverlayRequest {
    OpenDialog(Box<dyn Component>),
    CloseDialog,
    OpenPopup {
        /// Absolute window coordinates
        bounds: Rect,
        component: Box<dyn Component>,
        handle: PopupHandle,
    },
}

impl fmt::Debug for OverlayRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayRequest::OpenDialog(d) => f.debug_tuple("OpenDialog").field(&d.id()).finish(),
            OverlayRequest::CloseDialog => f.write_str("CloseDialog"),
            OverlayRequest::OpenPopup {
                bounds, component, ..
            } => f
                .debug_struct("OpenPopup")
                .field("bounds", bounds)
                .field("component", &component.id())
                .finish(),
        }
    }
}

/// Content of a drag and drop gesture
#[derive(Clone)]
pub struct DragPayload(Rc<dyn Any>);

impl DragPayload {
    pub fn new<T: Any>(content: T) -> Self {
        DragPayload(Rc::new(content))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// The payload as text, for `String` and `&'static str` content
    pub fn as_str(&self) -> Option<&str> {
        self.downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| self.downcast_ref::<&'static str>().copied())
    }
}

impl fmt::Debug for DragPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.debug_tuple("DragPayload").field(&text).finish(),
            None => f.write_str("DragPayload(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_handle_shares_flag() {
        let a = PopupHandle::new();
        let b = a.clone();
        assert!(!b.is_closed());
        a.close();
        assert!(b.is_closed());
        assert!(a.same_popup(&b));
        assert!(!a.same_popup(&PopupHandle::new()));
    }

    #[test]
    fn test_drag_payload_downcast() {
        let p = DragPayload::new(String::from("ab"));
        assert_eq!(p.as_str(), Some("ab"));
        assert!(p.is::<String>());
        assert!(p.downcast_ref::<i32>().is_none());
        assert_eq!(DragPayload::new("cd").as_str(), Some("cd"));
        assert_eq!(DragPayload::new(7u8).as_str(), None);
    }
}
