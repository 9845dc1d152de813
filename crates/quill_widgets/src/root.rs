//! The top of the component tree
//!
//! The root owns the application content, the modal dialog and the popup
//! stack. Components ask for overlays through the [`State`]; the requests
//! are applied here between child traversals.

use std::sync::Arc;

use quill_core::{Component, MouseButtons, OverlayRequest, PopupHandle, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Point, Rect};
use quill_theme::{default_theme, ColorToken, FontToken, Theme};

struct Popup {
    /// Absolute window coordinates
    bounds: Rect,
    component: Box<dyn Component>,
    handle: PopupHandle,
}

/// Root component: content, at most one dialog, and popups on top
///
/// While a dialog is open the content is drawn under a veil and receives no
/// input. While popups are open nothing else receives input, and pressing
/// a mouse button outside them closes all of them.
pub struct Root {
    id: WidgetId,
    theme: Arc<Theme>,
    content: Box<dyn Component>,
    dialog: Option<Box<dyn Component>>,
    popups: Vec<Popup>,
}

impl Root {
    pub fn new(content: impl Component + 'static) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            content: Box::new(content),
            dialog: None,
            popups: Vec::new(),
        }
    }

    pub fn content_mut(&mut self) -> &mut dyn Component {
        self.content.as_mut()
    }

    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    /// Popups still open
    pub fn popup_count(&self) -> usize {
        self.popups.iter().filter(|p| !p.handle.is_closed()).count()
    }

    fn apply_requests(&mut self, state: &mut State) {
        for request in state.take_overlay_requests() {
            match request {
                OverlayRequest::OpenDialog(mut dialog) => {
                    dialog.set_theme(&self.theme);
                    tracing::debug!("Dialog {:?} opened", dialog.id());
                    self.dialog = Some(dialog);
                }
                OverlayRequest::CloseDialog => {
                    if self.dialog.take().is_some() {
                        tracing::debug!("Dialog closed");
                    }
                }
                OverlayRequest::OpenPopup {
                    bounds,
                    mut component,
                    handle,
                } => {
                    component.set_theme(&self.theme);
                    self.popups.push(Popup {
                        bounds,
                        component,
                        handle,
                    });
                }
            }
        }
        self.popups.retain(|p| !p.handle.is_closed());
    }
}

/// Preferred size of `dialog`, at most 7/8 of the window, centered
fn dialog_bounds(dialog: &dyn Component, fonts: &dyn FontLookup, w: i32, h: i32) -> Rect {
    let (dw, dh) = dialog.preferred_size(fonts);
    let (dw, dh) = (dw.min(w * 7 / 8), dh.min(h * 7 / 8));
    Rect::xywh((w - dw) / 2, (h - dh) / 2, dw, dh)
}

impl Component for Root {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        self.content.preferred_size(fonts)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        state.attach_root();
        self.apply_requests(state);
        let (w, h) = buf.size();
        let all = Rect::wh(w, h);
        buf.fill(all, self.theme.color(ColorToken::Background));

        let blocked = !self.popups.is_empty();
        match self.dialog.as_mut() {
            None if blocked => state.draw_child(buf, all, self.content.as_mut()),
            None => state.update_child(buf, all, self.content.as_mut()),
            Some(dialog) => {
                state.draw_child(buf, all, self.content.as_mut());
                buf.fill(all, self.theme.color(ColorToken::Veil));
                let r = dialog_bounds(dialog.as_ref(), buf.fonts(), w, h);
                if blocked {
                    state.draw_child(buf, r, dialog.as_mut());
                } else {
                    state.update_child(buf, r, dialog.as_mut());
                }
            }
        }
        self.apply_requests(state);

        if !self.popups.is_empty() {
            for popup in self.popups.iter_mut() {
                if !popup.handle.is_closed() {
                    state.update_child(buf, popup.bounds, popup.component.as_mut());
                }
            }
            if state.mouse_button_down(MouseButtons::LEFT)
                || state.mouse_button_down(MouseButtons::RIGHT)
            {
                state.close_popups();
                state.request_refocus();
            }
            self.apply_requests(state);
        }

        let preview = state
            .dragged_content()
            .filter(|(_, drop)| !drop)
            .and_then(|(payload, _)| payload.as_str().map(str::to_owned));
        if let Some(text) = preview {
            let font = self.theme.font(FontToken::Text);
            let ascent = buf.fonts().metrics(&font).ascent();
            let at = state.mouse_pos() + Point::new(0, ascent);
            buf.text(at, &text, &font, self.theme.color(ColorToken::Text));
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
        self.content.set_theme(theme);
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.set_theme(theme);
        }
        for popup in &mut self.popups {
            popup.component.set_theme(theme);
        }
    }
}
