//! Per-frame input state and event routing
//!
//! A single [`State`] is threaded through the component tree by
//! [`State::update_child`]. Each call narrows the state to the child: its
//! bounds, whether the mouse is over it, and whether it may receive input.
//! The saved fields are restored on return, so the call depth is the stack.
//!
//! Identity across frames (grab, keyboard focus, hover target) is kept by
//! [`WidgetId`]. Components never store the state; they query it and write
//! requests into it during their `update`.

use std::any::Any;
use std::mem;

use quill_paint::{Buffer, Point, Rect};
use smallvec::SmallVec;

use crate::component::{Component, EditCommand, WidgetId};
use crate::input::{Cursor, Key, Modifiers, MouseButtons};
use crate::overlay::{DragPayload, OverlayRequest, PopupHandle};

/// Key presses handed to a component in one call
pub type KeyPresses = SmallVec<[Key; 4]>;

/// A component's view of input, focus and scheduling
#[derive(Debug, Default)]
pub struct State {
    // traversal cursor
    pub(crate) current: Option<WidgetId>,
    pub(crate) disabled: bool,
    /// Mouse is inside the current component and all its ancestors
    pub(crate) hovered: bool,
    /// Current component has asked for keyboard focus during this visit
    pub(crate) focusable: bool,
    /// Visibility request, relative to `bounds`
    pub(crate) visible: Rect,
    /// Absolute bounds of the current component
    pub(crate) bounds: Rect,

    // input snapshot
    /// Absolute
    pub(crate) mouse_pos: Point,
    pub(crate) mouse_buttons: MouseButtons,
    /// Buttons released on the grabbed component since the last update
    pub(crate) click_buttons: MouseButtons,
    pub(crate) clicks: u32,
    pub(crate) modifiers: Modifiers,
    pub(crate) scroll: Point,
    pub(crate) text_input: String,
    pub(crate) key_presses: KeyPresses,
    pub(crate) window_size: Rect,
    pub(crate) clipboard: String,
    pub(crate) time: f32,
    pub(crate) blink: bool,

    // identity across frames
    pub(crate) hovered_widget: Option<WidgetId>,
    pub(crate) grabbed: Option<WidgetId>,
    pub(crate) drag: Option<DragPayload>,
    pub(crate) drop: bool,
    pub(crate) focused: Option<WidgetId>,
    pub(crate) focus_next: bool,
    pub(crate) last_focusable: Option<WidgetId>,

    // overlays
    pub(crate) root_attached: bool,
    pub(crate) overlay_requests: Vec<OverlayRequest>,
    pub(crate) popups: Vec<PopupHandle>,
    pub(crate) edits: Vec<EditCommand>,

    // requests, read by the frame driver
    pub(crate) cursor: Cursor,
    pub(crate) window_title: String,
    pub(crate) update: bool,
    pub(crate) animation: bool,
    pub(crate) refocus: bool,
    pub(crate) quit: bool,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the component being updated
    pub fn current(&self) -> Option<WidgetId> {
        self.current
    }

    /// Check whether the current component receives mouse events
    ///
    /// True while the mouse is over the component, and also while a press
    /// that started on it is held, even if the mouse has left it since.
    pub fn has_mouse_focus(&self) -> bool {
        !self.disabled
            && self.drag.is_none()
            && (self.grabbed == self.current || (self.grabbed.is_none() && self.hovered))
    }

    /// Check whether the cursor is inside the current component
    ///
    /// Unlike [`State::has_mouse_focus`] this turns false when a held press
    /// is dragged outside the component.
    pub fn is_hovered(&self) -> bool {
        !self.disabled && self.hovered && (self.grabbed == self.current || self.grabbed.is_none())
    }

    /// Opt the current component out of tab focus cycling
    ///
    /// It still takes focus when clicked.
    pub fn disable_tab_focus(&mut self) {
        if self.grabbed == self.current {
            self.focus_next = false;
            self.focused = self.current;
        }
        self.focusable = true;
        if self.current == self.focused {
            self.focus_next = false;
        }
    }

    /// Give keyboard focus to `id`
    pub fn set_keyboard_focus(&mut self, id: WidgetId) {
        self.focused = Some(id);
        self.focus_next = false;
        self.update = true;
    }

    /// Move keyboard focus to the next component that asks for it
    pub fn focus_next(&mut self) {
        self.focus_next = true;
    }

    /// Move keyboard focus to the previous focusable component
    pub fn focus_previous(&mut self) {
        self.focused = self.last_focusable;
        self.update = true;
    }

    pub fn keyboard_focus(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Check whether the current component receives keyboard events
    ///
    /// The first call during a visit does the focus bookkeeping: the focused
    /// component consumes a pending Tab (Shift+Tab moves focus back, Tab
    /// passes it on), and a grabbed component or the one after a Tab claims
    /// focus and asks to be scrolled into view. Later calls during the same
    /// visit only compare ids.
    pub fn has_keyboard_focus(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        if !self.focusable {
            self.focusable = true;
            if self.current == self.focused {
                self.focus_next = false;
                if let Some(i) = self.key_presses.iter().position(|&k| k == Key::TAB) {
                    if self.has_modifiers(Modifiers::SHIFT) {
                        self.focused = self.last_focusable;
                        self.update = true;
                    } else {
                        self.focus_next = true;
                    }
                    self.key_presses.remove(i);
                    return false;
                }
            }
            if self.focused != self.current && (self.grabbed == self.current || self.focus_next) {
                self.focus_next = false;
                self.focused = self.current;
                self.update = true;
                self.visible = Rect::wh(self.bounds.width(), self.bounds.height());
            }
        }
        self.focused.is_some() && self.focused == self.current
    }

    /// Check whether all of `buttons` are held
    pub fn mouse_button_down(&self, buttons: MouseButtons) -> bool {
        self.has_mouse_focus() && self.mouse_buttons.contains(buttons)
    }

    /// Check whether any of `buttons` was clicked since the last update
    pub fn mouse_click(&self, buttons: MouseButtons) -> bool {
        self.has_mouse_focus() && self.click_buttons.intersects(buttons)
    }

    /// Number of consecutive clicks of the last press
    pub fn click_count(&self) -> u32 {
        self.clicks
    }

    pub fn has_modifiers(&self, modifiers: Modifiers) -> bool {
        self.modifiers.contains(modifiers)
    }

    /// Mouse position relative to the current component
    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos - self.bounds.min
    }

    /// Scroll amount since the last update, for the hovered component
    pub fn scroll(&self) -> Point {
        if !self.disabled && self.hovered {
            self.scroll
        } else {
            Point::ZERO
        }
    }

    /// Mark the scroll amount as used so that ancestors don't scroll too
    pub fn consume_scroll(&mut self) {
        if !self.disabled && self.hovered {
            self.scroll = Point::ZERO;
        }
    }

    /// Take the key presses meant for the current component
    pub fn key_presses(&mut self) -> KeyPresses {
        if self.has_keyboard_focus() {
            mem::take(&mut self.key_presses)
        } else {
            KeyPresses::new()
        }
    }

    /// Pending key presses, whoever they are meant for
    pub fn peek_key_presses(&self) -> &[Key] {
        &self.key_presses
    }

    /// Take the text typed since the last update
    ///
    /// The key presses that produced it still show up in [`State::key_presses`].
    pub fn text_input(&mut self) -> String {
        if self.has_keyboard_focus() {
            mem::take(&mut self.text_input)
        } else {
            String::new()
        }
    }

    /// Start a drag and drop gesture carrying `content`
    pub fn initiate_drag<T: Any>(&mut self, content: T) {
        if self.has_mouse_focus() {
            self.grabbed = None;
            self.drag = Some(DragPayload::new(content));
        }
    }

    /// The drag payload while the mouse is over the current component
    ///
    /// The flag is true during the single update right after the release.
    pub fn dragged_content(&self) -> Option<(&DragPayload, bool)> {
        if self.is_hovered() {
            self.drag.as_ref().map(|d| (d, self.drop))
        } else {
            None
        }
    }

    /// Phase of blinking elements such as text cursors
    pub fn blink(&mut self) -> bool {
        self.has_keyboard_focus() && self.blink
    }

    /// Make blinking elements visible, usually after an edit
    pub fn set_blink(&mut self) {
        if self.has_keyboard_focus() {
            self.blink = true;
        }
    }

    /// Allow overlay requests; called by the root component on every update
    pub fn attach_root(&mut self) {
        self.root_attached = true;
    }

    /// Drain the overlay requests recorded since the last call
    pub fn take_overlay_requests(&mut self) -> Vec<OverlayRequest> {
        mem::take(&mut self.overlay_requests)
    }

    /// Show `dialog` as the single modal dialog and focus it
    pub fn open_dialog(&mut self, dialog: Box<dyn Component>) {
        if !self.root_attached {
            tracing::warn!("open_dialog ignored: no root component");
            return;
        }
        self.focused = Some(dialog.id());
        self.update = true;
        self.overlay_requests.push(OverlayRequest::OpenDialog(dialog));
    }

    pub fn close_dialog(&mut self) {
        if self.root_attached {
            self.overlay_requests.push(OverlayRequest::CloseDialog);
            self.update = true;
        }
    }

    /// Show `popup` on top of everything at `bounds`, relative to the current component
    ///
    /// Without a root the popup is dropped and the returned handle is already closed.
    pub fn open_popup(&mut self, bounds: Rect, popup: Box<dyn Component>) -> PopupHandle {
        if !self.root_attached {
            tracing::warn!("open_popup ignored: no root component");
            return PopupHandle::closed();
        }
        let handle = PopupHandle::new();
        self.focused = Some(popup.id());
        self.update = true;
        self.popups.retain(|p| !p.is_closed());
        self.popups.push(handle.clone());
        self.overlay_requests.push(OverlayRequest::OpenPopup {
            bounds: bounds.translate(self.bounds.min),
            component: popup,
            handle: handle.clone(),
        });
        handle
    }

    /// Close every open popup
    pub fn close_popups(&mut self) {
        if self.root_attached {
            for popup in self.popups.drain(..) {
                popup.close();
            }
            self.update = true;
        }
    }

    pub fn has_popups(&self) -> bool {
        self.root_attached && self.popups.iter().any(|p| !p.is_closed())
    }

    /// Queue an edit for the focused component's [`crate::Editable`] capability
    ///
    /// Applied when the traversal next reaches that component.
    pub fn request_edit(&mut self, command: EditCommand) {
        if self.focused.is_some() {
            self.edits.push(command);
        }
    }

    /// Window rectangle relative to the current component
    pub fn window_bounds(&self) -> Rect {
        self.window_size.translate(-self.bounds.min)
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        if self.has_mouse_focus() {
            self.cursor = cursor;
        }
    }

    pub fn set_window_title(&mut self, title: impl Into<String>) {
        self.window_title = title.into();
    }

    /// Ask scrolling ancestors to bring `r`, relative to the current component, into view
    pub fn request_visible(&mut self, r: Rect) {
        self.visible = r;
    }

    /// Area a child asked to be made visible, relative to the current component
    ///
    /// Call after [`State::update_child`].
    pub fn visibility_request(&self) -> Option<Rect> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.visible)
        }
    }

    /// Clear a visibility request that was handled here
    pub fn clear_visibility_request(&mut self) {
        self.visible = Rect::ZERO;
    }

    /// Run the traversal again before presenting this frame
    pub fn request_update(&mut self) {
        self.update = true;
    }

    /// Run another frame after a short delay
    pub fn request_animation(&mut self) {
        self.animation = true;
    }

    /// Recompute which component is under the mouse
    pub fn request_refocus(&mut self) {
        self.refocus = true;
    }

    /// Seconds since the frame that requested animation
    pub fn animation_speed(&self) -> f32 {
        self.time
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Draw `child` inside `bounds` without delivering any input to it
    pub fn draw_child(&mut self, buf: &mut Buffer, bounds: Rect, child: &mut dyn Component) {
        let disabled = mem::replace(&mut self.disabled, true);
        let parent = self.current.replace(child.id());
        buf.push(bounds);
        child.update(buf, self);
        buf.pop();
        self.disabled = disabled;
        self.current = parent;
    }

    /// Update `child` inside `bounds`, relative to the current component
    pub fn update_child(&mut self, buf: &mut Buffer, bounds: Rect, child: &mut dyn Component) {
        buf.push(bounds);
        if self.disabled {
            child.update(buf, self);
            buf.pop();
            return;
        }
        let id = child.id();
        let parent = self.current;
        let hovered = self.hovered;
        let visible = mem::replace(&mut self.visible, Rect::ZERO);
        let focusable = self.focusable;
        let parent_bounds = self.bounds;

        self.hovered = hovered && (self.mouse_pos - parent_bounds.min).is_in(bounds);
        if self.hovered {
            self.hovered_widget = Some(id);
        }
        self.bounds = bounds.translate(parent_bounds.min);
        self.current = Some(id);
        self.focusable = false;
        if self.focused == Some(id) {
            self.focus_next = true;
            self.apply_edits(child);
        }

        child.update(buf, self);

        if self.focusable {
            self.last_focusable = Some(id);
        }
        self.current = parent;
        self.bounds = parent_bounds;
        self.hovered = hovered;
        self.visible = if self.visible.is_empty() {
            visible
        } else {
            self.visible.translate(bounds.min)
        };
        self.focusable = focusable;
        buf.pop();
    }

    fn apply_edits(&mut self, child: &mut dyn Component) {
        if self.edits.is_empty() {
            return;
        }
        let edits = mem::take(&mut self.edits);
        match child.as_editable() {
            Some(target) => {
                for edit in edits {
                    edit.apply(target, self);
                }
            }
            None => tracing::trace!("{} edit(s) dropped: focused component is not editable", edits.len()),
        }
    }
}
