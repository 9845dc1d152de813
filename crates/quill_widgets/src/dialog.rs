//! Standard modal dialogs
//!
//! Each function builds a [`Frame`] and opens it with
//! [`State::open_dialog`]. Every button closes the dialog before running
//! its callback, so a callback may open the next dialog.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use quill_core::{Component, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Rect};
use quill_theme::{default_theme, ColorToken, Theme};

use crate::button::Button;
use crate::frame::Frame;
use crate::label::Label;
use crate::layout::{Bar, BarFill, Container, Stack};
use crate::scroll::ScrollView;
use crate::text_field::TextField;

/// One label per line of `message`, scrollable
fn message_view(message: &str) -> ScrollView {
    let stack = message
        .lines()
        .fold(Stack::new(), |stack, line| stack.child(Label::new(line)));
    ScrollView::new(stack)
}

fn message_frame(icon: &str, title: &str, message: &str, buttons: Bar) -> Frame {
    Frame::new(
        title,
        Container::new().center(message_view(message)).bottom(buttons),
    )
    .icon(icon)
}

/// Show `message` with a single button that closes the dialog
pub fn show_message_dialog(state: &mut State, title: &str, message: &str, button: &str) {
    let buttons = Bar::new(BarFill::Right).child(Button::new(button).on_click(State::close_dialog));
    state.open_dialog(Box::new(message_frame("info", title, message, buttons)));
}

/// Like [`show_message_dialog`], with the error title color and a warning icon
pub fn show_error_dialog(state: &mut State, title: &str, message: &str, button: &str) {
    let buttons = Bar::new(BarFill::Right).child(Button::new(button).on_click(State::close_dialog));
    let frame = message_frame("warning", title, message, buttons)
        .title_color(ColorToken::TitleBackgroundError);
    state.open_dialog(Box::new(frame));
}

/// Ask for confirmation; `action` runs when `ok` is pressed
pub fn show_confirm_dialog(
    state: &mut State,
    title: &str,
    message: &str,
    ok: &str,
    cancel: &str,
    mut action: impl FnMut(&mut State) + 'static,
) {
    let buttons = Bar::new(BarFill::Right)
        .child(Button::new(ok).on_click(move |state: &mut State| {
            state.close_dialog();
            action(state);
        }))
        .child(Button::new(cancel).on_click(State::close_dialog));
    state.open_dialog(Box::new(message_frame("question", title, message, buttons)));
}

/// Ask for a line of text; `action` receives it on `ok` or Enter
pub fn show_input_dialog(
    state: &mut State,
    title: &str,
    message: &str,
    ok: &str,
    cancel: &str,
    mut action: impl FnMut(&mut State, &str) + 'static,
) {
    let submit = Rc::new(Cell::new(false));
    let pressed = Rc::clone(&submit);
    let body = InputDialogBody {
        id: WidgetId::new(),
        theme: default_theme(),
        message: message_view(message),
        field: TextField::new().on_submit(move |state: &mut State, text: &str| {
            state.close_dialog();
            action(state, text);
        }),
        ok: Button::new(ok).on_click(move |_: &mut State| pressed.set(true)),
        cancel: Button::new(cancel).on_click(State::close_dialog),
        submit,
    };
    state.open_dialog(Box::new(Frame::new(title, body).icon("question")));
}

/// Message above a row with the text field and both buttons
///
/// The ok button raises a flag that submits the field once the row has
/// been updated.
struct InputDialogBody {
    id: WidgetId,
    theme: Arc<Theme>,
    message: ScrollView,
    field: TextField,
    ok: Button,
    cancel: Button,
    submit: Rc<Cell<bool>>,
}

impl InputDialogBody {
    fn row(&self) -> [&dyn Component; 3] {
        [&self.field, &self.ok, &self.cancel]
    }
}

impl Component for InputDialogBody {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let (mw, mh) = self.message.preferred_size(fonts);
        let (rw, rh) = self.row().iter().fold((0, 0), |(w, h), c| {
            let (cw, ch) = c.preferred_size(fonts);
            (w + cw, h.max(ch))
        });
        (mw.max(rw), mh + rh)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let fonts = buf.fonts_rc();
        let sizes = self.row().map(|c| c.preferred_size(fonts.as_ref()));
        let row_h = sizes.iter().map(|s| s.1).max().unwrap_or(0).min(h);
        let y = h - row_h;

        state.update_child(buf, Rect::wh(w, y), &mut self.message);
        buf.fill(Rect::xywh(0, y, w, row_h), self.theme.color(ColorToken::AltBackground));
        let (ok_w, cancel_w) = (sizes[1].0, sizes[2].0);
        let field_w = w - ok_w - cancel_w;
        state.update_child(buf, Rect::xywh(0, y, field_w, row_h), &mut self.field);
        state.update_child(buf, Rect::xywh(field_w, y, ok_w, row_h), &mut self.ok);
        state.update_child(buf, Rect::xywh(field_w + ok_w, y, cancel_w, row_h), &mut self.cancel);

        if self.submit.replace(false) {
            self.field.trigger_action(state);
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
        self.message.set_theme(theme);
        self.field.set_theme(theme);
        self.ok.set_theme(theme);
        self.cancel.set_theme(theme);
    }
}
