//! Single line text input

use std::sync::Arc;

use quill_core::{Component, Cursor, Editable, Key, Modifiers, MouseButtons, State, WidgetId};
use quill_paint::{Buffer, FontLookup, FontMetrics, Rect};
use quill_text::{find_word, next_word, previous_word, TextLabel};
use quill_theme::{default_theme, ColorToken, FontToken, Theme};

use crate::anim::animate;

/// Horizontal text padding
const PAD: i32 = 3;

pub type TextFieldAction = Box<dyn FnMut(&mut State, &str)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Idle,
    /// Left button held, extending the selection
    Select,
    /// Left button pressed inside the selection; moving out starts a drag
    Drag,
}

/// An editable line of text
///
/// Positions are byte offsets into the text on character boundaries. The
/// selection runs between the anchor and the cursor, in either order.
/// Selected text can be dragged into other text fields, which insert string
/// drag payloads where they are dropped.
pub struct TextField {
    id: WidgetId,
    theme: Arc<Theme>,
    text: String,
    editable: bool,
    action: Option<TextFieldAction>,
    min_width: i32,
    label: TextLabel,
    cursor: usize,
    anchor: usize,
    last_x: i32,
    mode: Mode,
    anim: f32,
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl TextField {
    pub fn new() -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            text: String::new(),
            editable: true,
            action: None,
            min_width: 100,
            label: TextLabel::new(),
            cursor: 0,
            anchor: 0,
            last_x: -1,
            mode: Mode::Idle,
            anim: 0.0,
        }
    }

    /// Start with `text`, the cursor at its end
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn min_width(mut self, min_width: i32) -> Self {
        self.min_width = min_width;
        self
    }

    /// Set the callback run on Enter
    pub fn on_submit(mut self, action: impl FnMut(&mut State, &str) + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and move the cursor to its end
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
        self.anchor = self.cursor;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Select from `anchor` to `cursor`
    pub fn set_selection(&mut self, anchor: usize, cursor: usize) {
        self.anchor = self.boundary(anchor);
        self.cursor = self.boundary(cursor);
    }

    /// Ordered selection range
    pub fn selection(&self) -> (usize, usize) {
        let a = self.anchor.min(self.text.len());
        let c = self.cursor.min(self.text.len());
        (a.min(c), a.max(c))
    }

    pub fn selected_text(&self) -> &str {
        let (s1, s2) = self.selection();
        &self.text[s1..s2]
    }

    /// Run the submit callback with the current text
    pub fn trigger_action(&mut self, state: &mut State) {
        if let Some(action) = self.action.as_mut() {
            action(state, &self.text);
        }
    }

    fn boundary(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    /// Replace the selection with `s`
    fn insert(&mut self, s: &str) {
        if !self.editable {
            return;
        }
        let (s1, s2) = self.selection();
        self.text.replace_range(s1..s2, s);
        self.cursor = s1 + s.len();
        self.anchor = self.cursor;
    }

    fn next(&self, word: bool) -> usize {
        let pos = self.cursor.min(self.text.len());
        if word {
            next_word(&self.text, pos)
        } else {
            self.text[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
        }
    }

    fn previous(&self, word: bool) -> usize {
        let pos = self.cursor.min(self.text.len());
        if word {
            previous_word(&self.text, pos)
        } else {
            self.text[..pos].chars().next_back().map_or(pos, |c| pos - c.len_utf8())
        }
    }

    fn in_selection(&self, pos: usize) -> bool {
        let (s1, s2) = self.selection();
        pos > s1 && pos < s2
    }

    fn handle_keys(&mut self, state: &mut State) {
        let word = state.has_modifiers(Modifiers::CONTROL);
        for key in state.key_presses() {
            match key {
                Key::LEFT => self.cursor = self.previous(word),
                Key::RIGHT => self.cursor = self.next(word),
                Key::HOME => self.cursor = 0,
                Key::END => self.cursor = self.text.len(),
                Key::BACKSPACE => {
                    if self.editable && self.cursor == self.anchor {
                        self.cursor = self.previous(word);
                    }
                    self.insert("");
                }
                Key::DELETE => {
                    if self.editable && self.cursor == self.anchor {
                        self.cursor = self.next(word);
                    }
                    self.insert("");
                }
                Key::ENTER => {
                    self.trigger_action(state);
                    continue;
                }
                _ => continue,
            }
            if !state.has_modifiers(Modifiers::SHIFT) {
                self.anchor = self.cursor;
            }
            state.set_blink();
        }
        let text = state.text_input();
        if !text.is_empty() {
            self.insert(&text);
            state.set_blink();
        }
    }

    fn handle_mouse(&mut self, state: &mut State, m: &dyn FontMetrics) {
        let mx = state.mouse_pos().x;
        let index = |text: &str| m.index(text, (mx - PAD) as f32);

        let dragged = state
            .dragged_content()
            .and_then(|(payload, drop)| payload.as_str().map(|s| (s.to_owned(), drop)));
        if let Some((content, drop)) = dragged {
            self.cursor = index(&self.text);
            self.anchor = self.cursor;
            state.set_blink();
            if drop {
                self.insert(&content);
            }
            self.mode = Mode::Idle;
            return;
        }
        if !state.has_mouse_focus() {
            self.mode = Mode::Idle;
            return;
        }

        if state.mouse_button_down(MouseButtons::LEFT) {
            let c = index(&self.text);
            match self.mode {
                Mode::Drag => {
                    if !self.in_selection(c) {
                        state.initiate_drag(self.selected_text().to_owned());
                        self.insert("");
                    }
                }
                Mode::Idle if state.click_count() == 1 && self.in_selection(c) => {
                    self.mode = Mode::Drag;
                }
                _ => {
                    if self.last_x != mx {
                        self.cursor = c;
                        if self.mode == Mode::Idle {
                            self.mode = Mode::Select;
                            self.anchor = c;
                        }
                    } else if self.mode == Mode::Idle {
                        self.mode = Mode::Select;
                        match state.click_count() % 3 {
                            1 => (self.anchor, self.cursor) = (c, c),
                            2 => (self.anchor, self.cursor) = find_word(&self.text, c),
                            0 => (self.anchor, self.cursor) = (0, self.text.len()),
                            _ => self.anchor = self.cursor,
                        }
                    }
                    state.set_blink();
                    self.last_x = mx;
                }
            }
        } else {
            if self.mode == Mode::Drag {
                self.cursor = index(&self.text);
                self.anchor = self.cursor;
                state.set_blink();
            }
            self.mode = Mode::Idle;
        }
    }
}

impl Component for TextField {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let (w, h) =
            TextLabel::new().size(&self.text, &self.theme.font(FontToken::InputText), fonts);
        ((w + 2 * PAD).max(self.min_width), h + 2 * PAD)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let font = self.theme.font(FontToken::InputText);
        let m = buf.fonts().metrics(&font);
        state.set_cursor(Cursor::Text);
        self.handle_keys(state);
        self.handle_mouse(state, m.as_ref());

        let (w, h) = buf.size();
        let th = m.line_height();
        let focused = state.has_keyboard_focus();
        animate(state, &mut self.anim, 8.0, self.editable && focused);

        let input = self.theme.color(ColorToken::InputText);
        let filled = (self.anim * w as f32) as i32;
        buf.fill(
            Rect::xyxy(0, (h - th) / 2 - PAD, filled, (h + th) / 2 + PAD),
            self.theme.color(ColorToken::InputBackground),
        );
        let line = w - 2 * PAD - filled;
        if line > 0 {
            buf.fill(Rect::xywh(PAD, (h + th) / 2, line, 1), input);
        }

        let y = (h - th) / 2;
        let (s1, s2) = self.selection();
        let mut x = PAD as f32 + m.advance(&self.text[..s1]);
        let mut cx = x as i32;
        if s1 != s2 {
            let adv = m.advance(&self.text[s1..s2]);
            let token = if focused {
                ColorToken::Selection
            } else {
                ColorToken::SelectionInactive
            };
            buf.fill(
                Rect::xywh(x as i32, y, adv as i32, th),
                self.theme.color(token),
            );
            x += adv;
            if self.cursor.min(self.text.len()) == s2 {
                cx = x as i32;
            }
        }
        if state.blink() {
            buf.fill(Rect::xywh(cx - 1, y, 2, th), input);
        }
        self.label
            .draw_left(buf, Rect::xywh(PAD, y, w - PAD, th), &self.text, &font, input);
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
    }

    fn as_editable(&mut self) -> Option<&mut dyn Editable> {
        Some(self)
    }
}

impl Editable for TextField {
    fn select_all(&mut self, _state: &mut State) {
        self.anchor = 0;
        self.cursor = self.text.len();
    }

    fn cut(&mut self, state: &mut State) {
        state.set_clipboard(self.selected_text());
        self.insert("");
    }

    fn copy(&mut self, state: &mut State) {
        state.set_clipboard(self.selected_text());
    }

    fn paste(&mut self, state: &mut State) {
        let text = state.clipboard().to_owned();
        self.insert(&text);
    }
}
