use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use quill_core::{
    handle_keyboard_shortcuts, BackendState, Component, FrameDriver, FrameHooks, FrameReport, Key,
    Modifiers, MouseButtons, PopupHandle, State, WidgetId,
};
use quill_paint::{Buffer, FixedFontLookup, FontLookup, Point, Rect};
use quill_text::TextLabel;
use quill_theme::{default_theme, FontToken};
use quill_widgets::{
    show_input_dialog, show_message_dialog, Button, CheckBox, Menu, MenuBar, Root, ScrollView,
    Separator, Stack, TextField,
};

/// Records whether it had mouse focus during its last update
struct FocusWatch {
    id: WidgetId,
    mouse_focus: Rc<Cell<bool>>,
}

impl FocusWatch {
    fn new() -> (Self, Rc<Cell<bool>>) {
        let flag = Rc::new(Cell::new(false));
        let watch = Self {
            id: WidgetId::new(),
            mouse_focus: Rc::clone(&flag),
        };
        (watch, flag)
    }
}

impl Component for FocusWatch {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, _fonts: &dyn FontLookup) -> (i32, i32) {
        (20, 20)
    }

    fn update(&mut self, _buf: &mut Buffer, state: &mut State) {
        self.mouse_focus.set(state.has_mouse_focus());
    }
}

struct Harness {
    driver: FrameDriver,
    state: BackendState,
    buf: Buffer,
    size: (i32, i32),
}

impl Harness {
    fn new(w: i32, h: i32) -> Self {
        Self::with_driver(FrameDriver::default(), w, h)
    }

    fn with_driver(driver: FrameDriver, w: i32, h: i32) -> Self {
        let mut state = BackendState::new();
        state.set_hovered(true);
        state.set_window_size(w, h);
        Self {
            driver,
            state,
            buf: Buffer::new(Rc::new(FixedFontLookup)),
            size: (w, h),
        }
    }

    fn cycle(&mut self, root: &mut dyn Component, input: impl FnOnce(&mut BackendState)) -> FrameReport {
        self.driver.begin_cycle(&mut self.state);
        input(&mut self.state);
        self.driver
            .frame(&mut self.state, &mut self.buf, root, self.size, false, Instant::now())
    }

    fn press(&mut self, root: &mut dyn Component, clicks: u32) {
        self.cycle(root, |s| {
            s.grab_mouse();
            s.set_mouse_buttons(MouseButtons::LEFT);
            s.set_mouse_clicks(clicks);
        });
    }

    fn release(&mut self, root: &mut dyn Component) {
        self.cycle(root, |s| {
            s.release_mouse(MouseButtons::LEFT);
            s.set_mouse_buttons(MouseButtons::NONE);
        });
    }
}

fn focused_field(h: &mut Harness, text: &str) -> TextField {
    let mut field = TextField::new().with_text(text);
    let id = field.id();
    h.cycle(&mut field, |s| s.set_keyboard_focus(id));
    field
}

#[test]
fn test_typing_after_backspace() {
    let mut h = Harness::new(100, 100);
    let mut field = focused_field(&mut h, "hello");
    h.cycle(&mut field, |s| s.add_key_press(Key::BACKSPACE));
    assert_eq!(field.text(), "hell");
    h.cycle(&mut field, |s| s.add_text_input("!"));
    assert_eq!(field.text(), "hell!");
    assert_eq!(field.cursor(), 5);
}

#[test]
fn test_keys_apply_before_text_in_one_batch() {
    let mut h = Harness::new(100, 100);
    let mut field = focused_field(&mut h, "hello");
    h.cycle(&mut field, |s| {
        s.add_key_press(Key::BACKSPACE);
        s.add_text_input("!");
    });
    assert_eq!(field.text(), "hell!");
    assert_eq!(field.cursor(), 5);
}

#[test]
fn test_shift_extends_selection_and_ctrl_moves_by_word() {
    let mut h = Harness::new(100, 100);
    let mut field = focused_field(&mut h, "one two");
    h.cycle(&mut field, |s| {
        s.set_modifiers(Modifiers::CONTROL | Modifiers::SHIFT);
        s.add_key_press(Key::LEFT);
    });
    assert_eq!(field.selected_text(), "two");
    h.cycle(&mut field, |s| {
        s.set_modifiers(Modifiers::NONE);
        s.add_key_press(Key::HOME);
    });
    assert_eq!(field.cursor(), 0);
    assert_eq!(field.selected_text(), "");
}

#[test]
fn test_keys_without_focus_are_ignored() {
    let mut h = Harness::new(100, 100);
    let mut field = TextField::new().with_text("abc");
    h.cycle(&mut field, |s| {
        s.add_key_press(Key::BACKSPACE);
        s.add_text_input("x");
    });
    assert_eq!(field.text(), "abc");
}

#[test]
fn test_drag_moves_selected_text() {
    let mut h = Harness::new(100, 100);
    let mut field = TextField::new().with_text("abcd");
    field.set_selection(0, 2);

    // 6px per character after 3px padding: x = 9 is inside "ab"
    h.cycle(&mut field, |s| s.set_mouse_position(9, 5));
    h.press(&mut field, 1);
    assert_eq!(field.text(), "abcd", "pressing inside the selection keeps it");

    h.cycle(&mut field, |s| s.set_mouse_position(27, 5));
    assert_eq!(field.text(), "cd", "leaving the selection starts the drag");
    assert!(h.state.dragged_content().is_some());

    h.cycle(&mut field, |_| {});
    assert_eq!(field.cursor(), 2, "the drop position follows the mouse");

    h.release(&mut field);
    assert_eq!(field.text(), "cdab");
    assert_eq!(field.cursor(), 4);

    h.cycle(&mut field, |_| {});
    assert_eq!(field.text(), "cdab");
    assert!(h.state.dragged_content().is_none());
}

#[test]
fn test_release_inside_selection_places_cursor() {
    let mut h = Harness::new(100, 100);
    let mut field = TextField::new().with_text("abcd");
    field.set_selection(0, 2);
    h.cycle(&mut field, |s| s.set_mouse_position(9, 5));
    h.press(&mut field, 1);
    h.release(&mut field);
    assert_eq!(field.text(), "abcd");
    assert_eq!(field.selection(), (1, 1));
    assert!(h.state.dragged_content().is_none());
}

#[test]
fn test_double_and_triple_click_select() {
    let mut h = Harness::new(100, 100);
    let mut field = TextField::new().with_text("one two");
    h.cycle(&mut field, |s| s.set_mouse_position(33, 5));
    h.press(&mut field, 1);
    h.release(&mut field);
    assert_eq!(field.selection(), (5, 5));

    h.press(&mut field, 2);
    h.release(&mut field);
    assert_eq!(field.selected_text(), "two");

    h.press(&mut field, 3);
    h.release(&mut field);
    assert_eq!(field.selected_text(), "one two");
}

#[test]
fn test_clipboard_shortcuts_edit_the_focused_field() {
    let hooks = FrameHooks {
        update: Some(Box::new(handle_keyboard_shortcuts)),
        ..FrameHooks::default()
    };
    let mut h = Harness::with_driver(FrameDriver::default().with_hooks(hooks), 100, 100);
    let mut field = focused_field(&mut h, "hello");

    h.cycle(&mut field, |s| {
        s.set_modifiers(Modifiers::CONTROL);
        s.add_key_press(Key::A);
        s.add_key_press(Key::C);
    });
    assert_eq!(h.state.clipboard(), "hello");
    assert_eq!(field.selected_text(), "hello");

    h.cycle(&mut field, |s| s.add_key_press(Key::X));
    assert_eq!(field.text(), "");

    h.cycle(&mut field, |s| s.add_key_press(Key::V));
    assert_eq!(field.text(), "hello");
    assert_eq!(field.cursor(), 5);
}

#[test]
fn test_button_runs_its_action_once_per_click() {
    let mut h = Harness::new(100, 100);
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let mut button = Button::new("Go").on_click(move |_| counter.set(counter.get() + 1));
    h.cycle(&mut button, |s| s.set_mouse_position(5, 5));
    h.press(&mut button, 1);
    assert_eq!(clicks.get(), 0);
    h.release(&mut button);
    assert_eq!(clicks.get(), 1);
    h.cycle(&mut button, |_| {});
    assert_eq!(clicks.get(), 1);
}

#[test]
fn test_checkbox_toggles_on_space() {
    let mut h = Harness::new(100, 100);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let mut check = CheckBox::new("Wrap").on_change(move |_, on| log.borrow_mut().push(on));
    let id = check.id();
    h.cycle(&mut check, |s| s.set_keyboard_focus(id));
    h.cycle(&mut check, |s| s.add_key_press(Key::SPACE));
    h.cycle(&mut check, |s| s.add_key_press(Key::SPACE));
    assert_eq!(*seen.borrow(), vec![true, false]);
    assert!(!check.is_checked());
}

#[test]
fn test_scroll_wheel_moves_the_view() {
    let mut h = Harness::new(100, 100);
    let stack = (0..20).fold(Stack::new(), |s, _| s.child(Separator::new(10, 20)));
    let mut view = ScrollView::new(stack);
    h.cycle(&mut view, |_| {});
    h.cycle(&mut view, |s| s.add_scroll(0, -1));
    assert_eq!(view.offset(), Point::new(0, 45));
    h.cycle(&mut view, |s| s.add_scroll(0, 10));
    assert_eq!(view.offset(), Point::ZERO);
    h.cycle(&mut view, |s| s.add_scroll(0, -100));
    assert_eq!(view.offset(), Point::new(0, 300), "clamped to content height minus view");
}

#[test]
fn test_dialog_blocks_the_content_until_closed() {
    let hooks = FrameHooks {
        init: Some(Box::new(|s: &mut State| {
            show_message_dialog(s, "Note", "Saved.\nAll good.", "OK")
        })),
        ..FrameHooks::default()
    };
    let mut h = Harness::with_driver(FrameDriver::default().with_hooks(hooks), 400, 300);
    let (watch, content_focus) = FocusWatch::new();
    let mut root = Root::new(watch);

    h.cycle(&mut root, |_| {});
    assert!(root.has_dialog());
    assert!(!content_focus.get(), "content under a dialog gets no input");

    // the dialog's button took keyboard focus when it opened
    h.cycle(&mut root, |s| s.add_key_press(Key::ENTER));
    assert!(!root.has_dialog());
    assert!(content_focus.get());
}

#[test]
fn test_input_dialog_submits_on_enter() {
    let result = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&result);
    let hooks = FrameHooks {
        init: Some(Box::new(move |s: &mut State| {
            show_input_dialog(s, "Name", "Enter a name", "OK", "Cancel", move |_, text| {
                *sink.borrow_mut() = Some(text.to_owned());
            })
        })),
        ..FrameHooks::default()
    };
    let mut h = Harness::with_driver(FrameDriver::default().with_hooks(hooks), 400, 300);
    let (watch, _) = FocusWatch::new();
    let mut root = Root::new(watch);

    h.cycle(&mut root, |_| {});
    assert!(root.has_dialog());
    h.cycle(&mut root, |s| s.add_text_input("ada"));
    assert_eq!(*result.borrow(), None);
    h.cycle(&mut root, |s| s.add_key_press(Key::ENTER));
    assert_eq!(result.borrow().as_deref(), Some("ada"));
    assert!(!root.has_dialog());
}

fn root_with_popup(h: &mut Harness) -> (Root, Rc<Cell<bool>>, Rc<Cell<bool>>, PopupHandle) {
    let (watch, content_focus) = FocusWatch::new();
    let mut root = Root::new(watch);
    h.cycle(&mut root, |s| s.set_mouse_position(10, 10));
    let (popup, popup_focus) = FocusWatch::new();
    let handle = h.state.open_popup(Rect::xywh(50, 50, 20, 20), Box::new(popup));
    h.cycle(&mut root, |_| {});
    (root, content_focus, popup_focus, handle)
}

#[test]
fn test_popup_blocks_the_content_and_closes_with_its_handle() {
    let mut h = Harness::new(100, 100);
    let (mut root, content_focus, _, handle) = root_with_popup(&mut h);
    assert_eq!(root.popup_count(), 1);
    assert!(h.state.has_popups());
    assert!(!content_focus.get());

    h.state.close_popups();
    assert!(handle.is_closed());
    assert!(!h.state.has_popups());
    h.cycle(&mut root, |_| {});
    assert_eq!(root.popup_count(), 0);
    assert!(content_focus.get());
}

#[test]
fn test_pressing_outside_closes_popups() {
    let mut h = Harness::new(100, 100);
    let (mut root, _, _, handle) = root_with_popup(&mut h);
    h.press(&mut root, 1);
    assert!(handle.is_closed());
    assert_eq!(root.popup_count(), 0);
    assert!(!h.state.has_popups());
}

#[test]
fn test_pressing_inside_a_popup_keeps_it() {
    let mut h = Harness::new(100, 100);
    let (mut root, _, popup_focus, handle) = root_with_popup(&mut h);
    h.cycle(&mut root, |s| s.set_mouse_position(55, 55));
    assert!(popup_focus.get());
    h.press(&mut root, 1);
    assert!(!handle.is_closed());
    assert_eq!(root.popup_count(), 1);
    assert!(popup_focus.get());
}

/// A menu bar at the top, recording the open menu after every update
struct MenuWindow {
    id: WidgetId,
    bar: MenuBar,
    open: Rc<Cell<Option<usize>>>,
}

impl Component for MenuWindow {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        self.bar.preferred_size(fonts)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, _) = buf.size();
        let (_, bar_h) = self.bar.preferred_size(buf.fonts());
        state.update_child(buf, Rect::xywh(0, 0, w, bar_h), &mut self.bar);
        self.open.set(self.bar.open_menu());
    }
}

fn menu_window(chosen: &Rc<RefCell<Vec<&'static str>>>) -> (Root, Rc<Cell<Option<usize>>>) {
    let choose = |name: &'static str| {
        let chosen = Rc::clone(chosen);
        move |_: &mut State| chosen.borrow_mut().push(name)
    };
    let bar = MenuBar::new()
        .menu(Menu::new("File").item("Open", choose("open")).item("Quit", choose("quit")))
        .menu(Menu::new("Edit").item("Copy", choose("copy")).item("Paste", choose("paste")));
    let open = Rc::new(Cell::new(None));
    let window = MenuWindow {
        id: WidgetId::new(),
        bar,
        open: Rc::clone(&open),
    };
    (Root::new(window), open)
}

/// Width and height of a menu bar title
fn title_size(text: &str) -> (i32, i32) {
    let font = default_theme().font(FontToken::Text);
    let (w, h) = TextLabel::new().size(text, &font, &FixedFontLookup);
    (w + 10, h + 6)
}

#[test]
fn test_hovering_a_sibling_menu_switches_the_open_popup() {
    let mut h = Harness::new(200, 100);
    let chosen = Rc::new(RefCell::new(Vec::new()));
    let (mut root, open) = menu_window(&chosen);
    let (file_w, bar_h) = title_size("File");

    h.cycle(&mut root, |s| s.set_mouse_position(2, 2));
    assert_eq!(open.get(), None);
    h.press(&mut root, 1);
    assert_eq!(open.get(), Some(0));
    assert_eq!(root.popup_count(), 2, "menu popup and bar overlay");

    h.cycle(&mut root, |s| s.set_mouse_position(file_w + 2, 2));
    assert_eq!(open.get(), Some(1));
    assert_eq!(root.popup_count(), 2, "the File popup closed");

    h.cycle(&mut root, |s| s.set_mouse_position(file_w + 5, bar_h + 3));
    h.release(&mut root);
    assert_eq!(*chosen.borrow(), ["copy"]);
    assert_eq!(root.popup_count(), 0);
    assert_eq!(open.get(), None);
    assert!(!h.state.has_popups());
}

#[test]
fn test_menu_item_runs_on_enter() {
    let mut h = Harness::new(200, 100);
    let chosen = Rc::new(RefCell::new(Vec::new()));
    let (mut root, open) = menu_window(&chosen);
    let (_, bar_h) = title_size("File");

    h.cycle(&mut root, |s| s.set_mouse_position(2, 2));
    h.press(&mut root, 1);
    h.release(&mut root);
    assert_eq!(open.get(), Some(0), "releasing on the title keeps the menu open");
    assert!(chosen.borrow().is_empty());

    h.cycle(&mut root, |s| s.set_mouse_position(5, bar_h * 2 + 3));
    h.cycle(&mut root, |s| s.add_key_press(Key::ENTER));
    assert_eq!(*chosen.borrow(), ["quit"]);
    assert_eq!(root.popup_count(), 0);
}

/// Opens a context menu where the right button is pressed
struct ContextArea {
    id: WidgetId,
    menu: Menu,
}

impl Component for ContextArea {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, _fonts: &dyn FontLookup) -> (i32, i32) {
        (100, 100)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        if state.mouse_button_down(MouseButtons::RIGHT) && !self.menu.is_open() {
            let at = state.mouse_pos();
            self.menu.open_at(state, at, buf.fonts());
        }
    }
}

#[test]
fn test_context_menu_flips_at_the_window_corner() {
    let mut h = Harness::new(100, 100);
    let chosen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&chosen);
    let area = ContextArea {
        id: WidgetId::new(),
        menu: Menu::new("Context").item("Delete", move |_| log.borrow_mut().push("delete")),
    };
    let mut root = Root::new(area);

    h.cycle(&mut root, |s| s.set_mouse_position(90, 90));
    h.cycle(&mut root, |s| {
        s.grab_mouse();
        s.set_mouse_buttons(MouseButtons::RIGHT);
    });
    assert_eq!(root.popup_count(), 1);
    h.cycle(&mut root, |s| {
        s.release_mouse(MouseButtons::RIGHT);
        s.set_mouse_buttons(MouseButtons::NONE);
    });
    assert_eq!(root.popup_count(), 1);

    // the popup ends at the press position, so its only item sits above and left of it
    h.cycle(&mut root, |s| s.set_mouse_position(85, 84));
    h.press(&mut root, 1);
    h.release(&mut root);
    assert_eq!(*chosen.borrow(), ["delete"]);
    assert_eq!(root.popup_count(), 0);
}
