use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use quill_app::{App, AppConfig, Prepared};
use quill_core::{Cursor, Key, Modifiers};
use quill_gpu::{BuiltinIcons, RecordingBackend, Renderer, RendererConfig};
use quill_platform::{
    ClipboardBackend, ControlFlow, InputEvent, PlatformEvent, Result as PlatformResult,
};
use quill_text::{FontLibrary, GlyphProvider};
use quill_widgets::{Label, Root, Stack, TextField};

/// Clipboard whose contents stay visible to the test
#[derive(Clone, Default)]
struct SharedClipboard(Rc<RefCell<String>>);

impl ClipboardBackend for SharedClipboard {
    fn get_text(&mut self) -> PlatformResult<String> {
        Ok(self.0.borrow().clone())
    }

    fn set_text(&mut self, text: &str) -> PlatformResult<()> {
        *self.0.borrow_mut() = text.to_owned();
        Ok(())
    }
}

fn renderer(fonts: &Rc<FontLibrary>) -> Renderer<RecordingBackend> {
    let glyphs: Rc<dyn GlyphProvider> = fonts.clone();
    Renderer::new(
        RecordingBackend::new(),
        glyphs,
        Rc::new(BuiltinIcons::new()),
        RendererConfig::default(),
    )
}

fn prepare(app: App) -> (Prepared, Renderer<RecordingBackend>) {
    let mut prepared = app
        .with_fonts(Rc::new(FontLibrary::empty()))
        .prepare()
        .unwrap();
    prepared.session.resize(200, 100);
    let renderer = renderer(&prepared.fonts);
    (prepared, renderer)
}

fn label_app() -> App {
    App::new(Root::new(Label::new("Hello")))
}

#[test]
fn test_frames_are_drawn_at_the_window_size() {
    let (mut prepared, mut renderer) = prepare(label_app());
    let output = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(output.flow, ControlFlow::Wait);
    assert!(!output.report.deferred);
    assert_eq!(renderer.backend().frames(), 1);
    assert_eq!(renderer.backend().frame_size(), (200, 100));
    assert!(!renderer.backend().draws().is_empty());
}

#[test]
fn test_resize_changes_the_next_frame() {
    let (mut prepared, mut renderer) = prepare(label_app());
    assert!(prepared.session.handle(PlatformEvent::Resized {
        width: 320,
        height: 240
    }));
    assert_eq!(prepared.session.size(), (320, 240));
    prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(renderer.backend().frame_size(), (320, 240));
}

#[test]
fn test_close_without_hook_exits() {
    let (mut prepared, mut renderer) = prepare(label_app());
    prepared.session.handle(PlatformEvent::CloseRequested);
    let output = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(output.flow, ControlFlow::Exit);
}

#[test]
fn test_close_hook_can_keep_the_window_open() {
    let app = label_app().on_close(|state| state.set_window_title("Unsaved changes"));
    let (mut prepared, mut renderer) = prepare(app);
    prepared.session.handle(PlatformEvent::CloseRequested);
    let output = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(output.flow, ControlFlow::Wait);
    assert_eq!(output.title.as_deref(), Some("Unsaved changes"));

    let output = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(output.flow, ControlFlow::Wait, "close is not repeated");
}

#[test]
fn test_cursor_change_is_reported_once() {
    let app = label_app().on_update(|state| state.set_cursor(Cursor::Hand));
    let (mut prepared, mut renderer) = prepare(app);
    let first = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(first.cursor, Some(Cursor::Hand));
    let second = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(second.cursor, None);
}

#[test]
fn test_animation_schedules_a_redraw() {
    let app = label_app().on_update(|state| state.request_animation());
    let (mut prepared, mut renderer) = prepare(app);
    let now = Instant::now();
    let output = prepared.session.frame(&mut renderer, now);
    let interval = AppConfig::default().frame.animation_interval();
    assert_eq!(output.flow, ControlFlow::RedrawAt(now + interval));
}

#[test]
fn test_wake_runs_queued_callbacks() {
    let (mut prepared, mut renderer) = prepare(label_app().with_title("Before"));
    let handle = prepared.session.ui_handle(Arc::new(|| {}));
    handle
        .run(|state| state.set_window_title("After"))
        .unwrap();

    assert!(prepared.session.handle(PlatformEvent::Wake));
    assert_eq!(prepared.session.state().window_title(), "After");
    let output = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(output.title.as_deref(), Some("After"));
    let output = prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(output.title, None);
}

#[test]
fn test_handle_is_delivered_once() {
    let delivered = Rc::new(RefCell::new(0));
    let count = Rc::clone(&delivered);
    let app = label_app().on_handle(move |_handle| *count.borrow_mut() += 1);
    let (mut prepared, _renderer) = prepare(app);

    let handle = prepared.session.ui_handle(Arc::new(|| {}));
    prepared.deliver_handle(handle.clone());
    prepared.deliver_handle(handle);
    assert_eq!(*delivered.borrow(), 1);
}

#[test]
fn test_frame_and_lifecycle_events_need_no_redraw() {
    let (mut prepared, _renderer) = prepare(label_app());
    assert!(!prepared.session.handle(PlatformEvent::Frame));
    assert!(!prepared.session.handle(PlatformEvent::Resumed));
    assert!(!prepared.session.handle(PlatformEvent::Suspended));
    assert!(prepared.session.handle(PlatformEvent::Blink(true)));
}

#[test]
fn test_copy_shortcut_reaches_the_system_clipboard() {
    let field = TextField::new().with_text("hello");
    let id = quill_core::Component::id(&field);
    let app = App::new(Root::new(Stack::new().child(field)))
        .on_init(move |state| state.set_keyboard_focus(id));
    let (mut prepared, mut renderer) = prepare(app);
    let clipboard = SharedClipboard::default();
    prepared.session = prepared.session.with_clipboard(Box::new(clipboard.clone()));

    prepared.session.frame(&mut renderer, Instant::now());
    for event in [
        InputEvent::Modifiers(Modifiers::CONTROL),
        InputEvent::Key(Key::A),
        InputEvent::Key(Key::C),
    ] {
        prepared.session.handle(PlatformEvent::Input(event));
    }
    prepared.session.frame(&mut renderer, Instant::now());

    assert_eq!(prepared.session.state().clipboard(), "hello");
    assert_eq!(*clipboard.0.borrow(), "hello");
}

#[test]
fn test_clipboard_is_read_back_after_quiet_frames() {
    let (mut prepared, mut renderer) = prepare(label_app());
    let clipboard = SharedClipboard::default();
    *clipboard.0.borrow_mut() = "outside".to_string();
    prepared.session = prepared.session.with_clipboard(Box::new(clipboard.clone()));
    assert_eq!(prepared.session.state().clipboard(), "outside");

    *clipboard.0.borrow_mut() = "copied elsewhere".to_string();
    prepared.session.frame(&mut renderer, Instant::now());
    assert_eq!(prepared.session.state().clipboard(), "copied elsewhere");
}
