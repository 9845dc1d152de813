use std::rc::Rc;

use quill_paint::{Buffer, Color, Command, Font, FontLookup, Rect};
use quill_text::{next_word, previous_word, FontLibrary, TextLabel};

#[test]
fn test_label_measures_through_library_fallback() {
    let library = FontLibrary::empty();
    let mut label = TextLabel::new();
    // no faces loaded, so fixed metrics: 6px per char at 12px
    assert_eq!(label.size("quill", &Font::new("bold", 12.0), &library), (30, 15));
}

#[test]
fn test_label_draws_with_buffer_fonts() {
    let mut buf = Buffer::new(Rc::new(FontLibrary::empty()));
    buf.reset(100, 40);
    let mut label = TextLabel::new();
    label.draw_centered_icon(
        &mut buf,
        Rect::wh(100, 40),
        "",
        &Font::default(),
        Color::BLACK,
        "close",
        4,
    );
    let lists = buf.finish();
    assert_eq!(lists.len(), 1);
    // empty text drops the gap: x = (100 - 0 - 0 - 15) / 2
    assert!(matches!(
        &lists[0].commands[..],
        [Command::Icon { rect, .. }] if *rect == Rect::xywh(42, 0, 15, 40)
    ));
}

#[test]
fn test_closest_font_is_stable() {
    let library = FontLibrary::empty();
    let font = library.closest(&Font::new("Mono Bold", 14.26));
    assert_eq!(font, Font::new("mono-bold", 14.5));
    assert_eq!(library.closest(&font), font);
}

#[test]
fn test_word_navigation() {
    let text = "hello, big world";
    assert_eq!(next_word(text, 0), 5);
    assert_eq!(previous_word(text, text.len()), 11);
}
