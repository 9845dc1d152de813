//! Clip/offset stack laws of the draw buffer

use std::rc::Rc;

use quill_paint::{Buffer, Color, Command, FixedFontLookup, Point, Rect};

fn buffer() -> Buffer {
    let mut b = Buffer::new(Rc::new(FixedFontLookup));
    b.reset(640, 480);
    b
}

/// Deterministic pseudo-random rectangles, some of them outside the window
fn rects(seed: u32, n: usize) -> Vec<Rect> {
    let mut x = seed;
    let mut next = move || {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        (x % 400) as i32 - 100
    };
    (0..n)
        .map(|_| Rect::xywh(next(), next(), next().abs(), next().abs()))
        .collect()
}

#[test]
fn test_balanced_push_pop_restores_initial_state() {
    for seed in 1..50 {
        let mut b = buffer();
        let initial = (b.origin(), b.clip(), b.size());
        let rs = rects(seed, 1 + seed as usize % 7);
        for r in &rs {
            b.push(*r);
            b.fill(Rect::wh(3, 3), Color::BLACK);
        }
        for _ in &rs {
            b.pop();
        }
        assert_eq!(
            (b.origin(), b.clip(), b.size()),
            initial,
            "seed {seed} did not round-trip"
        );
        assert_eq!(b.depth(), 0);
    }
}

#[test]
fn test_interleaved_brackets_restore_each_level() {
    let mut b = buffer();
    b.push(Rect::xywh(10, 10, 100, 100));
    let level1 = (b.origin(), b.clip());
    b.push(Rect::xywh(5, 5, 20, 20));
    b.pop();
    assert_eq!((b.origin(), b.clip()), level1);
    b.push(Rect::xywh(90, 90, 50, 50));
    assert_eq!(b.clip(), Rect::xyxy(100, 100, 110, 110));
    b.pop();
    b.pop();
    assert_eq!(b.clip(), Rect::wh(640, 480));
}

#[test]
fn test_lists_keep_painter_order() {
    let mut b = buffer();
    b.fill(Rect::wh(1, 1), Color::BLACK);
    b.push(Rect::xywh(1, 1, 10, 10));
    b.outline(Rect::wh(10, 10), Color::WHITE);
    b.pop();
    b.shadow(Rect::wh(2, 2), Color::BLACK, 4);
    let kinds: Vec<_> = b
        .finish()
        .iter()
        .flat_map(|l| l.commands.iter().map(Command::kind))
        .collect();
    assert_eq!(kinds, ["fill", "outline", "shadow"]);
}

#[test]
fn test_commands_are_stored_relative_to_list_offset() {
    let mut b = buffer();
    b.push(Rect::xywh(30, 40, 100, 100));
    b.text(Point::new(2, 12), "hi", &quill_paint::Font::default(), Color::BLACK);
    b.pop();
    let lists = b.finish();
    assert_eq!(lists[0].offset, Point::new(30, 40));
    match &lists[0].commands[0] {
        Command::Text { position, .. } => assert_eq!(*position, Point::new(2, 12)),
        other => panic!("unexpected command {other:?}"),
    }
}
