use ogx_core::Position;
use rowan::TextSize;

use crate::line_index::LineIndex;

fn pos(index: &LineIndex, offset: u32) -> Position {
    index.position(TextSize::from(offset))
}

#[test]
fn single_line() {
    let index = LineIndex::new("abc");

    assert_eq!(index.line_count(), 1);
    assert_eq!(pos(&index, 0), Position::new(1, 0));
    assert_eq!(pos(&index, 2), Position::new(1, 2));
}

#[test]
fn multiple_lines() {
    let index = LineIndex::new("a = 1\nb = 2\n\nc");

    assert_eq!(index.line_count(), 4);
    assert_eq!(pos(&index, 4), Position::new(1, 4));
    assert_eq!(pos(&index, 5), Position::new(1, 5));
    assert_eq!(pos(&index, 6), Position::new(2, 0));
    assert_eq!(pos(&index, 12), Position::new(3, 0));
    assert_eq!(pos(&index, 13), Position::new(4, 0));
}

#[test]
fn crlf_and_lone_cr() {
    let index = LineIndex::new("a\r\nb\rc");

    assert_eq!(index.line_count(), 3);
    assert_eq!(pos(&index, 3), Position::new(2, 0));
    assert_eq!(pos(&index, 5), Position::new(3, 0));
}

#[test]
fn offsets_past_end_clamp() {
    let index = LineIndex::new("ab\ncd");

    assert_eq!(pos(&index, 100), Position::new(2, 2));
}

#[test]
fn line_starts() {
    let index = LineIndex::new("x\ny\n");

    assert_eq!(index.line_start(0), None);
    assert_eq!(index.line_start(1), Some(TextSize::from(0)));
    assert_eq!(index.line_start(2), Some(TextSize::from(2)));
    assert_eq!(index.line_start(3), Some(TextSize::from(4)));
    assert_eq!(index.line_start(4), None);
}
