// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::shape_and_layout;
use crate::cursor::TextCursor;
use crate::selection::TextSelection;

#[test]
fn word_drag_extends_by_whole_words() {
    let shaper = shape_and_layout("aa bb cc", 1000.0);
    let mut selection = TextSelection::default();

    // Double click on "bb".
    let anchor = TextCursor::after(4);
    selection.start_selection(anchor, shaper.select_word(anchor));
    assert_eq!(
        selection.selection(),
        (TextCursor::before(3), TextCursor::after(4))
    );

    // Drag onto "cc": the union covers both words.
    selection.drag_selection(shaper.select_word(TextCursor::before(6)));
    assert_eq!(
        selection.selection(),
        (TextCursor::before(3), TextCursor::after(7))
    );
    assert_eq!(selection.cursor(), TextCursor::after(7));

    // Drag back onto "aa": the anchor word stays selected.
    selection.drag_selection(shaper.select_word(TextCursor::before(0)));
    assert_eq!(
        selection.selection(),
        (TextCursor::before(0), TextCursor::after(4))
    );
    assert_eq!(selection.cursor(), TextCursor::before(0));
}

#[test]
fn resize_clamps_into_shorter_text() {
    let shaper = shape_and_layout("abcdef", 1000.0);
    let mut selection = TextSelection::default();
    selection.start_selection(TextCursor::after(5), shaper.select_document(TextCursor::after(5)));

    selection.resize(3);
    assert_eq!(
        selection.selection(),
        (TextCursor::before(0), TextCursor::after(2))
    );
}

#[test]
fn cursor_movement_collapses_the_selection() {
    let shaper = shape_and_layout("aa bb", 1000.0);
    let mut selection = TextSelection::default();
    selection.start_selection(TextCursor::before(0), shaper.select_word(TextCursor::before(0)));
    assert!(!selection.is_empty());

    let cursor = shaper.move_right_char(selection.cursor(), false);
    selection.set_cursor(cursor);
    assert!(selection.is_empty());
    assert_eq!(selection.cursor(), TextCursor::after(0));
}
