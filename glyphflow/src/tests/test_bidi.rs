// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::shape_and_layout;
use crate::shaped_char::Direction;

#[test]
fn hebrew_run_reverses_inside_latin_text() {
    // "abc אבג def"
    let shaper = shape_and_layout("abc \u{5D0}\u{5D1}\u{5D2} def", 1000.0);
    let line = &shaper.lines()[0];
    assert_eq!(line.columns, [0, 1, 2, 3, 6, 5, 4, 7, 8, 9, 10]);
    assert_eq!(line.paragraph_direction, Direction::Ltr);
    for (i, c) in shaper.chars().iter().enumerate() {
        let expected = if (4..7).contains(&i) {
            Direction::Rtl
        } else {
            Direction::Ltr
        };
        assert_eq!(c.direction, expected, "char {i}");
    }
}

#[test]
fn rtl_paragraph_reverses_the_line() {
    let shaper = shape_and_layout("\u{5D0}\u{5D1}\u{5D2} abc", 1000.0);
    assert_eq!(shaper.text_direction(), Direction::Rtl);
    let line = &shaper.lines()[0];
    assert_eq!(line.paragraph_direction, Direction::Rtl);
    // Left to right on screen: the Latin run, the space, then the Hebrew
    // letters reversed.
    assert_eq!(line.columns, [4, 5, 6, 3, 2, 1, 0]);
}

#[test]
fn brackets_mirror_in_rtl_runs() {
    let shaper = shape_and_layout("\u{5D0}(\u{5D1})\u{5D2}", 1000.0);
    assert_eq!(shaper.chars()[1].mirrored, Some(')'));
    assert_eq!(shaper.chars()[3].mirrored, Some('('));
    assert_eq!(shaper.chars()[0].mirrored, None);
}

#[test]
fn latin_brackets_do_not_mirror() {
    let shaper = shape_and_layout("a(b)c", 1000.0);
    assert!(shaper.chars().iter().all(|c| c.mirrored.is_none()));
}

#[test]
fn embedding_codes_are_deleted_from_display() {
    // LRE ... PDF
    let shaper = shape_and_layout("a\u{202A}b\u{202C}c", 1000.0);
    assert_eq!(shaper.len(), 5);
    assert!(shaper.chars()[1].deleted);
    assert!(shaper.chars()[3].deleted);
    assert_eq!(shaper.lines()[0].columns, [0, 2, 4]);
    // Deleted characters keep a clamped address on their line.
    assert_eq!(shaper.chars()[1].line_nr, 0);
    assert_eq!(shaper.chars()[1].column_nr, 0);
    assert_eq!(shaper.chars()[3].column_nr, 1);
}

#[test]
fn paragraph_direction_is_resolved_per_paragraph() {
    let shaper = shape_and_layout("abc\n\u{5D0}\u{5D1}\u{5D2}\n", 1000.0);
    assert_eq!(shaper.lines().len(), 3);
    assert_eq!(shaper.lines()[0].paragraph_direction, Direction::Ltr);
    assert_eq!(shaper.lines()[1].paragraph_direction, Direction::Rtl);
    // The virtual line after the trailing separator takes the text
    // direction.
    assert!(shaper.lines()[2].range.is_empty());
    assert_eq!(shaper.lines()[2].paragraph_direction, Direction::Ltr);
}

#[test]
fn separator_controls_fold_into_addressed_lines() {
    // An information separator is a paragraph break like any newline; the
    // line before it must keep its columns and every character its address.
    let shaper = shape_and_layout("a\u{1C}b", 1000.0);
    assert_eq!(shaper.lines().len(), 2);
    assert_eq!(shaper.lines()[0].columns, [0, 1]);
    for (i, c) in shaper.chars().iter().enumerate() {
        assert_ne!(c.line_nr, crate::shaped_char::UNASSIGNED, "char {i}");
    }
}

#[test]
fn first_strong_detection_skips_isolates() {
    // The Hebrew letter sits inside an isolate, so the first strong
    // character of the text is the trailing Latin one.
    let shaper = shape_and_layout("\u{2067}\u{5D0}\u{2069}a", 1000.0);
    assert_eq!(shaper.text_direction(), Direction::Ltr);

    let shaper = shape_and_layout("\u{2066}a\u{2069}\u{5D0}", 1000.0);
    assert_eq!(shaper.text_direction(), Direction::Rtl);
}

#[test]
fn every_character_gets_an_address() {
    let shaper = shape_and_layout("ab \u{5D0}\u{5D1}\ncd", 60.0);
    for (i, c) in shaper.chars().iter().enumerate() {
        assert!(c.line_nr < shaper.lines().len(), "char {i}");
        let line = &shaper.lines()[c.line_nr];
        assert!(c.column_nr < line.num_columns(), "char {i}");
        if !c.deleted {
            assert_eq!(line.columns[c.column_nr], i, "char {i}");
        }
    }
}
