// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::{assert_near, shape, ADVANCE};
use crate::analysis::{self, BreakVector};
use crate::fold;
use crate::shaped_char::ShapedChar;

fn setup(text: &str) -> (BreakVector, Vec<f32>) {
    let shaper = shape(text);
    let breaks = analysis::line_breaks(shaper.text(), shaper.chars());
    let widths: Vec<f32> = shaper.chars().iter().map(ShapedChar::fold_width).collect();
    (breaks, widths)
}

#[test]
fn wide_enough_text_stays_on_one_line() {
    let (breaks, widths) = setup("aa bb");
    assert_eq!(fold::fold_lines(&breaks, &widths, 100.0), [5]);
}

#[test]
fn folds_at_word_boundaries() {
    let (breaks, widths) = setup("aa bb");
    // Room for two and a half characters plus trimmed trailing whitespace.
    assert_eq!(fold::fold_lines(&breaks, &widths, 2.4 * ADVANCE), [3, 2]);
}

#[test]
fn trailing_whitespace_does_not_count_toward_the_width() {
    let (_, widths) = setup("aa bb");
    assert_near(fold::line_width(&widths[..3]), 2.0 * ADVANCE);
    assert_near(fold::line_width(&widths[..5]), 5.0 * ADVANCE);
    // Whitespace only.
    assert_near(fold::line_width(&widths[2..3]), 0.0);
}

#[test]
fn zero_width_whitespace_is_still_whitespace() {
    // The sign distinguishes invisible from visible at width zero.
    assert_near(fold::line_width(&[-0.0]), 0.0);
    assert_near(fold::line_width(&[5.0, -0.0]), 5.0);
}

#[test]
fn mandatory_breaks_always_fold() {
    let (breaks, widths) = setup("ab\ncd");
    assert_eq!(fold::fold_lines(&breaks, &widths, 1000.0), [3, 2]);
}

#[test]
fn unbreakable_overflow_gets_its_own_line() {
    let (breaks, widths) = setup("abcdef gh");
    // No boundary inside the first word; it overflows rather than splits.
    assert_eq!(fold::fold_lines(&breaks, &widths, 2.0 * ADVANCE), [7, 2]);
}

#[test]
fn folding_preserves_every_character() {
    let (breaks, widths) = setup("one two three four five\nsix");
    for max_width in [1.0, 9.0, 17.0, 33.0, 65.0, 1000.0] {
        let lengths = fold::fold_lines(&breaks, &widths, max_width);
        assert_eq!(
            lengths.iter().sum::<usize>(),
            widths.len(),
            "at width {max_width}"
        );
        assert!(lengths.iter().all(|&l| l > 0));
    }
}

#[test]
fn narrower_folds_never_have_fewer_lines() {
    let (breaks, widths) = setup("one two three four five");
    let mut previous = 0;
    for max_width in [1000.0, 80.0, 60.0, 40.0, 20.0, 1.0] {
        let num_lines = fold::fold_lines(&breaks, &widths, max_width).len();
        assert!(num_lines >= previous, "at width {max_width}");
        previous = num_lines;
    }
}

#[test]
fn empty_text_folds_to_no_lines() {
    let (breaks, widths) = setup("");
    assert!(fold::fold_lines(&breaks, &widths, 100.0).is_empty());
}
