// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line folding: fitting characters to a maximum line width.
//!
//! All functions work on the fold-width vector, where each entry is a
//! character's advance in pixels, negated for invisible characters
//! (whitespace, separators, controls). The sign encodes visibility so width
//! sums can skip trailing whitespace without a second lookup.

use crate::analysis::{BreakOpportunity, BreakVector};

#[inline]
fn is_whitespace(width: f32) -> bool {
    width.is_sign_negative()
}

/// Width of one line: the sum of advances up to and including the last
/// visible character. A line of only whitespace has width zero.
pub(crate) fn line_width(widths: &[f32]) -> f32 {
    let Some(last_visible) = widths.iter().rposition(|w| !is_whitespace(*w)) else {
        return 0.0;
    };
    widths[..=last_visible].iter().map(|w| w.abs()).sum()
}

/// The widest line of a text broken into lines of the given lengths.
pub(crate) fn max_line_width(widths: &[f32], line_lengths: &[usize]) -> f32 {
    let mut max_width = 0.0_f32;
    let mut start = 0;
    for &length in line_lengths {
        max_width = max_width.max(line_width(&widths[start..start + length]));
        start += length;
    }
    max_width
}

/// Whether every line fits the maximum width.
fn width_check(widths: &[f32], line_lengths: &[usize], maximum_line_width: f32) -> bool {
    let mut start = 0;
    for &length in line_lengths {
        if line_width(&widths[start..start + length]) > maximum_line_width {
            return false;
        }
        start += length;
    }
    true
}

/// Line lengths when breaking only at mandatory boundaries.
pub(crate) fn mandatory_lines(breaks: &BreakVector) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut length = 0;
    for boundary in 1..breaks.len() {
        length += 1;
        if breaks[boundary] == BreakOpportunity::Mandatory {
            lengths.push(length);
            length = 0;
        }
    }
    lengths
}

/// Line lengths when breaking at every boundary, mandatory or allowed.
pub(crate) fn optional_lines(breaks: &BreakVector) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut length = 0;
    for boundary in 1..breaks.len() {
        length += 1;
        if breaks[boundary] != BreakOpportunity::No {
            lengths.push(length);
            length = 0;
        }
    }
    lengths
}

/// Quickly finds a candidate line end by accumulating raw advances until the
/// line overflows, remembering the last allowed boundary.
///
/// Returns an exclusive end index; `start + 1` when no boundary fits, which
/// the finish pass recognizes as the overflow sentinel.
fn fast_fit_line(
    breaks: &BreakVector,
    widths: &[f32],
    start: usize,
    maximum_line_width: f32,
) -> usize {
    let mut width = 0.0;
    let mut end_of_line = start + 1;
    let mut i = start;
    loop {
        width += widths[i].abs();
        if width > maximum_line_width {
            return end_of_line;
        }
        match breaks[i + 1] {
            BreakOpportunity::Mandatory => return i + 1,
            BreakOpportunity::Allowed => end_of_line = i + 1,
            BreakOpportunity::No => {}
        }
        i += 1;
        debug_assert!(i < widths.len(), "the final boundary is mandatory");
    }
}

/// Refines a fast-fit candidate using exact, trailing-whitespace-trimmed
/// line widths, extending the line as far as the width allows.
fn slow_fit_line(
    breaks: &BreakVector,
    widths: &[f32],
    start: usize,
    mut end_of_line: usize,
    maximum_line_width: f32,
) -> usize {
    let mut end = end_of_line;
    while end <= widths.len() {
        if line_width(&widths[start..end]) > maximum_line_width {
            return end_of_line;
        }
        match breaks[end] {
            BreakOpportunity::Mandatory => return end,
            BreakOpportunity::Allowed => end_of_line = end,
            BreakOpportunity::No => {}
        }
        end += 1;
    }
    end_of_line
}

/// Handles the overflow sentinel: a line that fits no boundary is extended
/// to the first boundary after it, exceeding the maximum width rather than
/// splitting inside a run.
fn finish_fit_line(breaks: &BreakVector, start: usize, mut end_of_line: usize) -> usize {
    if end_of_line == start + 1 {
        while breaks[end_of_line] == BreakOpportunity::No {
            end_of_line += 1;
        }
    }
    end_of_line
}

/// First-fit fold of the whole text to a maximum line width.
fn fit_lines(breaks: &BreakVector, widths: &[f32], maximum_line_width: f32) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut start = 0;
    while start < widths.len() {
        let end = fast_fit_line(breaks, widths, start, maximum_line_width);
        let end = slow_fit_line(breaks, widths, start, end, maximum_line_width);
        let end = finish_fit_line(breaks, start, end);
        lengths.push(end - start);
        start = end;
    }
    lengths
}

/// Folds text into lines no wider than `maximum_line_width`.
///
/// Mandatory-only lines are tried first; when they all fit no optional
/// break is taken. A single run wider than the maximum overflows on its own
/// line. The sum of the returned lengths always equals the character count.
pub(crate) fn fold_lines(
    breaks: &BreakVector,
    widths: &[f32],
    maximum_line_width: f32,
) -> Vec<usize> {
    if widths.is_empty() {
        return Vec::new();
    }

    let lengths = mandatory_lines(breaks);
    if width_check(widths, &lengths, maximum_line_width) {
        return lengths;
    }
    fit_lines(breaks, widths, maximum_line_width)
}

/// Folds to a maximum width and reports the widest resulting line.
pub(crate) fn fold_lines_width(
    breaks: &BreakVector,
    widths: &[f32],
    maximum_line_width: f32,
) -> (f32, Vec<usize>) {
    let lengths = fit_lines(breaks, widths, maximum_line_width);
    let width = max_line_width(widths, &lengths);
    (width, lengths)
}
