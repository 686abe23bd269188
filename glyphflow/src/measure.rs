// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Search over candidate line widths, used to auto-size text containers.

use crate::analysis::BreakVector;
use crate::fold;

/// Points per millimeter.
const PT_PER_MM: f32 = 2.83465;
/// Print width of a single column of text on A4 paper, in millimeters.
const ONE_COLUMN_MM: f32 = 172.0;
/// Print width of one of two columns of text on A4 paper, in millimeters.
const TWO_COLUMN_MM: f32 = 88.0;

/// One candidate produced by [`WidthSearch`].
#[derive(Clone, PartialEq, Debug)]
pub struct WidthCandidate {
    /// Character count of each folded line.
    pub line_lengths: Vec<usize>,
    /// The widest line at this fold.
    pub width: f32,
}

impl WidthCandidate {
    /// Number of lines of this candidate.
    pub fn num_lines(&self) -> usize {
        self.line_lengths.len()
    }
}

/// An interval of widths whose endpoints produce known line counts.
/// `min_width` produces `min_lines` (more lines), `max_width` produces
/// `max_lines` (fewer lines).
#[derive(Copy, Clone, Debug)]
struct Interval {
    min_lines: usize,
    max_lines: usize,
    min_width: f32,
    max_width: f32,
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum SearchState {
    Start,
    WideOneColumn,
    WideTwoColumn,
    Narrow,
    Splitting,
    Done,
}

/// Lazy search over line widths that change the number of folded lines.
///
/// The first candidate is the text folded at mandatory breaks only (the
/// widest, fewest-line layout). Text wider than a two-column print width is
/// only refolded at the two standard column widths; narrower text is
/// searched by splitting width intervals in half, yielding a candidate
/// whenever the line count strictly drops. A consumer that has enough
/// samples simply stops iterating.
///
/// Widths are compared exactly; only interval merging uses the epsilon, so
/// two candidates closer than it are considered duplicates and skipped.
#[derive(Debug)]
pub struct WidthSearch<'a> {
    breaks: &'a BreakVector,
    widths: &'a [f32],
    dpi_scale: f32,
    merge_epsilon: f32,
    state: SearchState,
    stack: Vec<Interval>,
    /// Line count of the last yielded candidate.
    num_lines: usize,
    max_width: f32,
    /// Defensive bound on stack iterations.
    steps: usize,
}

impl<'a> WidthSearch<'a> {
    pub(crate) fn new(breaks: &'a BreakVector, widths: &'a [f32], dpi_scale: f32) -> Self {
        Self {
            breaks,
            widths,
            dpi_scale,
            merge_epsilon: 2.0,
            state: SearchState::Start,
            stack: Vec::new(),
            num_lines: 0,
            max_width: 0.0,
            steps: 0,
        }
    }

    /// Sets the width below which two candidates are merged. Defaults to
    /// 2.0 pixels.
    #[must_use]
    pub fn with_merge_epsilon(mut self, epsilon: f32) -> Self {
        self.merge_epsilon = epsilon;
        self
    }

    fn fold_at(&self, maximum_line_width: f32) -> (f32, Vec<usize>) {
        fold::fold_lines_width(self.breaks, self.widths, maximum_line_width)
    }

    fn split_step(&mut self) -> Option<WidthCandidate> {
        while let Some(entry) = self.stack.pop() {
            self.steps += 1;
            if self.steps > 2 * self.widths.len() + 8 {
                // No distinct line counts remain within reach.
                self.stack.clear();
                return None;
            }

            let has_gap = entry.min_lines > entry.max_lines + 1;
            if !has_gap || entry.max_width < entry.min_width + self.merge_epsilon {
                continue;
            }

            let half_width = (entry.min_width + entry.max_width) * 0.5;
            let (split_width, split_lengths) = self.fold_at(half_width);
            let split_lines = split_lengths.len();

            if split_lines == entry.max_lines {
                // The lower half may still hold an interesting width.
                self.stack.push(Interval {
                    min_lines: entry.min_lines,
                    max_lines: split_lines,
                    min_width: entry.min_width,
                    max_width: half_width,
                });
            } else if split_lines == entry.min_lines {
                // The upper half may still hold an interesting width.
                self.stack.push(Interval {
                    min_lines: split_lines,
                    max_lines: entry.max_lines,
                    min_width: half_width,
                    max_width: entry.max_width,
                });
            } else {
                // A new line count; yield it and search both halves. The
                // folded width gives a tighter boundary than the midpoint.
                self.stack.push(Interval {
                    min_lines: entry.min_lines,
                    max_lines: split_lines,
                    min_width: entry.min_width,
                    max_width: split_width,
                });
                self.stack.push(Interval {
                    min_lines: split_lines,
                    max_lines: entry.max_lines,
                    min_width: split_width,
                    max_width: entry.max_width,
                });
                return Some(WidthCandidate {
                    line_lengths: split_lengths,
                    width: split_width,
                });
            }
        }
        None
    }
}

impl Iterator for WidthSearch<'_> {
    type Item = WidthCandidate;

    fn next(&mut self) -> Option<WidthCandidate> {
        let one_column = ONE_COLUMN_MM * PT_PER_MM * self.dpi_scale;
        let two_column = TWO_COLUMN_MM * PT_PER_MM * self.dpi_scale;

        loop {
            match self.state {
                SearchState::Start => {
                    if self.widths.is_empty() {
                        self.state = SearchState::Done;
                        return None;
                    }
                    let line_lengths = fold::mandatory_lines(self.breaks);
                    let width = fold::max_line_width(self.widths, &line_lengths);
                    self.num_lines = line_lengths.len();
                    self.max_width = width;
                    self.state = if width >= two_column {
                        if width > one_column {
                            SearchState::WideOneColumn
                        } else {
                            SearchState::WideTwoColumn
                        }
                    } else {
                        SearchState::Narrow
                    };
                    return Some(WidthCandidate { line_lengths, width });
                }
                SearchState::WideOneColumn => {
                    let (width, line_lengths) = self.fold_at(one_column);
                    self.state = SearchState::WideTwoColumn;
                    let previous = core::mem::replace(&mut self.num_lines, line_lengths.len());
                    if previous > line_lengths.len() {
                        return Some(WidthCandidate { line_lengths, width });
                    }
                }
                SearchState::WideTwoColumn => {
                    let (width, line_lengths) = self.fold_at(two_column);
                    self.state = SearchState::Done;
                    let previous = core::mem::replace(&mut self.num_lines, line_lengths.len());
                    if previous > line_lengths.len() {
                        return Some(WidthCandidate { line_lengths, width });
                    }
                }
                SearchState::Narrow => {
                    let line_lengths = fold::optional_lines(self.breaks);
                    let width = fold::max_line_width(self.widths, &line_lengths);
                    if line_lengths.len() <= self.num_lines {
                        // Every fold produces the same line count.
                        self.state = SearchState::Done;
                        return None;
                    }
                    self.stack.push(Interval {
                        min_lines: line_lengths.len(),
                        max_lines: self.num_lines,
                        min_width: width,
                        max_width: self.max_width,
                    });
                    self.state = SearchState::Splitting;
                    return Some(WidthCandidate { line_lengths, width });
                }
                SearchState::Splitting => {
                    let candidate = self.split_step();
                    if candidate.is_none() {
                        self.state = SearchState::Done;
                    }
                    return candidate;
                }
                SearchState::Done => return None,
            }
        }
    }
}
