// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-line record, vertical placement and horizontal glyph placement.
//!
//! The coordinate system has y pointing up: the first line's baseline sits
//! at y = 0 and subsequent baselines descend to negative y.

use core::ops::Range;

use icu_properties::props::GeneralCategory;
use peniko::kurbo::Rect;

use crate::font::{FontMetrics, FontProvider};
use crate::shaped_char::{is_separator, Direction, ShapedChar};

/// Horizontal alignment of lines within the layout rectangle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Alignment {
    /// Align to the natural side of each line's paragraph direction.
    #[default]
    Flush,
    /// Align to the left edge.
    Left,
    /// Center between the edges.
    Center,
    /// Align to the right edge.
    Right,
    /// Stretch internal whitespace to fill the width; falls back to flush
    /// alignment when the line cannot reasonably be justified.
    Justified,
}

/// Vertical alignment of the line block within the layout rectangle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum VerticalAlignment {
    /// The first baseline is placed at the requested baseline position.
    #[default]
    Top,
    /// The middle baseline is placed at the requested baseline position.
    Middle,
    /// The last baseline is placed at the requested baseline position.
    Bottom,
}

/// One output line of a layout.
///
/// Lines hold index ranges into the shaper's character vector and are
/// rebuilt from scratch on every layout; the characters are reused.
#[derive(Clone, Debug)]
pub struct ShapedLine {
    /// Logical-order character range of the line.
    pub range: Range<usize>,
    /// Character indices in visual (display) order, filled by the bidi
    /// pass. Characters deleted by bidi do not appear.
    pub columns: Vec<usize>,
    /// Maximum font metrics over the line's visible characters, in pixels.
    pub metrics: FontMetrics,
    /// Index of this line, top to bottom.
    pub line_nr: usize,
    /// Baseline position.
    pub y: f32,
    /// Bounding rectangle of the visible part of the line, valid after
    /// layout.
    pub rect: Rect,
    /// Width of the line excluding trailing whitespace, taken from the fold
    /// widths rather than recomputed from glyph geometry.
    pub width: f32,
    /// General category of the line's last character.
    pub last_category: GeneralCategory,
    /// Resolved direction of the paragraph this line belongs to.
    pub paragraph_direction: Direction,
    /// Line-spacing multiplier, max over the visible characters' styles.
    pub(crate) spacing_line: f32,
    /// Paragraph-spacing multiplier, max over the visible characters'
    /// styles.
    pub(crate) spacing_paragraph: f32,
}

impl ShapedLine {
    /// Builds a line over `range`, marking trailing whitespace and
    /// aggregating metrics over the visible characters.
    pub(crate) fn new(
        line_nr: usize,
        range: Range<usize>,
        chars: &mut [ShapedChar],
        width: f32,
        initial_metrics: FontMetrics,
    ) -> Self {
        let mut metrics = initial_metrics;
        let mut spacing_line = 0.0_f32;
        let mut spacing_paragraph = 0.0_f32;
        let mut last_visible = None;
        for i in range.clone() {
            chars[i].is_trailing_whitespace = false;
            // Only visible characters contribute to the line metrics; a
            // paragraph separator is seldom present in a font.
            if chars[i].is_visible() {
                metrics = metrics.max(&chars[i].metrics);
                spacing_line = spacing_line.max(chars[i].line_spacing);
                spacing_paragraph = spacing_paragraph.max(chars[i].paragraph_spacing);
                last_visible = Some(i);
            }
        }
        if last_visible.is_none() {
            spacing_line = 1.0;
            spacing_paragraph = 1.5;
        }

        let last_category = if range.is_empty() {
            GeneralCategory::Unassigned
        } else {
            let first_trailing = last_visible.map_or(range.start, |i| i + 1);
            for i in first_trailing..range.end {
                chars[i].is_trailing_whitespace = true;
            }
            chars[range.end - 1].general_category
        };

        Self {
            range,
            columns: Vec::new(),
            metrics,
            line_nr,
            y: 0.0,
            rect: Rect::ZERO,
            width,
            last_category,
            paragraph_direction: Direction::Ltr,
            spacing_line,
            spacing_paragraph,
        }
    }

    /// Number of visual columns on the line.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Character index at a visual column.
    pub fn column(&self, column_nr: usize) -> Option<usize> {
        self.columns.get(column_nr).copied()
    }

    /// Positions the line's glyphs: advance pass with the font provider's
    /// kerning hook, alignment, sub-pixel rounding and bounding rectangles.
    pub(crate) fn layout(
        &mut self,
        chars: &mut [ShapedChar],
        text: &str,
        provider: &dyn FontProvider,
        style_sizes: &[f32],
        alignment: Alignment,
        min_x: f32,
        max_x: f32,
        sub_pixel_width: f32,
    ) {
        self.advance_glyphs(chars, text, provider, style_sizes);
        let (visible_width, num_whitespace) = self.measure_precise(chars);
        self.align_glyphs(chars, alignment, max_x - min_x, visible_width, num_whitespace);
        self.move_glyphs(chars, min_x);
        self.round_positions(chars, sub_pixel_width);
        self.make_rectangles(chars);
    }

    /// Assigns x positions in display order, calling the provider's
    /// `shape_run` hook once per maximal same-font, same-style, same-script
    /// group of columns.
    fn advance_glyphs(
        &self,
        chars: &mut [ShapedChar],
        text: &str,
        provider: &dyn FontProvider,
        style_sizes: &[f32],
    ) {
        let mut x = 0.0_f32;
        let mut group = 0;
        while group < self.columns.len() {
            let first = &chars[self.columns[group]];
            let (font, style_index, script) = (first.font, first.style_index, first.script);
            let mut end = group + 1;
            while end < self.columns.len() {
                let c = &chars[self.columns[end]];
                if c.font != font || c.style_index != style_index || c.script != script {
                    break;
                }
                end += 1;
            }

            let graphemes: Vec<_> = self.columns[group..end]
                .iter()
                .map(|&i| chars[i].display_text(text))
                .collect();
            let grapheme_refs: Vec<&str> = graphemes.iter().map(|g| g.as_ref()).collect();
            let size = style_sizes.get(style_index).copied().unwrap_or(0.0);
            let advances = provider.shape_run(font, size, &grapheme_refs);

            for (k, &i) in self.columns[group..end].iter().enumerate() {
                if let Some(advances) = &advances {
                    if let Some(&advance) = advances.get(k) {
                        chars[i].advance = advance;
                    }
                }
                chars[i].x = x;
                x += chars[i].advance;
            }
            group = end;
        }
    }

    /// Precise width of the visible part of the line and the number of
    /// internal whitespace characters, shifting the first visible character
    /// to x = 0.
    fn measure_precise(&self, chars: &mut [ShapedChar]) -> (f32, usize) {
        let mut columns = self.columns.iter().copied();
        let Some(first) = columns.by_ref().find(|&i| !chars[i].is_trailing_whitespace) else {
            return (0.0, 0);
        };

        let left_x = chars[first].x;
        let mut right_x = left_x;
        let mut num_whitespace = 0;
        for i in core::iter::once(first).chain(columns) {
            if chars[i].is_trailing_whitespace {
                break;
            }
            right_x = chars[i].x + chars[i].advance;
            if !chars[i].is_visible() {
                num_whitespace += 1;
            }
        }

        for &i in &self.columns {
            chars[i].x -= left_x;
        }
        (right_x - left_x, num_whitespace)
    }

    /// Distributes free space over internal whitespace. Lines whose free
    /// space exceeds a quarter of the maximum width, or that have no
    /// internal whitespace, are not justified.
    fn justify_glyphs(
        &self,
        chars: &mut [ShapedChar],
        max_line_width: f32,
        visible_width: f32,
        num_whitespace: usize,
    ) -> bool {
        if num_whitespace == 0 {
            return false;
        }
        let extra_space = max_line_width - visible_width;
        if extra_space > max_line_width * 0.25 {
            return false;
        }

        let extra_per_whitespace = extra_space / num_whitespace as f32;
        let mut offset = 0.0;
        for &i in &self.columns {
            chars[i].x += offset;
            if !chars[i].is_trailing_whitespace && !chars[i].is_visible() {
                offset += extra_per_whitespace;
            }
        }
        true
    }

    fn align_glyphs(
        &self,
        chars: &mut [ShapedChar],
        alignment: Alignment,
        max_line_width: f32,
        visible_width: f32,
        num_whitespace: usize,
    ) {
        if alignment == Alignment::Justified
            && self.justify_glyphs(chars, max_line_width, visible_width, num_whitespace)
        {
            return;
        }

        let alignment = match alignment {
            Alignment::Flush | Alignment::Justified => match self.paragraph_direction {
                Direction::Ltr => Alignment::Left,
                Direction::Rtl => Alignment::Right,
            },
            other => other,
        };

        let offset = match alignment {
            Alignment::Right => max_line_width - visible_width,
            Alignment::Center => (max_line_width - visible_width) * 0.5,
            _ => 0.0,
        };
        self.move_glyphs(chars, offset);
    }

    fn move_glyphs(&self, chars: &mut [ShapedChar], offset: f32) {
        for &i in &self.columns {
            chars[i].x += offset;
        }
    }

    /// Rounds x positions to the sub-pixel grid to keep rendered glyphs
    /// sharp and stable across relayouts.
    fn round_positions(&self, chars: &mut [ShapedChar], sub_pixel_width: f32) {
        let rcp = 1.0 / sub_pixel_width;
        for &i in &self.columns {
            chars[i].x = (chars[i].x * rcp).round() * sub_pixel_width;
        }
    }

    /// Bounding rectangles: each character extends to the next character's
    /// x position; the last extends by its own advance. Used for selection
    /// boxes, cursors and mouse handling.
    fn make_rectangles(&mut self, chars: &mut [ShapedChar]) {
        let bottom = f64::from(self.y - self.metrics.descender);
        let top = f64::from(self.y + self.metrics.ascender);

        for (k, &i) in self.columns.iter().enumerate() {
            let left = f64::from(chars[i].x);
            let right = match self.columns.get(k + 1) {
                Some(&next) => f64::from(chars[next].x),
                None => f64::from(chars[i].x + chars[i].advance),
            };
            chars[i].rect = Rect::new(left, bottom, right, top);
        }

        self.rect = match (self.columns.first(), self.columns.last()) {
            (Some(&first), Some(&last)) => chars[first].rect.union(chars[last].rect),
            _ => Rect::new(0.0, bottom, 1.0, top),
        };
    }

    /// The character nearest to a horizontal position, and whether the
    /// position falls in its trailing half.
    ///
    /// An empty (virtual) line reports its end index so the caller maps it
    /// to the end-of-text cursor.
    pub(crate) fn nearest(&self, chars: &[ShapedChar], x: f32) -> (usize, bool) {
        if self.columns.is_empty() {
            return (self.range.end, false);
        }

        let x = f64::from(x);
        let mut column_nr = self
            .columns
            .partition_point(|&i| chars[i].rect.x1 < x)
            .min(self.columns.len() - 1);

        let mut index = self.columns[column_nr];
        if is_separator(chars[index].general_category) {
            // Do not put the cursor on a line or paragraph separator.
            match self.paragraph_direction {
                Direction::Ltr if column_nr > 0 => {
                    column_nr -= 1;
                    index = self.columns[column_nr];
                }
                Direction::Rtl if column_nr + 1 < self.columns.len() => {
                    column_nr += 1;
                    index = self.columns[column_nr];
                }
                // A separator-only line; place the cursor before it.
                _ => return (index, false),
            }
        }

        let center = (chars[index].rect.x0 + chars[index].rect.x1) * 0.5;
        let after = (chars[index].direction == Direction::Ltr) == (x > center);
        (index, after)
    }

    /// First character in display order.
    pub(crate) fn front(&self) -> Option<usize> {
        self.columns.first().copied()
    }

    /// Last character in display order.
    pub(crate) fn back(&self) -> Option<usize> {
        self.columns.last().copied()
    }
}

/// Assigns every baseline top to bottom. Each line descends from the
/// previous by the previous descender, the larger of the two line gaps and
/// the current ascender, times the spacing multiplier of the gap. The
/// multiplier is the paragraph spacing when the previous line ended on a
/// paragraph separator.
pub(crate) fn layout_vertical_spacing(
    lines: &mut [ShapedLine],
    line_spacing: Option<f32>,
    paragraph_spacing: Option<f32>,
) {
    for i in 1..lines.len() {
        let previous = &lines[i - 1];
        let multiplier = if previous.last_category == GeneralCategory::ParagraphSeparator {
            paragraph_spacing.unwrap_or(previous.spacing_paragraph)
        } else {
            line_spacing.unwrap_or(previous.spacing_line)
        };
        let descent = previous.metrics.descender
            + previous.metrics.line_gap.max(lines[i].metrics.line_gap)
            + lines[i].metrics.ascender;
        lines[i].y = lines[i - 1].y - descent * multiplier;
    }
}

/// Shifts the line block so the requested vertical alignment holds, clamps
/// it into the rectangle and rounds every baseline to the sub-pixel grid.
pub(crate) fn layout_vertical_alignment(
    lines: &mut [ShapedLine],
    alignment: VerticalAlignment,
    baseline: f32,
    min_y: f32,
    max_y: f32,
    sub_pixel_height: f32,
) {
    debug_assert!(!lines.is_empty(), "there is always at least a virtual line");

    let mut adjustment = match alignment {
        VerticalAlignment::Top => -lines[0].y,
        VerticalAlignment::Bottom => -lines[lines.len() - 1].y,
        VerticalAlignment::Middle => {
            let mid = lines.len() / 2;
            if lines.len() % 2 == 1 {
                -lines[mid].y
            } else {
                -(lines[mid - 1].y + lines[mid].y) * 0.5
            }
        }
    };
    adjustment += baseline;

    // The text may not fit; prioritize showing the top lines.
    if lines[lines.len() - 1].y + adjustment < min_y {
        adjustment = min_y - lines[lines.len() - 1].y;
    }
    if lines[0].y + adjustment > max_y {
        adjustment = max_y - lines[0].y;
    }

    let rcp = 1.0 / sub_pixel_height;
    for line in lines {
        line.y = ((line.y + adjustment) * rcp).round() * sub_pixel_height;
    }
}
