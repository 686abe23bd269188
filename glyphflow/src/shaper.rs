// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text shaper: analysis, layout and the query/navigation API.

use icu_properties::props::{GeneralCategory, Script};
use peniko::kurbo::{Point, Rect};

use crate::analysis::{self, BreakOpportunity, BreakVector, Properties};
use crate::bidi::{self, BaseDirection};
use crate::cursor::TextCursor;
use crate::fold;
use crate::font::{FontMetrics, FontProvider};
use crate::line::{
    layout_vertical_alignment, layout_vertical_spacing, Alignment, ShapedLine, VerticalAlignment,
};
use crate::measure::WidthSearch;
use crate::shape;
use crate::shaped_char::{Direction, ShapedChar};
use crate::style::{Brush, ResolvedStyle, StyleAttributes, StyleResolver, TextSpan};

/// Options controlling a layout pass.
#[derive(Clone, PartialEq, Debug)]
pub struct LayoutOptions {
    /// Horizontal alignment of the lines.
    pub alignment: Alignment,
    /// Vertical alignment of the line block.
    pub vertical_alignment: VerticalAlignment,
    /// Where the aligned reference baseline is placed on the y axis.
    pub baseline: f32,
    /// Sub-pixel grid for glyph positions, typically 1/3 or 1/5 pixel for
    /// subpixel-antialiased rendering.
    pub sub_pixel_size: (f32, f32),
    /// Overrides the styles' line-spacing multipliers when set.
    pub line_spacing: Option<f32>,
    /// Overrides the styles' paragraph-spacing multipliers when set.
    pub paragraph_spacing: Option<f32>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            alignment: Alignment::Flush,
            vertical_alignment: VerticalAlignment::Top,
            baseline: 0.0,
            sub_pixel_size: (1.0, 1.0),
            line_spacing: None,
            paragraph_spacing: None,
        }
    }
}

/// A shaped text: the character vector, the folded lines and everything
/// needed to navigate them.
///
/// The shaper owns its characters and lines exclusively. Lines are rebuilt
/// on every [`layout`](Self::layout); characters are created once at
/// construction and mutated in place by the passes. Layout is idempotent:
/// the same rectangle and options produce bit-identical results.
pub struct TextShaper<'a, B: Brush> {
    provider: &'a dyn FontProvider,
    properties: Properties,
    /// Normalized source text; newlines are paragraph separators here.
    text: String,
    chars: Vec<ShapedChar>,
    styles: Vec<ResolvedStyle<B>>,
    /// Effective pixel size per interned style.
    style_sizes: Vec<f32>,
    lines: Vec<ShapedLine>,
    rect: Rect,
    dpi_scale: f32,
    base_direction: BaseDirection,
    /// First-strong direction of the whole text.
    text_direction: Direction,
    line_break_opportunities: BreakVector,
    word_break_opportunities: BreakVector,
    sentence_break_opportunities: BreakVector,
    /// Per-character advances, negated for invisible characters.
    fold_widths: Vec<f32>,
    /// Metrics of the first style's primary font; the floor for every
    /// line's metrics so empty lines have a sensible height.
    initial_metrics: FontMetrics,
}

impl<B: Brush> core::fmt::Debug for TextShaper<'_, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextShaper")
            .field("text", &self.text)
            .field("chars", &self.chars.len())
            .field("lines", &self.lines.len())
            .field("rect", &self.rect)
            .field("text_direction", &self.text_direction)
            .finish_non_exhaustive()
    }
}

impl<'a, B: Brush> TextShaper<'a, B> {
    /// Shapes styled spans of text: normalization, segmentation, glyph and
    /// metrics resolution, break analysis and script resolution. Call
    /// [`layout`](Self::layout) afterwards to produce lines.
    pub fn new(
        provider: &'a dyn FontProvider,
        resolver: &dyn StyleResolver<B>,
        spans: &[TextSpan<'_>],
        dpi_scale: f32,
        base_direction: BaseDirection,
    ) -> Self {
        let properties = Properties::new();

        // Normalize the spans into one text, remembering which attribute
        // set covers which byte range. Equal attribute sets are merged.
        let mut text = String::new();
        let mut attributes: Vec<StyleAttributes> = Vec::new();
        let mut span_ranges: Vec<(usize, usize)> = Vec::new();
        for span in spans {
            let start = text.len();
            analysis::normalize_into(span.text, &mut text);
            let attribute_index = attributes
                .iter()
                .position(|a| *a == span.attributes)
                .unwrap_or_else(|| {
                    attributes.push(span.attributes.clone());
                    attributes.len() - 1
                });
            span_ranges.push((start, attribute_index));
        }

        let mut chars = analysis::segment_characters(&text, &properties);
        let attribute_of: Vec<usize> = chars
            .iter()
            .map(|c| {
                let span = span_ranges.partition_point(|&(start, _)| start <= c.range.start);
                span_ranges[span.saturating_sub(1)].1
            })
            .collect();

        let word_break_opportunities = analysis::word_breaks(&text, &chars);
        let sentence_break_opportunities = analysis::sentence_breaks(&text, &chars);
        let line_break_opportunities = analysis::line_breaks(&text, &chars);

        let runs = analysis::run_ranges(&word_break_opportunities, &attribute_of);
        let styles = shape::resolve_glyphs(
            &mut chars,
            &text,
            &runs,
            &attribute_of,
            &attributes,
            resolver,
            provider,
            dpi_scale,
        );
        let style_sizes: Vec<f32> = styles.iter().map(|s| s.size * dpi_scale).collect();

        analysis::resolve_scripts(&mut chars, &word_break_opportunities, Script::Common);

        let fold_widths: Vec<f32> = chars.iter().map(ShapedChar::fold_width).collect();
        let text_direction = bidi::detect_direction(&chars, base_direction);

        let initial_metrics = match styles.first() {
            Some(style) => provider
                .metrics(style.font_chain.primary())
                .scale(style.size * dpi_scale),
            None => {
                // Empty text still needs line metrics for the virtual line.
                let style = resolver.resolve(
                    &spans.first().map(|s| s.attributes.clone()).unwrap_or_default(),
                );
                provider
                    .metrics(style.font_chain.primary())
                    .scale(style.size * dpi_scale)
            }
        };

        Self {
            provider,
            properties,
            text,
            chars,
            styles,
            style_sizes,
            lines: Vec::new(),
            rect: Rect::ZERO,
            dpi_scale,
            base_direction,
            text_direction,
            line_break_opportunities,
            word_break_opportunities,
            sentence_break_opportunities,
            fold_widths,
            initial_metrics,
        }
    }

    /// Shapes a single unstyled text.
    pub fn with_text(
        provider: &'a dyn FontProvider,
        resolver: &dyn StyleResolver<B>,
        text: &str,
        dpi_scale: f32,
        base_direction: BaseDirection,
    ) -> Self {
        Self::new(provider, resolver, &[TextSpan::plain(text)], dpi_scale, base_direction)
    }

    /// Number of grapheme clusters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The normalized source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The characters in logical order.
    pub fn chars(&self) -> &[ShapedChar] {
        &self.chars
    }

    /// The lines of the last layout, top to bottom.
    pub fn lines(&self) -> &[ShapedLine] {
        &self.lines
    }

    /// The interned resolved styles; characters refer to these by index.
    pub fn styles(&self) -> &[ResolvedStyle<B>] {
        &self.styles
    }

    /// The rectangle of the last layout.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// First-strong direction of the text.
    pub fn text_direction(&self) -> Direction {
        self.text_direction
    }

    /// Folds, reorders and positions the text inside `rect`.
    pub fn layout(&mut self, rect: Rect, options: &LayoutOptions) {
        self.rect = rect;
        self.lines = self.make_lines(rect, options);
        bidi::reorder_lines(
            &self.properties,
            &self.text,
            &mut self.chars,
            &mut self.lines,
            self.base_direction,
        );
        shape::resolve_mirrored_glyphs(&mut self.chars, &self.styles, self.provider);
        for line in &mut self.lines {
            line.layout(
                &mut self.chars,
                &self.text,
                self.provider,
                &self.style_sizes,
                options.alignment,
                rect.x0 as f32,
                rect.x1 as f32,
                options.sub_pixel_size.0,
            );
        }
    }

    /// Folds lines and assigns vertical positions, without running the bidi
    /// or horizontal placement passes.
    fn make_lines(&mut self, rect: Rect, options: &LayoutOptions) -> Vec<ShapedLine> {
        let line_lengths = fold::fold_lines(
            &self.line_break_opportunities,
            &self.fold_widths,
            rect.width() as f32,
        );

        let mut lines = Vec::with_capacity(line_lengths.len() + 1);
        let mut start = 0;
        for length in line_lengths {
            let range = start..start + length;
            let width = fold::line_width(&self.fold_widths[range.clone()]);
            lines.push(ShapedLine::new(
                lines.len(),
                range,
                &mut self.chars,
                width,
                self.initial_metrics,
            ));
            start += length;
        }

        // A virtual empty line represents the cursor position after a
        // trailing paragraph separator, and the only line of empty text.
        let needs_virtual_line = lines
            .last()
            .map_or(true, |line| crate::shaped_char::is_separator(line.last_category));
        if needs_virtual_line {
            let len = self.chars.len();
            let mut line = ShapedLine::new(
                lines.len(),
                len..len,
                &mut self.chars,
                0.0,
                self.initial_metrics,
            );
            line.paragraph_direction = self.text_direction;
            lines.push(line);
        }

        layout_vertical_spacing(&mut lines, options.line_spacing, options.paragraph_spacing);
        layout_vertical_alignment(
            &mut lines,
            options.vertical_alignment,
            options.baseline,
            rect.y0 as f32,
            rect.y1 as f32,
            options.sub_pixel_size.1,
        );
        lines
    }

    /// The rectangle the text would occupy when folded to a maximum line
    /// width, without committing a layout.
    pub fn bounding_rectangle(&mut self, maximum_line_width: f32, options: &LayoutOptions) -> Rect {
        let rect = Rect::new(
            0.0,
            f64::from(f32::MIN),
            f64::from(maximum_line_width),
            f64::from(f32::MAX),
        );
        let options = LayoutOptions {
            baseline: 0.0,
            sub_pixel_size: (1.0, 1.0),
            ..options.clone()
        };
        let lines = self.make_lines(rect, &options);
        debug_assert!(!lines.is_empty(), "there is always at least a virtual line");

        let mut max_width = 0.0_f32;
        for line in &lines {
            max_width = max_width.max(line.width);
        }

        let first = &lines[0];
        let last = &lines[lines.len() - 1];
        let max_y = first.y + first.metrics.ascender.ceil();
        let min_y = last.y - last.metrics.descender.ceil();
        Rect::new(
            0.0,
            f64::from(min_y),
            f64::from(max_width.ceil()),
            f64::from(max_y),
        )
    }

    /// Lazily searches widths that reduce the number of folded lines, used
    /// to auto-size text containers. Candidates arrive widest first.
    pub fn candidate_widths(&self) -> WidthSearch<'_> {
        WidthSearch::new(
            &self.line_break_opportunities,
            &self.fold_widths,
            self.dpi_scale,
        )
    }

    /// Height from the first line's x-height to the last baseline when the
    /// text is broken into lines of the given lengths.
    pub fn text_height(&self, line_lengths: &[usize]) -> f32 {
        if line_lengths.is_empty() {
            return 0.0;
        }

        let mut start = 0;
        let mut previous = self.measure_line(start..start + line_lengths[0]);
        start += line_lengths[0];
        let mut total_height = previous.metrics.x_height;

        for &length in &line_lengths[1..] {
            let current = self.measure_line(start..start + length);
            start += length;

            let line_height = previous.metrics.descender
                + previous.metrics.line_gap.max(current.metrics.line_gap)
                + current.metrics.ascender;
            let spacing = if previous.last_category == GeneralCategory::ParagraphSeparator {
                previous.spacing_paragraph
            } else {
                previous.spacing_line
            };
            total_height += spacing * line_height;
            previous = current;
        }
        total_height
    }

    fn measure_line(&self, range: core::ops::Range<usize>) -> LineMeasure {
        let mut measure = LineMeasure {
            metrics: self.initial_metrics,
            last_category: GeneralCategory::Unassigned,
            spacing_line: 1.0,
            spacing_paragraph: 1.5,
        };
        let mut any_visible = false;
        for c in &self.chars[range.clone()] {
            if c.is_visible() {
                measure.metrics = measure.metrics.max(&c.metrics);
                if any_visible {
                    measure.spacing_line = measure.spacing_line.max(c.line_spacing);
                    measure.spacing_paragraph = measure.spacing_paragraph.max(c.paragraph_spacing);
                } else {
                    measure.spacing_line = c.line_spacing;
                    measure.spacing_paragraph = c.paragraph_spacing;
                    any_visible = true;
                }
            }
        }
        if !range.is_empty() {
            measure.last_category = self.chars[range.end - 1].general_category;
        }
        measure
    }

    // --- Cursor primitives -------------------------------------------------

    /// The cursor at the start of the text.
    pub fn begin_cursor(&self) -> TextCursor {
        TextCursor::default()
    }

    /// The cursor at the end of the text; the start sentinel for empty
    /// text.
    pub fn end_cursor(&self) -> TextCursor {
        if self.chars.is_empty() {
            TextCursor::default()
        } else {
            TextCursor::after(self.chars.len() - 1)
        }
    }

    /// A clamped cursor before the character at `index`.
    pub fn before_cursor(&self, index: usize) -> TextCursor {
        TextCursor::before(index).resize(self.chars.len())
    }

    /// A clamped cursor after the character at `index`.
    pub fn after_cursor(&self, index: usize) -> TextCursor {
        TextCursor::after(index).resize(self.chars.len())
    }

    /// The cursor on the display-left side of the character at `index`.
    pub fn left_cursor(&self, index: usize) -> TextCursor {
        match self.chars.get(index) {
            Some(c) if c.direction == Direction::Ltr => self.before_cursor(index),
            Some(_) => self.after_cursor(index),
            None => self.end_cursor(),
        }
    }

    /// The cursor on the display-right side of the character at `index`.
    pub fn right_cursor(&self, index: usize) -> TextCursor {
        match self.chars.get(index) {
            Some(c) if c.direction == Direction::Ltr => self.after_cursor(index),
            Some(_) => self.before_cursor(index),
            None => self.end_cursor(),
        }
    }

    /// Whether the cursor sits on the display-left side of its character.
    pub fn is_on_left(&self, cursor: TextCursor) -> bool {
        match self.chars.get(cursor.index()) {
            Some(c) => (c.direction == Direction::Ltr) == cursor.is_before(),
            None => true,
        }
    }

    /// Whether the cursor sits on the display-right side of its character.
    pub fn is_on_right(&self, cursor: TextCursor) -> bool {
        match self.chars.get(cursor.index()) {
            Some(c) => (c.direction == Direction::Ltr) == cursor.is_after(),
            None => true,
        }
    }

    /// The character index a cursor is attached to; `len` for cursors past
    /// the end of text.
    fn char_of_cursor(&self, cursor: TextCursor) -> usize {
        cursor.index().min(self.chars.len())
    }

    /// Display position of a character index; the end index reports one
    /// past the last column of the last line.
    pub fn column_line_of(&self, index: usize) -> (usize, usize) {
        if let Some(c) = self.chars.get(index) {
            if c.line_nr != crate::shaped_char::UNASSIGNED {
                return (c.column_nr, c.line_nr);
            }
        }
        match self.lines.last() {
            Some(line) => (line.num_columns(), self.lines.len() - 1),
            None => (0, 0),
        }
    }

    /// Character index at a display position; columns outside a line walk
    /// to the neighboring line honoring that line's paragraph direction.
    fn char_at_column(&self, column_nr: isize, line_nr: isize) -> usize {
        if line_nr < 0 {
            return 0;
        }
        let Some(line) = self.lines.get(line_nr as usize) else {
            return self.chars.len();
        };

        let left_of_line = column_nr < 0;
        let right_of_line = column_nr >= line.num_columns() as isize;
        if left_of_line || right_of_line {
            let ltr = line.paragraph_direction == Direction::Ltr;
            let go_up = left_of_line == ltr;
            if go_up {
                if line_nr == 0 {
                    return 0;
                }
                let above = &self.lines[line_nr as usize - 1];
                let end_of_above = match above.paragraph_direction {
                    Direction::Ltr => above.back(),
                    Direction::Rtl => above.front(),
                };
                return end_of_above.unwrap_or(self.chars.len());
            }
            let Some(below) = self.lines.get(line_nr as usize + 1) else {
                return self.chars.len();
            };
            let begin_of_below = match below.paragraph_direction {
                Direction::Ltr => below.front(),
                Direction::Rtl => below.back(),
            };
            return begin_of_below.unwrap_or(self.chars.len());
        }

        line.column(column_nr as usize).unwrap_or(self.chars.len())
    }

    fn left_char_of(&self, index: usize) -> usize {
        let (column_nr, line_nr) = self.column_line_of(index);
        self.char_at_column(column_nr as isize - 1, line_nr as isize)
    }

    fn right_char_of(&self, index: usize) -> usize {
        let (column_nr, line_nr) = self.column_line_of(index);
        self.char_at_column(column_nr as isize + 1, line_nr as isize)
    }

    // --- Navigation --------------------------------------------------------

    /// Moves one character to the display left. In overwrite mode the
    /// cursor lands before the target character.
    pub fn move_left_char(&self, cursor: TextCursor, overwrite_mode: bool) -> TextCursor {
        let mut index = self.char_of_cursor(cursor);
        if overwrite_mode {
            index = self.left_char_of(index);
            self.before_cursor(index)
        } else {
            if self.is_on_left(cursor) {
                index = self.left_char_of(index);
            }
            self.left_cursor(index)
        }
    }

    /// Moves one character to the display right. In overwrite mode the
    /// cursor lands before the target character.
    pub fn move_right_char(&self, cursor: TextCursor, overwrite_mode: bool) -> TextCursor {
        let mut index = self.char_of_cursor(cursor);
        if overwrite_mode {
            index = self.right_char_of(index);
            self.before_cursor(index)
        } else {
            if self.is_on_right(cursor) {
                index = self.right_char_of(index);
            }
            self.right_cursor(index)
        }
    }

    /// Moves down one line, tracking a consistent horizontal position
    /// across repeated vertical moves through the `x` cache.
    pub fn move_down_char(&self, cursor: TextCursor, x: &mut Option<f32>) -> TextCursor {
        if self.chars.is_empty() {
            return TextCursor::default();
        }

        let (_, line_nr) = self.column_line_of(self.char_of_cursor(cursor));
        let line_nr = line_nr + 1;
        if line_nr >= self.lines.len() {
            return self.end_cursor();
        }

        let x = *x.get_or_insert_with(|| self.cursor_x(cursor));
        let (index, _) = self.lines[line_nr].nearest(&self.chars, x);
        self.before_cursor(index)
    }

    /// Moves up one line, tracking a consistent horizontal position across
    /// repeated vertical moves through the `x` cache.
    pub fn move_up_char(&self, cursor: TextCursor, x: &mut Option<f32>) -> TextCursor {
        if self.chars.is_empty() {
            return TextCursor::default();
        }

        let (_, line_nr) = self.column_line_of(self.char_of_cursor(cursor));
        if line_nr == 0 {
            return TextCursor::default();
        }

        let x = *x.get_or_insert_with(|| self.cursor_x(cursor));
        let (index, _) = self.lines[line_nr - 1].nearest(&self.chars, x);
        self.before_cursor(index)
    }

    fn cursor_x(&self, cursor: TextCursor) -> f32 {
        match self.chars.get(self.char_of_cursor(cursor)) {
            Some(c) if self.is_on_left(cursor) => c.rect.x0 as f32,
            Some(c) => c.rect.x1 as f32,
            None => 0.0,
        }
    }

    /// Moves left to the nearest word boundary, skipping whitespace.
    pub fn move_left_word(&self, cursor: TextCursor, overwrite_mode: bool) -> TextCursor {
        let cursor = self
            .move_left_char(cursor, overwrite_mode)
            .before_neighbor(self.chars.len());
        let mut index = self.char_of_cursor(cursor);
        while let Some(c) = self.chars.get(index) {
            if c.general_category != GeneralCategory::SpaceSeparator
                && self.word_break_opportunities[index] != BreakOpportunity::No
            {
                return self.before_cursor(index);
            }
            let next = self.left_char_of(index);
            if next == index {
                return self.before_cursor(index);
            }
            index = next;
        }
        self.end_cursor()
    }

    /// Moves right to the nearest word boundary, skipping whitespace.
    pub fn move_right_word(&self, cursor: TextCursor, overwrite_mode: bool) -> TextCursor {
        let cursor = self
            .move_right_char(cursor, overwrite_mode)
            .before_neighbor(self.chars.len());
        let mut index = self.char_of_cursor(cursor);
        while let Some(c) = self.chars.get(index) {
            if c.general_category != GeneralCategory::SpaceSeparator
                && self.word_break_opportunities[index] != BreakOpportunity::No
            {
                return self.before_cursor(index);
            }
            let next = self.right_char_of(index);
            if next == index {
                return self.before_cursor(index);
            }
            index = next;
        }
        self.end_cursor()
    }

    /// Moves to the start of the cursor's line.
    pub fn move_begin_line(&self, cursor: TextCursor) -> TextCursor {
        let (_, line_nr) = self.column_line_of(self.char_of_cursor(cursor));
        match self.lines.get(line_nr) {
            Some(line) => self.before_cursor(line.range.start),
            None => TextCursor::default(),
        }
    }

    /// Moves past the last non-whitespace character of the cursor's line.
    pub fn move_end_line(&self, cursor: TextCursor) -> TextCursor {
        let (_, line_nr) = self.column_line_of(self.char_of_cursor(cursor));
        let Some(line) = self.lines.get(line_nr) else {
            return self.end_cursor();
        };

        let mut index = line.range.end;
        while index > line.range.start {
            index -= 1;
            if !self.chars[index].is_trailing_whitespace {
                break;
            }
        }
        self.after_cursor(index)
    }

    /// Moves to the start of the cursor's sentence.
    pub fn move_begin_sentence(&self, cursor: TextCursor) -> TextCursor {
        let cursor = if cursor.is_after() {
            TextCursor::before(cursor.index())
        } else if cursor.index() > 0 {
            TextCursor::before(cursor.index() - 1)
        } else {
            cursor
        };
        let (first, _) = self.select_sentence(cursor);
        first.before_neighbor(self.chars.len())
    }

    /// Moves to the end of the cursor's sentence.
    pub fn move_end_sentence(&self, cursor: TextCursor) -> TextCursor {
        let cursor = if cursor.is_before() {
            TextCursor::after(cursor.index())
        } else if cursor.index() + 1 < self.chars.len() {
            TextCursor::after(cursor.index() + 1)
        } else {
            cursor
        };
        let (_, last) = self.select_sentence(cursor);
        last.before_neighbor(self.chars.len())
    }

    /// Moves to the start of the cursor's paragraph.
    pub fn move_begin_paragraph(&self, cursor: TextCursor) -> TextCursor {
        let cursor = if cursor.is_after() {
            TextCursor::before(cursor.index())
        } else if cursor.index() > 0 {
            TextCursor::before(cursor.index() - 1)
        } else {
            cursor
        };
        let (first, _) = self.select_paragraph(cursor);
        first.before_neighbor(self.chars.len())
    }

    /// Moves to the end of the cursor's paragraph.
    pub fn move_end_paragraph(&self, cursor: TextCursor) -> TextCursor {
        let cursor = if cursor.is_before() {
            TextCursor::after(cursor.index())
        } else if cursor.index() + 1 < self.chars.len() {
            TextCursor::after(cursor.index() + 1)
        } else {
            cursor
        };
        let (_, last) = self.select_paragraph(cursor);
        last.before_neighbor(self.chars.len())
    }

    /// Moves to the start of the text.
    pub fn move_begin_document(&self, _cursor: TextCursor) -> TextCursor {
        TextCursor::default()
    }

    /// Moves to the end of the text.
    pub fn move_end_document(&self, _cursor: TextCursor) -> TextCursor {
        self.end_cursor()
    }

    /// The cursor nearest to a point: nearest line by baseline distance,
    /// then nearest character rectangle within that line. The half of the
    /// rectangle the point falls in decides before/after.
    pub fn nearest_cursor(&self, position: Point) -> TextCursor {
        if self.chars.is_empty() {
            return TextCursor::default();
        }

        let mut nearest: Option<(f32, &ShapedLine)> = None;
        for line in &self.lines {
            let distance = (line.y - position.y as f32).abs();
            if nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, line));
            }
        }
        let Some((_, line)) = nearest else {
            return TextCursor::default();
        };

        let (index, after) = line.nearest(&self.chars, position.x as f32);
        if after {
            self.after_cursor(index)
        } else {
            self.before_cursor(index)
        }
    }

    // --- Selection ---------------------------------------------------------

    /// Walks outward from the cursor until a boundary in both directions.
    fn selection_from_breaks(
        &self,
        cursor: TextCursor,
        breaks: &BreakVector,
    ) -> (TextCursor, TextCursor) {
        if self.chars.is_empty() {
            return (TextCursor::default(), TextCursor::default());
        }

        // Search on both sides of the character under the cursor; the
        // before/after distinction is not used here.
        let mut first_index = cursor.index().min(self.chars.len() - 1);
        while breaks[first_index] == BreakOpportunity::No {
            first_index -= 1;
        }
        let mut last_index = cursor.index().min(self.chars.len() - 1);
        while breaks[last_index + 1] == BreakOpportunity::No {
            last_index += 1;
        }

        (self.before_cursor(first_index), self.after_cursor(last_index))
    }

    /// The single character under the cursor.
    pub fn select_char(&self, cursor: TextCursor) -> (TextCursor, TextCursor) {
        (
            self.before_cursor(cursor.index()),
            self.after_cursor(cursor.index()),
        )
    }

    /// The word under the cursor.
    pub fn select_word(&self, cursor: TextCursor) -> (TextCursor, TextCursor) {
        self.selection_from_breaks(cursor, &self.word_break_opportunities)
    }

    /// The sentence under the cursor.
    pub fn select_sentence(&self, cursor: TextCursor) -> (TextCursor, TextCursor) {
        self.selection_from_breaks(cursor, &self.sentence_break_opportunities)
    }

    /// The paragraph under the cursor, delimited by paragraph separators.
    pub fn select_paragraph(&self, cursor: TextCursor) -> (TextCursor, TextCursor) {
        if self.chars.is_empty() {
            return (TextCursor::default(), TextCursor::default());
        }

        let start = cursor.index().min(self.chars.len() - 1);
        let mut first_index = start;
        while first_index > 0 {
            if self.chars[first_index - 1].general_category
                == GeneralCategory::ParagraphSeparator
            {
                break;
            }
            first_index -= 1;
        }
        let mut last_index = start;
        while last_index < self.chars.len() {
            if self.chars[last_index].general_category == GeneralCategory::ParagraphSeparator {
                break;
            }
            last_index += 1;
        }

        (self.before_cursor(first_index), self.after_cursor(last_index))
    }

    /// The whole text.
    pub fn select_document(&self, _cursor: TextCursor) -> (TextCursor, TextCursor) {
        (TextCursor::default(), self.end_cursor())
    }
}

struct LineMeasure {
    metrics: FontMetrics,
    last_category: GeneralCategory,
    spacing_line: f32,
    spacing_paragraph: f32,
}
