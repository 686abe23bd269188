// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-grapheme record that every layout pass reads and writes.

use core::ops::Range;

use icu_properties::props::{BidiClass, BidiPairedBracketType, GeneralCategory, Script};
use peniko::kurbo::Rect;
use smallvec::SmallVec;

use crate::font::{FontId, FontMetrics, GlyphId};

/// Sentinel for line/column numbers that have not been assigned yet.
pub const UNASSIGNED: usize = usize::MAX;

/// Resolved direction of a character or paragraph.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// One grapheme cluster: the unit of shaping, placement and addressing.
///
/// Characters are stored in one vector owned by the shaper, in logical
/// order, and mutated in place by the fold, bidi and position passes. Lines
/// refer to them by index.
#[derive(Clone, Debug)]
pub struct ShapedChar {
    /// Byte range of the cluster in the normalized source text.
    pub range: Range<usize>,
    /// Replacement code point recorded when bidi mirroring swaps a paired
    /// bracket. The source text itself is never modified.
    pub mirrored: Option<char>,
    /// Index into the shaper's interned style table.
    pub style_index: usize,
    /// Font the glyphs below belong to.
    pub font: FontId,
    /// Glyphs resolved through the style's font chain.
    pub glyphs: SmallVec<[GlyphId; 4]>,
    /// Advance of the cluster in pixels, before kerning and morphing.
    pub advance: f32,
    /// Font metrics scaled to the effective font size, in pixels.
    pub metrics: FontMetrics,
    /// Line-spacing multiplier of the character's style.
    pub line_spacing: f32,
    /// Paragraph-spacing multiplier of the character's style.
    pub paragraph_spacing: f32,
    /// General category of the cluster starter.
    pub general_category: GeneralCategory,
    /// Bidi class of the cluster starter, before resolution.
    pub bidi_class: BidiClass,
    /// Direction assigned by the bidi pass.
    pub direction: Direction,
    /// Script after two-pass resolution.
    pub script: Script,
    /// Paired-bracket class of the cluster starter.
    pub bracket: BidiPairedBracketType,
    /// Line the character was placed on, [`UNASSIGNED`] until positioning.
    pub line_nr: usize,
    /// Visual column within the line, [`UNASSIGNED`] until positioning.
    pub column_nr: usize,
    /// Left edge of the glyph in layout coordinates, set during placement.
    pub x: f32,
    /// Bounding rectangle on the line, used for selection boxes and mouse
    /// handling. Valid after layout.
    pub rect: Rect,
    /// Whether the character is invisible trailing whitespace on its line.
    pub is_trailing_whitespace: bool,
    /// Whether the bidi algorithm removed this character from display
    /// (explicit embedding/override/boundary-neutral codes).
    pub deleted: bool,
}

impl ShapedChar {
    pub(crate) fn new(
        range: Range<usize>,
        general_category: GeneralCategory,
        bidi_class: BidiClass,
        script: Script,
        bracket: BidiPairedBracketType,
    ) -> Self {
        Self {
            range,
            mirrored: None,
            style_index: 0,
            font: FontId::default(),
            glyphs: SmallVec::new(),
            advance: 0.0,
            metrics: FontMetrics::default(),
            line_spacing: 1.0,
            paragraph_spacing: 1.5,
            general_category,
            bidi_class,
            direction: Direction::Ltr,
            script,
            bracket,
            line_nr: UNASSIGNED,
            column_nr: UNASSIGNED,
            x: 0.0,
            rect: Rect::ZERO,
            is_trailing_whitespace: false,
            deleted: false,
        }
    }

    /// Whether the glyphs take up ink: not whitespace, separators or
    /// control characters.
    pub fn is_visible(&self) -> bool {
        is_visible(self.general_category)
    }

    /// Width entry for the folding pass: the advance, negated for invisible
    /// characters so whitespace can be excluded from width sums while still
    /// being iterated.
    pub(crate) fn fold_width(&self) -> f32 {
        if self.is_visible() {
            self.advance
        } else {
            -self.advance
        }
    }

    /// The cluster's text within the shaper's normalized source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }

    /// The text to display: the mirrored replacement when bidi swapped a
    /// paired bracket, the source cluster otherwise.
    pub fn display_text<'a>(&self, source: &'a str) -> std::borrow::Cow<'a, str> {
        match self.mirrored {
            Some(c) => std::borrow::Cow::Owned(c.to_string()),
            None => std::borrow::Cow::Borrowed(self.text(source)),
        }
    }
}

/// Whether a general category takes up ink.
pub(crate) fn is_visible(category: GeneralCategory) -> bool {
    !matches!(
        category,
        GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

/// Whether a general category is a line or paragraph separator.
pub(crate) fn is_separator(category: GeneralCategory) -> bool {
    matches!(
        category,
        GeneralCategory::LineSeparator | GeneralCategory::ParagraphSeparator
    )
}
