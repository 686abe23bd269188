// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text shaping and bidirectional layout.
//!
//! The shaper turns styled spans of text into positioned grapheme clusters:
//! it normalizes and segments the text, resolves glyphs and per-character
//! metrics through a [`FontProvider`], folds the text into lines, reorders
//! each line with the Unicode Bidirectional Algorithm and assigns every
//! character a rectangle. The result supports rendering, hit testing and
//! full cursor navigation over bidirectional text.
//!
//! ```ignore
//! let mut shaper = TextShaper::with_text(
//!     &fonts, &styles, "hello world", 1.0, BaseDirection::Auto,
//! );
//! shaper.layout(Rect::new(0.0, -100.0, 200.0, 0.0), &LayoutOptions::default());
//! for c in shaper.chars() {
//!     // c.glyphs, c.font, c.rect ...
//! }
//! ```

mod analysis;
mod bidi;
mod cursor;
mod fold;
mod font;
mod line;
mod measure;
mod selection;
mod shape;
mod shaped_char;
mod shaper;
mod style;

#[cfg(test)]
mod tests;

pub use peniko::kurbo::{Point, Rect};

pub use analysis::{BreakOpportunity, BreakVector};
pub use bidi::BaseDirection;
pub use cursor::TextCursor;
pub use font::{FontChain, FontId, FontMetrics, FontProvider, GlyphId, GlyphLookup, TOFU_GLYPH};
pub use line::{Alignment, ShapedLine, VerticalAlignment};
pub use measure::{WidthCandidate, WidthSearch};
pub use selection::TextSelection;
pub use shaped_char::{Direction, ShapedChar, UNASSIGNED};
pub use shaper::{LayoutOptions, TextShaper};
pub use style::{
    Brush, FontStyle, FontWeight, Phrasing, ResolvedStyle, StyleAttributes, StyleResolver,
    TextSpan,
};
