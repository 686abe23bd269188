// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style attributes and the style-resolver collaborator interface.

use icu_locale_core::LanguageIdentifier;

use crate::font::FontChain;

/// Trait for types that represent the color of glyphs or decorations.
pub trait Brush: Clone + PartialEq + Default + core::fmt::Debug {}

impl<T: Clone + PartialEq + Default + core::fmt::Debug> Brush for T {}

/// Visual weight class of a font, on the OpenType `usWeightClass` scale.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Weight value of 400.
    pub const NORMAL: Self = Self(400);
    /// Weight value of 700.
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Visual style or 'slope' of a font.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum FontStyle {
    /// An upright or "roman" style.
    #[default]
    Normal,
    /// A cursive or "true italic" style.
    Italic,
    /// A slanted style.
    Oblique,
}

/// Semantic role of a span of text, used by style resolvers to pick fonts
/// and decorations.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Phrasing {
    /// Plain running text.
    #[default]
    Regular,
    /// Emphasized text.
    Emphasis,
    /// Strongly emphasized text.
    Strong,
    /// Source code or other monospaced content.
    Code,
    /// A hyperlink.
    Link,
    /// Quoted text.
    Quote,
}

/// Attributes attached to a span of source text.
///
/// The shaper itself treats these as opaque: it only compares them for
/// equality when segmenting runs and hands them to the [`StyleResolver`].
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StyleAttributes {
    /// Requested font weight.
    pub weight: FontWeight,
    /// Requested font style.
    pub style: FontStyle,
    /// Semantic role of the span.
    pub phrasing: Phrasing,
    /// Language of the span, when known.
    pub language: Option<LanguageIdentifier>,
}

/// A concrete style resolved from [`StyleAttributes`], cached once per run.
#[derive(Clone, PartialEq, Debug)]
pub struct ResolvedStyle<B: Brush> {
    /// Fonts to search for glyphs, in priority order.
    pub font_chain: FontChain,
    /// Font size in pixels per em, before pixel-density scaling.
    pub size: f32,
    /// Color of the glyphs.
    pub brush: B,
    /// Multiplier for the distance between lines within a paragraph.
    pub line_spacing: f32,
    /// Multiplier for the distance between the last line of a paragraph and
    /// the first line of the next.
    pub paragraph_spacing: f32,
}

impl<B: Brush> Default for ResolvedStyle<B> {
    fn default() -> Self {
        Self {
            font_chain: FontChain::default(),
            size: 12.0,
            brush: B::default(),
            line_spacing: 1.0,
            paragraph_spacing: 1.5,
        }
    }
}

/// Resolves style attributes to concrete styles.
///
/// Must be a pure function of the attributes; the shaper resolves once per
/// run and caches the result for the lifetime of the layout.
pub trait StyleResolver<B: Brush> {
    /// Resolves `attributes` to a concrete style.
    fn resolve(&self, attributes: &StyleAttributes) -> ResolvedStyle<B>;
}

/// A span of source text with uniform style attributes.
#[derive(Clone, Debug)]
pub struct TextSpan<'a> {
    /// The span's text.
    pub text: &'a str,
    /// Attributes shared by every grapheme of the span.
    pub attributes: StyleAttributes,
}

impl<'a> TextSpan<'a> {
    /// A span with default attributes.
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            attributes: StyleAttributes::default(),
        }
    }

    /// A span with the given attributes.
    pub fn styled(text: &'a str, attributes: StyleAttributes) -> Self {
        Self { text, attributes }
    }
}
