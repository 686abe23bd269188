// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font collaborator interface.
//!
//! Glyphflow does not parse font files. Everything it needs from a font
//! (glyph coverage, advances, design metrics, optional kerning) comes
//! through the [`FontProvider`] trait, so any font stack or a test double
//! can back a shaper.

use smallvec::SmallVec;

/// Identifier of a font known to a [`FontProvider`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct FontId(pub u32);

/// Identifier of a glyph within a font.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct GlyphId(pub u32);

/// The placeholder glyph substituted when no font in a chain covers a
/// grapheme. Text layout never fails on a missing glyph.
pub const TOFU_GLYPH: GlyphId = GlyphId(0);

/// An ordered font fallback chain. The first font that covers a grapheme
/// wins.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FontChain(SmallVec<[FontId; 2]>);

impl FontChain {
    /// Creates a chain from fonts in priority order.
    pub fn new(fonts: impl IntoIterator<Item = FontId>) -> Self {
        Self(fonts.into_iter().collect())
    }

    /// The primary font of the chain.
    ///
    /// This font supplies the tofu glyph and the initial line metrics, so an
    /// empty chain behaves as a chain containing the default font.
    pub fn primary(&self) -> FontId {
        self.0.first().copied().unwrap_or_default()
    }

    /// Fonts in priority order.
    pub fn fonts(&self) -> &[FontId] {
        &self.0
    }
}

/// Glyphs resolved for a single grapheme cluster.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GlyphLookup {
    /// The font the glyphs belong to.
    pub font: FontId,
    /// One glyph per code point of the cluster, in cluster order.
    pub glyphs: SmallVec<[GlyphId; 4]>,
}

impl GlyphLookup {
    /// The tofu lookup for a chain, used when no font covers a grapheme.
    pub fn tofu(chain: &FontChain) -> Self {
        Self {
            font: chain.primary(),
            glyphs: SmallVec::from_slice(&[TOFU_GLYPH]),
        }
    }

    /// The glyph used for metrics and advance lookups.
    pub fn first(&self) -> GlyphId {
        self.glyphs.first().copied().unwrap_or(TOFU_GLYPH)
    }
}

/// Design metrics of a font in em units; multiply by a font size in pixels
/// to get pixel metrics.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of tall glyphs. Positive up.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of deep glyphs. Positive
    /// down.
    pub descender: f32,
    /// Extra distance between the descender of one line and the ascender of
    /// the next.
    pub line_gap: f32,
    /// Height of capital letters above the baseline.
    pub cap_height: f32,
    /// Height of lowercase letters without ascenders.
    pub x_height: f32,
    /// Advance of the decimal digits, for tabular number alignment.
    pub digit_advance: f32,
}

impl FontMetrics {
    /// Scales the metrics by a font size in pixels.
    #[must_use]
    pub fn scale(&self, size: f32) -> Self {
        Self {
            ascender: self.ascender * size,
            descender: self.descender * size,
            line_gap: self.line_gap * size,
            cap_height: self.cap_height * size,
            x_height: self.x_height * size,
            digit_advance: self.digit_advance * size,
        }
    }

    /// Component-wise maximum, used to aggregate metrics over a line.
    #[must_use]
    pub fn max(&self, other: &Self) -> Self {
        Self {
            ascender: self.ascender.max(other.ascender),
            descender: self.descender.max(other.descender),
            line_gap: self.line_gap.max(other.line_gap),
            cap_height: self.cap_height.max(other.cap_height),
            x_height: self.x_height.max(other.x_height),
            digit_advance: self.digit_advance.max(other.digit_advance),
        }
    }
}

/// External provider of glyphs and font metrics.
pub trait FontProvider {
    /// Resolves the glyphs for a grapheme cluster through a fallback chain.
    ///
    /// Implementations must not fail for uncovered graphemes; return
    /// [`GlyphLookup::tofu`] instead.
    fn resolve(&self, chain: &FontChain, grapheme: &str) -> GlyphLookup;

    /// Design metrics of a font, in em units.
    fn metrics(&self, font: FontId) -> FontMetrics;

    /// Advance of a glyph, in em units.
    fn advance(&self, font: FontId, glyph: GlyphId) -> f32;

    /// Kerning and glyph-morphing hook.
    ///
    /// `graphemes` is a visual-order run sharing one font and style. An
    /// implementation that performs kerning or ligation returns one pixel
    /// advance per grapheme, which replaces the plain glyph advances during
    /// horizontal placement. The default performs no morphing.
    fn shape_run(&self, font: FontId, size: f32, graphemes: &[&str]) -> Option<Vec<f32>> {
        let _ = (font, size, graphemes);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_scale_and_max() {
        let a = FontMetrics {
            ascender: 0.8,
            descender: 0.2,
            line_gap: 0.1,
            cap_height: 0.7,
            x_height: 0.5,
            digit_advance: 0.6,
        };
        let b = FontMetrics {
            ascender: 0.9,
            descender: 0.1,
            ..a
        };
        let m = a.max(&b);
        assert_eq!(m.ascender, 0.9);
        assert_eq!(m.descender, 0.2);
        let s = a.scale(10.0);
        assert_eq!(s.ascender, 8.0);
        assert_eq!(s.digit_advance, 6.0);
    }

    #[test]
    fn empty_chain_has_default_primary() {
        let chain = FontChain::default();
        assert_eq!(chain.primary(), FontId(0));
        assert_eq!(GlyphLookup::tofu(&chain).first(), TOFU_GLYPH);
    }
}
