// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles: a monospace font provider and a fixed style resolver.

use peniko::kurbo::Rect;

use crate::font::{FontChain, FontId, FontMetrics, FontProvider, GlyphId, GlyphLookup};
use crate::shaper::{LayoutOptions, TextShaper};
use crate::style::{Phrasing, ResolvedStyle, StyleAttributes, StyleResolver};

pub(crate) const LATIN: FontId = FontId(0);
pub(crate) const HEBREW: FontId = FontId(1);

/// Advance of every glyph at the default test size of 10px.
pub(crate) const ADVANCE: f32 = 5.0;

fn covers(font: FontId, c: char) -> bool {
    let hebrew = ('\u{0590}'..='\u{05FF}').contains(&c);
    match font {
        HEBREW => hebrew,
        _ => !hebrew,
    }
}

/// A monospace font pair: every glyph advances half an em, Hebrew code
/// points live in their own font so fallback is exercised.
pub(crate) struct TestFonts;

impl FontProvider for TestFonts {
    fn resolve(&self, chain: &FontChain, grapheme: &str) -> GlyphLookup {
        let starter = grapheme.chars().next().unwrap_or('\0');
        for &font in chain.fonts() {
            if covers(font, starter) {
                return GlyphLookup {
                    font,
                    glyphs: grapheme.chars().map(|c| GlyphId(c as u32)).collect(),
                };
            }
        }
        GlyphLookup::tofu(chain)
    }

    fn metrics(&self, _font: FontId) -> FontMetrics {
        FontMetrics {
            ascender: 0.8,
            descender: 0.2,
            line_gap: 0.1,
            cap_height: 0.7,
            x_height: 0.5,
            digit_advance: 0.5,
        }
    }

    fn advance(&self, _font: FontId, _glyph: GlyphId) -> f32 {
        0.5
    }
}

/// A provider whose kerning hook squishes every grapheme to a fixed pixel
/// advance, to verify the hook overrides plain advances.
pub(crate) struct SquishFonts(pub(crate) f32);

impl FontProvider for SquishFonts {
    fn resolve(&self, chain: &FontChain, grapheme: &str) -> GlyphLookup {
        TestFonts.resolve(chain, grapheme)
    }

    fn metrics(&self, font: FontId) -> FontMetrics {
        TestFonts.metrics(font)
    }

    fn advance(&self, font: FontId, glyph: GlyphId) -> f32 {
        TestFonts.advance(font, glyph)
    }

    fn shape_run(&self, _font: FontId, _size: f32, graphemes: &[&str]) -> Option<Vec<f32>> {
        Some(vec![self.0; graphemes.len()])
    }
}

/// Resolves every attribute set to the Latin-then-Hebrew chain at 10px;
/// code phrasing doubles the size so style runs can be told apart.
pub(crate) struct TestStyles;

impl StyleResolver<()> for TestStyles {
    fn resolve(&self, attributes: &StyleAttributes) -> ResolvedStyle<()> {
        let size = if attributes.phrasing == Phrasing::Code {
            20.0
        } else {
            10.0
        };
        ResolvedStyle {
            font_chain: FontChain::new([LATIN, HEBREW]),
            size,
            brush: (),
            line_spacing: 1.0,
            paragraph_spacing: 1.5,
        }
    }
}

pub(crate) static FONTS: TestFonts = TestFonts;

pub(crate) fn shape(text: &str) -> TextShaper<'static, ()> {
    TextShaper::with_text(
        &FONTS,
        &TestStyles,
        text,
        1.0,
        crate::bidi::BaseDirection::Auto,
    )
}

/// Shapes and lays out in a tall rectangle of the given width, with default
/// options.
pub(crate) fn shape_and_layout(text: &str, width: f32) -> TextShaper<'static, ()> {
    let mut shaper = shape(text);
    shaper.layout(
        Rect::new(0.0, -1000.0, f64::from(width), 0.0),
        &LayoutOptions::default(),
    );
    shaper
}

pub(crate) fn assert_near(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}
