// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph resolution and per-character metrics.

use core::ops::Range;

use hashbrown::HashMap;

use crate::font::{FontId, FontMetrics, FontProvider};
use crate::shaped_char::ShapedChar;
use crate::style::{Brush, ResolvedStyle, StyleAttributes, StyleResolver};

/// Resolves glyphs and scaled metrics for every character and interns the
/// resolved styles.
///
/// Styles are resolved once per distinct attribute set. Within a run,
/// scaled font metrics are recomputed only when the resolved font changes
/// from one grapheme to the next; a cache keyed on font and size avoids
/// recomputation across runs as well.
pub(crate) fn resolve_glyphs<B: Brush>(
    chars: &mut [ShapedChar],
    text: &str,
    runs: &[Range<usize>],
    attribute_of: &[usize],
    attributes: &[StyleAttributes],
    resolver: &dyn StyleResolver<B>,
    provider: &dyn FontProvider,
    dpi_scale: f32,
) -> Vec<ResolvedStyle<B>> {
    let mut styles: Vec<ResolvedStyle<B>> = Vec::new();
    let mut style_of_attribute: Vec<Option<usize>> = vec![None; attributes.len()];
    let mut metrics_cache: HashMap<(FontId, u32), FontMetrics> = HashMap::new();

    for run in runs {
        debug_assert!(!run.is_empty(), "runs cover the text without gaps");

        let attribute_index = attribute_of[run.start];
        let style_index = *style_of_attribute[attribute_index].get_or_insert_with(|| {
            styles.push(resolver.resolve(&attributes[attribute_index]));
            styles.len() - 1
        });
        let style = &styles[style_index];
        let size = style.size * dpi_scale;

        let mut run_font: Option<FontId> = None;
        let mut font_metrics = FontMetrics::default();
        for i in run.clone() {
            let lookup = provider.resolve(&style.font_chain, chars[i].text(text));
            if run_font != Some(lookup.font) {
                run_font = Some(lookup.font);
                font_metrics = *metrics_cache
                    .entry((lookup.font, size.to_bits()))
                    .or_insert_with(|| provider.metrics(lookup.font).scale(size));
            }

            let c = &mut chars[i];
            c.style_index = style_index;
            c.font = lookup.font;
            c.advance = provider.advance(lookup.font, lookup.first()) * size;
            c.metrics = font_metrics;
            c.line_spacing = style.line_spacing;
            c.paragraph_spacing = style.paragraph_spacing;
            c.glyphs = lookup.glyphs;
        }
    }

    styles
}

/// Re-resolves glyphs for characters the bidi pass mirrored.
///
/// Mirror pairs share their advance and metrics, so only the glyphs and
/// font are replaced; the fold widths stay valid.
pub(crate) fn resolve_mirrored_glyphs<B: Brush>(
    chars: &mut [ShapedChar],
    styles: &[ResolvedStyle<B>],
    provider: &dyn FontProvider,
) {
    for c in chars.iter_mut() {
        let Some(mirrored) = c.mirrored else {
            continue;
        };
        let mut buffer = [0_u8; 4];
        let lookup = provider.resolve(
            &styles[c.style_index].font_chain,
            mirrored.encode_utf8(&mut buffer),
        );
        c.font = lookup.font;
        c.glyphs = lookup.glyphs;
    }
}
