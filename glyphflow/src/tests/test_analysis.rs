// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use icu_properties::props::Script;

use super::utils::shape;
use crate::analysis::{self, BreakOpportunity};

#[test]
fn newlines_normalize_to_paragraph_separator() {
    let shaper = shape("a\r\nb\rc\nd\u{85}e");
    assert_eq!(shaper.text(), "a\u{2029}b\u{2029}c\u{2029}d\u{2029}e");
    assert_eq!(shaper.len(), 9);
}

#[test]
fn separator_controls_normalize_to_paragraph_separator() {
    // Vertical tab, form feed and the information separators are hard
    // paragraph breaks too.
    let shaper = shape("a\u{0B}b\u{0C}c\u{1C}d\u{1D}e\u{1E}f");
    assert_eq!(
        shaper.text(),
        "a\u{2029}b\u{2029}c\u{2029}d\u{2029}e\u{2029}f"
    );
}

#[test]
fn line_separator_is_kept() {
    let shaper = shape("a\u{2028}b");
    assert_eq!(shaper.text(), "a\u{2028}b");
}

#[test]
fn combining_marks_join_their_cluster() {
    // e + combining acute is one grapheme cluster.
    let shaper = shape("e\u{301}x");
    assert_eq!(shaper.len(), 2);
    assert_eq!(shaper.chars()[0].text(shaper.text()), "e\u{301}");
}

#[test]
fn line_breaks_mark_separators_mandatory() {
    let shaper = shape("ab cd\nef");
    let breaks = analysis::line_breaks(shaper.text(), shaper.chars());
    assert_eq!(breaks.len(), shaper.len() + 1);
    assert_eq!(breaks[0], BreakOpportunity::No);
    // After the space.
    assert_eq!(breaks[3], BreakOpportunity::Allowed);
    // After the paragraph separator and at the end of text.
    assert_eq!(breaks[6], BreakOpportunity::Mandatory);
    assert_eq!(breaks[8], BreakOpportunity::Mandatory);
}

#[test]
fn word_breaks_have_boundary_sentinels() {
    let shaper = shape("aa bb");
    let breaks = analysis::word_breaks(shaper.text(), shaper.chars());
    assert_eq!(breaks[0], BreakOpportunity::Allowed);
    assert_eq!(breaks[5], BreakOpportunity::Allowed);
    assert_eq!(breaks[1], BreakOpportunity::No);
    assert_eq!(breaks[3], BreakOpportunity::Allowed);
}

#[test]
fn brackets_inherit_the_inner_script() {
    // Brackets around a Latin word inside Hebrew text follow the Latin.
    let shaper = shape("\u{5D0}(b)\u{5D0}");
    let scripts: Vec<Script> = shaper.chars().iter().map(|c| c.script).collect();
    assert_eq!(
        scripts,
        [
            Script::Hebrew,
            Script::Latin,
            Script::Latin,
            Script::Latin,
            Script::Hebrew
        ]
    );
}

#[test]
fn whitespace_takes_the_preceding_script() {
    let shaper = shape("ab \u{5D0}\u{5D1}");
    assert_eq!(shaper.chars()[2].script, Script::Latin);
    assert_eq!(shaper.chars()[3].script, Script::Hebrew);
}

#[test]
fn attribute_changes_split_runs_and_intern_styles() {
    use crate::shaper::TextShaper;
    use crate::style::{Phrasing, StyleAttributes, TextSpan};

    let code = StyleAttributes {
        phrasing: Phrasing::Code,
        ..StyleAttributes::default()
    };
    let spans = [
        TextSpan::plain("ab"),
        TextSpan::styled("cd", code),
        TextSpan::plain("ef"),
    ];
    let shaper: TextShaper<'_, ()> = TextShaper::new(
        &super::utils::FONTS,
        &super::utils::TestStyles,
        &spans,
        1.0,
        crate::bidi::BaseDirection::Auto,
    );

    // The two plain spans share one interned style.
    assert_eq!(shaper.styles().len(), 2);
    let indices: Vec<usize> = shaper.chars().iter().map(|c| c.style_index).collect();
    assert_eq!(indices, [0, 0, 1, 1, 0, 0]);
    // Code runs at double the size.
    super::utils::assert_near(shaper.chars()[2].advance, 10.0);
    super::utils::assert_near(shaper.chars()[0].advance, 5.0);
}

#[test]
fn hebrew_resolves_through_the_fallback_font() {
    let shaper = shape("a\u{5D0}");
    assert_eq!(shaper.chars()[0].font, super::utils::LATIN);
    assert_eq!(shaper.chars()[1].font, super::utils::HEBREW);
}
