// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unicode analysis of the source text: normalization, segmentation,
//! character properties and script resolution.

use core::ops::{Index, Range};

use icu_properties::props::{BidiMirroringGlyph, GeneralCategory, Script};
use icu_properties::props::{BidiClass, BidiPairedBracketType};
use icu_properties::{CodePointMapData, CodePointMapDataBorrowed};
use icu_segmenter::options::{
    LineBreakOptions, SentenceBreakInvariantOptions, WordBreakInvariantOptions,
};
use icu_segmenter::{
    GraphemeClusterSegmenter, LineSegmenter, SentenceSegmenter, WordSegmenter,
};

use crate::shaped_char::{is_separator, ShapedChar};

/// Paragraph separator, the normal form of every newline convention.
pub(crate) const PARAGRAPH_SEPARATOR: char = '\u{2029}';

/// Compiled Unicode property tables.
///
/// Lookups are total functions: any code point resolves to a defined value,
/// never an error.
#[derive(Copy, Clone)]
pub(crate) struct Properties {
    pub(crate) general_category: CodePointMapDataBorrowed<'static, GeneralCategory>,
    pub(crate) bidi_class: CodePointMapDataBorrowed<'static, BidiClass>,
    pub(crate) script: CodePointMapDataBorrowed<'static, Script>,
    pub(crate) mirror: CodePointMapDataBorrowed<'static, BidiMirroringGlyph>,
}

impl Properties {
    pub(crate) fn new() -> Self {
        Self {
            general_category: CodePointMapData::<GeneralCategory>::new(),
            bidi_class: CodePointMapData::<BidiClass>::new(),
            script: CodePointMapData::<Script>::new(),
            mirror: CodePointMapData::<BidiMirroringGlyph>::new(),
        }
    }
}

/// Appends `text` to `out` with every newline convention and
/// paragraph-separating control (vertical tab, form feed, the information
/// separators U+001C..=U+001E, U+0085) reduced to U+2029 PARAGRAPH
/// SEPARATOR. Normalized text then has no bidi class B character other than
/// U+2029, so folded lines always lie within one paragraph. U+2028 LINE
/// SEPARATOR is kept as-is.
pub(crate) fn normalize_into(text: &str, out: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(PARAGRAPH_SEPARATOR);
            }
            '\n' | '\u{0B}' | '\u{0C}' | '\u{1C}' | '\u{1D}' | '\u{1E}' | '\u{85}' => {
                out.push(PARAGRAPH_SEPARATOR);
            }
            _ => out.push(c),
        }
    }
}

/// Builds the character vector: one [`ShapedChar`] per grapheme cluster,
/// with the starter's properties assigned.
pub(crate) fn segment_characters(text: &str, properties: &Properties) -> Vec<ShapedChar> {
    let mut chars = Vec::new();
    let segmenter = GraphemeClusterSegmenter::new();
    let mut boundaries = segmenter.segment_str(text);
    let Some(mut start) = boundaries.next() else {
        return chars;
    };
    for end in boundaries {
        let starter = text[start..end].chars().next().unwrap_or('\0');
        chars.push(ShapedChar::new(
            start..end,
            properties.general_category.get(starter),
            properties.bidi_class.get(starter),
            properties.script.get(starter),
            properties.mirror.get(starter).paired_bracket_type,
        ));
        start = end;
    }
    chars
}

/// A break opportunity between two characters.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BreakOpportunity {
    /// Breaking here is not permitted.
    No,
    /// Breaking here is permitted.
    Allowed,
    /// A break is required here.
    Mandatory,
}

/// Break opportunities at every boundary of the character vector.
///
/// Entry `i` is the boundary before character `i`; entry `len` is the end of
/// the text, so a vector over `n` characters has `n + 1` entries.
#[derive(Clone, Debug)]
pub struct BreakVector(Vec<BreakOpportunity>);

impl BreakVector {
    fn new_no(num_chars: usize) -> Self {
        Self(vec![BreakOpportunity::No; num_chars + 1])
    }

    /// Number of boundaries, one more than the number of characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the underlying text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.len() <= 1
    }
}

impl Index<usize> for BreakVector {
    type Output = BreakOpportunity;

    fn index(&self, boundary: usize) -> &BreakOpportunity {
        &self.0[boundary]
    }
}

/// Maps segmenter byte boundaries onto character indices.
///
/// Segmenter boundaries are always grapheme-cluster aligned, so every byte
/// boundary matches the start of a character or the end of the text.
fn mark_boundaries(
    breaks: &mut BreakVector,
    chars: &[ShapedChar],
    boundaries: impl Iterator<Item = usize>,
) {
    for byte in boundaries {
        let index = chars.partition_point(|c| c.range.start < byte);
        debug_assert!(
            index == chars.len() || chars[index].range.start == byte,
            "segmenter boundary must be cluster aligned"
        );
        breaks.0[index] = BreakOpportunity::Allowed;
    }
}

/// Word boundaries (UAX #29). The start and end of text are boundaries.
pub(crate) fn word_breaks(text: &str, chars: &[ShapedChar]) -> BreakVector {
    let mut breaks = BreakVector::new_no(chars.len());
    let segmenter = WordSegmenter::new_auto(WordBreakInvariantOptions::default());
    mark_boundaries(&mut breaks, chars, segmenter.segment_str(text));
    breaks.0[0] = BreakOpportunity::Allowed;
    breaks.0[chars.len()] = BreakOpportunity::Allowed;
    breaks
}

/// Sentence boundaries (UAX #29). The start and end of text are boundaries.
pub(crate) fn sentence_breaks(text: &str, chars: &[ShapedChar]) -> BreakVector {
    let mut breaks = BreakVector::new_no(chars.len());
    let segmenter = SentenceSegmenter::new(SentenceBreakInvariantOptions::default());
    mark_boundaries(&mut breaks, chars, segmenter.segment_str(text));
    breaks.0[0] = BreakOpportunity::Allowed;
    breaks.0[chars.len()] = BreakOpportunity::Allowed;
    breaks
}

/// Line break opportunities (UAX #14).
///
/// The segmenter reports where breaking is permitted; boundaries directly
/// after a line or paragraph separator and the end of text are upgraded to
/// mandatory. The start of text is never an opportunity.
pub(crate) fn line_breaks(text: &str, chars: &[ShapedChar]) -> BreakVector {
    let mut breaks = BreakVector::new_no(chars.len());
    let segmenter = LineSegmenter::new_auto(LineBreakOptions::default());
    mark_boundaries(&mut breaks, chars, segmenter.segment_str(text));
    for (i, c) in chars.iter().enumerate() {
        if is_separator(c.general_category) {
            breaks.0[i + 1] = BreakOpportunity::Mandatory;
        }
    }
    breaks.0[0] = BreakOpportunity::No;
    breaks.0[chars.len()] = BreakOpportunity::Mandatory;
    breaks
}

/// Splits the character vector into runs: maximal ranges with no internal
/// word-break opportunity and identical style attributes throughout.
///
/// `attribute_of` gives each character's attribute-set index; a change
/// forces a run boundary even without a word break. The ranges are ordered,
/// non-overlapping and cover the text exactly once. Empty text yields no
/// runs.
pub(crate) fn run_ranges(word_breaks: &BreakVector, attribute_of: &[usize]) -> Vec<Range<usize>> {
    let num_chars = attribute_of.len();
    let mut runs = Vec::new();
    if num_chars == 0 {
        return runs;
    }
    debug_assert_eq!(word_breaks.len(), num_chars + 1, "one boundary per gap");
    debug_assert!(
        word_breaks[num_chars] != BreakOpportunity::No,
        "end of text must be a word break"
    );

    let mut run_start = 0;
    for i in 0..num_chars {
        let break_after = word_breaks[i + 1] != BreakOpportunity::No;
        if break_after || attribute_of[i + 1] != attribute_of[i] {
            // The end-of-text boundary is always a word break, so the
            // attribute comparison never indexes past the last character.
            runs.push(run_start..i + 1);
            run_start = i + 1;
        }
    }
    runs
}

fn is_concrete_script(script: Script) -> bool {
    script != Script::Common && script != Script::Unknown && script != Script::Inherited
}

/// Resolves the script of every character.
///
/// Backward pass: characters with a Common or Unknown script take the script
/// of the word they belong to; open brackets inherit the following resolved
/// script, close brackets are left Common. Forward pass: remaining Common
/// and Inherited characters (close brackets among them) take the previous
/// resolved script. Nested mixed-script brackets are implementation-defined
/// and pinned by tests.
pub(crate) fn resolve_scripts(
    chars: &mut [ShapedChar],
    word_breaks: &BreakVector,
    default_script: Script,
) {
    // The first concrete script in the text seeds both passes.
    let first_script = chars
        .iter()
        .map(|c| c.script)
        .find(|&s| is_concrete_script(s))
        .unwrap_or(default_script);

    let mut word_script = Script::Common;
    let mut previous_script = first_script;
    for i in (0..chars.len()).rev() {
        if word_breaks[i + 1] != BreakOpportunity::No {
            word_script = Script::Common;
        }

        let script = chars[i].script;
        if script == Script::Common || script == Script::Unknown {
            chars[i].script = match chars[i].bracket {
                BidiPairedBracketType::Open => previous_script,
                BidiPairedBracketType::Close => Script::Common,
                _ => word_script,
            };
        } else if script != Script::Inherited {
            previous_script = script;
            word_script = script;
        }
    }

    let mut previous_script = first_script;
    for c in chars.iter_mut() {
        if c.script == Script::Common || c.script == Script::Inherited {
            c.script = previous_script;
        } else {
            previous_script = c.script;
        }
    }
}
