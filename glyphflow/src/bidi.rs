// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bidirectional reordering pass (UAX #9).
//!
//! The Unicode Bidirectional Algorithm itself is driven through the
//! `unicode-bidi` crate over the full normalized text, with bidi classes
//! supplied by the icu property tables. This pass maps the result back onto
//! the character and line model: visual column order per line, resolved
//! direction per character, bracket mirroring, X9 deletions and per-line
//! paragraph directions.

use icu_properties::props::{BidiClass, GeneralCategory};
use unicode_bidi::{BidiInfo, Level};

use crate::analysis::Properties;
use crate::line::ShapedLine;
use crate::shaped_char::{Direction, ShapedChar};

/// Requested base direction of the text.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum BaseDirection {
    /// Detect per paragraph from the first strong character (UAX #9 P2/P3).
    #[default]
    Auto,
    /// Force left-to-right paragraphs.
    Ltr,
    /// Force right-to-left paragraphs.
    Rtl,
}

impl BaseDirection {
    fn level(self) -> Option<Level> {
        match self {
            Self::Auto => None,
            Self::Ltr => Some(Level::ltr()),
            Self::Rtl => Some(Level::rtl()),
        }
    }
}

/// Whether rule X9 removes this class from display: explicit embedding and
/// override codes, and boundary neutrals. Isolate initiators are kept.
fn removed_by_x9(class: BidiClass) -> bool {
    matches!(
        class,
        BidiClass::LeftToRightEmbedding
            | BidiClass::RightToLeftEmbedding
            | BidiClass::LeftToRightOverride
            | BidiClass::RightToLeftOverride
            | BidiClass::PopDirectionalFormat
            | BidiClass::BoundaryNeutral
    )
}

/// First-strong direction of the whole text, used for the virtual last line
/// and as the fallback paragraph direction of empty text.
pub(crate) fn detect_direction(
    chars: &[ShapedChar],
    base_direction: BaseDirection,
) -> Direction {
    match base_direction {
        BaseDirection::Ltr => Direction::Ltr,
        BaseDirection::Rtl => Direction::Rtl,
        BaseDirection::Auto => {
            // Rule P2: characters between an isolate initiator and its
            // matching PDI do not count.
            let mut isolate_depth = 0_usize;
            for c in chars {
                match c.bidi_class {
                    BidiClass::LeftToRightIsolate
                    | BidiClass::RightToLeftIsolate
                    | BidiClass::FirstStrongIsolate => isolate_depth += 1,
                    BidiClass::PopDirectionalIsolate => {
                        isolate_depth = isolate_depth.saturating_sub(1);
                    }
                    BidiClass::LeftToRight if isolate_depth == 0 => return Direction::Ltr,
                    BidiClass::RightToLeft | BidiClass::ArabicLetter if isolate_depth == 0 => {
                        return Direction::Rtl;
                    }
                    _ => {}
                }
            }
            Direction::Ltr
        }
    }
}

/// Reorders every line into visual column order and assigns per-character
/// direction, mirroring and line/column back-references.
///
/// Characters removed by X9 are flagged `deleted`: they never appear in a
/// line's columns, and carry the clamped column of the nearest preceding
/// visible character so every character keeps a well-defined address.
pub(crate) fn reorder_lines(
    properties: &Properties,
    text: &str,
    chars: &mut [ShapedChar],
    lines: &mut [ShapedLine],
    base_direction: BaseDirection,
) {
    let text_direction = detect_direction(chars, base_direction);

    if chars.is_empty() {
        for line in lines {
            line.columns.clear();
            line.paragraph_direction = text_direction;
        }
        return;
    }

    let info = BidiInfo::new_with_data_source(&properties.bidi_class, text, base_direction.level());

    // Character index owning a byte position. Snapshots the cluster starts
    // so the lookup stays usable while `chars` is mutably borrowed below.
    let starts: Vec<usize> = chars.iter().map(|c| c.range.start).collect();
    let char_at = |byte: usize| starts.partition_point(|&start| start < byte);

    // Assign each line its paragraph's direction; the paragraph advances
    // when a line ends on a paragraph separator. Lines past the last
    // paragraph (the virtual line after a trailing separator) take the
    // text direction.
    let mut paragraphs = info.paragraphs.iter().peekable();
    for line in lines.iter_mut() {
        line.paragraph_direction = match paragraphs.peek() {
            Some(paragraph) => {
                if paragraph.level.is_rtl() {
                    Direction::Rtl
                } else {
                    Direction::Ltr
                }
            }
            None => text_direction,
        };
        if line.last_category == GeneralCategory::ParagraphSeparator {
            paragraphs.next();
        }
    }

    for c in chars.iter_mut() {
        c.deleted = removed_by_x9(c.bidi_class);
        c.mirrored = None;
    }

    for line in lines.iter_mut() {
        line.columns.clear();
        if line.range.is_empty() {
            continue;
        }

        let line_bytes = chars[line.range.start].range.start..chars[line.range.end - 1].range.end;
        let Some(paragraph) = info
            .paragraphs
            .iter()
            .find(|p| p.range.start <= line_bytes.start && line_bytes.end <= p.range.end)
        else {
            // Normalization leaves U+2029 as the only class B character,
            // and line folding always breaks after it.
            debug_assert!(false, "a folded line must lie within one paragraph");
            continue;
        };

        // Reorder the line within its paragraph's resolved context.
        let (levels, runs) = info.visual_runs(paragraph, line_bytes);
        for run in runs {
            let first = char_at(run.start);
            let last = char_at(run.end);
            let rtl = levels[run.start].is_rtl();

            let mut run_columns: Vec<usize> = (first..last).collect();
            if rtl {
                run_columns.reverse();
            }
            for i in run_columns {
                let c = &mut chars[i];
                let level = levels[c.range.start];
                c.direction = if level.is_rtl() {
                    Direction::Rtl
                } else {
                    Direction::Ltr
                };

                if level.is_rtl() {
                    let starter = c.text(text).chars().next().unwrap_or('\0');
                    let mirror = properties.mirror.get(starter);
                    if mirror.mirrored {
                        c.mirrored = mirror.mirroring_glyph;
                    }
                }

                if !c.deleted {
                    line.columns.push(i);
                }
            }
        }

        // Back-references for O(1) reverse lookup.
        for (column_nr, &i) in line.columns.iter().enumerate() {
            chars[i].line_nr = line.line_nr;
            chars[i].column_nr = column_nr;
        }
        let last_column = line.columns.len().saturating_sub(1);
        let mut previous_column = 0;
        for i in line.range.clone() {
            if chars[i].deleted {
                chars[i].line_nr = line.line_nr;
                chars[i].column_nr = previous_column.min(last_column);
            } else {
                previous_column = chars[i].column_nr;
            }
        }
    }
}
