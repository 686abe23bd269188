// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection state for interactive text editing.

use crate::cursor::TextCursor;

/// A selection: an anchor cursor pair from where the selection started, a
/// drag pair from the latest extension, and the active cursor.
///
/// Tracking pairs rather than single cursors lets double-click-drag extend
/// by whole words: the anchor pair is the word first selected, and dragging
/// unions further word ranges with it.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TextSelection {
    cursor: TextCursor,
    start_first: TextCursor,
    start_last: TextCursor,
    finish_first: TextCursor,
    finish_last: TextCursor,
}

impl TextSelection {
    /// The active cursor, where typing and further movement happen.
    pub fn cursor(&self) -> TextCursor {
        self.cursor
    }

    /// The selected range as an ordered cursor pair. An empty selection
    /// returns the active cursor twice.
    pub fn selection(&self) -> (TextCursor, TextCursor) {
        let first = self.start_first.min(self.finish_first);
        let last = self.start_last.max(self.finish_last);
        (first, last)
    }

    /// Whether the selection is collapsed to a single position.
    pub fn is_empty(&self) -> bool {
        let (first, last) = self.selection();
        first == last
    }

    /// Collapses everything to one position.
    pub fn set_cursor(&mut self, cursor: TextCursor) {
        self.cursor = cursor;
        self.start_first = cursor;
        self.start_last = cursor;
        self.finish_first = cursor;
        self.finish_last = cursor;
    }

    /// Clamps all tracked cursors after the text was resized.
    pub fn resize(&mut self, len: usize) {
        self.cursor = self.cursor.resize(len);
        self.start_first = self.start_first.resize(len);
        self.start_last = self.start_last.resize(len);
        self.finish_first = self.finish_first.resize(len);
        self.finish_last = self.finish_last.resize(len);
    }

    /// Begins a selection anchored at `range` (for example a word or a
    /// single character position), with `cursor` active.
    pub fn start_selection(&mut self, cursor: TextCursor, range: (TextCursor, TextCursor)) {
        let (first, last) = ordered(range);
        self.cursor = cursor;
        self.start_first = first;
        self.start_last = last;
        self.finish_first = first;
        self.finish_last = last;
    }

    /// Extends the selection towards `range`.
    ///
    /// The active cursor flips to the boundary of the union range nearest
    /// the drag, so dragging past the anchor behaves like standard text
    /// editors: the far side of the anchor stays put.
    pub fn drag_selection(&mut self, range: (TextCursor, TextCursor)) {
        let (first, last) = ordered(range);
        self.finish_first = first;
        self.finish_last = last;
        self.cursor = if first < self.start_first {
            self.selection().0
        } else {
            self.selection().1
        };
    }
}

fn ordered(range: (TextCursor, TextCursor)) -> (TextCursor, TextCursor) {
    (range.0.min(range.1), range.0.max(range.1))
}
