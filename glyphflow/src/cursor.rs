// Copyright 2025 the Glyphflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor positions in shaped text.

/// A position in shaped text: a character index plus the side of that
/// character the cursor sits on.
///
/// Bidirectional text has two visually distinct positions adjacent to one
/// logical character, so an index alone is ambiguous. The default cursor,
/// before index 0, is the start sentinel and remains valid for empty text.
///
/// The ordering is logical: before a character sorts ahead of after it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct TextCursor {
    index: usize,
    after: bool,
}

impl TextCursor {
    /// A cursor before the character at `index`.
    pub fn before(index: usize) -> Self {
        Self { index, after: false }
    }

    /// A cursor after the character at `index`.
    pub fn after(index: usize) -> Self {
        Self { index, after: true }
    }

    /// The character index the cursor is attached to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the cursor sits before its character.
    pub fn is_before(&self) -> bool {
        !self.after
    }

    /// Whether the cursor sits after its character.
    pub fn is_after(&self) -> bool {
        self.after
    }

    /// Clamps the cursor to a text of `len` characters. Out-of-range
    /// cursors become the end position; any cursor into empty text becomes
    /// the start sentinel.
    #[must_use]
    pub fn resize(self, len: usize) -> Self {
        if len == 0 {
            Self::default()
        } else if self.index >= len {
            Self::after(len - 1)
        } else {
            self
        }
    }

    /// The same position expressed on the before-side of the next
    /// character, clamped at the end of text.
    #[must_use]
    pub fn before_neighbor(self, len: usize) -> Self {
        if self.after {
            Self::before(self.index + 1).resize(len)
        } else {
            self
        }
    }

    /// The same position expressed on the after-side of the previous
    /// character; identity at the start of text.
    #[must_use]
    pub fn after_neighbor(self, len: usize) -> Self {
        if !self.after && self.index > 0 {
            Self::after(self.index - 1).resize(len)
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_logical() {
        assert!(TextCursor::before(3) < TextCursor::after(3));
        assert!(TextCursor::after(3) < TextCursor::before(4));
    }

    #[test]
    fn resize_clamps() {
        assert_eq!(TextCursor::after(9).resize(5), TextCursor::after(4));
        assert_eq!(TextCursor::before(2).resize(5), TextCursor::before(2));
        assert_eq!(TextCursor::after(9).resize(0), TextCursor::default());
    }

    #[test]
    fn neighbors() {
        let len = 5;
        assert_eq!(
            TextCursor::after(1).before_neighbor(len),
            TextCursor::before(2)
        );
        assert_eq!(
            TextCursor::before(2).after_neighbor(len),
            TextCursor::after(1)
        );
        // Identity at the boundaries.
        assert_eq!(
            TextCursor::default().after_neighbor(len),
            TextCursor::default()
        );
        assert_eq!(
            TextCursor::after(4).before_neighbor(len),
            TextCursor::after(4)
        );
    }
}
