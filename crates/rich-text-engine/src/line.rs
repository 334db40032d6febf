//! Logical lines of an [`AttributedText`].
//!
//! A line's range covers its content only; the terminator that ends it is not
//! part of the range, so an empty line has a zero-length range.

use crate::attributes::ParagraphStyle;
use crate::buffer::AttributedText;
use crate::error::{EditorError, EditorResult};
use crate::list::ListId;
use crate::range::TextRange;

pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\u{2028}' | '\u{2029}')
}

/// List metadata derived from a line's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMetadata {
    pub list: Option<ListId>,
    pub paragraph: Option<ParagraphStyle>,
    pub is_list_line: bool,
}

/// One logical line: its attributed content and where it sits in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    pub text: AttributedText,
    pub range: TextRange,
}

impl DocumentLine {
    pub fn new(text: AttributedText, range: TextRange) -> Self {
        Self { text, range }
    }

    /// A line is a list line when a list item and a paragraph style are both
    /// active over all of its content. Callers cache the result if needed.
    pub fn resolve(&self) -> LineMetadata {
        let Some(active) = self.text.active_attributes(self.text.full_range()) else {
            return LineMetadata::default();
        };
        match (active.list, active.paragraph) {
            (Some(list), Some(paragraph)) => LineMetadata {
                list: Some(list),
                paragraph: Some(paragraph),
                is_list_line: true,
            },
            _ => LineMetadata::default(),
        }
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.text.as_cow().starts_with(prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.text.as_cow().ends_with(suffix)
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// A post-edit line paired with the pre-edit line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedLine {
    pub line: DocumentLine,
    pub old_line: DocumentLine,
}

impl ModifiedLine {
    pub fn new(line: DocumentLine, old_line: DocumentLine) -> Self {
        Self { line, old_line }
    }

    pub fn range(&self) -> TextRange {
        self.line.range
    }

    /// The new line's metadata, or the old line's when the edit stripped it.
    pub fn resolve(&self) -> LineMetadata {
        let current = self.line.resolve();
        if current.is_list_line {
            current
        } else {
            self.old_line.resolve()
        }
    }
}

impl AttributedText {
    /// Content ranges of every line in document order. An empty buffer, and
    /// a buffer ending in a terminator, both end with an empty line.
    pub fn line_ranges(&self) -> Vec<TextRange> {
        let mut ranges = Vec::new();
        let mut start = 0;
        let mut offset = 0;
        for c in self.as_cow().chars() {
            if is_line_terminator(c) {
                ranges.push(TextRange::from_bounds(start, offset));
                start = offset + 1;
            }
            offset += 1;
        }
        ranges.push(TextRange::from_bounds(start, offset));
        ranges
    }

    /// The line containing `offset`. An offset just past a terminator belongs
    /// to the following line; the end of the buffer belongs to the last line.
    pub fn current_line(&self, offset: usize) -> EditorResult<DocumentLine> {
        let len = self.len();
        if offset > len {
            return Err(EditorError::Range {
                range: TextRange::caret(offset),
                buffer_len: len,
            });
        }
        let range = self
            .line_ranges()
            .into_iter()
            .find(|line| line.location <= offset && offset <= line.end_location())
            .unwrap_or_else(|| TextRange::caret(len));
        self.line_at(range)
    }

    /// Every line touched by `range`, including partially covered boundary
    /// lines. A zero-length range inside a line yields that line.
    pub fn lines_overlapping(&self, range: TextRange) -> EditorResult<Vec<DocumentLine>> {
        let span = range.validate(self.len())?;
        self.line_ranges()
            .into_iter()
            .filter(|line| line.location <= span.end && span.start <= line.end_location())
            .map(|line| self.line_at(line))
            .collect()
    }

    fn line_at(&self, range: TextRange) -> EditorResult<DocumentLine> {
        Ok(DocumentLine::new(self.substring(range)?, range))
    }
}
