use crate::error::{EditorError, EditorResult};

/// A half-open range `[location, location + length)` measured in characters.
///
/// `length` may be negative while a reversed edit is being described; call
/// [`TextRange::normalized`] before using such a range. A zero-length range
/// is an insertion point, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub location: usize,
    pub length: isize,
}

impl TextRange {
    pub fn new(location: usize, length: isize) -> Self {
        Self { location, length }
    }

    /// Range spanning `location..end_location`; a reversed pair yields a
    /// negative length.
    pub fn from_bounds(location: usize, end_location: usize) -> Self {
        Self {
            location,
            length: end_location as isize - location as isize,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Insertion point at `location`.
    pub fn caret(location: usize) -> Self {
        Self::new(location, 0)
    }

    pub fn end_location(self) -> usize {
        self.location.saturating_add_signed(self.length)
    }

    /// Length of the normalized range.
    pub fn len(self) -> usize {
        self.normalized().length as usize
    }

    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    pub fn first_character(self) -> Self {
        Self::new(self.location, 1)
    }

    /// The single character just past the end of the range.
    pub fn last_character(self) -> Self {
        Self::new(self.end_location(), 1)
    }

    pub fn next_position(self) -> Self {
        Self::caret(self.location + 1)
    }

    /// Flips a negative length so the range covers the same characters with
    /// a non-negative length. Saturates at offset zero.
    pub fn normalized(self) -> Self {
        if self.length >= 0 {
            return self;
        }
        let start = self.location.saturating_sub(self.length.unsigned_abs());
        Self::from_bounds(start, self.location)
    }

    /// The part of `self` that lies inside `bounds`.
    ///
    /// The result never has a negative length and never starts outside
    /// `bounds`; a range entirely outside collapses to an insertion point on
    /// the nearest edge.
    pub fn clamped(self, bounds: TextRange) -> Self {
        let bounds = bounds.normalized();
        let range = self.normalized();
        let (lower, upper) = (bounds.location, bounds.end_location());
        let start = range.location.clamp(lower, upper);
        let end = range.end_location().clamp(lower, upper).max(start);
        Self::from_bounds(start, end)
    }

    pub fn clamped_to_len(self, len: usize) -> Self {
        self.clamped(Self::new(0, len as isize))
    }

    pub fn shifted(self, by: isize) -> Self {
        Self::new(self.location.saturating_add_signed(by), self.length)
    }

    pub fn contains(self, offset: usize) -> bool {
        let range = self.normalized();
        range.location <= offset && offset < range.end_location()
    }

    /// Whether `self` lies completely inside `outer`.
    pub fn is_within(self, outer: TextRange) -> bool {
        let (inner, outer) = (self.normalized(), outer.normalized());
        inner.location >= outer.location && inner.end_location() <= outer.end_location()
    }

    pub fn intersects(self, other: TextRange) -> bool {
        let (a, b) = (self.normalized(), other.normalized());
        a.location < b.end_location() && b.location < a.end_location()
    }

    /// Gaps inside `self` not covered by any of `ranges`, sorted by location.
    /// Inputs may be unsorted and overlapping; empty gaps are omitted.
    pub fn complement(self, ranges: &[TextRange]) -> Vec<TextRange> {
        let outer = self.normalized();
        let mut covered: Vec<TextRange> = ranges.iter().map(|r| r.normalized()).collect();
        covered.sort_by_key(|r| r.location);

        let mut gaps = Vec::new();
        let mut current = outer.location;
        for range in covered {
            let gap_end = range.location.min(outer.end_location());
            if current < gap_end {
                gaps.push(Self::from_bounds(current, gap_end));
            }
            current = current.max(range.end_location());
        }
        if current < outer.end_location() {
            gaps.push(Self::from_bounds(current, outer.end_location()));
        }
        gaps
    }

    /// Checks the range against a buffer of `buffer_len` characters and
    /// converts it to a std range.
    pub fn validate(self, buffer_len: usize) -> EditorResult<std::ops::Range<usize>> {
        let reversed_past_start =
            self.length < 0 && self.length.unsigned_abs() > self.location;
        let range = self.normalized();
        if reversed_past_start || range.end_location() > buffer_len {
            return Err(EditorError::Range {
                range: self,
                buffer_len,
            });
        }
        Ok(range.location..range.end_location())
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}
