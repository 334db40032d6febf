use serde::{Deserialize, Serialize};

use crate::numeral;

/// Numbering style of one list nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SequenceKind {
    Numeric,
    UpperAlpha,
    LowerAlpha,
    UpperRoman,
    LowerRoman,
    Diamond,
    Square,
    Dot,
}

impl SequenceKind {
    /// Symbolic kinds render the same glyph for every ordinal.
    pub fn is_symbolic(self) -> bool {
        matches!(self, Self::Diamond | Self::Square | Self::Dot)
    }
}

/// Pre-rendered bitmap for a list marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA pixels.
    pub rgba: Vec<u8>,
}

/// A rendered list bullet or number.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    Text(String),
    Image(MarkerImage),
}

impl Marker {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }
}

/// Maps a 0-based list index to its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSequence {
    pub kind: SequenceKind,
    pub parenthesized: bool,
    /// How many times an alphabetic ordinal is repeated (`AA`, `BB`, ...).
    pub digit_group_size: usize,
}

impl MarkerSequence {
    pub fn new(kind: SequenceKind) -> Self {
        Self {
            kind,
            parenthesized: false,
            digit_group_size: 1,
        }
    }

    pub fn parenthesized(mut self) -> Self {
        self.parenthesized = true;
        self
    }

    /// Values below one are raised to one.
    pub fn with_digit_group_size(mut self, size: usize) -> Self {
        self.digit_group_size = size.max(1);
        self
    }

    pub fn value(&self, index: usize) -> Marker {
        let ordinal = index as i64 + 1;
        let core = match self.kind {
            SequenceKind::Numeric => ordinal.to_string(),
            SequenceKind::UpperAlpha => numeral::upper_letter(ordinal).repeat(self.group()),
            SequenceKind::LowerAlpha => numeral::lower_letter(ordinal).repeat(self.group()),
            SequenceKind::UpperRoman => numeral::upper_roman(ordinal),
            SequenceKind::LowerRoman => numeral::lower_roman(ordinal),
            SequenceKind::Diamond => return Marker::Text("◈".to_string()),
            SequenceKind::Square => return Marker::Text("▣".to_string()),
            SequenceKind::Dot => return Marker::Text("◉".to_string()),
        };
        if self.parenthesized {
            Marker::Text(format!("({core})"))
        } else {
            Marker::Text(format!("{core}."))
        }
    }

    fn group(&self) -> usize {
        self.digit_group_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn text(sequence: MarkerSequence, index: usize) -> String {
        sequence
            .value(index)
            .as_text()
            .expect("text marker")
            .to_string()
    }

    #[rstest]
    #[case(SequenceKind::Numeric, 0, "1.")]
    #[case(SequenceKind::Numeric, 41, "42.")]
    #[case(SequenceKind::UpperAlpha, 0, "A.")]
    #[case(SequenceKind::LowerAlpha, 26, "aa.")]
    #[case(SequenceKind::UpperRoman, 3, "IV.")]
    #[case(SequenceKind::LowerRoman, 8, "ix.")]
    fn ordinal_sequences(#[case] kind: SequenceKind, #[case] index: usize, #[case] expected: &str) {
        assert_eq!(text(MarkerSequence::new(kind), index), expected);
    }

    #[test]
    fn parenthesized_replaces_trailing_period() {
        let sequence = MarkerSequence::new(SequenceKind::Numeric).parenthesized();
        assert_eq!(text(sequence, 2), "(3)");
        let roman = MarkerSequence::new(SequenceKind::LowerRoman).parenthesized();
        assert_eq!(text(roman, 1), "(ii)");
    }

    #[test]
    fn digit_group_repeats_letters() {
        let sequence = MarkerSequence::new(SequenceKind::UpperAlpha).with_digit_group_size(2);
        assert_eq!(text(sequence, 0), "AA.");
        assert_eq!(text(sequence, 1), "BB.");
        assert_eq!(text(sequence, 27), "ABAB.");
    }

    #[rstest]
    #[case(SequenceKind::Diamond, "◈")]
    #[case(SequenceKind::Square, "▣")]
    #[case(SequenceKind::Dot, "◉")]
    fn symbolic_sequences_ignore_index(#[case] kind: SequenceKind, #[case] glyph: &str) {
        let sequence = MarkerSequence::new(kind).parenthesized();
        assert!(kind.is_symbolic());
        assert_eq!(text(sequence, 0), glyph);
        assert_eq!(text(sequence, 999), glyph);
    }

    #[test]
    fn overflow_renders_sentinel_inside_decoration() {
        let sequence = MarkerSequence::new(SequenceKind::UpperRoman);
        assert_eq!(text(sequence, 3999), ">MMMCMXCIX.");
        let alpha = MarkerSequence::new(SequenceKind::LowerAlpha).parenthesized();
        assert_eq!(text(alpha, 702), "(>zz)");
    }
}
