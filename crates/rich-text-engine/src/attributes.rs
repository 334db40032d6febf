use std::collections::BTreeSet;

use crate::list::ListId;

/// Inline character styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

/// Paragraph indentation in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParagraphStyle {
    pub head_indent: u32,
    pub first_line_head_indent: u32,
}

impl ParagraphStyle {
    pub fn for_level(level: usize, indent_unit_width: u32) -> Self {
        let indent = indent_unit_width.saturating_mul(level as u32);
        Self {
            head_indent: indent,
            first_line_head_indent: indent,
        }
    }

    /// Nesting depth implied by the first-line indent.
    pub fn level(&self, indent_unit_width: u32) -> usize {
        if indent_unit_width == 0 {
            return 0;
        }
        (self.first_line_head_indent / indent_unit_width) as usize
    }
}

/// Formatting carried by one attribute run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    pub list: Option<ListId>,
    pub paragraph: Option<ParagraphStyle>,
    /// Suppresses the marker of the line that follows this character.
    pub skip_next_marker: bool,
    pub styles: BTreeSet<TextStyle>,
}

impl Attributes {
    pub fn list_line(list: ListId, paragraph: ParagraphStyle) -> Self {
        Self {
            list: Some(list),
            paragraph: Some(paragraph),
            ..Self::default()
        }
    }

    /// Attributes shared by both sides; values that differ are dropped.
    pub fn intersect(&self, other: &Attributes) -> Attributes {
        Attributes {
            list: self.list.filter(|list| other.list == Some(*list)),
            paragraph: self.paragraph.filter(|style| other.paragraph == Some(*style)),
            skip_next_marker: self.skip_next_marker && other.skip_next_marker,
            styles: self.styles.intersection(&other.styles).copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_level_is_indent_over_unit() {
        let style = ParagraphStyle::for_level(3, 25);
        assert_eq!(style.first_line_head_indent, 75);
        assert_eq!(style.level(25), 3);
        assert_eq!(ParagraphStyle::default().level(25), 0);
        assert_eq!(style.level(0), 0);
    }

    #[test]
    fn intersect_keeps_only_shared_values() {
        let mut bold = Attributes::default();
        bold.styles.insert(TextStyle::Bold);
        bold.styles.insert(TextStyle::Italic);
        bold.paragraph = Some(ParagraphStyle::for_level(1, 25));

        let mut italic = Attributes::default();
        italic.styles.insert(TextStyle::Italic);
        italic.paragraph = Some(ParagraphStyle::for_level(2, 25));

        let shared = bold.intersect(&italic);
        assert_eq!(shared.styles.into_iter().collect::<Vec<_>>(), vec![TextStyle::Italic]);
        assert_eq!(shared.paragraph, None);
    }
}
