//! List formatting over an [`AttributedText`].
//!
//! Empty list lines hold a single placeholder character so they have
//! something to carry the list attributes; these helpers keep placeholders,
//! list attributes and typing attributes consistent after an edit.

use crate::attributes::{Attributes, ParagraphStyle};
use crate::buffer::AttributedText;
use crate::error::EditorResult;
use crate::line::{DocumentLine, LineMetadata, ModifiedLine};
use crate::list::{Indentation, ListArena, ListId};
use crate::range::TextRange;

/// Attributes applied to the text of a list line at `level`.
pub fn list_attributes(list: ListId, level: usize, indent_unit_width: u32) -> Attributes {
    Attributes::list_line(list, ParagraphStyle::for_level(level, indent_unit_width))
}

/// A list line with no content besides placeholders.
pub fn is_empty_list_line(line: &DocumentLine, placeholder: char) -> bool {
    line.resolve().is_list_line && line.text.as_cow().chars().all(|c| c == placeholder)
}

/// Expands `range` to the whole lines it covers. A non-empty range ending
/// right after a terminator does not pull in the following line.
pub fn line_span(buffer: &AttributedText, range: TextRange) -> EditorResult<TextRange> {
    let span = range.validate(buffer.len())?;
    let probe = if span.is_empty() {
        TextRange::caret(span.start)
    } else {
        TextRange::from_bounds(span.start, span.end - 1)
    };
    let lines = buffer.lines_overlapping(probe)?;
    Ok(match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => {
            TextRange::from_bounds(first.range.location, last.range.end_location())
        }
        _ => probe,
    })
}

/// Whether the list attribute over `range` is structurally `item`.
pub fn has_list(
    buffer: &AttributedText,
    lists: &ListArena,
    item: ListId,
    range: TextRange,
) -> bool {
    buffer
        .active_attributes(range)
        .and_then(|active| active.list)
        .is_some_and(|current| lists.items_equal(current, item))
}

pub fn apply_list(
    buffer: &mut AttributedText,
    item: ListId,
    range: TextRange,
    indent_unit_width: u32,
) -> EditorResult<()> {
    let paragraph = ParagraphStyle::for_level(1, indent_unit_width);
    buffer.update_attributes(range, |attributes| {
        attributes.list = Some(item);
        attributes.paragraph = Some(paragraph);
    })
}

pub fn remove_list(buffer: &mut AttributedText, range: TextRange) -> EditorResult<()> {
    buffer.update_attributes(range, |attributes| {
        attributes.list = None;
        attributes.paragraph = None;
    })
}

/// Shifts the paragraph level of every list line touched by `range`. Lines
/// that would drop below level 1 leave the list.
pub fn indent_lines(
    buffer: &mut AttributedText,
    range: TextRange,
    mode: Indentation,
    indent_unit_width: u32,
) -> EditorResult<usize> {
    let mut touched = 0;
    for line in buffer.lines_overlapping(range)? {
        let LineMetadata {
            paragraph: Some(paragraph),
            is_list_line: true,
            ..
        } = line.resolve()
        else {
            continue;
        };
        let level = paragraph.level(indent_unit_width);
        let next = match mode {
            Indentation::Indent => level + 1,
            Indentation::Outdent => level.saturating_sub(1),
        };
        if next < 1 {
            remove_list(buffer, line.range)?;
        } else {
            let style = ParagraphStyle::for_level(next, indent_unit_width);
            buffer.update_attributes(line.range, |attributes| attributes.paragraph = Some(style))?;
        }
        touched += 1;
    }
    Ok(touched)
}

/// Removes placeholders from each of `lines` that holds other text or is no
/// longer a list line. Returns `caret` adjusted for the removed characters.
pub fn strip_placeholders(
    buffer: &mut AttributedText,
    lines: &[DocumentLine],
    mut caret: usize,
    placeholder: char,
) -> EditorResult<usize> {
    let mut lines: Vec<&DocumentLine> = lines.iter().collect();
    lines.sort_by_key(|line| std::cmp::Reverse(line.range.location));
    for line in lines {
        if line.range.len() <= 1 && line.resolve().is_list_line {
            continue;
        }
        let positions: Vec<usize> = line
            .text
            .as_cow()
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == placeholder)
            .map(|(offset, _)| line.range.location + offset)
            .collect();
        for offset in positions.into_iter().rev() {
            buffer.remove(TextRange::new(offset, 1))?;
            if offset < caret {
                caret -= 1;
            }
        }
    }
    Ok(caret)
}

/// Result of [`reconcile_list_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    /// Span of the list lines involved, in post-reconcile offsets.
    pub range: Option<TextRange>,
    pub caret: usize,
    /// Whether the buffer was modified.
    pub modified: bool,
}

/// Carries list attributes across an edit.
///
/// Every changed line whose metadata (its own, or its pre-edit line's) marks
/// it as a list line gets the list attributes back if the edit dropped them,
/// and an empty one gets a placeholder unless the list was just removed on
/// purpose. Finally placeholders leave every edited line, and the caret
/// line, once it holds real text or is no longer a list line.
pub fn reconcile_list_lines(
    buffer: &mut AttributedText,
    changed: &[ModifiedLine],
    caret: usize,
    intentional_delete: bool,
    placeholder: char,
) -> EditorResult<Reconciled> {
    let mut targets: Vec<(&DocumentLine, LineMetadata)> = Vec::new();
    for modified in changed {
        let metadata = modified.resolve();
        if !metadata.is_list_line || targets.iter().any(|(line, _)| line.range == modified.range()) {
            continue;
        }
        targets.push((&modified.line, metadata));
    }
    targets.sort_by_key(|(line, _)| std::cmp::Reverse(line.range.location));

    let mut caret = caret;
    let mut modified = false;
    let mut inserted = 0;
    for (line, metadata) in &targets {
        let (Some(list), Some(paragraph)) = (metadata.list, metadata.paragraph) else {
            continue;
        };
        if line.is_empty() {
            if intentional_delete {
                continue;
            }
            let attributes = Attributes::list_line(list, paragraph);
            buffer.insert(line.range.location, &placeholder.to_string(), &attributes)?;
            if line.range.location <= caret {
                caret += 1;
            }
            inserted += 1;
            modified = true;
            log::trace!("placeholder inserted at {}", line.range.location);
        } else if !line.resolve().is_list_line {
            buffer.update_attributes(line.range, |attributes| {
                attributes.list = Some(list);
                attributes.paragraph = Some(paragraph);
            })?;
            modified = true;
            log::trace!("list attributes restored on {:?}", line.range);
        }
    }

    let range = targets
        .iter()
        .map(|(line, _)| line.range)
        .reduce(|a, b| {
            TextRange::from_bounds(
                a.location.min(b.location),
                a.end_location().max(b.end_location()),
            )
        })
        .map(|span| TextRange::new(span.location, span.length + inserted));

    // Placeholders were only inserted at line starts inside the edited span.
    let edited = changed
        .iter()
        .map(|modified| modified.line.range)
        .reduce(|a, b| {
            TextRange::from_bounds(
                a.location.min(b.location),
                a.end_location().max(b.end_location()),
            )
        })
        .map(|span| TextRange::new(span.location, span.length + inserted));
    let mut lines = match edited {
        Some(span) => buffer.lines_overlapping(span.clamped_to_len(buffer.len()))?,
        None => Vec::new(),
    };
    let caret_line = buffer.current_line(caret.min(buffer.len()))?;
    if lines.iter().all(|line| line.range != caret_line.range) {
        lines.push(caret_line);
    }
    let before = buffer.len();
    let caret = strip_placeholders(buffer, &lines, caret, placeholder)?;
    modified |= buffer.len() != before;

    if let Some(range) = range {
        log::debug!("reconciled list lines in {range:?}");
    }
    Ok(Reconciled {
        range: range.map(|range| range.clamped_to_len(buffer.len())),
        caret,
        modified,
    })
}

/// Typing attributes for a caret at `caret`: list and paragraph follow the
/// caret line, inline styles are kept from `current`.
pub fn typing_attributes_at(
    buffer: &AttributedText,
    caret: usize,
    current: &Attributes,
) -> EditorResult<Attributes> {
    let metadata = buffer.current_line(caret)?.resolve();
    let mut attributes = current.clone();
    attributes.skip_next_marker = false;
    if metadata.is_list_line {
        attributes.list = metadata.list;
        attributes.paragraph = metadata.paragraph;
    } else {
        attributes.list = None;
        attributes.paragraph = None;
    }
    Ok(attributes)
}
