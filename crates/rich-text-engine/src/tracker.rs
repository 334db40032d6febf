//! Two-phase edit tracking.
//!
//! An edit is first proposed against the buffer it will change, then applied
//! once the caller has produced the new buffer. Applying classifies the edit,
//! works out which lines it touched and records it in the undo history.

use crate::buffer::AttributedText;
use crate::error::{EditorError, EditorResult};
use crate::history::{EditKind, History, Recorded};
use crate::line::{DocumentLine, ModifiedLine};
use crate::range::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Insertion,
    Deletion,
    Replacement,
}

impl ChangeType {
    /// An empty change range is an insertion, even of empty text; otherwise
    /// empty text is a deletion and anything else a replacement.
    pub fn classify(change_range: TextRange, new_text: &str) -> Self {
        if change_range.is_empty() {
            Self::Insertion
        } else if new_text.is_empty() {
            Self::Deletion
        } else {
            Self::Replacement
        }
    }

    fn edit_kind(self) -> EditKind {
        match self {
            Self::Insertion => EditKind::Insertion,
            Self::Deletion => EditKind::Deletion,
            Self::Replacement => EditKind::Replacement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Proposed,
}

#[derive(Debug, Clone)]
struct PendingEdit {
    old_text: AttributedText,
    new_text: String,
    change_range: TextRange,
}

/// Outcome of [`ChangeTracker::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub change_type: ChangeType,
    pub change_range: TextRange,
    pub lines: Vec<ModifiedLine>,
    /// False for a zero-width insertion, which leaves history untouched.
    pub recorded: bool,
}

impl AppliedChange {
    pub fn is_noop(&self) -> bool {
        !self.recorded
    }
}

#[derive(Debug, Clone)]
pub struct ChangeTracker {
    pending: Option<PendingEdit>,
    history: History,
}

impl ChangeTracker {
    pub fn new(initial: &AttributedText, history_limit: Option<usize>) -> Self {
        Self {
            pending: None,
            history: History::new(initial.clone(), history_limit),
        }
    }

    pub fn state(&self) -> EditState {
        if self.pending.is_some() {
            EditState::Proposed
        } else {
            EditState::Idle
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Records the pre-image of an edit. The buffer is not touched.
    pub fn propose(
        &mut self,
        old_text: &AttributedText,
        new_text: &str,
        change_range: TextRange,
    ) -> EditorResult<()> {
        if self.pending.is_some() {
            return Err(EditorError::Sequencing {
                reason: "an edit is already proposed",
            });
        }
        let span = change_range.validate(old_text.len())?;
        self.pending = Some(PendingEdit {
            old_text: old_text.clone(),
            new_text: new_text.to_string(),
            change_range: span.into(),
        });
        Ok(())
    }

    /// Drops the pending edit, returning whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Completes the pending edit against the buffer it produced.
    ///
    /// The proposal is consumed even when line extraction fails, so a
    /// mismatched buffer never leaves the tracker stuck in `Proposed`.
    pub fn apply(&mut self, new_buffer: &AttributedText) -> EditorResult<AppliedChange> {
        let Some(pending) = self.pending.take() else {
            return Err(EditorError::Sequencing {
                reason: "no edit has been proposed",
            });
        };

        let change_type = ChangeType::classify(pending.change_range, &pending.new_text);
        log::debug!(
            "{change_type:?} of {:?} at {:?}",
            pending.new_text,
            pending.change_range
        );
        let lines = changed_lines(
            change_type,
            &pending.old_text,
            new_buffer,
            pending.change_range,
            &pending.new_text,
        )?;

        let noop = change_type == ChangeType::Insertion && pending.new_text.is_empty();
        if !noop {
            let recorded = self.history.record(
                change_type.edit_kind(),
                &pending.new_text,
                new_buffer.clone(),
            );
            if recorded == Recorded::Coalesced {
                log::trace!("coalesced into previous undo step");
            }
        }

        Ok(AppliedChange {
            change_type,
            change_range: pending.change_range,
            lines,
            recorded: !noop,
        })
    }

    /// Records an attribute-only change as its own undo step.
    pub fn record_style_change(&mut self, buffer: &AttributedText) {
        self.history.record(EditKind::Style, "", buffer.clone());
    }

    /// Folds follow-up changes (placeholder repair) into the last step.
    pub fn amend(&mut self, buffer: &AttributedText) {
        self.history.amend_current(buffer.clone());
    }

    pub fn undo(&mut self) -> Option<AttributedText> {
        self.history.undo().cloned()
    }

    pub fn redo(&mut self) -> Option<AttributedText> {
        self.history.redo().cloned()
    }
}

/// Pairs the lines an edit produced with the lines it came from.
pub fn changed_lines(
    change_type: ChangeType,
    old_text: &AttributedText,
    new_text: &AttributedText,
    change_range: TextRange,
    inserted: &str,
) -> EditorResult<Vec<ModifiedLine>> {
    let inserted_span = TextRange::new(change_range.location, inserted.chars().count() as isize);
    match change_type {
        ChangeType::Insertion => {
            let old_line = old_text.current_line(change_range.location)?;
            Ok(new_text
                .lines_overlapping(inserted_span)?
                .into_iter()
                .map(|line| ModifiedLine::new(line, old_line.clone()))
                .collect())
        }
        ChangeType::Deletion => {
            let new_line = new_text.current_line(change_range.location)?;
            Ok(old_text
                .lines_overlapping(change_range)?
                .into_iter()
                .map(|old_line| ModifiedLine::new(new_line.clone(), old_line))
                .collect())
        }
        ChangeType::Replacement => {
            let old_lines = old_text.lines_overlapping(change_range)?;
            let merged = match (old_lines.first(), old_lines.last()) {
                (Some(first), Some(last)) => {
                    TextRange::from_bounds(first.range.location, last.range.end_location())
                }
                _ => TextRange::caret(change_range.location),
            };
            let old_line = DocumentLine::new(old_text.substring(merged)?, merged);
            Ok(new_text
                .lines_overlapping(inserted_span)?
                .into_iter()
                .map(|line| ModifiedLine::new(line, old_line.clone()))
                .collect())
        }
    }
}
