//! Linear undo/redo over full buffer snapshots.

use crate::buffer::AttributedText;
use crate::line::is_line_terminator;

/// What produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Initial,
    Insertion,
    Deletion,
    Replacement,
    Style,
}

/// Text that always opens a new undo step so words and lines can be undone
/// one at a time.
pub fn is_boundary_text(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c == ' ' || is_line_terminator(c),
        _ => false,
    }
}

/// Whether an edit of `kind` inserting `text` folds into the previous slot.
///
/// Runs of insertions coalesce until a space or line terminator is typed;
/// runs of deletions always coalesce. Style changes, replacements and the
/// first edit after an undo or redo never do.
pub fn should_coalesce(previous: Option<EditKind>, kind: EditKind, text: &str) -> bool {
    match (previous, kind) {
        (Some(EditKind::Insertion), EditKind::Insertion) => !is_boundary_text(text),
        (Some(EditKind::Deletion), EditKind::Deletion) => true,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub snapshot: AttributedText,
    pub kind: EditKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Pushed,
    Coalesced,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    pointer: usize,
    /// Kind of the last recorded edit; cleared by undo and redo.
    last_kind: Option<EditKind>,
    limit: Option<usize>,
}

impl History {
    pub fn new(initial: AttributedText, limit: Option<usize>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                snapshot: initial,
                kind: EditKind::Initial,
            }],
            pointer: 0,
            last_kind: Some(EditKind::Initial),
            limit: limit.map(|limit| limit.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current(&self) -> &AttributedText {
        &self.entries[self.pointer].snapshot
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// Records `snapshot` as the state after an edit, discarding any redo
    /// entries first.
    pub fn record(&mut self, kind: EditKind, text: &str, snapshot: AttributedText) -> Recorded {
        let discarded = self.entries.len() - self.pointer - 1;
        if discarded > 0 {
            log::debug!("discarding {discarded} redo entries");
            self.entries.truncate(self.pointer + 1);
        }

        let previous = self.last_kind.replace(kind);
        if should_coalesce(previous, kind, text) {
            self.entries[self.pointer].snapshot = snapshot;
            log::trace!("coalesced {kind:?} into history slot {}", self.pointer);
            return Recorded::Coalesced;
        }

        self.entries.push(HistoryEntry { snapshot, kind });
        if let Some(limit) = self.limit {
            let overflow = self.entries.len().saturating_sub(limit);
            self.entries.drain(..overflow);
        }
        self.pointer = self.entries.len() - 1;
        log::trace!("pushed {kind:?} as history slot {}", self.pointer);
        Recorded::Pushed
    }

    /// Overwrites the snapshot under the pointer, for follow-up changes that
    /// belong to the edit just recorded.
    pub fn amend_current(&mut self, snapshot: AttributedText) {
        self.entries[self.pointer].snapshot = snapshot;
    }

    pub fn undo(&mut self) -> Option<&AttributedText> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        self.last_kind = None;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&AttributedText> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        self.last_kind = None;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(EditKind::Insertion), EditKind::Insertion, "a", true)]
    #[case(Some(EditKind::Insertion), EditKind::Insertion, " ", false)]
    #[case(Some(EditKind::Insertion), EditKind::Insertion, "\n", false)]
    #[case(Some(EditKind::Insertion), EditKind::Insertion, "ab", true)]
    #[case(Some(EditKind::Insertion), EditKind::Deletion, "", false)]
    #[case(Some(EditKind::Deletion), EditKind::Deletion, "", true)]
    #[case(Some(EditKind::Deletion), EditKind::Insertion, "a", false)]
    #[case(Some(EditKind::Replacement), EditKind::Replacement, "x", false)]
    #[case(Some(EditKind::Style), EditKind::Style, "", false)]
    #[case(Some(EditKind::Style), EditKind::Insertion, "a", false)]
    #[case(Some(EditKind::Initial), EditKind::Insertion, "a", false)]
    #[case(None, EditKind::Insertion, "a", false)]
    fn coalescing_matrix(
        #[case] previous: Option<EditKind>,
        #[case] kind: EditKind,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(should_coalesce(previous, kind, text), expected);
    }

    fn snapshot(text: &str) -> AttributedText {
        AttributedText::plain(text)
    }

    #[test]
    fn undo_and_redo_stop_at_the_ends() {
        let mut history = History::new(snapshot(""), None);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.record(EditKind::Insertion, "a", snapshot("a"));
        assert_eq!(history.undo().map(AttributedText::text), Some(String::new()));
        assert!(history.undo().is_none());
        assert_eq!(history.redo().map(AttributedText::text), Some("a".to_string()));
        assert!(history.redo().is_none());
    }

    #[test]
    fn new_edit_discards_redo_entries() {
        let mut history = History::new(snapshot(""), None);
        history.record(EditKind::Insertion, "a", snapshot("a"));
        history.record(EditKind::Style, "", snapshot("a"));
        history.undo();
        assert!(history.can_redo());

        history.record(EditKind::Deletion, "", snapshot(""));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[2].kind, EditKind::Deletion);
    }

    #[test]
    fn first_edit_after_undo_opens_a_new_slot() {
        let mut history = History::new(snapshot(""), None);
        history.record(EditKind::Insertion, "a", snapshot("a"));
        history.record(EditKind::Insertion, " ", snapshot("a "));
        history.undo();

        assert_eq!(history.record(EditKind::Insertion, "b", snapshot("ab")), Recorded::Pushed);
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo().map(AttributedText::text), Some("a".to_string()));
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut history = History::new(snapshot(""), Some(2));
        history.record(EditKind::Style, "", snapshot("1"));
        history.record(EditKind::Style, "", snapshot("2"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pointer(), 1);
        assert_eq!(history.undo().map(AttributedText::text), Some("1".to_string()));
        assert!(!history.can_undo());
    }
}
