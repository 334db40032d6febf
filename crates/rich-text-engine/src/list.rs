//! List metadata attached to text runs.
//!
//! List items live in a [`ListArena`] and text runs refer to them by
//! [`ListId`]. Several runs (a list split across a style change, every line of
//! one list) may share one handle, so mutating an item through the arena is a
//! broadcast to every run holding it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::marker::{MarkerSequence, SequenceKind};

/// Successor chains longer than this compare equal once both sides are
/// still in step.
pub const MAX_SUCCESSOR_DEPTH: usize = 32;

/// Handle of a [`ListItem`] inside a [`ListArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(usize);

impl ListId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indentation {
    Indent,
    Outdent,
}

/// Result of [`ListArena::change_indent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentOutcome {
    Level(usize),
    /// Outdenting would drop below level 1; the caller must remove the list
    /// attribute from the affected text.
    Detach,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// 1-based nesting depth.
    pub indent_level: usize,
    /// One sequence per nesting depth, used cyclically. Never empty.
    tracks: Vec<MarkerSequence>,
    /// Item that continues this list after a style change.
    pub successor: Option<ListId>,
}

impl ListItem {
    /// A level-1 item. An empty `tracks` falls back to a single dot track.
    pub fn new(tracks: Vec<MarkerSequence>) -> Self {
        Self {
            indent_level: 1,
            tracks: non_empty_tracks(tracks),
            successor: None,
        }
    }

    pub fn tracks(&self) -> &[MarkerSequence] {
        &self.tracks
    }

    /// Replaces the tracks; an empty list falls back to a single dot track.
    pub fn set_tracks(&mut self, tracks: Vec<MarkerSequence>) {
        self.tracks = non_empty_tracks(tracks);
    }

    pub fn with_indent_level(mut self, level: usize) -> Self {
        self.indent_level = level.max(1);
        self
    }

    /// Track for the item's own level.
    pub fn track(&self) -> &MarkerSequence {
        self.track_for_level(self.indent_level)
    }

    pub fn track_for_level(&self, level: usize) -> &MarkerSequence {
        &self.tracks[(level.max(1) - 1) % self.tracks.len()]
    }
}

fn non_empty_tracks(tracks: Vec<MarkerSequence>) -> Vec<MarkerSequence> {
    if tracks.is_empty() {
        vec![MarkerSequence::new(SequenceKind::Dot)]
    } else {
        tracks
    }
}

/// Persisted shape of a list item and its successor chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedListItem {
    pub indent_level: usize,
    pub tracks: Vec<MarkerSequence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<Box<PersistedListItem>>,
}

/// Append-only storage for list items.
#[derive(Debug, Clone, Default)]
pub struct ListArena {
    items: Vec<ListItem>,
}

impl ListArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: ListItem) -> ListId {
        self.items.push(item);
        ListId(self.items.len() - 1)
    }

    pub fn get(&self, id: ListId) -> Option<&ListItem> {
        self.items.get(id.0)
    }

    /// Mutable access. Every text run holding `id` observes the change.
    pub fn get_mut(&mut self, id: ListId) -> Option<&mut ListItem> {
        self.items.get_mut(id.0)
    }

    pub fn item(&self, id: ListId) -> EditorResult<&ListItem> {
        self.get(id).ok_or(EditorError::UnknownList { id })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_successor(&mut self, id: ListId, successor: Option<ListId>) -> EditorResult<()> {
        if let Some(next) = successor {
            self.item(next)?;
        }
        let item = self.get_mut(id).ok_or(EditorError::UnknownList { id })?;
        item.successor = successor;
        Ok(())
    }

    /// Shifts the item's level in place for every run that shares it.
    pub fn change_indent(&mut self, id: ListId, mode: Indentation) -> EditorResult<IndentOutcome> {
        let item = self.get_mut(id).ok_or(EditorError::UnknownList { id })?;
        match mode {
            Indentation::Indent => {
                item.indent_level += 1;
                Ok(IndentOutcome::Level(item.indent_level))
            }
            Indentation::Outdent if item.indent_level <= 1 => Ok(IndentOutcome::Detach),
            Indentation::Outdent => {
                item.indent_level -= 1;
                Ok(IndentOutcome::Level(item.indent_level))
            }
        }
    }

    /// Structural equality of two items including their successor chains.
    pub fn items_equal(&self, a: ListId, b: ListId) -> bool {
        self.equal_within(a, b, MAX_SUCCESSOR_DEPTH)
    }

    fn equal_within(&self, a: ListId, b: ListId, depth: usize) -> bool {
        if a == b || depth == 0 {
            return true;
        }
        let (Some(left), Some(right)) = (self.get(a), self.get(b)) else {
            return false;
        };
        if left.indent_level != right.indent_level || left.tracks != right.tracks {
            return false;
        }
        match (left.successor, right.successor) {
            (None, None) => true,
            (Some(next_a), Some(next_b)) => self.equal_within(next_a, next_b, depth - 1),
            _ => false,
        }
    }

    pub fn export(&self, id: ListId) -> EditorResult<PersistedListItem> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(next) = current {
            if !seen.insert(next) {
                return Err(EditorError::CyclicList { id });
            }
            let item = self.item(next)?;
            chain.push(item);
            current = item.successor;
        }

        let mut persisted: Option<Box<PersistedListItem>> = None;
        for item in chain.into_iter().rev() {
            persisted = Some(Box::new(PersistedListItem {
                indent_level: item.indent_level,
                tracks: item.tracks.clone(),
                successor: persisted,
            }));
        }
        persisted
            .map(|boxed| *boxed)
            .ok_or(EditorError::UnknownList { id })
    }

    pub fn import(&mut self, persisted: &PersistedListItem) -> ListId {
        let successor = persisted
            .successor
            .as_deref()
            .map(|next| self.import(next));
        let tracks = persisted
            .tracks
            .iter()
            .map(|track| track.with_digit_group_size(track.digit_group_size))
            .collect();
        let mut item = ListItem::new(tracks).with_indent_level(persisted.indent_level);
        item.successor = successor;
        self.insert(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numeric_then_alpha() -> Vec<MarkerSequence> {
        vec![
            MarkerSequence::new(SequenceKind::Numeric),
            MarkerSequence::new(SequenceKind::LowerAlpha).parenthesized(),
        ]
    }

    #[test]
    fn tracks_cycle_with_indent_level() {
        let item = ListItem::new(numeric_then_alpha());
        assert_eq!(item.track().kind, SequenceKind::Numeric);
        assert_eq!(item.track_for_level(2).kind, SequenceKind::LowerAlpha);
        assert_eq!(item.track_for_level(3).kind, SequenceKind::Numeric);
        assert_eq!(item.track_for_level(0).kind, SequenceKind::Numeric);
    }

    #[test]
    fn empty_tracks_fall_back_to_dot() {
        let item = ListItem::new(Vec::new());
        assert_eq!(item.tracks(), [MarkerSequence::new(SequenceKind::Dot)]);
    }

    #[test]
    fn clearing_tracks_through_the_arena_keeps_a_dot_track() {
        let mut arena = ListArena::new();
        let id = arena.insert(ListItem::new(numeric_then_alpha()));
        if let Some(item) = arena.get_mut(id) {
            item.set_tracks(Vec::new());
        }
        let item = arena.item(id).unwrap();
        assert_eq!(item.tracks().len(), 1);
        assert_eq!(item.track_for_level(3).kind, SequenceKind::Dot);
    }

    #[test]
    fn indent_change_is_visible_through_every_holder() {
        let mut arena = ListArena::new();
        let id = arena.insert(ListItem::new(numeric_then_alpha()));
        let holders = [id, id, id];

        assert_eq!(
            arena.change_indent(id, Indentation::Indent),
            Ok(IndentOutcome::Level(2))
        );
        for holder in holders {
            assert_eq!(arena.get(holder).map(|item| item.indent_level), Some(2));
        }
    }

    #[test]
    fn outdent_below_one_requests_detach() {
        let mut arena = ListArena::new();
        let id = arena.insert(ListItem::new(numeric_then_alpha()).with_indent_level(2));
        assert_eq!(
            arena.change_indent(id, Indentation::Outdent),
            Ok(IndentOutcome::Level(1))
        );
        assert_eq!(
            arena.change_indent(id, Indentation::Outdent),
            Ok(IndentOutcome::Detach)
        );
        assert_eq!(arena.get(id).map(|item| item.indent_level), Some(1));
    }

    #[test]
    fn equality_is_structural_not_identity() {
        let mut arena = ListArena::new();
        let a = arena.insert(ListItem::new(numeric_then_alpha()));
        let b = arena.insert(ListItem::new(numeric_then_alpha()));
        let c = arena.insert(ListItem::new(numeric_then_alpha()).with_indent_level(2));
        assert!(arena.items_equal(a, b));
        assert!(!arena.items_equal(a, c));
    }

    #[test]
    fn equality_compares_successors() {
        let mut arena = ListArena::new();
        let tail_a = arena.insert(ListItem::new(numeric_then_alpha()));
        let tail_b = arena.insert(ListItem::new(vec![MarkerSequence::new(SequenceKind::Square)]));
        let a = arena.insert(ListItem::new(numeric_then_alpha()));
        let b = arena.insert(ListItem::new(numeric_then_alpha()));
        arena.set_successor(a, Some(tail_a)).unwrap();
        arena.set_successor(b, Some(tail_b)).unwrap();
        assert!(!arena.items_equal(a, b));

        arena.set_successor(b, None).unwrap();
        assert!(!arena.items_equal(a, b));
    }

    #[test]
    fn equality_terminates_on_cyclic_successors() {
        let mut arena = ListArena::new();
        let a = arena.insert(ListItem::new(numeric_then_alpha()));
        let b = arena.insert(ListItem::new(numeric_then_alpha()));
        arena.set_successor(a, Some(a)).unwrap();
        arena.set_successor(b, Some(b)).unwrap();
        assert!(arena.items_equal(a, b));
        assert_eq!(arena.export(a), Err(EditorError::CyclicList { id: a }));
    }

    #[test]
    fn unknown_successor_is_rejected() {
        let mut arena = ListArena::new();
        let a = arena.insert(ListItem::new(numeric_then_alpha()));
        let bogus = ListId(42);
        assert_eq!(
            arena.set_successor(a, Some(bogus)),
            Err(EditorError::UnknownList { id: bogus })
        );
    }

    #[test]
    fn export_and_import_preserve_structure() {
        let mut arena = ListArena::new();
        let tail = arena.insert(ListItem::new(vec![MarkerSequence::new(SequenceKind::Diamond)]));
        let head = arena.insert(ListItem::new(numeric_then_alpha()).with_indent_level(3));
        arena.set_successor(head, Some(tail)).unwrap();

        let persisted = arena.export(head).unwrap();
        assert_eq!(persisted.indent_level, 3);
        assert_eq!(persisted.tracks.len(), 2);
        assert_eq!(
            persisted.successor.as_ref().map(|next| next.tracks[0].kind),
            Some(SequenceKind::Diamond)
        );

        let mut other = ListArena::new();
        let imported = other.import(&persisted);
        assert_eq!(other.export(imported).unwrap(), persisted);
    }

    #[test]
    fn persisted_shape_uses_camel_case_keys() {
        let persisted = PersistedListItem {
            indent_level: 2,
            tracks: vec![MarkerSequence::new(SequenceKind::UpperRoman).parenthesized()],
            successor: Some(Box::new(PersistedListItem {
                indent_level: 1,
                tracks: vec![MarkerSequence::new(SequenceKind::Dot)],
                successor: None,
            })),
        };

        let encoded = toml::to_string(&persisted).unwrap();
        assert!(encoded.contains("indentLevel = 2"));
        assert!(encoded.contains("digitGroupSize = 1"));
        assert!(encoded.contains("kind = \"upperRoman\""));

        let decoded: PersistedListItem = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, persisted);
    }
}
