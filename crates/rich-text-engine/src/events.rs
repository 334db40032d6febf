use crate::numbering::MarkerInstruction;
use crate::range::TextRange;

/// Notifications for the presentation layer, queued on the document and
/// drained with [`crate::Document::take_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// List metadata of the lines in `range` changed; typing attributes and
    /// placeholders have already been synced.
    ListLinesChanged { range: TextRange },
    /// The live buffer was replaced wholesale (undo, redo, reset).
    TextChanged,
    MarkersRendered(Vec<MarkerInstruction>),
}
