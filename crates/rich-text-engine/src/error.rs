use thiserror::Error;

use crate::list::ListId;
use crate::range::TextRange;

/// Errors surfaced to callers of the editing core.
///
/// Marker overflow never surfaces here: numeral conversions resolve to
/// sentinel strings instead. Exhausted undo/redo is reported as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("edit sequencing violated: {reason}")]
    Sequencing { reason: &'static str },

    #[error("range {range:?} does not fit a buffer of length {buffer_len}")]
    Range { range: TextRange, buffer_len: usize },

    #[error("list item {id:?} has a cyclic successor chain")]
    CyclicList { id: ListId },

    #[error("unknown list item {id:?}")]
    UnknownList { id: ListId },
}

pub type EditorResult<T> = Result<T, EditorError>;
