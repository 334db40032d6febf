pub mod attributes;
pub mod buffer;
pub mod document;
pub mod error;
pub mod events;
pub mod formatting;
pub mod history;
pub mod line;
pub mod list;
pub mod marker;
pub mod numbering;
pub mod numeral;
pub mod range;
pub mod settings;
pub mod tracker;

// Re-export key types for easier usage
pub use attributes::{Attributes, ParagraphStyle, TextStyle};
pub use buffer::AttributedText;
pub use document::{Document, EditOutcome};
pub use error::{EditorError, EditorResult};
pub use events::EditorEvent;
pub use history::{EditKind, should_coalesce};
pub use line::{DocumentLine, LineMetadata, ModifiedLine};
pub use list::{IndentOutcome, Indentation, ListArena, ListId, ListItem, PersistedListItem};
pub use marker::{Marker, MarkerImage, MarkerSequence, SequenceKind};
pub use numbering::{LineFragment, ListNumberer, MarkerInstruction, Rect};
pub use range::TextRange;
pub use settings::EditorSettings;
pub use tracker::{AppliedChange, ChangeTracker, ChangeType, EditState};
