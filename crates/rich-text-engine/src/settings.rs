use serde::{Deserialize, Serialize};

pub const DEFAULT_INDENT_UNIT_WIDTH: u32 = 25;

/// Zero-width space standing in for the content of an empty list line.
pub const DEFAULT_PLACEHOLDER: char = '\u{200B}';

/// Engine constants a host may tune.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EditorSettings {
    /// Points of indentation per list nesting level.
    pub indent_unit_width: u32,
    pub placeholder: char,
    /// Maximum number of undo snapshots kept, unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,
    /// Vertical offset applied to marker rectangles.
    pub top_inset: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            indent_unit_width: DEFAULT_INDENT_UNIT_WIDTH,
            placeholder: DEFAULT_PLACEHOLDER,
            history_limit: None,
            top_inset: 0.0,
        }
    }
}
