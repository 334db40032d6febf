//! Render-time list numbering.
//!
//! A layout pass drives a [`ListNumberer`] with `begin`, then `begin_run` for
//! every maximal list attribute run and `step` for each line fragment inside
//! it, and collects the marker draw instructions with `end`.

use std::collections::HashMap;

use crate::buffer::AttributedText;
use crate::line::is_line_terminator;
use crate::list::{ListArena, ListId};
use crate::marker::Marker;
use crate::range::TextRange;
use crate::settings::EditorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One laid-out visual line. A logical line that wraps produces several.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFragment {
    pub range: TextRange,
    pub rect: Rect,
}

impl LineFragment {
    /// One unwrapped fragment per logical line, stacked `line_height` apart.
    pub fn stack(buffer: &AttributedText, line_height: f64) -> Vec<Self> {
        buffer
            .line_ranges()
            .into_iter()
            .enumerate()
            .map(|(row, range)| Self {
                range,
                rect: Rect::new(0.0, row as f64 * line_height, 0.0, line_height),
            })
            .collect()
    }
}

/// A marker to draw in the indent spacer of a list line.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerInstruction {
    pub rect: Rect,
    pub marker: Marker,
    pub level: usize,
    /// 0-based ordinal within the level.
    pub index: usize,
    pub list: ListId,
}

#[derive(Debug, Clone)]
pub struct ListNumberer {
    counters: HashMap<usize, usize>,
    previous_level: usize,
    indent_unit_width: u32,
    top_inset: f64,
    instructions: Vec<MarkerInstruction>,
}

impl ListNumberer {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            counters: HashMap::new(),
            previous_level: 0,
            indent_unit_width: settings.indent_unit_width,
            top_inset: settings.top_inset,
            instructions: Vec::new(),
        }
    }

    /// Starts a render pass.
    pub fn begin(&mut self) {
        self.counters.clear();
        self.previous_level = 0;
        self.instructions.clear();
    }

    /// Starts a new list attribute run; numbering restarts for every level.
    pub fn begin_run(&mut self) {
        self.counters.clear();
    }

    /// Numbers `fragment`, returning the marker to draw for it if any.
    ///
    /// Fragments that do not start a logical line, and lines whose preceding
    /// terminator carries `skip_next_marker`, neither draw nor count.
    pub fn step(
        &mut self,
        fragment: &LineFragment,
        buffer: &AttributedText,
        lists: &ListArena,
    ) -> Option<&MarkerInstruction> {
        let location = fragment.range.location;
        if let Some(before) = location.checked_sub(1) {
            let starts_line = buffer.char_at(before).is_some_and(is_line_terminator);
            let skipped = buffer
                .attributes_at(before)
                .is_some_and(|attributes| attributes.skip_next_marker);
            if !starts_line || skipped {
                return None;
            }
        }

        let attributes = buffer.attributes_at(location)?;
        let list = attributes.list?;
        let paragraph = attributes.paragraph.unwrap_or_default();
        let level = paragraph.level(self.indent_unit_width);

        let counter = self.counters.entry(level).or_insert(0);
        let mut index = *counter;
        *counter += 1;
        if level > self.previous_level {
            index = 0;
            *counter = 1;
        }
        self.previous_level = level;

        if level == 0 {
            return None;
        }
        let Some(item) = lists.get(list) else {
            log::warn!("no list item for {list:?}; marker skipped");
            return None;
        };
        let marker = item.track_for_level(level).value(index);
        log::trace!("level {level} index {index} at {location}");

        self.instructions.push(MarkerInstruction {
            rect: Rect::new(
                fragment.rect.x,
                fragment.rect.y + self.top_inset,
                f64::from(paragraph.first_line_head_indent),
                fragment.rect.height,
            ),
            marker,
            level,
            index,
            list,
        });
        self.instructions.last()
    }

    /// Ends the pass and hands over its instructions.
    pub fn end(&mut self) -> Vec<MarkerInstruction> {
        std::mem::take(&mut self.instructions)
    }
}

/// Runs a complete numbering pass over `fragments`, which must be in
/// document order.
pub fn number_fragments(
    buffer: &AttributedText,
    lists: &ListArena,
    settings: &EditorSettings,
    fragments: &[LineFragment],
) -> Vec<MarkerInstruction> {
    let mut numberer = ListNumberer::new(settings);
    numberer.begin();
    for (run, _) in buffer.list_runs() {
        numberer.begin_run();
        for fragment in fragments.iter().filter(|f| run.contains(f.range.location)) {
            numberer.step(fragment, buffer, lists);
        }
    }
    let instructions = numberer.end();
    log::debug!("numbering pass produced {} markers", instructions.len());
    instructions
}
