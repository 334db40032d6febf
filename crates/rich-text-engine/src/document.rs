use crate::attributes::{Attributes, ParagraphStyle, TextStyle};
use crate::buffer::AttributedText;
use crate::error::EditorResult;
use crate::events::EditorEvent;
use crate::formatting;
use crate::line::{DocumentLine, is_line_terminator};
use crate::list::{IndentOutcome, Indentation, ListArena, ListId, ListItem};
use crate::marker::MarkerSequence;
use crate::numbering::{self, LineFragment, MarkerInstruction};
use crate::range::TextRange;
use crate::settings::EditorSettings;
use crate::tracker::{AppliedChange, ChangeTracker};

/// What [`Document::replace_text`] did with an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied(AppliedChange),
    /// The input was turned into a list toggle; the text was left alone.
    Intercepted { range: TextRange },
}

/// A rich-text document: the buffer plus everything needed to edit it.
///
/// Every text change goes through [`Document::replace_text`], which runs the
/// propose/apply cycle of the [`ChangeTracker`] and then keeps list lines,
/// placeholders and typing attributes consistent. Outbound notifications
/// queue up until drained with [`Document::take_events`].
#[derive(Debug, Clone)]
pub struct Document {
    buffer: AttributedText,
    lists: ListArena,
    tracker: ChangeTracker,
    /// Selection or caret, in chars.
    selection: TextRange,
    typing_attributes: Attributes,
    settings: EditorSettings,
    events: Vec<EditorEvent>,
    /// Set when the user removed a list on purpose, so the next edit does
    /// not bring it back with a placeholder.
    list_intentional_delete: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Document {
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_text(AttributedText::new(), settings)
    }

    pub fn with_text(buffer: AttributedText, settings: EditorSettings) -> Self {
        let len = buffer.len();
        Self {
            tracker: ChangeTracker::new(&buffer, settings.history_limit),
            buffer,
            lists: ListArena::new(),
            selection: TextRange::caret(len),
            typing_attributes: Attributes::default(),
            settings,
            events: Vec::new(),
            list_intentional_delete: false,
        }
    }

    /// Create a document from raw UTF-8 bytes, caret at the end.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::with_text(
            AttributedText::plain(text),
            EditorSettings::default(),
        ))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.text().into_bytes()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &AttributedText {
        &self.buffer
    }

    pub fn lists(&self) -> &ListArena {
        &self.lists
    }

    pub fn lists_mut(&mut self) -> &mut ListArena {
        &mut self.lists
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    pub fn typing_attributes(&self) -> &Attributes {
        &self.typing_attributes
    }

    pub fn list_intentional_delete(&self) -> bool {
        self.list_intentional_delete
    }

    pub fn can_undo(&self) -> bool {
        self.tracker.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.tracker.can_redo()
    }

    pub fn current_line(&self, offset: usize) -> EditorResult<DocumentLine> {
        self.buffer.current_line(offset)
    }

    pub fn lines_overlapping(&self, range: TextRange) -> EditorResult<Vec<DocumentLine>> {
        self.buffer.lines_overlapping(range)
    }

    /// Drains queued notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Moves the selection and syncs typing attributes to the caret line.
    pub fn set_selection(&mut self, selection: TextRange) -> EditorResult<()> {
        let span = selection.validate(self.buffer.len())?;
        self.selection = span.into();
        self.sync_typing_attributes()
    }

    /// Replaces the whole text and starts a fresh history.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = AttributedText::plain(text);
        self.tracker = ChangeTracker::new(&self.buffer, self.settings.history_limit);
        self.selection = TextRange::caret(self.buffer.len());
        self.typing_attributes = Attributes::default();
        self.list_intentional_delete = false;
        self.events.push(EditorEvent::TextChanged);
        self.push_history_event();
    }

    /// Replaces `range` with `text` typed using the current typing attributes.
    ///
    /// ## Edit Steps
    ///
    /// 1. **Interception**: return on a placeholder-only list line, or a
    ///    backspace on such a line or at the start of a list line, removes the
    ///    list from that line instead of editing text.
    /// 2. **Propose**: the tracker records the pre-edit buffer.
    /// 3. **Mutate**: the buffer is edited and the caret moves past `text`.
    /// 4. **Apply**: the tracker classifies the edit, pairs new lines with old
    ///    ones and records history.
    /// 5. **Reconcile**: list attributes and placeholders are repaired on the
    ///    changed lines, and the history slot is amended to match.
    pub fn replace_text(&mut self, range: TextRange, text: &str) -> EditorResult<EditOutcome> {
        if let Some(line) = self.intercepted_line(range, text)? {
            log::debug!("input {text:?} at {range:?} removes list from {:?}", line.range);
            self.remove_list_from_lines(line.range)?;
            return Ok(EditOutcome::Intercepted { range: line.range });
        }

        self.tracker.propose(&self.buffer, text, range)?;
        let span = range.normalized();
        if let Err(error) = self.buffer.replace(span, text, &self.typing_attributes) {
            self.tracker.cancel();
            return Err(error);
        }
        let applied = self.tracker.apply(&self.buffer)?;
        let caret = span.location + text.chars().count();

        let reconciled = formatting::reconcile_list_lines(
            &mut self.buffer,
            &applied.lines,
            caret,
            self.list_intentional_delete,
            self.settings.placeholder,
        )?;
        if reconciled.modified && applied.recorded {
            self.tracker.amend(&self.buffer);
        }
        self.list_intentional_delete = false;
        self.selection = TextRange::caret(reconciled.caret);
        self.sync_typing_attributes()?;

        if let Some(range) = reconciled.range {
            self.events.push(EditorEvent::ListLinesChanged { range });
        }
        if applied.recorded {
            self.push_history_event();
        }
        Ok(EditOutcome::Applied(applied))
    }

    pub fn insert_text(&mut self, at: usize, text: &str) -> EditorResult<EditOutcome> {
        self.replace_text(TextRange::caret(at), text)
    }

    /// Replaces the current selection, as typing does.
    pub fn type_text(&mut self, text: &str) -> EditorResult<EditOutcome> {
        self.replace_text(self.selection, text)
    }

    /// Deletes the character before the caret, or the selection.
    pub fn backspace(&mut self) -> EditorResult<Option<EditOutcome>> {
        let selection = self.selection.normalized();
        let range = if selection.is_empty() {
            match selection.location.checked_sub(1) {
                Some(start) => TextRange::new(start, 1),
                None => return Ok(None),
            }
        } else {
            selection
        };
        self.replace_text(range, "").map(Some)
    }

    /// Toggles `item` on the whole lines covered by `range`.
    ///
    /// If the lines already carry a structurally equal list it is removed,
    /// otherwise `item` is applied at level 1. Applying to an empty line
    /// first inserts a placeholder, so the returned range is never empty in
    /// that case.
    pub fn toggle_list(&mut self, item: ListId, range: TextRange) -> EditorResult<TextRange> {
        self.lists.item(item)?;
        let lines = formatting::line_span(&self.buffer, range)?;

        if formatting::has_list(&self.buffer, &self.lists, item, lines) {
            return self.remove_list_from_lines(lines);
        }

        let lines = if lines.is_empty() {
            let attributes =
                formatting::list_attributes(item, 1, self.settings.indent_unit_width);
            let placeholder = self.settings.placeholder.to_string();
            self.buffer.insert(lines.location, &placeholder, &attributes)?;
            if self.selection.is_empty() && self.selection.location >= lines.location {
                self.selection = self.selection.shifted(1);
            }
            lines.first_character()
        } else {
            formatting::apply_list(&mut self.buffer, item, lines, self.settings.indent_unit_width)?;
            lines
        };
        self.list_intentional_delete = false;
        log::debug!("list {item:?} applied to {lines:?}");
        self.finish_style_change(lines)?;
        Ok(lines)
    }

    /// Toggles a fresh level-1 list with `tracks` on the lines of `range`.
    pub fn style_list(
        &mut self,
        tracks: Vec<MarkerSequence>,
        range: TextRange,
    ) -> EditorResult<TextRange> {
        let item = self.lists.insert(ListItem::new(tracks));
        self.toggle_list(item, range)
    }

    /// Indents or outdents every list line touched by `range`.
    pub fn indent_lines(&mut self, range: TextRange, mode: Indentation) -> EditorResult<()> {
        let lines = formatting::line_span(&self.buffer, range)?;
        let touched =
            formatting::indent_lines(&mut self.buffer, lines, mode, self.settings.indent_unit_width)?;
        if touched == 0 {
            return Ok(());
        }
        let caret = self.selection.location.min(self.buffer.len());
        let lines_now = self.buffer.lines_overlapping(lines.clamped_to_len(self.buffer.len()))?;
        let caret = formatting::strip_placeholders(
            &mut self.buffer,
            &lines_now,
            caret,
            self.settings.placeholder,
        )?;
        self.selection = TextRange::caret(caret);
        self.finish_style_change(lines.clamped_to_len(self.buffer.len()))
    }

    /// Changes the level of `list` itself, which every line holding it sees.
    /// Outdenting below level 1 removes the list from all of its lines.
    pub fn change_list_indent(&mut self, list: ListId, mode: Indentation) -> EditorResult<IndentOutcome> {
        let outcome = self.lists.change_indent(list, mode)?;
        let runs: Vec<TextRange> = self
            .buffer
            .list_runs()
            .into_iter()
            .filter_map(|(range, id)| (id == list).then_some(range))
            .collect();
        let unit = self.settings.indent_unit_width;
        for run in &runs {
            match outcome {
                IndentOutcome::Detach => formatting::remove_list(&mut self.buffer, *run)?,
                IndentOutcome::Level(_) => self.buffer.update_attributes(*run, |attributes| {
                    if let Some(paragraph) = attributes.paragraph {
                        let level = match mode {
                            Indentation::Indent => paragraph.level(unit) + 1,
                            Indentation::Outdent => paragraph.level(unit).saturating_sub(1).max(1),
                        };
                        attributes.paragraph = Some(ParagraphStyle::for_level(level, unit));
                    }
                })?,
            }
        }
        if let Some(span) = runs.iter().copied().reduce(|a, b| {
            TextRange::from_bounds(a.location, b.end_location())
        }) {
            self.finish_style_change(span)?;
        }
        Ok(outcome)
    }

    /// Toggles an inline style on `range`, or on the typing attributes when
    /// `range` is empty.
    pub fn toggle_style(&mut self, style: TextStyle, range: TextRange) -> EditorResult<()> {
        let span = range.validate(self.buffer.len())?;
        if span.is_empty() {
            if !self.typing_attributes.styles.remove(&style) {
                self.typing_attributes.styles.insert(style);
            }
            return Ok(());
        }
        let range: TextRange = span.into();
        let present = self
            .buffer
            .active_attributes(range)
            .is_some_and(|active| active.styles.contains(&style));
        self.buffer.update_attributes(range, |attributes| {
            if present {
                attributes.styles.remove(&style);
            } else {
                attributes.styles.insert(style);
            }
        })?;
        self.tracker.record_style_change(&self.buffer);
        self.push_history_event();
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        match self.tracker.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.tracker.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Numbers the list lines among `fragments` and queues the result.
    pub fn render_markers(&mut self, fragments: &[LineFragment]) -> Vec<MarkerInstruction> {
        let instructions =
            numbering::number_fragments(&self.buffer, &self.lists, &self.settings, fragments);
        self.events
            .push(EditorEvent::MarkersRendered(instructions.clone()));
        instructions
    }

    /// The line an input would turn into a list toggle, if any.
    fn intercepted_line(&self, range: TextRange, text: &str) -> EditorResult<Option<DocumentLine>> {
        let span = range.validate(self.buffer.len())?;
        let placeholder = self.settings.placeholder;

        let is_return = span.is_empty()
            && text.chars().count() == 1
            && text.chars().all(is_line_terminator);
        if is_return {
            let line = self.buffer.current_line(span.start)?;
            return Ok(formatting::is_empty_list_line(&line, placeholder).then_some(line));
        }

        let is_backspace = text.is_empty() && span.len() == 1;
        if is_backspace {
            let line = self.buffer.current_line(span.end)?;
            let at_list_start = span.end == line.range.location && line.resolve().is_list_line;
            if at_list_start || formatting::is_empty_list_line(&line, placeholder) {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn remove_list_from_lines(&mut self, lines: TextRange) -> EditorResult<TextRange> {
        formatting::remove_list(&mut self.buffer, lines)?;
        self.list_intentional_delete = true;

        let touched = self.buffer.lines_overlapping(lines)?;
        let before = self.buffer.len();
        let caret = self.selection.location.min(before);
        let caret = formatting::strip_placeholders(
            &mut self.buffer,
            &touched,
            caret,
            self.settings.placeholder,
        )?;
        let removed = before - self.buffer.len();
        self.selection = TextRange::caret(caret);
        let lines = TextRange::new(lines.location, lines.length - removed as isize);
        log::debug!("list removed from {lines:?}");
        self.finish_style_change(lines)?;
        Ok(lines)
    }

    fn finish_style_change(&mut self, range: TextRange) -> EditorResult<()> {
        self.tracker.record_style_change(&self.buffer);
        self.sync_typing_attributes()?;
        self.events.push(EditorEvent::ListLinesChanged { range });
        self.push_history_event();
        Ok(())
    }

    fn restore(&mut self, snapshot: AttributedText) {
        self.buffer = snapshot;
        self.selection = self.selection.clamped_to_len(self.buffer.len());
        if let Err(error) = self.sync_typing_attributes() {
            log::warn!("typing attributes not synced after history move: {error}");
        }
        self.events.push(EditorEvent::TextChanged);
        self.push_history_event();
    }

    fn sync_typing_attributes(&mut self) -> EditorResult<()> {
        let caret = self.selection.location.min(self.buffer.len());
        self.typing_attributes =
            formatting::typing_attributes_at(&self.buffer, caret, &self.typing_attributes)?;
        Ok(())
    }

    fn push_history_event(&mut self) {
        self.events.push(EditorEvent::HistoryChanged {
            can_undo: self.tracker.can_undo(),
            can_redo: self.tracker.can_redo(),
        });
    }
}
