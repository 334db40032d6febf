use std::borrow::Cow;

use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::attributes::Attributes;
use crate::error::EditorResult;
use crate::list::ListId;
use crate::range::TextRange;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Run {
    len: usize,
    attributes: Attributes,
}

/// Text stored in an `xi_rope::Rope` with attribute runs on top.
///
/// Offsets and lengths are counted in `char`s. Runs always cover the whole
/// text, are never empty, and adjacent runs never carry equal attributes.
/// Cloning shares the rope, which keeps history snapshots cheap.
#[derive(Clone)]
pub struct AttributedText {
    text: Rope,
    runs: Vec<Run>,
}

impl AttributedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: &str) -> Self {
        Self::styled(text, &Attributes::default())
    }

    pub fn styled(text: &str, attributes: &Attributes) -> Self {
        let len = text.chars().count();
        let runs = if len == 0 {
            Vec::new()
        } else {
            vec![Run {
                len,
                attributes: attributes.clone(),
            }]
        };
        Self {
            text: Rope::from(text),
            runs,
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn full_range(&self) -> TextRange {
        TextRange::new(0, self.len() as isize)
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub(crate) fn as_cow(&self) -> Cow<'_, str> {
        self.text.slice_to_cow(..)
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.as_cow().chars().nth(offset)
    }

    pub fn slice_text(&self, range: TextRange) -> EditorResult<String> {
        let span = range.validate(self.len())?;
        let start = self.byte_offset(span.start);
        let end = self.byte_offset(span.end);
        Ok(self.text.slice_to_cow(start..end).into_owned())
    }

    pub fn substring(&self, range: TextRange) -> EditorResult<AttributedText> {
        let span = range.validate(self.len())?;
        let text = self.slice_text(range)?;
        let runs = self
            .runs_in(span.clone().into())
            .map(|(range, attributes)| Run {
                len: range.len(),
                attributes: attributes.clone(),
            })
            .collect();
        let mut result = Self {
            text: Rope::from(text),
            runs,
        };
        result.merge_runs();
        Ok(result)
    }

    pub fn attributes_at(&self, offset: usize) -> Option<&Attributes> {
        let mut start = 0;
        for run in &self.runs {
            if offset < start + run.len {
                return Some(&run.attributes);
            }
            start += run.len;
        }
        None
    }

    /// Attributes that are uniformly active over the whole range, or `None`
    /// for an empty range.
    pub fn active_attributes(&self, range: TextRange) -> Option<Attributes> {
        let range = range.clamped(self.full_range());
        self.runs_in(range)
            .map(|(_, attributes)| attributes.clone())
            .reduce(|shared, next| shared.intersect(&next))
    }

    /// Runs overlapping `range`, clipped to it.
    pub fn runs_in(&self, range: TextRange) -> impl Iterator<Item = (TextRange, &Attributes)> + '_ {
        let range = range.normalized();
        let mut start = 0;
        self.runs.iter().filter_map(move |run| {
            let run_range = TextRange::new(start, run.len as isize);
            start += run.len;
            let clipped = run_range.clamped(range);
            (!clipped.is_empty()).then_some((clipped, &run.attributes))
        })
    }

    /// Maximal runs sharing one list attribute, in document order.
    pub fn list_runs(&self) -> Vec<(TextRange, ListId)> {
        let mut runs: Vec<(TextRange, ListId)> = Vec::new();
        for (range, attributes) in self.runs_in(self.full_range()) {
            let Some(list) = attributes.list else {
                continue;
            };
            match runs.last_mut() {
                Some((previous, id)) if *id == list && previous.end_location() == range.location => {
                    previous.length += range.length;
                }
                _ => runs.push((range, list)),
            }
        }
        runs
    }

    pub fn replace(&mut self, range: TextRange, text: &str, attributes: &Attributes) -> EditorResult<()> {
        let span = range.validate(self.len())?;
        if span.is_empty() && text.is_empty() {
            return Ok(());
        }

        let bytes = self.byte_offset(span.start)..self.byte_offset(span.end);
        let mut builder = Builder::new(self.text.len());
        if text.is_empty() {
            builder.delete(bytes);
        } else {
            builder.replace(bytes, Rope::from(text));
        }
        self.text = builder.build().apply(&self.text);

        let first = self.split_at(span.start);
        let last = self.split_at(span.end);
        let inserted = text.chars().count();
        let replacement = (inserted > 0).then(|| Run {
            len: inserted,
            attributes: attributes.clone(),
        });
        self.runs.splice(first..last, replacement);
        self.merge_runs();
        Ok(())
    }

    pub fn insert(&mut self, at: usize, text: &str, attributes: &Attributes) -> EditorResult<()> {
        self.replace(TextRange::caret(at), text, attributes)
    }

    pub fn remove(&mut self, range: TextRange) -> EditorResult<()> {
        self.replace(range, "", &Attributes::default())
    }

    /// Applies `update` to the attributes of every character in `range`.
    pub fn update_attributes(
        &mut self,
        range: TextRange,
        mut update: impl FnMut(&mut Attributes),
    ) -> EditorResult<()> {
        let span = range.validate(self.len())?;
        if span.is_empty() {
            return Ok(());
        }
        let first = self.split_at(span.start);
        let last = self.split_at(span.end);
        for run in &mut self.runs[first..last] {
            update(&mut run.attributes);
        }
        self.merge_runs();
        Ok(())
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        let text = self.as_cow();
        text.char_indices()
            .nth(char_offset)
            .map_or(text.len(), |(byte, _)| byte)
    }

    /// Ensures a run boundary at `offset` and returns the index of the run
    /// starting there.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for index in 0..self.runs.len() {
            let len = self.runs[index].len;
            if offset == start {
                return index;
            }
            if offset < start + len {
                let head = offset - start;
                let tail = Run {
                    len: len - head,
                    attributes: self.runs[index].attributes.clone(),
                };
                self.runs[index].len = head;
                self.runs.insert(index + 1, tail);
                return index + 1;
            }
            start += len;
        }
        self.runs.len()
    }

    fn merge_runs(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(previous) if previous.attributes == run.attributes => previous.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

impl Default for AttributedText {
    fn default() -> Self {
        Self {
            text: Rope::from(""),
            runs: Vec::new(),
        }
    }
}

impl PartialEq for AttributedText {
    fn eq(&self, other: &Self) -> bool {
        // Rope has no structural equality; compare contents.
        self.runs == other.runs && self.as_cow() == other.as_cow()
    }
}

impl Eq for AttributedText {}

impl std::fmt::Debug for AttributedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributedText")
            .field("text", &self.as_cow())
            .field("runs", &self.runs)
            .finish()
    }
}
