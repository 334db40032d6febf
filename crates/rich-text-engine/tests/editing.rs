use pretty_assertions::assert_eq;
use rich_text_engine::{
    ChangeTracker, ChangeType, Document, EditOutcome, EditorError, EditorEvent, Indentation,
    LineFragment, MarkerSequence, SequenceKind, TextRange,
};

fn type_chars(doc: &mut Document, text: &str) {
    for c in text.chars() {
        doc.type_text(&c.to_string()).unwrap();
    }
}

fn outline_tracks() -> Vec<MarkerSequence> {
    vec![
        MarkerSequence::new(SequenceKind::Numeric),
        MarkerSequence::new(SequenceKind::LowerAlpha).parenthesized(),
    ]
}

/// Renders each list line as `marker text`, indented two spaces per level.
fn render_outline(doc: &mut Document) -> String {
    let fragments = LineFragment::stack(doc.buffer(), 18.0);
    let markers = doc.render_markers(&fragments);
    doc.buffer()
        .line_ranges()
        .into_iter()
        .map(|range| {
            let text = doc.buffer().slice_text(range).unwrap();
            match markers.iter().find(|m| m.rect.y == fragment_y(&fragments, range)) {
                Some(marker) => format!(
                    "{}{} {text}",
                    "  ".repeat(marker.level - 1),
                    marker.marker.as_text().unwrap_or("?")
                ),
                None => text,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fragment_y(fragments: &[LineFragment], range: TextRange) -> f64 {
    fragments
        .iter()
        .find(|f| f.range == range)
        .map(|f| f.rect.y)
        .unwrap_or(f64::NAN)
}

#[test]
fn typing_a_word_is_a_single_undo_step() {
    let mut doc = Document::default();
    type_chars(&mut doc, "hello");
    assert!(doc.undo());
    assert_eq!(doc.text(), "");
    assert!(!doc.undo());
}

#[test]
fn space_splits_undo_steps() {
    let mut doc = Document::default();
    type_chars(&mut doc, "hello world");
    assert_eq!(doc.tracker().history().len(), 3);

    assert!(doc.undo());
    assert_eq!(doc.text(), "hello");
    assert!(doc.undo());
    assert_eq!(doc.text(), "");
}

#[test]
fn undo_then_redo_restores_the_exact_buffer() {
    let mut doc = Document::from_bytes(b"first line\nsecond").unwrap();
    let edits = [
        (TextRange::caret(5), " inserted"),
        (TextRange::new(0, 5), ""),
        (TextRange::new(3, 4), "REPLACED"),
    ];
    for (range, text) in edits {
        doc.replace_text(range, text).unwrap();
        let after = doc.buffer().clone();
        assert!(doc.undo());
        assert!(doc.redo());
        assert_eq!(doc.buffer(), &after);
    }
}

#[test]
fn deleting_the_middle_character() {
    let mut doc = Document::from_bytes(b"abc").unwrap();
    let EditOutcome::Applied(applied) = doc.replace_text(TextRange::new(1, 1), "").unwrap() else {
        panic!("plain deletion is never intercepted");
    };

    assert_eq!(applied.change_type, ChangeType::Deletion);
    assert_eq!(applied.lines.len(), 1);
    assert_eq!(applied.lines[0].old_line.text.text(), "abc");
    assert_eq!(applied.lines[0].old_line.range, TextRange::new(0, 3));
    assert_eq!(applied.lines[0].line.text.text(), "ac");
}

#[test]
fn proposing_twice_is_rejected() {
    let doc = Document::from_bytes(b"abc").unwrap();
    let mut tracker = ChangeTracker::new(doc.buffer(), None);
    tracker.propose(doc.buffer(), "x", TextRange::caret(1)).unwrap();
    assert!(matches!(
        tracker.propose(doc.buffer(), "y", TextRange::caret(2)),
        Err(EditorError::Sequencing { .. })
    ));
}

#[test]
fn out_of_range_edit_leaves_the_document_untouched() {
    let mut doc = Document::from_bytes(b"abc").unwrap();
    assert!(matches!(
        doc.replace_text(TextRange::new(2, 9), "x"),
        Err(EditorError::Range { .. })
    ));
    assert_eq!(doc.text(), "abc");
    doc.replace_text(TextRange::caret(3), "d").unwrap();
    assert_eq!(doc.text(), "abcd");
}

#[test]
fn list_toggle_on_caret_inserts_one_placeholder() {
    let mut doc = Document::default();
    let range = doc
        .style_list(outline_tracks(), TextRange::caret(0))
        .unwrap();
    assert_eq!(range.len(), 1);
    assert_eq!(doc.buffer().len(), 1);
    assert_eq!(doc.text(), "\u{200B}");
    assert!(doc.typing_attributes().list.is_some());
}

#[test]
fn building_an_outline_by_typing() {
    let mut doc = Document::default();
    doc.style_list(outline_tracks(), TextRange::caret(0)).unwrap();
    doc.type_text("Fruit").unwrap();
    doc.type_text("\n").unwrap();
    doc.type_text("Apple").unwrap();
    doc.indent_lines(doc.selection(), Indentation::Indent).unwrap();
    doc.type_text("\n").unwrap();
    doc.type_text("Pear").unwrap();
    doc.type_text("\n").unwrap();
    doc.indent_lines(doc.selection(), Indentation::Outdent).unwrap();
    doc.type_text("Bread").unwrap();

    assert_eq!(doc.text(), "Fruit\nApple\nPear\nBread");
    insta::assert_snapshot!(render_outline(&mut doc), @r"
    1. Fruit
      (a) Apple
      (b) Pear
    2. Bread
    ");
}

#[test]
fn return_on_an_empty_item_ends_the_list() {
    let mut doc = Document::default();
    doc.style_list(outline_tracks(), TextRange::caret(0)).unwrap();
    doc.type_text("one").unwrap();
    doc.type_text("\n").unwrap();

    let outcome = doc.type_text("\n").unwrap();
    assert!(matches!(outcome, EditOutcome::Intercepted { .. }));
    doc.type_text("after").unwrap();

    assert_eq!(render_outline(&mut doc), "1. one\nafter");
    assert!(doc.take_events().iter().any(|event| matches!(
        event,
        EditorEvent::MarkersRendered(markers) if markers.len() == 1
    )));
}

#[test]
fn list_items_survive_a_toml_round_trip() {
    let mut doc = Document::default();
    doc.style_list(outline_tracks(), TextRange::caret(0)).unwrap();
    let list = doc.typing_attributes().list.unwrap();

    let persisted = doc.lists().export(list).unwrap();
    let encoded = toml::to_string(&persisted).unwrap();
    let decoded = toml::from_str(&encoded).unwrap();

    let imported = doc.lists_mut().import(&decoded);
    assert!(doc.lists().items_equal(list, imported));
}
