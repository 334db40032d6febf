// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use rich_text_engine::{Document, Indentation, MarkerSequence, SequenceKind, TextRange};

#[allow(dead_code)]
pub fn generate_prose(words: usize) -> String {
    let base = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur"];
    let mut text = String::new();
    for i in 0..words {
        text.push_str(base[i % base.len()]);
        text.push(if i % 12 == 11 { '\n' } else { ' ' });
    }
    text
}

/// An outline of `items` lines whose levels cycle through `1..=depth`.
#[allow(dead_code)]
pub fn generate_outline(items: usize, depth: usize) -> Document {
    let mut doc = Document::default();
    let tracks = vec![
        MarkerSequence::new(SequenceKind::Numeric),
        MarkerSequence::new(SequenceKind::LowerAlpha),
        MarkerSequence::new(SequenceKind::LowerRoman).parenthesized(),
    ];
    doc.style_list(tracks, TextRange::caret(0)).unwrap();
    // A new line starts at the level of the line before it.
    let mut current = 1;
    for i in 0..items {
        if i > 0 {
            doc.type_text("\n").unwrap();
        }
        let level = i % depth.max(1) + 1;
        while current < level {
            doc.indent_lines(doc.selection(), Indentation::Indent).unwrap();
            current += 1;
        }
        while current > level {
            doc.indent_lines(doc.selection(), Indentation::Outdent).unwrap();
            current -= 1;
        }
        doc.type_text(&format!("item {i}")).unwrap();
    }
    doc
}
