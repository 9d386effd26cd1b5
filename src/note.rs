//! Footnotes and cross-references extracted from a passage.

extern crate alloc;

use alloc::string::String;

/// Kind of extracted note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NoteKind {
    /// Free-form footnote text.
    General,
    /// Cross-reference to another passage.
    Reference,
}

/// Note or cross-reference lifted out of the rendered text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Note {
    /// Verse the note belongs to (0 = before the first verse).
    pub verse: u32,
    /// Marker character shown inline.
    pub marker: char,
    /// Note text, whitespace-normalized.
    pub text: String,
    /// General note or cross-reference.
    pub kind: NoteKind,
    /// Raw OSIS target for references.
    pub target: Option<String>,
    /// Versification the target is expressed in.
    pub versification: Option<String>,
}

impl Note {
    /// Build a general note.
    pub fn general(verse: u32, marker: char, text: String) -> Self {
        Self {
            verse,
            marker,
            text,
            kind: NoteKind::General,
            target: None,
            versification: None,
        }
    }

    /// Build a cross-reference note.
    pub fn reference(
        verse: u32,
        marker: char,
        text: String,
        target: Option<String>,
        versification: Option<String>,
    ) -> Self {
        Self {
            verse,
            marker,
            text,
            kind: NoteKind::Reference,
            target,
            versification,
        }
    }
}

/// Cyclic a→z marker generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoteMarkers {
    next: u8,
}

impl NoteMarkers {
    /// Next marker in the cycle.
    pub fn next_marker(&mut self) -> char {
        let marker = (b'a' + self.next) as char;
        self.next = (self.next + 1) % 26;
        marker
    }
}

/// Collapse runs of whitespace and trim both ends.
pub fn normalize_note_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Whether captured text is only leftovers such as `"; "` between references.
pub fn is_artifact(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || c.is_ascii_punctuation())
}
