//! Verse and passage state shared by the element handlers.

extern crate alloc;

use alloc::format;
use alloc::string::String;

/// State of the verse currently being rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerseInfo {
    /// Current verse number (0 = no verse seen yet).
    pub verse: u32,
    /// Current chapter, if the content has chapters.
    pub chapter: Option<u32>,
    /// Whether visible verse text was written since the verse opened.
    pub text_written: bool,
    /// Buffer position before the verse-open markup; titles splice here.
    pub insert_anchor: usize,
    /// Whether a verse span is open.
    pub open: bool,
    /// Chapter whose divider has been written.
    pub divided_chapter: Option<u32>,
}

impl VerseInfo {
    /// Anchor id of the current verse (`{chapter}.{verse}`).
    pub fn anchor_id(&self) -> String {
        match self.chapter {
            Some(chapter) => format!("{}.{}", chapter, self.verse),
            None => format!("{}", self.verse),
        }
    }

    /// Whether a chapter divider is still owed for `chapter`.
    pub fn needs_divider(&self, chapter: u32) -> bool {
        chapter > 1 && self.divided_chapter != Some(chapter)
    }
}

/// Pass-wide state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassageInfo {
    /// Whether any visible text has been written in this pass.
    pub any_text_written: bool,
}
