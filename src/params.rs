//! Per-pass render configuration.
//!
//! A [`RenderParameters`] value is a read-only snapshot for one conversion
//! pass. Handlers only ever borrow it.

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

/// Chapter/verse pair used to key per-verse settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseKey {
    /// Chapter number (0 when the content has no chapter).
    pub chapter: u32,
    /// Verse number.
    pub verse: u32,
}

impl VerseKey {
    /// Create a key.
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
}

/// Resource limits for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderLimits {
    /// Maximum bytes held by the output buffer (`None` = unbounded).
    pub max_output_bytes: Option<usize>,
    /// Maximum nesting tracked per element handler; deeper frames are ignored.
    pub max_nesting: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_output_bytes: Some(8 * 1024 * 1024), // 8MB of HTML
            max_nesting: 32,
        }
    }
}

impl RenderLimits {
    /// Conservative limits for embedded environments.
    pub fn embedded() -> Self {
        Self {
            max_output_bytes: Some(512 * 1024), // 512KB of HTML
            max_nesting: 16,
        }
    }

    /// No output cap.
    pub fn unbounded() -> Self {
        Self {
            max_output_bytes: None,
            ..Self::default()
        }
    }
}

/// Display options for one conversion pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderParameters {
    /// Show verse numbers (anchors are always written).
    pub show_verse_numbers: bool,
    /// Show non-canonical titles.
    pub show_titles: bool,
    /// Show inline note markers.
    pub show_notes: bool,
    /// Show Strong's links after annotated words.
    pub show_strongs: bool,
    /// Show morphology links after annotated words.
    pub show_morphology: bool,
    /// Show bookmark markers at verse start.
    pub show_bookmarks: bool,
    /// Show "my note" markers at verse end.
    pub show_my_note_markers: bool,
    /// Render words of Jesus in red.
    pub red_letter: bool,
    /// Start each verse on its own line.
    pub verse_per_line: bool,
    /// Text direction of the passage.
    pub left_to_right: bool,
    /// BCP-47 language code of the document (`en`, `he`, ...).
    pub language_code: String,
    /// Base path prepended to figure sources.
    pub base_path: String,
    /// Versification of the document, carried on notes and links.
    pub versification: Option<String>,
    /// Bookmark style classes per verse.
    pub bookmark_styles: BTreeMap<VerseKey, Vec<String>>,
    /// Verses that carry a user note.
    pub verses_with_notes: BTreeSet<VerseKey>,
    /// Treat references outside notes as notes instead of inline links.
    pub auto_wrap_unwrapped_refs: bool,
    /// Resource limits.
    pub limits: RenderLimits,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            show_verse_numbers: true,
            show_titles: true,
            show_notes: true,
            show_strongs: false,
            show_morphology: false,
            show_bookmarks: false,
            show_my_note_markers: false,
            red_letter: false,
            verse_per_line: false,
            left_to_right: true,
            language_code: String::from("en"),
            base_path: String::new(),
            versification: None,
            bookmark_styles: BTreeMap::new(),
            verses_with_notes: BTreeSet::new(),
            auto_wrap_unwrapped_refs: false,
            limits: RenderLimits::default(),
        }
    }
}

impl RenderParameters {
    /// Default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle verse numbers.
    pub fn with_verse_numbers(mut self, show: bool) -> Self {
        self.show_verse_numbers = show;
        self
    }

    /// Toggle non-canonical titles.
    pub fn with_titles(mut self, show: bool) -> Self {
        self.show_titles = show;
        self
    }

    /// Toggle note markers.
    pub fn with_notes(mut self, show: bool) -> Self {
        self.show_notes = show;
        self
    }

    /// Toggle Strong's links.
    pub fn with_strongs(mut self, show: bool) -> Self {
        self.show_strongs = show;
        self
    }

    /// Toggle morphology links.
    pub fn with_morphology(mut self, show: bool) -> Self {
        self.show_morphology = show;
        self
    }

    /// Toggle red-letter rendering.
    pub fn with_red_letter(mut self, on: bool) -> Self {
        self.red_letter = on;
        self
    }

    /// Toggle one verse per line.
    pub fn with_verse_per_line(mut self, on: bool) -> Self {
        self.verse_per_line = on;
        self
    }

    /// Set language code and direction.
    pub fn with_language(mut self, code: &str, left_to_right: bool) -> Self {
        self.language_code = code.into();
        self.left_to_right = left_to_right;
        self
    }

    /// Set the figure base path.
    pub fn with_base_path(mut self, path: &str) -> Self {
        self.base_path = path.into();
        self
    }

    /// Set the versification name.
    pub fn with_versification(mut self, v11n: &str) -> Self {
        self.versification = Some(v11n.into());
        self
    }

    /// Toggle auto-wrapping of references outside notes.
    pub fn with_auto_wrap_refs(mut self, on: bool) -> Self {
        self.auto_wrap_unwrapped_refs = on;
        self
    }

    /// Add a bookmark style for a verse and enable bookmark markers.
    pub fn with_bookmark(mut self, key: VerseKey, style: &str) -> Self {
        self.show_bookmarks = true;
        self.bookmark_styles
            .entry(key)
            .or_default()
            .push(style.into());
        self
    }

    /// Mark a verse as carrying a user note and enable note markers.
    pub fn with_my_note(mut self, key: VerseKey) -> Self {
        self.show_my_note_markers = true;
        self.verses_with_notes.insert(key);
        self
    }

    /// Replace the resource limits.
    pub fn with_limits(mut self, limits: RenderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Whether any lexical annotation is requested.
    pub fn wants_lexical_links(&self) -> bool {
        self.show_strongs || self.show_morphology
    }
}
