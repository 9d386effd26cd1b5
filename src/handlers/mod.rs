//! Per-element handlers and the pass context they share.
//!
//! Every OSIS element the renderer understands has one handler. The
//! dispatcher calls `start` on the opening tag and `end` on the closing tag;
//! handlers that must remember how to close an element push a frame on
//! `start` and pop it on `end`. Frame stacks are bounded and popping an empty
//! stack yields the frame type's default, which always means "do nothing".

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::buffer::OutputBuffer;
use crate::error::RenderIssue;
use crate::event::Attributes;
use crate::note::{Note, NoteMarkers};
use crate::params::{RenderParameters, VerseKey};
use crate::passage::{ReferenceResolver, VerseRef};
use crate::state::{PassageInfo, VerseInfo};

pub mod block;
pub mod line;
pub mod markers;
pub mod note;
pub mod quote;
pub mod title;
pub mod verse;
pub mod word;

/// Compile-time ceiling for per-handler nesting.
pub const MAX_NESTING: usize = 64;

/// Handler for one OSIS element kind.
pub trait ElementHandler {
    /// Opening tag.
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>);

    /// Closing tag.
    fn end(&mut self, ctx: &mut RenderContext<'_>);
}

/// Bounded stack of close actions.
///
/// Frames beyond the limit are not stored; their matching pops return the
/// default frame so nesting stays balanced.
#[derive(Debug)]
pub struct FrameStack<T> {
    frames: heapless::Vec<T, MAX_NESTING>,
    limit: usize,
    overflow: usize,
}

impl<T: Default> FrameStack<T> {
    /// Stack holding at most `limit` frames (capped at [`MAX_NESTING`]).
    pub fn new(limit: usize) -> Self {
        Self {
            frames: heapless::Vec::new(),
            limit: limit.min(MAX_NESTING),
            overflow: 0,
        }
    }

    /// Push a frame.
    pub fn push(&mut self, frame: T) {
        if self.frames.len() >= self.limit || self.frames.push(frame).is_err() {
            if self.overflow == 0 {
                log::warn!(
                    "[OSIS] Nesting deeper than {} levels; ignoring inner frames",
                    self.limit
                );
            }
            self.overflow += 1;
        }
    }

    /// Pop a frame, or the default frame when empty or overflowed.
    pub fn pop(&mut self) -> T {
        if self.overflow > 0 {
            self.overflow -= 1;
            return T::default();
        }
        self.frames.pop().unwrap_or_default()
    }

    /// Whether the next push will be stored.
    pub fn has_room(&self) -> bool {
        self.frames.len() < self.limit
    }

    /// Number of stored frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame is stored.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Open-note bookkeeping shared by the note and reference handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoteState {
    /// Marker generator for notes without an explicit `n`.
    pub markers: NoteMarkers,
    /// Marker of the innermost open note.
    pub current: Option<char>,
    /// Number of open notes.
    pub depth: usize,
}

impl NoteState {
    /// Whether a note is open.
    pub fn in_note(&self) -> bool {
        self.depth > 0
    }
}

/// Mutable state of one render pass.
pub struct RenderContext<'a> {
    /// Pass configuration.
    pub params: &'a RenderParameters,
    /// Reference resolution collaborator.
    pub resolver: &'a dyn ReferenceResolver,
    /// Output sink.
    pub out: OutputBuffer,
    /// Current verse state.
    pub verse: VerseInfo,
    /// Pass-wide state.
    pub passage: PassageInfo,
    /// Open-note state.
    pub notes: NoteState,
    /// Extracted notes in document order.
    pub collected: Vec<Note>,
    /// Non-fatal problems found so far.
    pub issues: Vec<RenderIssue>,
    /// Last reference resolved for an inline link.
    pub last_reference: Option<VerseRef>,
}

impl<'a> RenderContext<'a> {
    /// Fresh context for one pass.
    pub fn new(params: &'a RenderParameters, resolver: &'a dyn ReferenceResolver) -> Self {
        Self {
            params,
            resolver,
            out: OutputBuffer::with_limit(params.limits.max_output_bytes),
            verse: VerseInfo::default(),
            passage: PassageInfo::default(),
            notes: NoteState::default(),
            collected: Vec::new(),
            issues: Vec::new(),
            last_reference: None,
        }
    }

    /// Write raw markup.
    pub fn write(&mut self, html: &str) {
        self.out.append(html);
    }

    /// Write character data and track whether visible text was produced.
    pub fn write_text(&mut self, text: &str) {
        let visible = self.out.writes_to_main() && !text.trim().is_empty();
        self.out.append_text(text);
        if visible {
            self.passage.any_text_written = true;
            if self.verse.open && !self.out.is_inserting() {
                self.verse.text_written = true;
            }
        }
    }

    /// `<br />`, unless nothing visible precedes it.
    pub fn write_line_break(&mut self) {
        if self.passage.any_text_written {
            self.write("<br />");
        }
    }

    /// Paragraph break, unless nothing visible precedes it.
    pub fn write_paragraph_break(&mut self) {
        if self.passage.any_text_written {
            self.write("<div class='breakline'></div>");
        }
    }

    /// Key of the current verse for per-verse settings.
    pub fn verse_key(&self) -> VerseKey {
        VerseKey::new(self.verse.chapter.unwrap_or(0), self.verse.verse)
    }

    /// Record and log a non-fatal issue.
    pub fn issue(&mut self, issue: RenderIssue) {
        log::warn!("[OSIS] {}", issue);
        self.issues.push(issue);
    }

    /// Numeric attribute with a fallback; malformed values are recorded.
    pub fn attr_u32(&mut self, element: &str, attrs: &Attributes, name: &str, default: u32) -> u32 {
        match attrs.get(name) {
            None => default,
            Some(value) => match value.trim().parse() {
                Ok(n) => n,
                Err(_) => {
                    self.issue(RenderIssue::MalformedAttribute {
                        element: element.to_string(),
                        attribute: name.to_string(),
                        value: value.to_string(),
                    });
                    default
                }
            },
        }
    }

    /// Record an unbalanced-markup issue.
    pub fn unbalanced(&mut self, context: &str) {
        self.issue(RenderIssue::UnbalancedMarkup {
            context: String::from(context),
        });
    }

    /// Issue for a verse-scoped imbalance, naming the verse.
    pub fn unbalanced_in_verse(&mut self, what: &str) {
        let context = format!("{} at end of verse {}", what, self.verse.anchor_id());
        self.issue(RenderIssue::UnbalancedMarkup { context });
    }
}
