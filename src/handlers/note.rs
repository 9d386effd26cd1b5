//! Footnotes and cross-references.
//!
//! Note bodies are captured into the temp store and lifted into the note
//! list when the note closes; only the marker stays in the text. A
//! `<reference>` becomes either a reference note (inside a note, or when
//! auto-wrapping is on) or an inline link, never both.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use quick_xml::escape::escape;

use super::{ElementHandler, FrameStack, RenderContext};
use crate::error::RenderIssue;
use crate::event::Attributes;
use crate::note::{is_artifact, normalize_note_text, Note};
use crate::passage::{is_numeric_reference, VerseRange};

#[derive(Debug)]
struct NoteFrame {
    marker: char,
    mark: usize,
    previous: Option<char>,
}

/// Handler for `<note>`.
#[derive(Debug)]
pub struct NoteHandler {
    frames: FrameStack<Option<NoteFrame>>,
}

impl NoteHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

impl ElementHandler for NoteHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if !self.frames.has_room() {
            self.frames.push(None);
            return;
        }
        let explicit = attrs.get("n").and_then(|n| {
            let mut chars = n.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        });
        let marker = match explicit {
            Some(c) => c,
            None => ctx.notes.markers.next_marker(),
        };

        if ctx.params.show_notes && !ctx.notes.in_note() {
            write_marker(ctx, marker);
        }

        let frame = NoteFrame {
            marker,
            mark: ctx.out.temp_len(),
            previous: ctx.notes.current,
        };
        ctx.out.begin_capture();
        ctx.notes.current = Some(marker);
        ctx.notes.depth += 1;
        self.frames.push(Some(frame));
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        let Some(frame) = self.frames.pop() else {
            if self.frames.is_empty() {
                ctx.unbalanced("note end without start");
            }
            return;
        };

        let captured = ctx.out.drain_temp_from(frame.mark);
        ctx.out.end_capture();
        if !ctx.out.is_capturing() {
            ctx.out.clear_temp();
        }
        ctx.notes.current = frame.previous;
        ctx.notes.depth = ctx.notes.depth.saturating_sub(1);

        let text = normalize_note_text(&captured);
        if is_artifact(&text) {
            log::debug!("[NOTE] Dropping empty note '{}'", frame.marker);
            return;
        }
        ctx.collected
            .push(Note::general(ctx.verse.verse, frame.marker, text));
        mark_verse_annotated(ctx);
    }
}

#[derive(Debug)]
struct ReferenceFrame {
    target: Option<String>,
    mark: usize,
}

/// Handler for `<reference>`.
#[derive(Debug)]
pub struct ReferenceHandler {
    frames: FrameStack<Option<ReferenceFrame>>,
}

impl ReferenceHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

impl ElementHandler for ReferenceHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if !self.frames.has_room() {
            self.frames.push(None);
            return;
        }
        let frame = ReferenceFrame {
            target: attrs.non_empty("osisRef").map(String::from),
            mark: ctx.out.temp_len(),
        };
        ctx.out.begin_capture();
        self.frames.push(Some(frame));
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        let Some(frame) = self.frames.pop() else {
            if self.frames.is_empty() {
                ctx.unbalanced("reference end without start");
            }
            return;
        };

        let captured = ctx.out.drain_temp_from(frame.mark);
        ctx.out.end_capture();
        if !ctx.out.is_capturing() {
            ctx.out.clear_temp();
        }
        let text = normalize_note_text(&captured);

        if ctx.notes.in_note() {
            let marker = match ctx.notes.current {
                Some(marker) => marker,
                None => ctx.notes.markers.next_marker(),
            };
            push_reference_note(ctx, marker, text, frame.target);
        } else if ctx.params.auto_wrap_unwrapped_refs {
            let marker = ctx.notes.markers.next_marker();
            if ctx.params.show_notes {
                write_marker(ctx, marker);
            }
            push_reference_note(ctx, marker, text, frame.target);
        } else {
            write_inline_link(ctx, &text, frame.target.as_deref());
        }
    }
}

fn push_reference_note(
    ctx: &mut RenderContext<'_>,
    marker: char,
    text: String,
    target: Option<String>,
) {
    let versification = ctx.params.versification.clone();
    ctx.collected.push(Note::reference(
        ctx.verse.verse,
        marker,
        text,
        target,
        versification,
    ));
    mark_verse_annotated(ctx);
}

fn write_marker(ctx: &mut RenderContext<'_>, marker: char) {
    let mut buf = [0u8; 4];
    let marker = escape(&*marker.encode_utf8(&mut buf));
    ctx.write(&format!("<span class='noteRef'>{}</span>", marker));
}

/// A verse holding a collected note counts as non-empty.
fn mark_verse_annotated(ctx: &mut RenderContext<'_>) {
    if ctx.verse.open && !ctx.out.is_inserting() {
        ctx.verse.text_written = true;
    }
}

fn write_inline_link(ctx: &mut RenderContext<'_>, text: &str, target: Option<&str>) {
    let reference = match target {
        Some(target) => target,
        None if !text.is_empty() => text,
        None => return,
    };

    let resolved = ctx.resolver.resolve(reference, None).or_else(|err| {
        match ctx.last_reference.as_ref() {
            Some(basis) if is_numeric_reference(reference) => {
                ctx.resolver.resolve(reference, Some(basis))
            }
            _ => Err(err),
        }
    });

    let ranges = match resolved {
        Ok(ranges) => ranges,
        Err(err) => {
            ctx.issue(RenderIssue::UnresolvedReference {
                reference: err.reference,
            });
            ctx.write_text(text);
            return;
        }
    };

    if let Some(last) = ranges.last() {
        ctx.last_reference = Some(last.end.clone());
    }

    let href = link_address(&ranges, ctx.params.versification.as_deref());
    ctx.write(&format!("<a href='{}'>", escape(href.as_str())));
    if text.is_empty() {
        let shown: Vec<String> = ranges.iter().map(VerseRange::display).collect();
        ctx.write_text(&shown.join("; "));
    } else {
        ctx.write_text(text);
    }
    ctx.write("</a>");
}

fn link_address(ranges: &[VerseRange], versification: Option<&str>) -> String {
    let osis: Vec<String> = ranges.iter().map(VerseRange::to_osis).collect();
    let mut href = format!("osis://?osis={}", osis.join("+"));
    if let Some(v11n) = versification {
        href.push_str("&v=");
        href.push_str(v11n);
    }
    href
}
