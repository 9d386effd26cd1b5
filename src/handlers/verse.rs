//! Verse and chapter boundaries.
//!
//! Opening a verse records the insertion anchor before writing the verse
//! markup, so titles that arrive after the verse tag can still be spliced in
//! front of it. Closing a verse that produced no visible text retracts the
//! whole verse span.

extern crate alloc;

use alloc::format;
use alloc::string::ToString;

use super::markers::{BookmarkMarker, MyNoteMarker};
use super::{ElementHandler, FrameStack, RenderContext};
use crate::error::RenderIssue;
use crate::event::Attributes;

#[derive(Debug, Default, PartialEq, Eq)]
enum VerseFrame {
    #[default]
    Ignore,
    Close,
}

/// Handler for `<verse>` in container and milestone form.
#[derive(Debug)]
pub struct VerseHandler {
    frames: FrameStack<VerseFrame>,
    bookmarks: BookmarkMarker,
}

impl VerseHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
            bookmarks: BookmarkMarker,
        }
    }
}

impl ElementHandler for VerseHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if attrs.contains("eID") {
            close_verse(ctx);
            self.frames.push(VerseFrame::Ignore);
            return;
        }

        if ctx.verse.open {
            ctx.unbalanced("verse opened before the previous verse was closed");
            close_verse(ctx);
        }

        let id = attrs.non_empty("osisID").or_else(|| attrs.non_empty("sID"));
        let number = match id {
            Some(id) => {
                let (chapter, verse) = parse_verse_id(id);
                if let Some(chapter) = chapter {
                    ctx.verse.chapter = Some(chapter);
                }
                match verse {
                    Some(verse) => verse,
                    None => {
                        ctx.issue(RenderIssue::MalformedAttribute {
                            element: "verse".to_string(),
                            attribute: "osisID".to_string(),
                            value: id.to_string(),
                        });
                        ctx.verse.verse + 1
                    }
                }
            }
            None => {
                log::debug!("[VERSE] Verse without id after {}", ctx.verse.verse);
                ctx.verse.verse + 1
            }
        };

        open_verse(ctx, number);
        self.bookmarks.start(attrs, ctx);

        if attrs.contains("sID") {
            self.frames.push(VerseFrame::Ignore);
        } else {
            self.frames.push(VerseFrame::Close);
        }
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        if self.frames.pop() == VerseFrame::Close {
            close_verse(ctx);
        }
    }
}

fn open_verse(ctx: &mut RenderContext<'_>, number: u32) {
    if let Some(chapter) = ctx.verse.chapter {
        if ctx.verse.needs_divider(chapter) {
            write_chapter_divider(ctx, chapter);
        }
    }

    ctx.verse.verse = number;
    ctx.verse.open = true;
    ctx.verse.text_written = false;
    ctx.verse.insert_anchor = ctx.out.position();

    let tag = verse_tag(ctx);
    let open = format!("<{} class='verse' id='{}'>", tag, ctx.verse.anchor_id());
    ctx.write(&open);
    if ctx.params.show_verse_numbers {
        let number = format!("<span class='verseNo'>{}</span>&#160;", number);
        ctx.write(&number);
    } else {
        ctx.write("&#8205;");
    }
}

/// Close the open verse, retracting it when it produced no text.
pub fn close_verse(ctx: &mut RenderContext<'_>) {
    if !ctx.verse.open {
        return;
    }
    if ctx.out.abort_unterminated_insert() {
        ctx.unbalanced_in_verse("insertion window");
    }
    if ctx.out.is_capturing() {
        ctx.out.reset_capture();
        ctx.notes.depth = 0;
        ctx.notes.current = None;
        ctx.unbalanced_in_verse("capture scope");
    }

    if ctx.verse.text_written {
        MyNoteMarker.start(&Attributes::new(), ctx);
        let close = format!("</{}>", verse_tag(ctx));
        ctx.write(&close);
    } else {
        log::debug!("[VERSE] Retracting empty verse {}", ctx.verse.anchor_id());
        let anchor = ctx.verse.insert_anchor;
        ctx.out.remove_after(anchor);
    }
    ctx.verse.open = false;
}

fn verse_tag(ctx: &RenderContext<'_>) -> &'static str {
    if ctx.params.verse_per_line {
        "div"
    } else {
        "span"
    }
}

fn write_chapter_divider(ctx: &mut RenderContext<'_>, chapter: u32) {
    let label = if ctx.params.show_verse_numbers {
        chapter.to_string()
    } else {
        "&#8203;".to_string()
    };
    let divider = format!("<div class='chapterNo' id='{}'>{}</div>", chapter, label);
    ctx.write(&divider);
    ctx.verse.divided_chapter = Some(chapter);
    ctx.verse.insert_anchor = ctx.out.position();
}

/// Split the first id of an `osisID` list into (chapter, verse).
fn parse_verse_id(id: &str) -> (Option<u32>, Option<u32>) {
    let first = id.split_whitespace().next().unwrap_or("");
    let first = first.split('-').next().unwrap_or(first);
    let first = first.split('!').next().unwrap_or(first);
    let mut parts = first.rsplit('.');
    let verse = parts.next().and_then(|v| v.parse().ok());
    let chapter = parts.next().and_then(|c| c.parse().ok());
    (chapter, verse)
}

/// Handler for `<chapter>`: tracks the chapter and writes its divider.
#[derive(Debug, Default)]
pub struct ChapterHandler;

impl ElementHandler for ChapterHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if attrs.contains("eID") {
            return;
        }
        let Some(id) = attrs.non_empty("osisID").or_else(|| attrs.non_empty("sID")) else {
            return;
        };
        let last = id.split_whitespace().next().unwrap_or(id).rsplit('.').next();
        match last.and_then(|c| c.parse::<u32>().ok()) {
            Some(chapter) => {
                if ctx.verse.chapter != Some(chapter) {
                    ctx.verse.chapter = Some(chapter);
                    ctx.verse.verse = 0;
                }
                if ctx.verse.needs_divider(chapter) && !ctx.verse.open {
                    write_chapter_divider(ctx, chapter);
                }
            }
            None => ctx.issue(RenderIssue::MalformedAttribute {
                element: "chapter".to_string(),
                attribute: "osisID".to_string(),
                value: id.to_string(),
            }),
        }
    }

    fn end(&mut self, _ctx: &mut RenderContext<'_>) {}
}
