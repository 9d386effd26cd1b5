//! User annotation markers around verses.

extern crate alloc;

use alloc::format;

use quick_xml::escape::escape;

use super::{ElementHandler, RenderContext};
use crate::event::Attributes;

/// Writes one bookmark span per configured style at verse start.
#[derive(Clone, Copy, Debug, Default)]
pub struct BookmarkMarker;

impl ElementHandler for BookmarkMarker {
    fn start(&mut self, _attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if !ctx.params.show_bookmarks {
            return;
        }
        let params = ctx.params;
        if let Some(styles) = params.bookmark_styles.get(&ctx.verse_key()) {
            for style in styles {
                ctx.write(&format!("<span class='bookmark {}'></span>", escape(style.as_str())));
            }
        }
    }

    fn end(&mut self, _ctx: &mut RenderContext<'_>) {}
}

/// Writes the my-note icon at verse end.
#[derive(Clone, Copy, Debug, Default)]
pub struct MyNoteMarker;

impl ElementHandler for MyNoteMarker {
    fn start(&mut self, _attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if ctx.params.show_my_note_markers
            && ctx.params.verses_with_notes.contains(&ctx.verse_key())
        {
            ctx.write("<span class='myNoteImg'></span>");
        }
    }

    fn end(&mut self, _ctx: &mut RenderContext<'_>) {}
}
