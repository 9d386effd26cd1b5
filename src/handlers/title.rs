//! Section titles.
//!
//! A title that belongs before the current verse is written through the
//! buffer's insertion window at the verse anchor, so it lands ahead of the
//! verse number that was already emitted.

extern crate alloc;

use alloc::format;

use super::{ElementHandler, FrameStack, RenderContext};
use crate::event::Attributes;

#[derive(Debug, Default, PartialEq, Eq)]
enum TitleFrame {
    /// End without a matching start.
    #[default]
    Unbalanced,
    Shown {
        level: u32,
        inserting: bool,
    },
    Hidden,
}

/// Handler for `<title>`.
#[derive(Debug)]
pub struct TitleHandler {
    frames: FrameStack<TitleFrame>,
}

impl TitleHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

fn is_synthetic(attrs: &Attributes) -> bool {
    match attrs.get("type") {
        Some("x-gen") => true,
        Some("chapter") => attrs.get("subType") == Some("x-chapter-number"),
        _ => false,
    }
}

impl ElementHandler for TitleHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if !self.frames.has_room() {
            self.frames.push(TitleFrame::Unbalanced);
            return;
        }
        let canonical = attrs.get("canonical") == Some("true");
        let visible = (canonical || ctx.params.show_titles) && !is_synthetic(attrs);
        if !visible {
            ctx.out.set_suppressed(true);
            self.frames.push(TitleFrame::Hidden);
            return;
        }

        let level = ctx.attr_u32("title", attrs, "level", 1).clamp(1, 6);
        let pre_verse = attrs.get("subType") == Some("x-preverse")
            || (ctx.verse.open && !ctx.verse.text_written);
        let inserting = pre_verse
            && ctx.verse.open
            && ctx.out.writes_to_main()
            && !ctx.out.is_inserting();
        if inserting {
            log::debug!("[TITLE] Splicing title before verse {}", ctx.verse.anchor_id());
            ctx.out.begin_insert_at(ctx.verse.insert_anchor);
        }
        ctx.write(&format!("<h{} class='heading{}'>", level, level));
        self.frames.push(TitleFrame::Shown { level, inserting });
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        match self.frames.pop() {
            TitleFrame::Shown { level, inserting } => {
                ctx.write(&format!("</h{}>", level));
                if inserting {
                    ctx.verse.insert_anchor = ctx.out.position();
                    ctx.out.finish_insert();
                }
            }
            TitleFrame::Hidden => ctx.out.set_suppressed(false),
            TitleFrame::Unbalanced => {
                if self.frames.is_empty() {
                    ctx.unbalanced("title end without start");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::verse::VerseHandler;
    use super::*;
    use crate::params::RenderParameters;

    #[test]
    fn test_title_spliced_before_verse() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        let mut verse = VerseHandler::new(8);
        let mut title = TitleHandler::new(8);
        verse.start(&attrs(&[("osisID", "Gen.1.1")]), &mut ctx);
        title.start(&attrs(&[("type", "section")]), &mut ctx);
        ctx.write_text("Creation");
        title.end(&mut ctx);
        ctx.write_text("In the beginning");
        verse.end(&mut ctx);
        assert_eq!(
            ctx.out.as_str(),
            "<h1 class='heading1'>Creation</h1><span class='verse' id='1.1'><span class='verseNo'>1</span>&#160;In the beginning</span>"
        );
    }

    #[test]
    fn test_title_text_does_not_count_as_verse_text() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        let mut verse = VerseHandler::new(8);
        let mut title = TitleHandler::new(8);
        verse.start(&attrs(&[("osisID", "Gen.1.1")]), &mut ctx);
        title.start(&attrs(&[]), &mut ctx);
        ctx.write_text("Heading");
        title.end(&mut ctx);
        verse.end(&mut ctx);
        assert_eq!(ctx.out.as_str(), "<h1 class='heading1'>Heading</h1>");
    }

    #[test]
    fn test_synthetic_and_hidden_titles_suppressed() {
        let params = RenderParameters::default().with_titles(false);
        let mut ctx = context(&params);
        let mut title = TitleHandler::new(8);
        title.start(&attrs(&[("type", "section")]), &mut ctx);
        ctx.write_text("Hidden");
        title.end(&mut ctx);
        title.start(&attrs(&[("type", "x-gen"), ("canonical", "true")]), &mut ctx);
        ctx.write_text("Generated");
        title.end(&mut ctx);
        title.start(&attrs(&[("type", "psalm"), ("canonical", "true")]), &mut ctx);
        ctx.write_text("A Psalm of David");
        title.end(&mut ctx);
        assert_eq!(ctx.out.as_str(), "<h1 class='heading1'>A Psalm of David</h1>");
        assert!(!ctx.out.is_suppressed());
    }

    #[test]
    fn test_level_is_clamped_and_validated() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        let mut title = TitleHandler::new(8);
        title.start(&attrs(&[("level", "9")]), &mut ctx);
        title.end(&mut ctx);
        title.start(&attrs(&[("level", "high")]), &mut ctx);
        title.end(&mut ctx);
        assert_eq!(
            ctx.out.as_str(),
            "<h6 class='heading6'></h6><h1 class='heading1'></h1>"
        );
        assert_eq!(ctx.issues.len(), 1);
    }

    #[test]
    fn test_unmatched_end_is_reported() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        TitleHandler::new(8).end(&mut ctx);
        assert_eq!(ctx.out.as_str(), "");
        assert_eq!(ctx.issues.len(), 1);
    }
}
