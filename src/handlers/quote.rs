//! Quotations, in container and milestone form.

extern crate alloc;

use alloc::string::String;

use super::{ElementHandler, FrameStack, RenderContext};
use crate::event::Attributes;

const DEFAULT_MARKER: &str = "\"";

#[derive(Debug)]
struct QuoteFrame {
    marker: String,
    red_letter: bool,
}

/// Handler for `<q>`.
///
/// Milestone quotes (`sID`/`eID`) are closed by a different element than the
/// one that opened them, so their frames live on a second stack.
#[derive(Debug)]
pub struct QuoteHandler {
    frames: FrameStack<Option<QuoteFrame>>,
    milestones: FrameStack<Option<QuoteFrame>>,
}

impl QuoteHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
            milestones: FrameStack::new(max_nesting),
        }
    }
}

impl ElementHandler for QuoteHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if attrs.contains("eID") {
            match self.milestones.pop() {
                Some(frame) => close_quote(&frame, ctx),
                None if self.milestones.is_empty() => ctx.unbalanced("quote eID without sID"),
                None => {}
            }
            self.frames.push(None);
            return;
        }

        let milestone = attrs.contains("sID");
        let room = if milestone {
            self.milestones.has_room()
        } else {
            self.frames.has_room()
        };
        if !room {
            if milestone {
                self.milestones.push(None);
            }
            self.frames.push(None);
            return;
        }

        let frame = QuoteFrame {
            marker: String::from(attrs.get("marker").unwrap_or(DEFAULT_MARKER)),
            red_letter: ctx.params.red_letter
                && attrs
                    .get("who")
                    .is_some_and(|who| who.eq_ignore_ascii_case("jesus")),
        };
        open_quote(&frame, ctx);

        if milestone {
            self.milestones.push(Some(frame));
            self.frames.push(None);
        } else {
            self.frames.push(Some(frame));
        }
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        if let Some(frame) = self.frames.pop() {
            close_quote(&frame, ctx);
        }
    }
}

fn open_quote(frame: &QuoteFrame, ctx: &mut RenderContext<'_>) {
    if frame.red_letter {
        ctx.write("<span class='redLetter'>");
    }
    ctx.write_text(&frame.marker);
}

fn close_quote(frame: &QuoteFrame, ctx: &mut RenderContext<'_>) {
    ctx.write_text(&frame.marker);
    if frame.red_letter {
        ctx.write("</span>");
    }
}
