//! Paragraphs, divisions, milestones and simple wrapping elements.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use quick_xml::escape::escape;

use super::{ElementHandler, FrameStack, RenderContext};
use crate::event::Attributes;

/// Handler for `<p>`: paragraph break where the paragraph ends.
#[derive(Debug)]
pub struct ParagraphHandler {
    frames: FrameStack<bool>,
}

impl ParagraphHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

impl ElementHandler for ParagraphHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if attrs.contains("eID") {
            ctx.write_paragraph_break();
        }
        let container = !attrs.contains("sID") && !attrs.contains("eID");
        self.frames.push(container);
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        if self.frames.pop() {
            ctx.write_paragraph_break();
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
enum DivFrame {
    #[default]
    Ignore,
    Paragraph,
    Section,
}

const SECTION_TYPES: &[&str] = &["introduction", "preface", "colophon", "glossary"];

/// Handler for `<div>`.
#[derive(Debug)]
pub struct DivHandler {
    frames: FrameStack<DivFrame>,
}

impl DivHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

impl ElementHandler for DivHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        let milestone = attrs.contains("sID") || attrs.contains("eID");
        let frame = match attrs.get("type") {
            Some("paragraph") if milestone => {
                if attrs.contains("eID") {
                    ctx.write_paragraph_break();
                }
                DivFrame::Ignore
            }
            Some("paragraph") => DivFrame::Paragraph,
            Some(kind) if !milestone && SECTION_TYPES.contains(&kind) && self.frames.has_room() => {
                ctx.write(&format!("<div class='{}'>", kind));
                DivFrame::Section
            }
            _ => DivFrame::Ignore,
        };
        self.frames.push(frame);
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        match self.frames.pop() {
            DivFrame::Paragraph => ctx.write_paragraph_break(),
            DivFrame::Section => ctx.write("</div>"),
            DivFrame::Ignore => {}
        }
    }
}

/// Handler for `<milestone>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MilestoneHandler;

impl ElementHandler for MilestoneHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        match attrs.get("type") {
            Some("x-p") | Some("x-extra-p") => ctx.write_paragraph_break(),
            Some("line") => ctx.write_line_break(),
            _ => {}
        }
        if let Some(marker) = attrs.non_empty("marker") {
            ctx.write_text(marker);
        }
    }

    fn end(&mut self, _ctx: &mut RenderContext<'_>) {}
}

/// Fixed open/close markup around the element's content.
#[derive(Clone, Copy, Debug)]
pub struct WrapHandler {
    open: &'static str,
    close: &'static str,
}

impl WrapHandler {
    /// Wrap content in `open` ... `close`.
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self { open, close }
    }
}

impl ElementHandler for WrapHandler {
    fn start(&mut self, _attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        ctx.write(self.open);
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        ctx.write(self.close);
    }
}

/// Handler for `<hi>` text highlighting.
#[derive(Debug)]
pub struct HiHandler {
    frames: FrameStack<Option<&'static str>>,
}

impl HiHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

fn hi_markup(kind: &str) -> Option<(&'static str, &'static str)> {
    match kind {
        "bold" => Some(("<b>", "</b>")),
        "italic" | "emphasis" => Some(("<i>", "</i>")),
        "super" => Some(("<sup>", "</sup>")),
        "sub" => Some(("<sub>", "</sub>")),
        "underline" => Some(("<u>", "</u>")),
        "small-caps" => Some(("<span class='smallCaps'>", "</span>")),
        _ => None,
    }
}

impl ElementHandler for HiHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        let close = match attrs.get("type").and_then(hi_markup) {
            Some((open, close)) if self.frames.has_room() => {
                ctx.write(open);
                Some(close)
            }
            _ => None,
        };
        self.frames.push(close);
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        if let Some(close) = self.frames.pop() {
            ctx.write(close);
        }
    }
}

/// Handler for `<figure>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FigureHandler;

impl ElementHandler for FigureHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        let Some(src) = attrs.non_empty("src") else {
            log::debug!("[OSIS] Figure without src");
            return;
        };
        let base = ctx.params.base_path.trim_end_matches('/');
        let path = if base.is_empty() {
            String::from(src)
        } else {
            format!("{}/{}", base, src.trim_start_matches('/'))
        };
        ctx.write(&format!("<img class='figure' src='{}' />", escape(path.as_str())));
    }

    fn end(&mut self, _ctx: &mut RenderContext<'_>) {}
}
