//! Poetry lines, line groups and line breaks.

use super::{ElementHandler, FrameStack, RenderContext};
use crate::event::Attributes;

const INDENT: &str = "&#160;&#160;";

#[derive(Debug, Default, PartialEq, Eq)]
enum LineFrame {
    #[default]
    Ignore,
    Indent,
    LineBreak,
    EndLineBreak,
}

/// Handler for `<l>`.
#[derive(Debug)]
pub struct LineHandler {
    frames: FrameStack<LineFrame>,
}

impl LineHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

fn write_indent(ctx: &mut RenderContext<'_>, attrs: &Attributes) {
    let level = ctx.attr_u32("l", attrs, "level", 1);
    for _ in 1..level.min(8) {
        ctx.write(INDENT);
    }
}

impl ElementHandler for LineHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        let frame = match attrs.get("type") {
            Some("x-indent") => {
                ctx.write(INDENT);
                LineFrame::Indent
            }
            Some("x-br") => LineFrame::LineBreak,
            _ if attrs.contains("eID") => LineFrame::LineBreak,
            _ if attrs.contains("sID") => {
                write_indent(ctx, attrs);
                LineFrame::Ignore
            }
            _ => {
                write_indent(ctx, attrs);
                LineFrame::EndLineBreak
            }
        };
        self.frames.push(frame);
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        match self.frames.pop() {
            LineFrame::LineBreak | LineFrame::EndLineBreak => ctx.write_line_break(),
            LineFrame::Indent | LineFrame::Ignore => {}
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
enum GroupFrame {
    #[default]
    Ignore,
    Group,
}

/// Handler for `<lg>`.
#[derive(Debug)]
pub struct LineGroupHandler {
    frames: FrameStack<GroupFrame>,
}

impl LineGroupHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

impl ElementHandler for LineGroupHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        if attrs.contains("sID") {
            ctx.write_paragraph_break();
            self.frames.push(GroupFrame::Ignore);
        } else if attrs.contains("eID") || !self.frames.has_room() {
            self.frames.push(GroupFrame::Ignore);
        } else {
            ctx.write("<div class='lg'>");
            self.frames.push(GroupFrame::Group);
        }
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        if self.frames.pop() == GroupFrame::Group {
            ctx.write("</div>");
        }
    }
}

/// Handler for `<lb>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineBreakHandler;

impl ElementHandler for LineBreakHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        match attrs.get("type") {
            Some("x-end-paragraph") | Some("x-begin-paragraph") => ctx.write_paragraph_break(),
            _ => ctx.write_line_break(),
        }
    }

    fn end(&mut self, _ctx: &mut RenderContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::params::RenderParameters;

    #[test]
    fn test_container_line_indents_and_breaks() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        let mut line = LineHandler::new(8);
        ctx.write_text("Psalm");
        line.start(&attrs(&[("level", "2")]), &mut ctx);
        ctx.write_text("The LORD");
        line.end(&mut ctx);
        assert_eq!(ctx.out.as_str(), "Psalm&#160;&#160;The LORD<br />");
    }

    #[test]
    fn test_milestone_lines() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        let mut line = LineHandler::new(8);
        line.start(&attrs(&[("sID", "l1")]), &mut ctx);
        line.end(&mut ctx);
        ctx.write_text("line one");
        line.start(&attrs(&[("eID", "l1")]), &mut ctx);
        line.end(&mut ctx);
        assert_eq!(ctx.out.as_str(), "line one<br />");
    }

    #[test]
    fn test_leading_line_break_suppressed() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        let mut line = LineHandler::new(8);
        line.start(&attrs(&[("type", "x-br")]), &mut ctx);
        line.end(&mut ctx);
        LineBreakHandler.start(&attrs(&[]), &mut ctx);
        assert_eq!(ctx.out.as_str(), "");
    }

    #[test]
    fn test_line_group_container_and_milestone() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        let mut lg = LineGroupHandler::new(8);
        lg.start(&attrs(&[]), &mut ctx);
        ctx.write_text("verse");
        lg.end(&mut ctx);
        lg.start(&attrs(&[("sID", "lg1")]), &mut ctx);
        lg.end(&mut ctx);
        assert_eq!(
            ctx.out.as_str(),
            "<div class='lg'>verse</div><div class='breakline'></div>"
        );
    }

    #[test]
    fn test_paragraph_line_break() {
        let params = RenderParameters::default();
        let mut ctx = context(&params);
        ctx.write_text("end");
        LineBreakHandler.start(&attrs(&[("type", "x-end-paragraph")]), &mut ctx);
        assert_eq!(ctx.out.as_str(), "end<div class='breakline'></div>");
    }
}
