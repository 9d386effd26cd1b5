//! `<w>` words with lexical annotations.

extern crate alloc;

use alloc::string::String;

use super::{ElementHandler, FrameStack, RenderContext};
use crate::event::Attributes;
use crate::strongs::{merge_lexical_tags, render_lexical_links};

/// Handler for `<w>`: writes Strong's/morphology links after the word.
#[derive(Debug)]
pub struct WordHandler {
    frames: FrameStack<Option<String>>,
}

impl WordHandler {
    /// Handler with the given nesting limit.
    pub fn new(max_nesting: usize) -> Self {
        Self {
            frames: FrameStack::new(max_nesting),
        }
    }
}

impl ElementHandler for WordHandler {
    fn start(&mut self, attrs: &Attributes, ctx: &mut RenderContext<'_>) {
        let params = ctx.params;
        let links = match attrs.non_empty("lemma") {
            Some(lemma) if params.wants_lexical_links() => {
                let tags = merge_lexical_tags(lemma, attrs.get("morph"));
                let html = render_lexical_links(&tags, params.show_strongs, params.show_morphology);
                (!html.is_empty()).then_some(html)
            }
            _ => None,
        };
        self.frames.push(links);
    }

    fn end(&mut self, ctx: &mut RenderContext<'_>) {
        let links = self.frames.pop();
        // Note bodies stay plain text.
        if ctx.out.is_capturing() {
            return;
        }
        if let Some(links) = links {
            ctx.write(" ");
            ctx.write(&links);
        }
    }
}
