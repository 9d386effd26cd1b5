//! Event dispatch and pass lifecycle.
//!
//! A [`Dispatcher`] owns everything one render pass needs. Events are
//! routed by element name to the registered [`ElementHandler`]s; character
//! data goes through the pass's [`TextFilter`] straight into the buffer.

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;

use quick_xml::escape::escape;

use crate::error::RenderIssue;
use crate::event::MarkupEvent;
use crate::filter::TextFilter;
use crate::handlers::block::{
    DivHandler, FigureHandler, HiHandler, MilestoneHandler, ParagraphHandler, WrapHandler,
};
use crate::handlers::line::{LineBreakHandler, LineGroupHandler, LineHandler};
use crate::handlers::note::{NoteHandler, ReferenceHandler};
use crate::handlers::quote::QuoteHandler;
use crate::handlers::title::TitleHandler;
use crate::handlers::verse::{close_verse, ChapterHandler, VerseHandler};
use crate::handlers::word::WordHandler;
use crate::handlers::{ElementHandler, RenderContext};
use crate::note::Note;
use crate::params::RenderParameters;
use crate::passage::{OsisRefResolver, ReferenceResolver};

/// HTML returned in place of a passage that hit the output cap.
pub const OVERSIZE_PLACEHOLDER: &str =
    "<div class='passage-error'>This passage is too large to display.</div>";

/// How a pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PassStatus {
    /// All events were rendered.
    Complete,
    /// The output cap was hit; `html` is a placeholder.
    OutputTooLarge {
        /// Configured byte limit.
        limit: usize,
    },
}

/// Result of one render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderedPassage {
    /// HTML fragment.
    pub html: String,
    /// Extracted notes in document order.
    pub notes: Vec<Note>,
    /// Non-fatal problems found during the pass.
    pub issues: Vec<RenderIssue>,
    /// Completion status.
    pub status: PassStatus,
}

impl RenderedPassage {
    /// Whether the whole passage was rendered.
    pub fn is_complete(&self) -> bool {
        self.status == PassStatus::Complete
    }
}

type HandlerMap = BTreeMap<&'static str, Box<dyn ElementHandler>>;

/// Single-pass OSIS event consumer.
pub struct Dispatcher<'a> {
    ctx: RenderContext<'a>,
    handlers: HandlerMap,
    filter: TextFilter,
    aborted: bool,
}

impl<'a> Dispatcher<'a> {
    /// Start a pass and write the passage wrapper.
    pub fn new(params: &'a RenderParameters, resolver: &'a dyn ReferenceResolver) -> Self {
        let mut ctx = RenderContext::new(params, resolver);
        let dir = if params.left_to_right { "ltr" } else { "rtl" };
        ctx.write(&format!(
            "<div class='passage' dir='{}' lang='{}'>",
            dir,
            escape(params.language_code.as_str())
        ));

        Self {
            ctx,
            handlers: default_handlers(params.limits.max_nesting),
            filter: TextFilter::for_language(&params.language_code),
            aborted: false,
        }
    }

    /// Feed one event.
    pub fn handle(&mut self, event: &MarkupEvent) {
        if self.aborted {
            return;
        }
        match event {
            MarkupEvent::ElementStart { name, attributes } => {
                match self.handlers.get_mut(name.as_str()) {
                    Some(handler) => handler.start(attributes, &mut self.ctx),
                    None => log::trace!("[OSIS] Ignoring <{}>", name),
                }
            }
            MarkupEvent::Characters { text } => {
                let filtered = self.filter.apply(text);
                self.ctx.write_text(&filtered);
            }
            MarkupEvent::ElementEnd { name } => {
                if let Some(handler) = self.handlers.get_mut(name.as_str()) {
                    handler.end(&mut self.ctx);
                }
            }
        }
        if self.ctx.out.overflowed() {
            log::warn!("[OSIS] Output limit reached; abandoning pass");
            self.aborted = true;
        }
    }

    /// Whether the output cap stopped the pass.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// HTML rendered so far, without the closing wrapper.
    pub fn html(&self) -> &str {
        self.ctx.out.as_str()
    }

    /// End the pass.
    pub fn finish(mut self) -> RenderedPassage {
        if !self.aborted {
            if self.ctx.verse.open {
                let context = format!(
                    "verse {} still open at end of passage",
                    self.ctx.verse.anchor_id()
                );
                self.ctx.unbalanced(&context);
                close_verse(&mut self.ctx);
            }
            if self.ctx.out.abort_unterminated_insert() {
                self.ctx.unbalanced("insertion window open at end of passage");
            }
            if self.ctx.out.reset_capture() > 0 {
                self.ctx.unbalanced("capture scope open at end of passage");
            }
            self.ctx.write("</div>");
        }

        let RenderContext {
            params,
            out,
            collected,
            mut issues,
            ..
        } = self.ctx;

        if out.overflowed() {
            let limit = params.limits.max_output_bytes.unwrap_or(0);
            let issue = RenderIssue::OutputTooLarge { limit };
            log::warn!("[OSIS] {}", issue);
            issues.push(issue);
            return RenderedPassage {
                html: String::from(OVERSIZE_PLACEHOLDER),
                notes: Vec::new(),
                issues,
                status: PassStatus::OutputTooLarge { limit },
            };
        }

        RenderedPassage {
            html: out.into_string(),
            notes: collected,
            issues,
            status: PassStatus::Complete,
        }
    }
}

fn default_handlers(max_nesting: usize) -> HandlerMap {
    let mut handlers: HandlerMap = BTreeMap::new();
    handlers.insert("verse", Box::new(VerseHandler::new(max_nesting)));
    handlers.insert("chapter", Box::new(ChapterHandler));
    handlers.insert("title", Box::new(TitleHandler::new(max_nesting)));
    handlers.insert("note", Box::new(NoteHandler::new(max_nesting)));
    handlers.insert("reference", Box::new(ReferenceHandler::new(max_nesting)));
    handlers.insert("w", Box::new(WordHandler::new(max_nesting)));
    handlers.insert("q", Box::new(QuoteHandler::new(max_nesting)));
    handlers.insert("l", Box::new(LineHandler::new(max_nesting)));
    handlers.insert("lg", Box::new(LineGroupHandler::new(max_nesting)));
    handlers.insert("lb", Box::new(LineBreakHandler));
    handlers.insert("p", Box::new(ParagraphHandler::new(max_nesting)));
    handlers.insert("div", Box::new(DivHandler::new(max_nesting)));
    handlers.insert("milestone", Box::new(MilestoneHandler));
    handlers.insert("list", Box::new(WrapHandler::new("<ul>", "</ul>")));
    handlers.insert("item", Box::new(WrapHandler::new("<li>", "</li>")));
    handlers.insert("table", Box::new(WrapHandler::new("<table>", "</table>")));
    handlers.insert("row", Box::new(WrapHandler::new("<tr>", "</tr>")));
    handlers.insert("cell", Box::new(WrapHandler::new("<td>", "</td>")));
    handlers.insert("figure", Box::new(FigureHandler));
    handlers.insert(
        "divineName",
        Box::new(WrapHandler::new("<span class='divineName'>", "</span>")),
    );
    handlers.insert(
        "transChange",
        Box::new(WrapHandler::new("<span class='transChange'>", "</span>")),
    );
    handlers.insert("hi", Box::new(HiHandler::new(max_nesting)));
    handlers
}

/// Render an event stream with the built-in OSIS reference resolver.
pub fn render<I>(events: I, params: &RenderParameters) -> RenderedPassage
where
    I: IntoIterator,
    I::Item: Borrow<MarkupEvent>,
{
    render_with_resolver(events, params, &OsisRefResolver)
}

/// Render an event stream with a caller-supplied resolver.
pub fn render_with_resolver<I>(
    events: I,
    params: &RenderParameters,
    resolver: &dyn ReferenceResolver,
) -> RenderedPassage
where
    I: IntoIterator,
    I::Item: Borrow<MarkupEvent>,
{
    let mut dispatcher = Dispatcher::new(params, resolver);
    for event in events {
        dispatcher.handle(event.borrow());
        if dispatcher.is_aborted() {
            break;
        }
    }
    dispatcher.finish()
}
