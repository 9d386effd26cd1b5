//! OSIS XML to markup events.
//!
//! Events are streamed to a callback as `quick-xml` produces them; nothing
//! is collected unless the caller asks for a `Vec`. Empty elements are
//! delivered as a start immediately followed by an end, and the OSIS
//! `<header>` subtree is skipped.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::ControlFlow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::dispatcher::{Dispatcher, RenderedPassage};
use crate::error::OsisError;
use crate::event::{Attributes, MarkupEvent};
use crate::params::RenderParameters;
use crate::passage::{OsisRefResolver, ReferenceResolver};

/// Stream OSIS XML as markup events.
///
/// The callback can stop the parse early by returning `ControlFlow::Break`.
pub fn parse_osis_events<F>(xml: &str, mut on_event: F) -> Result<(), OsisError>
where
    F: FnMut(MarkupEvent) -> ControlFlow<()>,
{
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    reader.config_mut().expand_empty_elements = false;

    let mut buf = Vec::new();
    // Depth inside a skipped subtree
    let mut skip_depth: usize = 0;

    loop {
        let flow = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = decode_name(e.local_name().as_ref(), &reader)?;
                if skip_depth > 0 || should_skip_element(&name) {
                    skip_depth += 1;
                    ControlFlow::Continue(())
                } else {
                    let attributes = read_attributes(&e, &reader)?;
                    on_event(MarkupEvent::ElementStart { name, attributes })
                }
            }
            Event::Empty(e) => {
                if skip_depth > 0 {
                    ControlFlow::Continue(())
                } else {
                    let name = decode_name(e.local_name().as_ref(), &reader)?;
                    let attributes = read_attributes(&e, &reader)?;
                    match on_event(MarkupEvent::ElementStart {
                        name: name.clone(),
                        attributes,
                    }) {
                        ControlFlow::Continue(()) => on_event(MarkupEvent::ElementEnd { name }),
                        ControlFlow::Break(()) => ControlFlow::Break(()),
                    }
                }
            }
            Event::End(e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    ControlFlow::Continue(())
                } else {
                    let name = decode_name(e.local_name().as_ref(), &reader)?;
                    on_event(MarkupEvent::ElementEnd { name })
                }
            }
            Event::Text(e) => {
                if skip_depth > 0 {
                    ControlFlow::Continue(())
                } else {
                    let text = e
                        .decode()
                        .map_err(|e| OsisError::Parse(format!("Decode error: {:?}", e)))?;
                    emit_text(&text, &mut on_event)
                }
            }
            Event::CData(e) => {
                if skip_depth > 0 {
                    ControlFlow::Continue(())
                } else {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|e| OsisError::Parse(format!("Decode error: {:?}", e)))?;
                    emit_text(&text, &mut on_event)
                }
            }
            Event::GeneralRef(e) => {
                if skip_depth > 0 {
                    ControlFlow::Continue(())
                } else {
                    let entity = e
                        .decode()
                        .map_err(|e| OsisError::Parse(format!("Decode error: {:?}", e)))?;
                    let raw = format!("&{};", entity);
                    let resolved = unescape(&raw)
                        .map_err(|e| OsisError::Parse(format!("Unescape error: {:?}", e)))?;
                    emit_text(&resolved, &mut on_event)
                }
            }
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
                ControlFlow::Continue(())
            }
            Event::Eof => break,
        };
        if flow.is_break() {
            log::debug!("[OSIS] Event stream stopped by consumer");
            break;
        }
        buf.clear();
    }

    Ok(())
}

/// Parse OSIS XML into a vector of markup events.
pub fn parse_osis(xml: &str) -> Result<Vec<MarkupEvent>, OsisError> {
    let mut events = Vec::new();
    parse_osis_events(xml, |event| {
        events.push(event);
        ControlFlow::Continue(())
    })?;
    Ok(events)
}

/// Render OSIS XML with the built-in reference resolver.
pub fn render_osis_str(xml: &str, params: &RenderParameters) -> Result<RenderedPassage, OsisError> {
    render_osis_str_with_resolver(xml, params, &OsisRefResolver)
}

/// Render OSIS XML with a caller-supplied resolver.
pub fn render_osis_str_with_resolver(
    xml: &str,
    params: &RenderParameters,
    resolver: &dyn ReferenceResolver,
) -> Result<RenderedPassage, OsisError> {
    let mut dispatcher = Dispatcher::new(params, resolver);
    parse_osis_events(xml, |event| {
        dispatcher.handle(&event);
        if dispatcher.is_aborted() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    Ok(dispatcher.finish())
}

/// Read and render an OSIS file.
#[cfg(feature = "std")]
pub fn render_osis_file<P: AsRef<std::path::Path>>(
    path: P,
    params: &RenderParameters,
) -> Result<RenderedPassage, OsisError> {
    let xml = std::fs::read_to_string(path)?;
    render_osis_str(&xml, params)
}

fn emit_text<F>(text: &str, on_event: &mut F) -> ControlFlow<()>
where
    F: FnMut(MarkupEvent) -> ControlFlow<()>,
{
    if text.is_empty() {
        return ControlFlow::Continue(());
    }
    on_event(MarkupEvent::Characters {
        text: text.to_string(),
    })
}

/// Subtrees that carry document metadata rather than content.
fn should_skip_element(name: &str) -> bool {
    matches!(name, "header")
}

fn read_attributes(e: &BytesStart, reader: &Reader<&[u8]>) -> Result<Attributes, OsisError> {
    let mut attributes = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| OsisError::Parse(format!("Attribute error: {:?}", e)))?;
        let key = decode_name(attr.key.local_name().as_ref(), reader)?;
        let raw = reader
            .decoder()
            .decode(&attr.value)
            .map_err(|e| OsisError::Parse(format!("Decode error: {:?}", e)))?;
        let value = unescape(&raw)
            .map_err(|e| OsisError::Parse(format!("Unescape error: {:?}", e)))?;
        attributes.push(key, value.into_owned());
    }
    Ok(attributes)
}

fn decode_name(name: &[u8], reader: &Reader<&[u8]>) -> Result<String, OsisError> {
    reader
        .decoder()
        .decode(name)
        .map_err(|e| OsisError::Parse(format!("Decode error: {:?}", e)))
        .map(|s| s.to_string())
}
