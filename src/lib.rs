//! mu-osis -- Memory-efficient streaming OSIS to HTML renderer
//!
//! Single-pass converter for Bible readers: a stream of OSIS markup events
//! for one chapter, commentary entry or dictionary article goes in, an HTML
//! fragment plus the footnotes and cross-references lifted out of it come
//! out. No DOM is built; section titles that arrive after a verse number are
//! spliced in front of it through a bounded insertion window.
//!
//! # Features
//!
//! - `std` (default) -- file helpers and `std::error::Error` impls
//! - `async` -- tokio-based file helpers
//! - `serde` -- `Serialize` for rendered passages and notes
//! - `cli` -- the `mu-osis` command-line renderer
//!
//! # Allocation Behavior
//!
//! Handler nesting is bounded by fixed-capacity stacks and output size is
//! capped by [`RenderLimits::max_output_bytes`]. A pass that hits the cap
//! stops early and reports [`PassStatus::OutputTooLarge`].
//!
//! # Example
//!
//! ```
//! use mu_osis::{render_osis_str, RenderParameters};
//!
//! let xml = r#"<verse osisID="Gen.1.1">In the beginning</verse>"#;
//! let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
//! assert!(passage.html.contains("<span class='verse' id='1.1'>"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(clippy::large_enum_variant, clippy::large_stack_arrays, clippy::redundant_clone)]
#![warn(
    clippy::box_collection,
    clippy::needless_collect,
    clippy::map_clone,
    clippy::implicit_clone,
    clippy::inefficient_to_string
)]

extern crate alloc;

pub mod buffer;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod filter;
pub mod handlers;
pub mod note;
pub mod params;
pub mod passage;
pub mod reader;
pub mod state;
pub mod strongs;

#[cfg(feature = "async")]
pub mod async_api;

// Re-export key types for convenience
#[cfg(feature = "async")]
pub use async_api::{render_osis_file_async, render_osis_file_async_with_resolver};
pub use buffer::OutputBuffer;
pub use dispatcher::{render, render_with_resolver, Dispatcher, PassStatus, RenderedPassage};
pub use error::{OsisError, RenderIssue};
pub use event::{Attributes, MarkupEvent};
pub use filter::TextFilter;
pub use note::{Note, NoteKind};
pub use params::{RenderLimits, RenderParameters, VerseKey};
pub use passage::{OsisRefResolver, ReferenceResolver, UnresolvedReference, VerseRange, VerseRef};
#[cfg(feature = "std")]
pub use reader::render_osis_file;
pub use reader::{parse_osis, parse_osis_events, render_osis_str, render_osis_str_with_resolver};
pub use strongs::{merge_lexical_tags, LexicalTag, StrongsNumber};
