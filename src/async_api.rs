//! Optional async helpers for rendering OSIS files.
//!
//! This module is available with the `async` feature.

use std::path::Path;

use crate::dispatcher::RenderedPassage;
use crate::error::OsisError;
use crate::params::RenderParameters;
use crate::passage::ReferenceResolver;
use crate::reader::{render_osis_str, render_osis_str_with_resolver};

/// Read an OSIS file asynchronously and render it.
///
/// The file is read with `tokio::fs`; rendering itself is synchronous.
pub async fn render_osis_file_async<P: AsRef<Path>>(
    path: P,
    params: &RenderParameters,
) -> Result<RenderedPassage, OsisError> {
    let xml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| OsisError::Io(e.to_string()))?;
    render_osis_str(&xml, params)
}

/// Read an OSIS file asynchronously and render it with a custom resolver.
pub async fn render_osis_file_async_with_resolver<P: AsRef<Path>>(
    path: P,
    params: &RenderParameters,
    resolver: &(dyn ReferenceResolver + Sync),
) -> Result<RenderedPassage, OsisError> {
    let xml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| OsisError::Io(e.to_string()))?;
    render_osis_str_with_resolver(&xml, params, resolver)
}
