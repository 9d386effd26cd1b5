//! Error and diagnostic types for mu-osis
//!
//! `OsisError` covers failures that stop a conversion before it starts
//! (unreadable input). `RenderIssue` covers everything a pass can survive:
//! the renderer records the issue, logs it and keeps going.

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;

/// Top-level error type for mu-osis operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OsisError {
    /// The OSIS text could not be tokenized as XML
    Parse(String),
    /// I/O error (description only, since `std::io::Error` is not `Clone`)
    Io(String),
}

impl fmt::Display for OsisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsisError::Parse(msg) => write!(f, "Parse error: {}", msg),
            OsisError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OsisError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for OsisError {
    fn from(err: std::io::Error) -> Self {
        OsisError::Io(err.to_string())
    }
}

impl From<quick_xml::Error> for OsisError {
    fn from(err: quick_xml::Error) -> Self {
        OsisError::Parse(err.to_string())
    }
}

/// Non-fatal problem found while rendering a passage.
///
/// Malformed documents are common in real modules, so only
/// [`RenderIssue::OutputTooLarge`] ends a pass early.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum RenderIssue {
    /// An attribute held a value that could not be interpreted.
    MalformedAttribute {
        /// Element carrying the attribute.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Raw attribute value.
        value: String,
    },
    /// A reference could not be resolved and was rendered as plain text.
    UnresolvedReference {
        /// Raw reference text or `osisRef` target.
        reference: String,
    },
    /// An insertion window or capture scope was still open at a boundary.
    UnbalancedMarkup {
        /// Where the imbalance was detected.
        context: String,
    },
    /// The output cap was reached and the pass was abandoned.
    OutputTooLarge {
        /// Configured byte limit.
        limit: usize,
    },
}

impl RenderIssue {
    /// Whether this issue ends the pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderIssue::OutputTooLarge { .. })
    }
}

impl fmt::Display for RenderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderIssue::MalformedAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "malformed attribute {}@{}='{}'",
                element, attribute, value
            ),
            RenderIssue::UnresolvedReference { reference } => {
                write!(f, "unresolved reference '{}'", reference)
            }
            RenderIssue::UnbalancedMarkup { context } => {
                write!(f, "unbalanced markup: {}", context)
            }
            RenderIssue::OutputTooLarge { limit } => {
                write!(f, "output exceeds {} bytes", limit)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RenderIssue {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osis_error_display() {
        let err = OsisError::Parse("bad xml".into());
        assert_eq!(format!("{}", err), "Parse error: bad xml");
    }

    #[test]
    fn test_malformed_attribute_display() {
        let issue = RenderIssue::MalformedAttribute {
            element: "title".into(),
            attribute: "level".into(),
            value: "two".into(),
        };
        assert_eq!(issue.to_string(), "malformed attribute title@level='two'");
        assert!(!issue.is_fatal());
    }

    #[test]
    fn test_only_output_too_large_is_fatal() {
        assert!(RenderIssue::OutputTooLarge { limit: 10 }.is_fatal());
        assert!(!RenderIssue::UnbalancedMarkup {
            context: "verse end".into()
        }
        .is_fatal());
    }
}
