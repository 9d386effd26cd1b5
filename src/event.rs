//! Markup events consumed by the renderer.
//!
//! Any OSIS reader can drive the renderer as long as it delivers events in
//! document order. Empty elements (`<verse eID="Gen.1.1"/>`) are delivered as
//! an `ElementStart` immediately followed by the matching `ElementEnd`.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// One event of the markup stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupEvent {
    /// Opening tag.
    ElementStart {
        /// Local element name (`verse`, `note`, ...).
        name: String,
        /// Attributes in document order.
        attributes: Attributes,
    },
    /// Character data, entities already resolved.
    Characters {
        /// Text payload.
        text: String,
    },
    /// Closing tag.
    ElementEnd {
        /// Local element name.
        name: String,
    },
}

impl MarkupEvent {
    /// Convenience constructor for a start tag.
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> Self {
        MarkupEvent::ElementStart {
            name: name.into(),
            attributes: Attributes::from_pairs(attributes),
        }
    }

    /// Convenience constructor for character data.
    pub fn text(text: &str) -> Self {
        MarkupEvent::Characters { text: text.into() }
    }

    /// Convenience constructor for an end tag.
    pub fn end(name: &str) -> Self {
        MarkupEvent::ElementEnd { name: name.into() }
    }
}

/// Ordered attribute list of one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    /// Empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from borrowed pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            pairs: pairs
                .iter()
                .map(|(k, v)| (String::from(*k), String::from(*v)))
                .collect(),
        }
    }

    /// Append an attribute.
    pub fn push(&mut self, name: String, value: String) {
        self.pairs.push((name, value));
    }

    /// Value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `name` when present and not blank.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_match() {
        let attrs = Attributes::from_pairs(&[("type", "x-p"), ("type", "line")]);
        assert_eq!(attrs.get("type"), Some("x-p"));
        assert_eq!(attrs.get("marker"), None);
    }

    #[test]
    fn test_non_empty_skips_blank_values() {
        let attrs = Attributes::from_pairs(&[("marker", ""), ("n", " a ")]);
        assert_eq!(attrs.non_empty("marker"), None);
        assert_eq!(attrs.non_empty("n"), Some(" a "));
        assert!(attrs.contains("marker"));
    }
}
