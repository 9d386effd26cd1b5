//! Locale-specific character filtering applied to text before output.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;

/// Text filter selected once per pass from the document language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextFilter {
    /// Pass text through unchanged.
    #[default]
    None,
    /// Remove Hebrew cantillation marks (U+0591..=U+05AF), keeping vowel points.
    StripHebrewCantillation,
}

impl TextFilter {
    /// Filter for a BCP-47 language code.
    pub fn for_language(code: &str) -> Self {
        let primary = code.split(['-', '_']).next().unwrap_or("");
        match primary {
            "he" | "hbo" | "iw" => TextFilter::StripHebrewCantillation,
            _ => TextFilter::None,
        }
    }

    /// Apply the filter, borrowing when nothing changes.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            TextFilter::None => Cow::Borrowed(text),
            TextFilter::StripHebrewCantillation => {
                if !text.chars().any(is_cantillation) {
                    return Cow::Borrowed(text);
                }
                let filtered: String = text.chars().filter(|c| !is_cantillation(*c)).collect();
                Cow::Owned(filtered)
            }
        }
    }
}

fn is_cantillation(c: char) -> bool {
    ('\u{0591}'..='\u{05AF}').contains(&c)
}
