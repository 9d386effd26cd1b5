//! Strong's number and morphology link formatting.
//!
//! A `<w>` element carries parallel, whitespace-separated `lemma` and
//! `morph` lists. They are paired by index (the lists may differ in length)
//! and the merged list is reversed before rendering: modules store the
//! generic tags last but readers expect them first.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use quick_xml::escape::escape;

/// Lexicon a Strong's number belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrongsLanguage {
    /// Old Testament Hebrew/Aramaic.
    Hebrew,
    /// New Testament Greek.
    Greek,
}

impl StrongsLanguage {
    /// Lookup protocol for this lexicon.
    pub fn protocol(self) -> &'static str {
        match self {
            StrongsLanguage::Hebrew => "hdef",
            StrongsLanguage::Greek => "gdef",
        }
    }
}

/// Parsed Strong's number (`strong:H0430`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrongsNumber {
    /// Lexicon.
    pub language: StrongsLanguage,
    /// Digits as written in the source.
    pub digits: String,
    /// Numeric id.
    pub id: u32,
}

impl StrongsNumber {
    /// Parse a lemma entry such as `strong:H0430` or `strong:G3056a`.
    pub fn parse(lemma: &str) -> Option<Self> {
        let raw = lemma.strip_prefix("strong:")?;
        let mut chars = raw.chars();
        let language = match chars.next()? {
            'H' | 'h' => StrongsLanguage::Hebrew,
            'G' | 'g' => StrongsLanguage::Greek,
            _ => return None,
        };
        let rest = chars.as_str();
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..end];
        let id = digits.parse().ok()?;
        Some(Self {
            language,
            digits: digits.into(),
            id,
        })
    }

    /// Lookup address, id zero-padded to five digits (`hdef:00430`).
    pub fn address(&self) -> String {
        format!("{}:{:05}", self.language.protocol(), self.id)
    }
}

/// One lemma/morphology pair after merging.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexicalTag {
    /// Lemma entry at this index, if any.
    pub lemma: Option<String>,
    /// Morphology entry at this index, if any.
    pub morph: Option<String>,
}

/// Pair `lemma` and `morph` entries by index and reverse the result.
///
/// The result always has `max(lemmas, morphs)` entries.
pub fn merge_lexical_tags(lemma: &str, morph: Option<&str>) -> Vec<LexicalTag> {
    let lemmas: Vec<&str> = lemma.split_whitespace().collect();
    let morphs: Vec<&str> = morph.map(|m| m.split_whitespace().collect()).unwrap_or_default();
    let len = lemmas.len().max(morphs.len());

    let mut tags: Vec<LexicalTag> = (0..len)
        .map(|i| LexicalTag {
            lemma: lemmas.get(i).map(|s| String::from(*s)),
            morph: morphs.get(i).map(|s| String::from(*s)),
        })
        .collect();
    tags.reverse();
    tags
}

/// Render merged tags as lookup links. Empty when nothing is linkable.
pub fn render_lexical_links(tags: &[LexicalTag], strongs: bool, morphology: bool) -> String {
    let mut out = String::new();
    for tag in tags {
        if strongs {
            if let Some(number) = tag.lemma.as_deref().and_then(StrongsNumber::parse) {
                push_separated(
                    &mut out,
                    &format!(
                        "<a href='{}' class='strongs'>{}</a>",
                        number.address(),
                        number.digits
                    ),
                );
            }
        }
        if morphology {
            if let Some(code) = tag.morph.as_deref().and_then(|m| m.strip_prefix("robinson:")) {
                let code = escape(code);
                push_separated(
                    &mut out,
                    &format!("<a href='robinson:{}' class='morphology'>{}</a>", code, code),
                );
            }
        }
    }
    out
}

fn push_separated(out: &mut String, link: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(link);
}
